use serde::{Deserialize, Serialize};

use tactics_core::{CommandKind, Position, UnitId, UnitState};

/// A scored decision for one unit: what to do and where.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AiAction {
    pub unit: UnitId,
    /// Tile the unit stood on when the action was planned.
    pub origin: Position,
    /// Move destination, or the defender's tile for attacks.
    pub destination: Position,
    pub kind: CommandKind,
    pub score: f32,
}

impl AiAction {
    pub fn attack(unit: &UnitState, target: Position, score: f32) -> Self {
        Self {
            unit: unit.id,
            origin: unit.position,
            destination: target,
            kind: CommandKind::Attack,
            score,
        }
    }

    pub fn movement(unit: &UnitState, destination: Position, score: f32) -> Self {
        Self {
            unit: unit.id,
            origin: unit.position,
            destination,
            kind: CommandKind::Move,
            score,
        }
    }

    pub fn is_attack(&self) -> bool {
        self.kind == CommandKind::Attack
    }
}

/// Planner output for a whole side.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SidePlan {
    pub actions: Vec<AiAction>,
    /// Units for which no candidate scored.
    pub idle: Vec<UnitId>,
}
