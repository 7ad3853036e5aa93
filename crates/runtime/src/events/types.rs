//! Event types for different topics.

use serde::{Deserialize, Serialize};

use tactics_core::{CommandKind, Position, Side, UnitId};

use crate::providers::ai::AiAction;

/// Changes on the battlefield itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BattleEvent {
    UnitMoved {
        unit: UnitId,
        from: Position,
        to: Position,
    },
    UnitAttacked {
        attacker: UnitId,
        defender: UnitId,
        target: Position,
        damage: f32,
    },
    UnitDied {
        unit: UnitId,
        side: Side,
    },
    UnitExhausted {
        unit: UnitId,
    },
    BattleEnded {
        loser: Side,
    },
}

/// Turn flow and the planner preview shown to the manual side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TurnEvent {
    TurnStarted { side: Side, round: u32 },
    UnitSkipped { unit: UnitId },
    CommandUndone { kind: CommandKind },
    /// Planned actions of the planner side for its next turn.
    PreviewUpdated { actions: Vec<AiAction> },
    PreviewCleared,
    /// A previewed unit died before it could act.
    PreviewWithdrawn { unit: UnitId },
}

/// Planner execution results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AiEvent {
    ActionExecuted { action: AiAction, fallback: bool },
    ActionFailed { action: AiAction },
    NoLegalAction { unit: UnitId },
}
