//! Turn state machine and command entry points.
//!
//! [`BattleEngine`] borrows the [`BattleState`] mutably. It builds and
//! executes commands, resolves deaths, and keeps turn bookkeeping.

mod errors;
mod turns;

pub use errors::TurnError;

use tracing::{debug, info};

use crate::action::{AttackCommand, BattleCommand, CommandError, CommandKind, MoveCommand};
use crate::env::BattleEnv;
use crate::grid::collect_range;
use crate::state::{BattleState, Position, Side, UnitId};

/// Coarse battle phase derived from the state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattlePhase {
    PlayerTurn,
    EnemyTurn,
    Ended { loser: Side },
}

impl BattlePhase {
    /// Phase of `state`; a wiped-out side ends the battle whoever is active.
    pub fn of(state: &BattleState) -> Self {
        if let Some(loser) = state.defeated_side() {
            return BattlePhase::Ended { loser };
        }
        match state.turn.active_side {
            Side::Player => BattlePhase::PlayerTurn,
            Side::Enemy => BattlePhase::EnemyTurn,
        }
    }

    pub fn is_over(&self) -> bool {
        matches!(self, BattlePhase::Ended { .. })
    }
}

/// Result of executing a command through the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CommandOutcome {
    pub actor: UnitId,
    pub kind: CommandKind,
    pub destination: Position,
    /// Unit killed by the command and the side it fought for.
    pub fallen: Option<(UnitId, Side)>,
    /// Losing side, when the command ended the battle.
    pub loser: Option<Side>,
}

pub struct BattleEngine<'a> {
    state: &'a mut BattleState,
}

impl<'a> BattleEngine<'a> {
    pub fn new(state: &'a mut BattleState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &BattleState {
        &*self.state
    }

    /// Builds a command for `unit` toward `destination` using a fresh range
    /// query from the unit's current tile.
    pub fn build_command(
        &self,
        env: &BattleEnv<'_>,
        kind: CommandKind,
        unit: UnitId,
        destination: Position,
    ) -> Result<BattleCommand, TurnError> {
        let map = env.map()?;
        let origin = self
            .state
            .unit(unit)
            .map(|state| state.position)
            .ok_or(TurnError::UnitNotFound { unit })?;
        let range = collect_range(map, origin, destination);

        Ok(match kind {
            CommandKind::Move => MoveCommand::new(unit, range, destination).into(),
            CommandKind::Attack => AttackCommand::new(unit, range, destination).into(),
        })
    }

    /// Executes a command and resolves any resulting death.
    pub fn execute(&mut self, command: &mut BattleCommand) -> Result<CommandOutcome, CommandError> {
        let fallen = command.execute(self.state)?;
        let outcome = self.settle(command.actor(), command.kind(), command.destination(), fallen);
        Ok(outcome)
    }

    /// Records the consequences of a command that has already been applied.
    pub fn settle(
        &mut self,
        actor: UnitId,
        kind: CommandKind,
        destination: Position,
        fallen: Option<UnitId>,
    ) -> CommandOutcome {
        let fallen = fallen.and_then(|id| {
            let side = self.state.units.fallen(id).map(|unit| unit.side)?;
            info!(target: "core::turn", unit = %id, side = %side, "unit fell");
            Some((id, side))
        });

        let loser = self.state.defeated_side();
        if let Some(loser) = loser {
            info!(target: "core::turn", loser = %loser, "battle ended");
        }

        debug!(
            target: "core::turn",
            actor = %actor,
            kind = %kind,
            destination = %destination,
            "command settled"
        );

        CommandOutcome {
            actor,
            kind,
            destination,
            fallen,
            loser,
        }
    }
}
