//! Asynchronous abstraction for sourcing player intent.
//!
//! Runtime users plug in [`IntentProvider`] implementations so the manual side
//! can be played by a human front-end, a scripted fixture, or the tactical
//! planner itself.
use std::collections::VecDeque;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use tactics_core::{BattleState, CommandKind, GridMap, Position, Side, UnitId};

use super::errors::Result;

/// One decision for the manual side.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Intent {
    /// Build and submit a command from the unit's current tile.
    Command {
        kind: CommandKind,
        unit: UnitId,
        destination: Position,
    },
    /// End the unit's turn without acting.
    Skip { unit: UnitId },
    /// Revert the last recorded move.
    Undo,
}

impl Intent {
    pub fn movement(unit: UnitId, destination: Position) -> Self {
        Intent::Command {
            kind: CommandKind::Move,
            unit,
            destination,
        }
    }

    pub fn attack(unit: UnitId, target: Position) -> Self {
        Intent::Command {
            kind: CommandKind::Attack,
            unit,
            destination: target,
        }
    }

    pub fn unit(&self) -> Option<UnitId> {
        match self {
            Intent::Command { unit, .. } | Intent::Skip { unit } => Some(*unit),
            Intent::Undo => None,
        }
    }
}

/// Source of intents for the side that is not driven by the planner.
///
/// Returning `Ok(None)` hands control back to the caller with the turn still
/// open (e.g. the front-end is waiting for input).
#[async_trait]
pub trait IntentProvider: Send + Sync {
    async fn next_intent(
        &self,
        side: Side,
        state: &BattleState,
        map: &GridMap,
    ) -> Result<Option<Intent>>;
}

/// Replays a fixed list of intents; useful for tests and recorded sessions.
pub struct ScriptedIntentProvider {
    intents: Mutex<VecDeque<Intent>>,
}

impl ScriptedIntentProvider {
    pub fn new(intents: impl IntoIterator<Item = Intent>) -> Self {
        Self {
            intents: Mutex::new(intents.into_iter().collect()),
        }
    }

    pub async fn remaining(&self) -> usize {
        self.intents.lock().await.len()
    }
}

#[async_trait]
impl IntentProvider for ScriptedIntentProvider {
    async fn next_intent(
        &self,
        _side: Side,
        _state: &BattleState,
        _map: &GridMap,
    ) -> Result<Option<Intent>> {
        Ok(self.intents.lock().await.pop_front())
    }
}
