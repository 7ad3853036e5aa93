//! Planner-backed intent provider for autoplay.

use async_trait::async_trait;

use tactics_core::{BattleState, CommandKind, GridMap, Side};

use super::TacticalPlanner;
use crate::api::{Intent, IntentProvider, Result};

/// Feeds the manual side with planner decisions, one idle unit at a time.
#[derive(Debug, Clone, Default)]
pub struct PlannerIntentProvider {
    planner: TacticalPlanner,
}

impl PlannerIntentProvider {
    pub fn new(planner: TacticalPlanner) -> Self {
        Self { planner }
    }
}

#[async_trait]
impl IntentProvider for PlannerIntentProvider {
    async fn next_intent(
        &self,
        side: Side,
        state: &BattleState,
        map: &GridMap,
    ) -> Result<Option<Intent>> {
        let Some(unit) = state.units.by_side(side).find(|unit| !unit.exhausted) else {
            return Ok(None);
        };

        let intent = match self.planner.best_action(state, map, unit.id) {
            Some(action) => match action.kind {
                CommandKind::Move => Intent::movement(action.unit, action.destination),
                CommandKind::Attack => Intent::attack(action.unit, action.destination),
            },
            None => Intent::Skip { unit: unit.id },
        };
        Ok(Some(intent))
    }
}
