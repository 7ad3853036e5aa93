//! Picks one action per unit.

use tracing::{debug, warn};

use tactics_core::{BattleConfig, BattleEnv, BattleState, MapOracle, Side, UnitId};

use super::{ActionCandidateGenerator, AiAction, AiContext, SidePlan};

/// Greedy single-ply planner: every unit takes its highest-scoring candidate.
///
/// The planner is side-agnostic; the same instance plans the enemy turn and
/// drives the player side in autoplay.
#[derive(Debug, Clone, Default)]
pub struct TacticalPlanner {
    config: BattleConfig,
}

impl TacticalPlanner {
    pub fn new(config: BattleConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    /// Best action for `unit`, or `None` if it cannot do anything useful.
    pub fn best_action(
        &self,
        state: &BattleState,
        map: &dyn MapOracle,
        unit: UnitId,
    ) -> Option<AiAction> {
        let unit = state.unit(unit)?;
        let env = BattleEnv::new(Some(map), Some(&self.config));
        let ctx = AiContext::new(unit, state, env).ok()?;
        select_best(ActionCandidateGenerator::generate(&ctx))
    }

    /// Plans every live unit of `side` against the current state.
    pub fn plan_side(&self, state: &BattleState, map: &dyn MapOracle, side: Side) -> SidePlan {
        let mut plan = SidePlan::default();

        for id in state.units.ids_by_side(side) {
            match self.best_action(state, map, id) {
                Some(action) => {
                    debug!(
                        target: "runtime::ai",
                        unit = %id,
                        kind = %action.kind,
                        destination = %action.destination,
                        score = action.score,
                        "planned action"
                    );
                    plan.actions.push(action);
                }
                None => {
                    warn!(target: "runtime::ai", unit = %id, side = %side, "no legal action");
                    plan.idle.push(id);
                }
            }
        }

        plan
    }
}

/// Highest finite score wins; the earliest candidate wins ties.
fn select_best(candidates: impl IntoIterator<Item = AiAction>) -> Option<AiAction> {
    let mut best: Option<AiAction> = None;
    for candidate in candidates {
        if !candidate.score.is_finite() {
            continue;
        }
        match best {
            Some(current) if candidate.score <= current.score => {}
            _ => best = Some(candidate),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use tactics_core::{CommandKind, Position};

    fn candidate(kind: CommandKind, x: i32, score: f32) -> AiAction {
        AiAction {
            unit: UnitId(0),
            origin: Position::ORIGIN,
            destination: Position::new(x, 0),
            kind,
            score,
        }
    }

    #[test]
    fn ties_keep_the_first_candidate() {
        let best = select_best([
            candidate(CommandKind::Attack, 1, 120.0),
            candidate(CommandKind::Move, 2, 120.0),
        ]);
        assert_eq!(best.unwrap().kind, CommandKind::Attack);
    }

    #[test]
    fn infinite_scores_are_never_selected() {
        assert_eq!(
            select_best([candidate(CommandKind::Move, 1, f32::NEG_INFINITY)]),
            None
        );
        let best = select_best([
            candidate(CommandKind::Move, 1, f32::NEG_INFINITY),
            candidate(CommandKind::Move, 2, -40.0),
        ]);
        assert_eq!(best.unwrap().destination, Position::new(2, 0));
    }
}
