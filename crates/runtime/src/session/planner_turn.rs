use std::collections::VecDeque;

use tracing::{debug, info, warn};

use tactics_core::{
    AttackCommand, BattleCommand, BattleEngine, CommandKind, CommandOutcome, GameError,
    MoveCommand, Side, TileRange, collect_range,
};

use super::BattleSession;
use crate::events::{AiEvent, BattleEvent};
use crate::providers::AiAction;

/// How a planned action was carried out.
#[derive(Clone, Debug, PartialEq)]
pub enum AiResolution {
    /// The planned command went through as is.
    Executed(CommandOutcome),
    /// The planned command was rejected; an attack on a tile along its path
    /// landed instead.
    Fallback(CommandOutcome),
    /// Nothing could be committed. The unit is exhausted anyway.
    Failed,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AiActionOutcome {
    pub action: AiAction,
    pub resolution: AiResolution,
}

impl AiActionOutcome {
    pub fn outcome(&self) -> Option<&CommandOutcome> {
        match &self.resolution {
            AiResolution::Executed(outcome) | AiResolution::Fallback(outcome) => Some(outcome),
            AiResolution::Failed => None,
        }
    }

    /// Losing side, when this action ended the battle.
    pub fn loser(&self) -> Option<Side> {
        self.outcome().and_then(|outcome| outcome.loser)
    }
}

/// Lazily executes one planner turn, one action per [`PlannerTurn::next`].
///
/// Each action waits [`crate::RuntimeConfig::ai_action_delay`] first. When
/// the plan runs out, idle units are exhausted and the turn passes on. A
/// battle-ending action stops the sequence immediately.
pub struct PlannerTurn<'s> {
    session: &'s mut BattleSession,
    side: Side,
    plan: VecDeque<AiAction>,
    done: bool,
}

impl<'s> PlannerTurn<'s> {
    pub(super) fn new(session: &'s mut BattleSession, side: Side, actions: Vec<AiAction>) -> Self {
        Self {
            session,
            side,
            plan: actions.into(),
            done: false,
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Actions not yet attempted.
    pub fn remaining(&self) -> usize {
        self.plan.len()
    }

    pub async fn next(&mut self) -> Option<AiActionOutcome> {
        if self.done {
            return None;
        }

        while let Some(action) = self.plan.pop_front() {
            if self.session.state.unit(action.unit).is_none() {
                debug!(target: "runtime::session", unit = %action.unit, "planned unit fell");
                continue;
            }

            let delay = self.session.config.ai_action_delay;
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            let outcome = self.session.perform_planned(action);
            if let Some(loser) = outcome.loser() {
                info!(target: "runtime::session", loser = %loser, "planner turn ended the battle");
                self.done = true;
            }
            return Some(outcome);
        }

        self.session.close_planner_turn(self.side);
        self.done = true;
        None
    }

    /// Drains the turn.
    pub async fn run(mut self) -> Vec<AiActionOutcome> {
        let mut outcomes = Vec::new();
        while let Some(outcome) = self.next().await {
            outcomes.push(outcome);
        }
        outcomes
    }
}

impl BattleSession {
    /// Executes a planned action against the live state, falling back to an
    /// attack along its path when the plan no longer holds.
    fn perform_planned(&mut self, action: AiAction) -> AiActionOutcome {
        let range = collect_range(&self.map, action.origin, action.destination);
        let command: BattleCommand = match action.kind {
            CommandKind::Move => {
                MoveCommand::new(action.unit, range.clone(), action.destination).into()
            }
            CommandKind::Attack => {
                AttackCommand::new(action.unit, range.clone(), action.destination).into()
            }
        };

        match self.apply(command, false) {
            Ok(outcome) => {
                self.bus.publish(AiEvent::ActionExecuted {
                    action,
                    fallback: false,
                });
                return AiActionOutcome {
                    action,
                    resolution: AiResolution::Executed(outcome),
                };
            }
            Err(err) => debug!(
                target: "runtime::session",
                unit = %action.unit,
                code = err.error_code(),
                error = %err,
                "planned command rejected"
            ),
        }

        let fallback = range
            .as_ref()
            .and_then(|range| self.fallback_attack(action, range));
        if let Some(outcome) = fallback {
            self.bus.publish(AiEvent::ActionExecuted {
                action,
                fallback: true,
            });
            return AiActionOutcome {
                action,
                resolution: AiResolution::Fallback(outcome),
            };
        }

        warn!(
            target: "runtime::session",
            unit = %action.unit,
            kind = %action.kind,
            destination = %action.destination,
            "planned action failed"
        );
        if self.state.exhaust(action.unit) {
            self.bus.publish(BattleEvent::UnitExhausted { unit: action.unit });
        }
        self.bus.publish(AiEvent::ActionFailed { action });
        AiActionOutcome {
            action,
            resolution: AiResolution::Failed,
        }
    }

    /// Walks the planned path backwards and attacks the first tile that
    /// yields a legal attack. Every rejected attempt exhausts the unit.
    fn fallback_attack(&mut self, action: AiAction, range: &TileRange) -> Option<CommandOutcome> {
        let tiles: Vec<_> = range.positions().collect();

        for &tile in tiles.iter().rev() {
            let alternative = collect_range(&self.map, action.origin, tile);
            let attack =
                AttackCommand::new(action.unit, alternative, tile).without_exhaustion_check();
            match self.apply(attack.clone().into(), false) {
                Ok(outcome) => return Some(outcome),
                Err(_) => {
                    attack.attack_failed(&mut self.state);
                }
            }
        }

        None
    }

    /// Exhausts units that never acted and passes the turn on.
    fn close_planner_turn(&mut self, side: Side) {
        let idle = BattleEngine::new(&mut self.state).exhaust_remaining(side);
        for unit in idle {
            self.bus.publish(BattleEvent::UnitExhausted { unit });
        }
        if self.state.defeated_side().is_some() {
            return;
        }
        let next = BattleEngine::new(&mut self.state).advance_turn();
        if let Some(next) = next {
            self.announce_turn(next);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tactics_core::{BattleState, GridMap, Position, UnitId, UnitSpec};

    use super::*;
    use crate::config::RuntimeConfig;

    fn enemy_turn(units: &[(&str, Side, (i32, i32), f32)]) -> (BattleSession, Vec<UnitId>) {
        let map = GridMap::flat(6, 6);
        let mut state = BattleState::new();
        let ids: Vec<UnitId> = units
            .iter()
            .map(|&(name, side, (x, y), health)| {
                state
                    .deploy(&map, UnitSpec::new(name, side, 2, health), Position::new(x, y))
                    .unwrap()
            })
            .collect();
        let config = RuntimeConfig::default().with_ai_action_delay(Duration::ZERO);
        let mut session = BattleSession::new(state, map, config);
        session.start();
        for (id, &(_, side, _, _)) in ids.iter().zip(units) {
            if side == Side::Player {
                session.skip_unit(*id).unwrap();
            }
        }
        (session, ids)
    }

    #[tokio::test]
    async fn rejected_move_falls_back_to_a_lethal_attack_along_its_path() {
        let (mut session, ids) = enemy_turn(&[
            ("guard", Side::Player, (2, 0), 2.0),
            ("raider", Side::Enemy, (0, 0), 5.0),
        ]);
        let (guard, raider) = (ids[0], ids[1]);
        let action = AiAction::movement(
            session.state.unit(raider).unwrap(),
            Position::new(2, 0),
            50.0,
        );

        let mut turn = PlannerTurn::new(&mut session, Side::Enemy, vec![action]);
        let outcome = turn.next().await.unwrap();
        assert!(turn.next().await.is_none());
        drop(turn);

        let AiResolution::Fallback(result) = &outcome.resolution else {
            panic!("expected a fallback, got {:?}", outcome.resolution);
        };
        assert_eq!(result.kind, CommandKind::Attack);
        assert_eq!(result.destination, Position::new(2, 0));
        assert_eq!(result.fallen, Some((guard, Side::Player)));
        assert_eq!(outcome.loser(), Some(Side::Player));
        assert_eq!(session.state.unit(raider).unwrap().position, Position::new(1, 0));
        assert!(session.phase().is_over());
    }

    #[tokio::test]
    async fn failed_fallback_leaves_the_unit_in_place_and_exhausted() {
        let (mut session, ids) = enemy_turn(&[
            ("guard", Side::Player, (5, 5), 5.0),
            ("raider", Side::Enemy, (0, 0), 5.0),
            ("scout", Side::Enemy, (2, 0), 5.0),
        ]);
        let (raider, scout) = (ids[1], ids[2]);
        let action = AiAction::movement(
            session.state.unit(raider).unwrap(),
            Position::new(2, 0),
            50.0,
        );

        let mut turn = PlannerTurn::new(&mut session, Side::Enemy, vec![action]);
        let outcome = turn.next().await.unwrap();
        assert_eq!(outcome.resolution, AiResolution::Failed);
        assert!(turn.session.state.is_exhausted(raider));
        assert!(!turn.session.state.is_exhausted(scout));
        assert_eq!(turn.session.state.unit(raider).unwrap().position, Position::ORIGIN);

        assert!(turn.next().await.is_none());
        drop(turn);
        assert_eq!(session.phase(), tactics_core::BattlePhase::PlayerTurn);
    }
}
