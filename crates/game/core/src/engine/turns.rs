use tracing::info;

use crate::state::{Side, UnitId};

use super::{BattleEngine, BattlePhase, TurnError};

/// Turn bookkeeping methods for BattleEngine.
impl<'a> BattleEngine<'a> {
    pub fn active_side(&self) -> Side {
        self.state.turn.active_side
    }

    pub fn phase(&self) -> BattlePhase {
        BattlePhase::of(&*self.state)
    }

    /// Hands the turn to `side`: clears the exhausted set and refreshes that
    /// side's units.
    pub fn begin_turn(&mut self, side: Side) {
        self.state.turn.hand_over(side);
        for id in self.state.units.ids_by_side(side) {
            self.state.restore(id);
        }
        info!(
            target: "core::turn",
            side = %side,
            round = self.state.turn.round,
            "turn started"
        );
    }

    /// True once every live unit of the active side has acted.
    pub fn is_turn_complete(&self) -> bool {
        let side = self.state.turn.active_side;
        let exhausted = self
            .state
            .turn
            .exhausted()
            .iter()
            .filter(|id| self.state.unit(**id).is_some_and(|unit| unit.side == side))
            .count();
        exhausted >= self.state.active_count(side)
    }

    /// Passes the turn to the opponent if the active side is done.
    ///
    /// Returns the side now in control, or `None` when nothing changed or
    /// the battle is already decided.
    pub fn advance_turn(&mut self) -> Option<Side> {
        if self.state.defeated_side().is_some() || !self.is_turn_complete() {
            return None;
        }
        let next = self.state.turn.active_side.opponent();
        self.begin_turn(next);
        Some(next)
    }

    /// Checks that `unit` may act now.
    pub fn ensure_can_act(&self, unit: UnitId) -> Result<(), TurnError> {
        if let Some(loser) = self.state.defeated_side() {
            return Err(TurnError::BattleOver { loser });
        }
        let state = self
            .state
            .unit(unit)
            .ok_or(TurnError::UnitNotFound { unit })?;
        let active = self.state.turn.active_side;
        if state.side != active {
            return Err(TurnError::NotYourTurn {
                unit,
                side: state.side,
                active,
            });
        }
        if state.exhausted {
            return Err(TurnError::AlreadyExhausted { unit });
        }
        Ok(())
    }

    /// Ends a unit's turn without acting.
    pub fn skip_unit(&mut self, unit: UnitId) -> Result<(), TurnError> {
        self.ensure_can_act(unit)?;
        self.state.exhaust(unit);
        info!(target: "core::turn", unit = %unit, "unit skipped");
        Ok(())
    }

    /// Exhausts every live unit of `side` that has not acted yet.
    pub fn exhaust_remaining(&mut self, side: Side) -> Vec<UnitId> {
        let idle: Vec<UnitId> = self
            .state
            .units
            .by_side(side)
            .filter(|unit| !unit.exhausted)
            .map(|unit| unit.id)
            .collect();
        for id in &idle {
            self.state.exhaust(*id);
        }
        idle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::GridMap;
    use crate::state::{BattleState, Position, UnitSpec};

    fn roster(players: i32, enemies: i32) -> (GridMap, BattleState) {
        let map = GridMap::flat(8, 8);
        let mut state = BattleState::new();
        for i in 0..players {
            state
                .deploy(&map, UnitSpec::new(format!("p{i}"), Side::Player, 2, 5.0), Position::new(i, 0))
                .unwrap();
        }
        for i in 0..enemies {
            state
                .deploy(&map, UnitSpec::new(format!("e{i}"), Side::Enemy, 2, 5.0), Position::new(i, 7))
                .unwrap();
        }
        (map, state)
    }

    #[test]
    fn transitions_exactly_when_every_player_unit_is_exhausted() {
        let (_map, mut state) = roster(3, 2);
        let players = state.units.ids_by_side(Side::Player);
        let mut engine = BattleEngine::new(&mut state);

        for (index, id) in players.iter().enumerate() {
            assert_eq!(engine.phase(), BattlePhase::PlayerTurn);
            assert_eq!(engine.advance_turn(), None, "advanced after {index} units");
            engine.skip_unit(*id).unwrap();
        }

        assert_eq!(engine.advance_turn(), Some(Side::Enemy));
        assert_eq!(engine.phase(), BattlePhase::EnemyTurn);
        assert_eq!(engine.state().turn.exhausted_count(), 0);
    }

    #[test]
    fn new_turn_refreshes_only_the_incoming_side() {
        let (_map, mut state) = roster(1, 1);
        let player = state.units.ids_by_side(Side::Player)[0];
        let enemy = state.units.ids_by_side(Side::Enemy)[0];
        state.exhaust(enemy);
        let mut engine = BattleEngine::new(&mut state);

        engine.skip_unit(player).unwrap();
        engine.advance_turn();

        assert!(!engine.state().is_exhausted(enemy));
        assert!(engine.state().is_exhausted(player));

        engine.begin_turn(Side::Player);
        assert!(!engine.state().is_exhausted(player));
        assert_eq!(engine.state().turn.round, 1);
    }

    #[test]
    fn skip_is_limited_to_idle_units_of_the_active_side() {
        let (_map, mut state) = roster(1, 1);
        let player = state.units.ids_by_side(Side::Player)[0];
        let enemy = state.units.ids_by_side(Side::Enemy)[0];
        let mut engine = BattleEngine::new(&mut state);

        assert!(matches!(engine.skip_unit(enemy), Err(TurnError::NotYourTurn { .. })));
        engine.skip_unit(player).unwrap();
        assert_eq!(
            engine.skip_unit(player),
            Err(TurnError::AlreadyExhausted { unit: player })
        );
    }

    #[test]
    fn battle_ends_when_a_side_is_wiped_out() {
        let (_map, mut state) = roster(1, 1);
        let enemy = state.units.ids_by_side(Side::Enemy)[0];
        state.remove_fallen(enemy);
        let mut engine = BattleEngine::new(&mut state);

        assert_eq!(engine.phase(), BattlePhase::Ended { loser: Side::Enemy });
        assert_eq!(engine.advance_turn(), None);
    }
}
