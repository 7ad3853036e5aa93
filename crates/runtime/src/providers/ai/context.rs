//! Read-only view the planner scores candidates against.

use tactics_core::{
    BattleConfig, BattleEnv, BattleState, MapOracle, OracleError, Position, UnitState,
};

/// Everything needed to score one unit's options.
///
/// The context borrows the state for the duration of a single planning pass;
/// nothing in it is cached across turns.
pub struct AiContext<'a> {
    /// The unit making the decision.
    pub unit: &'a UnitState,
    pub state: &'a BattleState,
    pub map: &'a dyn MapOracle,
    pub config: &'a BattleConfig,
}

impl<'a> AiContext<'a> {
    /// # Errors
    ///
    /// Returns `OracleError::MapNotAvailable` if `env` carries no map.
    pub fn new(
        unit: &'a UnitState,
        state: &'a BattleState,
        env: BattleEnv<'a>,
    ) -> Result<Self, OracleError> {
        Ok(Self {
            unit,
            state,
            map: env.map()?,
            config: env.config(),
        })
    }

    /// Live units fighting against the deciding unit.
    pub fn opponents(&self) -> impl Iterator<Item = &'a UnitState> + use<'a> {
        let state: &'a BattleState = self.state;
        state.units.by_side(self.unit.side.opponent())
    }

    /// Euclidean distance from `from` to the closest opponent.
    pub fn nearest_opponent_distance(&self, from: Position) -> Option<f32> {
        self.opponents()
            .map(|opponent| from.distance(opponent.position))
            .min_by(f32::total_cmp)
    }

    pub fn elevation(&self, position: Position) -> i32 {
        self.map.tile(position).map_or(0, |tile| tile.elevation)
    }
}
