use tracing::debug;

use crate::config::BattleConfig;
use crate::error::{ErrorSeverity, GameError};
use crate::grid::TileRange;
use crate::state::{BattleState, Position, UnitId};

use super::Command;

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MoveError {
    #[error("no range information for unit {unit}")]
    NoRange { unit: UnitId },

    #[error("unit {unit} not found")]
    UnitNotFound { unit: UnitId },

    #[error("unit {unit} is not standing at range origin {origin}")]
    NotAtOrigin { unit: UnitId, origin: Position },

    #[error("unit {unit} is already at {destination}")]
    ZeroDistance { unit: UnitId, destination: Position },

    #[error("unit {unit} has already acted this turn")]
    Exhausted { unit: UnitId },

    #[error("range does not lead to {destination}")]
    PathMismatch { destination: Position },

    #[error("tile {position} is not traversable")]
    Blocked { position: Position },

    #[error("tile {position} is occupied by {occupant}")]
    Occupied { position: Position, occupant: UnitId },

    #[error("path needs {required} action points, unit has {available}")]
    InsufficientActionPoints { required: f32, available: u32 },

    #[error("budget runs out at {position} before the destination")]
    StopsShort { position: Position },

    #[error("occupancy desync for unit {unit} at {position}")]
    OccupancyDesync { unit: UnitId, position: Position },

    #[error("move has not been executed")]
    NotExecuted,
}

impl GameError for MoveError {
    fn severity(&self) -> ErrorSeverity {
        use MoveError::*;
        match self {
            Exhausted { .. }
            | Blocked { .. }
            | Occupied { .. }
            | InsufficientActionPoints { .. }
            | StopsShort { .. } => ErrorSeverity::Recoverable,
            NoRange { .. }
            | UnitNotFound { .. }
            | NotAtOrigin { .. }
            | ZeroDistance { .. }
            | PathMismatch { .. }
            | NotExecuted => ErrorSeverity::Validation,
            OccupancyDesync { .. } => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        use MoveError::*;
        match self {
            NoRange { .. } => "MOVE_NO_RANGE",
            UnitNotFound { .. } => "MOVE_UNIT_NOT_FOUND",
            NotAtOrigin { .. } => "MOVE_NOT_AT_ORIGIN",
            ZeroDistance { .. } => "MOVE_ZERO_DISTANCE",
            Exhausted { .. } => "MOVE_EXHAUSTED",
            PathMismatch { .. } => "MOVE_PATH_MISMATCH",
            Blocked { .. } => "MOVE_BLOCKED",
            Occupied { .. } => "MOVE_OCCUPIED",
            InsufficientActionPoints { .. } => "MOVE_INSUFFICIENT_AP",
            StopsShort { .. } => "MOVE_STOPS_SHORT",
            OccupancyDesync { .. } => "MOVE_OCCUPANCY_DESYNC",
            NotExecuted => "MOVE_NOT_EXECUTED",
        }
    }
}

/// Validated relocation along a range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MovePlan {
    pub unit: UnitId,
    pub origin: Position,
    pub destination: Position,
    pub cost: f32,
}

/// Relocates a unit along a precomputed [`TileRange`].
///
/// Executing a move marks the unit exhausted. Undo puts the unit back on its
/// old tile but leaves it exhausted.
#[derive(Clone, Debug, PartialEq)]
pub struct MoveCommand {
    unit: UnitId,
    range: Option<TileRange>,
    destination: Position,
    check_exhausted: bool,
    executed_from: Option<Position>,
}

impl MoveCommand {
    pub fn new(unit: UnitId, range: Option<TileRange>, destination: Position) -> Self {
        Self {
            unit,
            range,
            destination,
            check_exhausted: true,
            executed_from: None,
        }
    }

    /// Skips the exhaustion check; used for the approach leg of an attack.
    #[must_use]
    pub fn without_exhaustion_check(mut self) -> Self {
        self.check_exhausted = false;
        self
    }

    pub fn unit(&self) -> UnitId {
        self.unit
    }

    pub fn destination(&self) -> Position {
        self.destination
    }

    pub fn range(&self) -> Option<&TileRange> {
        self.range.as_ref()
    }
}

impl Command for MoveCommand {
    type Plan = MovePlan;
    type Error = MoveError;

    fn actor(&self) -> UnitId {
        self.unit
    }

    fn validate(&self, state: &BattleState) -> Result<MovePlan, MoveError> {
        let (range, origin) = self
            .range
            .as_ref()
            .and_then(|range| Some((range, range.origin()?)))
            .ok_or(MoveError::NoRange { unit: self.unit })?;
        let unit = state
            .unit(self.unit)
            .ok_or(MoveError::UnitNotFound { unit: self.unit })?;

        if unit.position != origin || state.occupant(origin) != Some(self.unit) {
            return Err(MoveError::NotAtOrigin {
                unit: self.unit,
                origin,
            });
        }

        let steps = origin.step_distance(self.destination);
        if steps == 0 {
            return Err(MoveError::ZeroDistance {
                unit: self.unit,
                destination: self.destination,
            });
        }

        if self.check_exhausted && unit.exhausted {
            return Err(MoveError::Exhausted { unit: self.unit });
        }

        let path = range.trimmed(steps);
        if path.len() != steps as usize + 1
            || path.last().map(|step| step.position) != Some(self.destination)
        {
            return Err(MoveError::PathMismatch {
                destination: self.destination,
            });
        }

        let walked = &path[1..];
        if let Some(step) = walked
            .iter()
            .find(|step| step.is_blocked() || !step.tile.is_traversable())
        {
            return Err(MoveError::Blocked {
                position: step.position,
            });
        }

        let budget = unit.action_points as f32;
        let required: f32 = walked.iter().map(|step| step.cost).sum();
        if required > budget {
            return Err(MoveError::InsufficientActionPoints {
                required,
                available: unit.action_points,
            });
        }

        let mut accumulated = 0.0_f32;
        for (index, step) in walked.iter().enumerate() {
            accumulated += step.cost;
            if (accumulated - budget).abs() < BattleConfig::EXHAUSTION_EPSILON
                && index + 1 != walked.len()
            {
                return Err(MoveError::StopsShort {
                    position: step.position,
                });
            }

            if let Some(occupant) = state.occupant(step.position) {
                return Err(MoveError::Occupied {
                    position: step.position,
                    occupant,
                });
            }
        }

        Ok(MovePlan {
            unit: self.unit,
            origin,
            destination: self.destination,
            cost: required,
        })
    }

    fn execute(&mut self, state: &mut BattleState) -> Result<Option<UnitId>, MoveError> {
        let plan = self.validate(state)?;

        let moved = state
            .relocate(plan.unit, plan.destination)
            .map_err(|_| MoveError::UnitNotFound { unit: plan.unit })?;
        if !moved {
            return Err(MoveError::OccupancyDesync {
                unit: plan.unit,
                position: plan.destination,
            });
        }
        state.exhaust(plan.unit);
        self.executed_from = Some(plan.origin);

        debug!(
            target: "core::command",
            unit = %plan.unit,
            from = %plan.origin,
            to = %plan.destination,
            cost = plan.cost,
            "unit moved"
        );
        Ok(None)
    }

    fn undo(&mut self, state: &mut BattleState) -> Result<(), MoveError> {
        let origin = self.executed_from.ok_or(MoveError::NotExecuted)?;
        let moved = state
            .relocate(self.unit, origin)
            .map_err(|_| MoveError::UnitNotFound { unit: self.unit })?;
        if !moved {
            return Err(match state.occupant(origin) {
                Some(occupant) => MoveError::Occupied {
                    position: origin,
                    occupant,
                },
                None => MoveError::OccupancyDesync {
                    unit: self.unit,
                    position: origin,
                },
            });
        }
        self.executed_from = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{GridMap, StaticTile};
    use crate::grid::collect_range;
    use crate::state::{Side, UnitSpec};

    fn setup(map: &GridMap, ap: u32) -> (BattleState, UnitId) {
        let mut state = BattleState::new();
        let id = state
            .deploy(map, UnitSpec::new("walker", Side::Player, ap, 10.0), Position::ORIGIN)
            .unwrap();
        (state, id)
    }

    fn move_to(map: &GridMap, unit: UnitId, destination: Position) -> MoveCommand {
        MoveCommand::new(unit, collect_range(map, Position::ORIGIN, destination), destination)
    }

    #[test]
    fn two_tiles_exceed_a_budget_of_one() {
        let map = GridMap::flat(5, 5);
        let (state, id) = setup(&map, 1);

        let command = move_to(&map, id, Position::new(2, 0));
        assert!(matches!(
            command.validate(&state),
            Err(MoveError::InsufficientActionPoints { available: 1, .. })
        ));
    }

    #[test]
    fn can_execute_is_idempotent() {
        let map = GridMap::flat(5, 5);
        let (state, id) = setup(&map, 2);
        let before = state.clone();

        let command = move_to(&map, id, Position::new(2, 0));
        let first = command.can_execute(&state);
        let second = command.can_execute(&state);

        assert!(first);
        assert_eq!(first, second);
        assert_eq!(state, before);
    }

    #[test]
    fn execute_relocates_and_exhausts() {
        let map = GridMap::flat(5, 5);
        let (mut state, id) = setup(&map, 2);

        let mut command = move_to(&map, id, Position::new(0, 2));
        assert_eq!(command.execute(&mut state).unwrap(), None);

        assert_eq!(state.unit(id).unwrap().position, Position::new(0, 2));
        assert_eq!(state.occupant(Position::ORIGIN), None);
        assert!(state.is_exhausted(id));
        assert!(matches!(
            move_to(&map, id, Position::new(0, 1)).validate(&state),
            Err(MoveError::NotAtOrigin { .. })
        ));
    }

    #[test]
    fn undo_restores_position_but_not_exhaustion() {
        let map = GridMap::flat(5, 5);
        let (mut state, id) = setup(&map, 2);

        let mut command = move_to(&map, id, Position::new(1, 0));
        command.execute(&mut state).unwrap();
        command.undo(&mut state).unwrap();

        assert_eq!(state.unit(id).unwrap().position, Position::ORIGIN);
        assert!(state.is_exhausted(id));
        assert_eq!(command.undo(&mut state), Err(MoveError::NotExecuted));
    }

    #[test]
    fn path_through_walls_units_or_water_is_rejected() {
        let map = GridMap::flat(5, 5).with_tile(Position::new(0, 1), StaticTile::water());
        let (mut state, id) = setup(&map, 2);
        state
            .deploy(&map, UnitSpec::new("ally", Side::Player, 2, 5.0), Position::new(1, 0))
            .unwrap();

        assert!(matches!(
            move_to(&map, id, Position::new(2, 0)).validate(&state),
            Err(MoveError::Occupied { .. })
        ));
        assert!(matches!(
            move_to(&map, id, Position::new(0, 2)).validate(&state),
            Err(MoveError::PathMismatch { .. })
        ));
        assert!(matches!(
            move_to(&map, id, Position::new(0, 1)).validate(&state),
            Err(MoveError::Blocked { .. })
        ));
    }

    #[test]
    fn stopping_short_of_a_spent_budget_is_rejected() {
        // Two half-cost descents spend a budget of one on the second tile.
        let map = GridMap::flat(5, 5)
            .with_elevation(Position::new(0, 0), 2)
            .with_elevation(Position::new(1, 0), 1)
            .with_elevation(Position::new(2, 0), 0)
            .with_elevation(Position::new(3, 0), -3);
        let (state, id) = setup(&map, 1);

        let full = MoveCommand::new(
            id,
            collect_range(&map, Position::ORIGIN, Position::new(2, 0)),
            Position::new(2, 0),
        );
        assert!(full.can_execute(&state));

        let past = MoveCommand::new(
            id,
            collect_range(&map, Position::ORIGIN, Position::new(3, 0)),
            Position::new(3, 0),
        );
        assert!(matches!(
            past.validate(&state),
            Err(MoveError::StopsShort { position }) if position == Position::new(2, 0)
        ));
    }

    #[test]
    fn missing_range_fails_validation() {
        let map = GridMap::flat(3, 3);
        let (state, id) = setup(&map, 2);
        let command = MoveCommand::new(id, None, Position::new(1, 0));
        assert_eq!(command.validate(&state), Err(MoveError::NoRange { unit: id }));
    }
}
