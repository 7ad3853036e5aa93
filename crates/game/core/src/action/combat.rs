use tracing::debug;

use crate::config::BattleConfig;
use crate::error::{ErrorSeverity, GameError};
use crate::grid::TileRange;
use crate::state::{BattleState, Position, UnitId};

use super::{Command, MoveCommand, MoveError};

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttackError {
    #[error("no range information for attacker {attacker}")]
    NoRange { attacker: UnitId },

    #[error("unit {unit} not found")]
    UnitNotFound { unit: UnitId },

    #[error("unit {unit} is not standing at range origin {origin}")]
    NotAtOrigin { unit: UnitId, origin: Position },

    #[error("no unit to attack at {target}")]
    NoDefender { target: Position },

    #[error("attacker {attacker} cannot target its own tile")]
    ZeroDistance { attacker: UnitId },

    #[error("{defender} fights on the same side as {attacker}")]
    FriendlyTarget { attacker: UnitId, defender: UnitId },

    #[error("path to the target is blocked at {position}")]
    PathBlocked { position: Position },

    #[error("range does not reach {target}")]
    OutOfReach { target: Position },

    #[error("closing in needs {required} action points, attacker has {available}")]
    InsufficientActionPoints { required: f32, available: u32 },

    #[error("unit {unit} has already acted this turn")]
    Exhausted { unit: UnitId },

    #[error("cannot reach a striking position: {0}")]
    Approach(#[source] MoveError),

    #[error("occupancy desync for unit {unit} at {position}")]
    OccupancyDesync { unit: UnitId, position: Position },

    #[error("attack has not been executed")]
    NotExecuted,
}

impl GameError for AttackError {
    fn severity(&self) -> ErrorSeverity {
        use AttackError::*;
        match self {
            PathBlocked { .. }
            | OutOfReach { .. }
            | InsufficientActionPoints { .. }
            | Exhausted { .. } => ErrorSeverity::Recoverable,
            Approach(inner) => inner.severity(),
            NoRange { .. }
            | UnitNotFound { .. }
            | NotAtOrigin { .. }
            | NoDefender { .. }
            | ZeroDistance { .. }
            | FriendlyTarget { .. }
            | NotExecuted => ErrorSeverity::Validation,
            OccupancyDesync { .. } => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        use AttackError::*;
        match self {
            NoRange { .. } => "ATTACK_NO_RANGE",
            UnitNotFound { .. } => "ATTACK_UNIT_NOT_FOUND",
            NotAtOrigin { .. } => "ATTACK_NOT_AT_ORIGIN",
            NoDefender { .. } => "ATTACK_NO_DEFENDER",
            ZeroDistance { .. } => "ATTACK_ZERO_DISTANCE",
            FriendlyTarget { .. } => "ATTACK_FRIENDLY_TARGET",
            PathBlocked { .. } => "ATTACK_PATH_BLOCKED",
            OutOfReach { .. } => "ATTACK_OUT_OF_REACH",
            InsufficientActionPoints { .. } => "ATTACK_INSUFFICIENT_AP",
            Exhausted { .. } => "ATTACK_EXHAUSTED",
            Approach(_) => "ATTACK_APPROACH_FAILED",
            OccupancyDesync { .. } => "ATTACK_OCCUPANCY_DESYNC",
            NotExecuted => "ATTACK_NOT_EXECUTED",
        }
    }
}

/// Resolved blow: who hits whom, and how hard.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Strike {
    pub attacker: UnitId,
    pub defender: UnitId,
    pub target: Position,
    /// Action points spent closing in on the defender.
    pub cost: f32,
    pub damage: f32,
}

impl Strike {
    pub fn is_overrun(&self) -> bool {
        self.damage >= BattleConfig::OVERRUN_THRESHOLD
    }
}

/// How an attack reaches its target, decided once during validation.
#[derive(Clone, Debug, PartialEq)]
pub enum AttackPlan {
    /// Defender is within reach from where the attacker stands.
    Strike(Strike),
    /// Attacker first walks to the tile in front of the defender.
    AdvanceThenStrike(MoveCommand, Strike),
}

impl AttackPlan {
    pub fn strike(&self) -> &Strike {
        match self {
            AttackPlan::Strike(strike) | AttackPlan::AdvanceThenStrike(_, strike) => strike,
        }
    }

    pub fn damage(&self) -> f32 {
        self.strike().damage
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct AttackRecord {
    attacker_origin: Position,
    defender: UnitId,
    defender_health: f32,
}

/// Strikes the unit at `target`, advancing along `range` first if needed.
///
/// Damage is `action_points + 1 - cost`, where `cost` is what the attacker
/// pays to reach the tile in front of the defender. A lethal blow of at least
/// [`BattleConfig::OVERRUN_THRESHOLD`] also moves the attacker onto the
/// defender's tile.
#[derive(Clone, Debug, PartialEq)]
pub struct AttackCommand {
    attacker: UnitId,
    range: Option<TileRange>,
    target: Position,
    check_exhausted: bool,
    record: Option<AttackRecord>,
}

impl AttackCommand {
    pub fn new(attacker: UnitId, range: Option<TileRange>, target: Position) -> Self {
        Self {
            attacker,
            range,
            target,
            check_exhausted: true,
            record: None,
        }
    }

    /// Skips the exhaustion check; the planner scores attacks this way.
    #[must_use]
    pub fn without_exhaustion_check(mut self) -> Self {
        self.check_exhausted = false;
        self
    }

    pub fn attacker(&self) -> UnitId {
        self.attacker
    }

    pub fn target(&self) -> Position {
        self.target
    }

    pub fn range(&self) -> Option<&TileRange> {
        self.range.as_ref()
    }

    /// Exhausts the attacker after an attempt that could not be committed.
    pub fn attack_failed(&self, state: &mut BattleState) -> bool {
        debug!(
            target: "core::command",
            attacker = %self.attacker,
            target = %self.target,
            "attack abandoned"
        );
        state.exhaust(self.attacker)
    }
}

impl Command for AttackCommand {
    type Plan = AttackPlan;
    type Error = AttackError;

    fn actor(&self) -> UnitId {
        self.attacker
    }

    fn validate(&self, state: &BattleState) -> Result<AttackPlan, AttackError> {
        let (range, origin) = self
            .range
            .as_ref()
            .and_then(|range| Some((range, range.origin()?)))
            .ok_or(AttackError::NoRange {
                attacker: self.attacker,
            })?;
        let attacker = state.unit(self.attacker).ok_or(AttackError::UnitNotFound {
            unit: self.attacker,
        })?;

        if attacker.position != origin || state.occupant(origin) != Some(self.attacker) {
            return Err(AttackError::NotAtOrigin {
                unit: self.attacker,
                origin,
            });
        }

        let defender = state
            .unit_at(self.target)
            .ok_or(AttackError::NoDefender {
                target: self.target,
            })?;

        let steps = origin.step_distance(self.target);
        if steps == 0 {
            return Err(AttackError::ZeroDistance {
                attacker: self.attacker,
            });
        }
        if !attacker.is_hostile_to(defender) {
            return Err(AttackError::FriendlyTarget {
                attacker: self.attacker,
                defender: defender.id,
            });
        }

        let path = range.trimmed(steps);
        if path.len() != steps as usize + 1 {
            return Err(match path.last() {
                Some(step) if step.is_blocked() => AttackError::PathBlocked {
                    position: step.position,
                },
                _ => AttackError::OutOfReach {
                    target: self.target,
                },
            });
        }
        if path[path.len() - 1].position != self.target {
            return Err(AttackError::OutOfReach {
                target: self.target,
            });
        }

        // The defender's own tile must be enterable too: an overrun lands there.
        let approach = &path[1..path.len() - 1];
        if let Some(step) = path[1..].iter().find(|step| step.is_blocked()) {
            return Err(AttackError::PathBlocked {
                position: step.position,
            });
        }
        let cost: f32 = approach.iter().map(|step| step.cost).sum();
        if cost > attacker.action_points as f32 {
            return Err(AttackError::InsufficientActionPoints {
                required: cost,
                available: attacker.action_points,
            });
        }

        if self.check_exhausted && attacker.exhausted {
            return Err(AttackError::Exhausted {
                unit: self.attacker,
            });
        }

        let strike = Strike {
            attacker: self.attacker,
            defender: defender.id,
            target: self.target,
            cost,
            damage: attacker.action_points as f32 + BattleConfig::BASE_DAMAGE_BONUS - cost,
        };

        if approach.is_empty() {
            return Ok(AttackPlan::Strike(strike));
        }

        let staging = approach[approach.len() - 1].position;
        let advance = MoveCommand::new(self.attacker, Some(range.clone()), staging)
            .without_exhaustion_check();
        advance.validate(state).map_err(AttackError::Approach)?;
        Ok(AttackPlan::AdvanceThenStrike(advance, strike))
    }

    fn execute(&mut self, state: &mut BattleState) -> Result<Option<UnitId>, AttackError> {
        let plan = self.validate(state)?;
        let strike = *plan.strike();

        let defender_health = state
            .unit(strike.defender)
            .map(|unit| unit.health)
            .ok_or(AttackError::UnitNotFound {
                unit: strike.defender,
            })?;
        let attacker_origin = state
            .unit(strike.attacker)
            .map(|unit| unit.position)
            .ok_or(AttackError::UnitNotFound {
                unit: strike.attacker,
            })?;

        if let AttackPlan::AdvanceThenStrike(mut advance, _) = plan {
            advance.execute(state).map_err(AttackError::Approach)?;
        }

        let remaining = match state.unit_mut(strike.defender) {
            Some(defender) => {
                defender.health -= strike.damage;
                defender.health
            }
            None => {
                return Err(AttackError::UnitNotFound {
                    unit: strike.defender,
                });
            }
        };

        let fallen = remaining <= 0.0;
        if fallen {
            state.remove_fallen(strike.defender);
            if strike.is_overrun() {
                let moved = state
                    .relocate(strike.attacker, strike.target)
                    .map_err(|_| AttackError::UnitNotFound {
                        unit: strike.attacker,
                    })?;
                if !moved {
                    return Err(AttackError::OccupancyDesync {
                        unit: strike.attacker,
                        position: strike.target,
                    });
                }
            }
        }
        state.exhaust(strike.attacker);

        self.record = Some(AttackRecord {
            attacker_origin,
            defender: strike.defender,
            defender_health,
        });

        debug!(
            target: "core::command",
            attacker = %strike.attacker,
            defender = %strike.defender,
            damage = strike.damage,
            remaining,
            fallen,
            "attack resolved"
        );

        Ok(fallen.then_some(strike.defender))
    }

    /// Best effort: puts the attacker back, revives and heals the defender,
    /// and gives the attacker its action back.
    fn undo(&mut self, state: &mut BattleState) -> Result<(), AttackError> {
        let record = self.record.ok_or(AttackError::NotExecuted)?;

        let moved = state
            .relocate(self.attacker, record.attacker_origin)
            .map_err(|_| AttackError::UnitNotFound {
                unit: self.attacker,
            })?;
        if !moved {
            return Err(AttackError::OccupancyDesync {
                unit: self.attacker,
                position: record.attacker_origin,
            });
        }

        if state.unit(record.defender).is_none() && !state.reinstate_fallen(record.defender) {
            return Err(AttackError::UnitNotFound {
                unit: record.defender,
            });
        }
        if let Some(defender) = state.unit_mut(record.defender) {
            defender.health = record.defender_health;
        }
        state.restore(self.attacker);

        self.record = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{GridMap, StaticTile};
    use crate::grid::{CardinalDirection, TileRange, collect_range, legal_moves_for};
    use crate::state::{Side, UnitSpec};

    struct Duel {
        map: GridMap,
        state: BattleState,
        attacker: UnitId,
        defender: UnitId,
    }

    fn duel(map: GridMap, attacker_at: Position, defender_at: Position, health: f32) -> Duel {
        let mut state = BattleState::new();
        let attacker = state
            .deploy(&map, UnitSpec::new("knight", Side::Player, 2, 10.0), attacker_at)
            .unwrap();
        let defender = state
            .deploy(&map, UnitSpec::new("raider", Side::Enemy, 2, health), defender_at)
            .unwrap();
        Duel {
            map,
            state,
            attacker,
            defender,
        }
    }

    impl Duel {
        fn attack(&self, from: Position, target: Position) -> AttackCommand {
            AttackCommand::new(self.attacker, collect_range(&self.map, from, target), target)
        }
    }

    #[test]
    fn damage_subtracts_cost_of_closing_in() {
        let duel = duel(GridMap::flat(5, 5), Position::new(0, 0), Position::new(2, 0), 10.0);
        let command = duel.attack(Position::new(0, 0), Position::new(2, 0));

        assert!(command.can_execute(&duel.state));
        let plan = command.validate(&duel.state).unwrap();
        assert!(matches!(plan, AttackPlan::AdvanceThenStrike(ref advance, _) if advance.destination() == Position::new(1, 0)));
        assert_eq!(plan.damage(), 2.0);
    }

    #[test]
    fn wall_between_fails_validation() {
        let map = GridMap::flat(5, 5).with_tile(Position::new(1, 0), StaticTile::wall());
        let duel = duel(map, Position::new(0, 0), Position::new(2, 0), 10.0);
        let command = duel.attack(Position::new(0, 0), Position::new(2, 0));

        assert!(matches!(
            command.validate(&duel.state),
            Err(AttackError::PathBlocked { position }) if position == Position::new(1, 0)
        ));
    }

    #[test]
    fn lethal_adjacent_blow_overruns() {
        let mut duel = duel(GridMap::flat(5, 5), Position::new(1, 1), Position::new(2, 1), 2.0);
        let mut command = duel.attack(Position::new(1, 1), Position::new(2, 1));

        assert_eq!(command.execute(&mut duel.state).unwrap(), Some(duel.defender));
        assert_eq!(duel.state.unit(duel.attacker).unwrap().position, Position::new(2, 1));
        assert_eq!(duel.state.occupant(Position::new(1, 1)), None);
        assert!(duel.state.unit(duel.defender).is_none());
        assert!(duel.state.is_exhausted(duel.attacker));
    }

    #[test]
    fn surviving_defender_keeps_its_tile() {
        let mut duel = duel(GridMap::flat(5, 5), Position::new(1, 1), Position::new(2, 1), 10.0);
        let mut command = duel.attack(Position::new(1, 1), Position::new(2, 1));

        assert_eq!(command.execute(&mut duel.state).unwrap(), None);
        assert_eq!(duel.state.unit(duel.defender).unwrap().health, 7.0);
        assert_eq!(duel.state.unit(duel.attacker).unwrap().position, Position::new(1, 1));
    }

    #[test]
    fn defender_on_a_cliff_cannot_be_struck() {
        let map = GridMap::flat(5, 5).with_elevation(Position::new(2, 1), 3);
        let mut duel = duel(map, Position::new(1, 1), Position::new(2, 1), 2.0);
        let mut command = duel.attack(Position::new(1, 1), Position::new(2, 1));

        assert!(matches!(
            command.validate(&duel.state),
            Err(AttackError::PathBlocked { position }) if position == Position::new(2, 1)
        ));
        assert!(command.execute(&mut duel.state).is_err());
        assert_eq!(duel.state.unit(duel.attacker).unwrap().position, Position::new(1, 1));
        assert!(duel.state.unit(duel.defender).is_some());

        let attacker = duel.state.unit(duel.attacker).unwrap();
        assert!(!legal_moves_for(&duel.state, &duel.map, attacker).can_attack(Position::new(2, 1)));
    }

    #[test]
    fn defender_past_a_leg_breaking_drop_cannot_be_struck() {
        let map = GridMap::flat(5, 5).with_elevation(Position::new(0, 1), 3);
        let duel = duel(map, Position::new(0, 1), Position::new(2, 1), 2.0);
        let command = duel.attack(Position::new(0, 1), Position::new(2, 1));

        assert!(matches!(
            command.validate(&duel.state),
            Err(AttackError::PathBlocked { position }) if position == Position::new(2, 1)
        ));
        let attacker = duel.state.unit(duel.attacker).unwrap();
        assert!(!legal_moves_for(&duel.state, &duel.map, attacker).can_attack(Position::new(2, 1)));
    }

    #[test]
    fn empty_range_is_treated_as_missing() {
        let duel = duel(GridMap::flat(5, 5), Position::new(1, 1), Position::new(2, 1), 2.0);
        let command = AttackCommand::new(
            duel.attacker,
            Some(TileRange::empty(CardinalDirection::East)),
            Position::new(2, 1),
        );
        assert_eq!(
            command.validate(&duel.state),
            Err(AttackError::NoRange { attacker: duel.attacker })
        );
    }

    #[test]
    fn friendly_and_missing_targets_are_rejected() {
        let mut duel = duel(GridMap::flat(5, 5), Position::new(0, 0), Position::new(0, 3), 10.0);
        duel.state
            .deploy(&duel.map, UnitSpec::new("squire", Side::Player, 2, 5.0), Position::new(1, 0))
            .unwrap();

        assert!(matches!(
            duel.attack(Position::new(0, 0), Position::new(1, 0)).validate(&duel.state),
            Err(AttackError::FriendlyTarget { .. })
        ));
        assert!(matches!(
            duel.attack(Position::new(0, 0), Position::new(0, 2)).validate(&duel.state),
            Err(AttackError::NoDefender { .. })
        ));
    }

    #[test]
    fn exhausted_attacker_only_passes_without_the_check() {
        let mut duel = duel(GridMap::flat(5, 5), Position::new(0, 0), Position::new(1, 0), 10.0);
        duel.state.exhaust(duel.attacker);

        let command = duel.attack(Position::new(0, 0), Position::new(1, 0));
        assert!(matches!(command.validate(&duel.state), Err(AttackError::Exhausted { .. })));
        assert!(command.without_exhaustion_check().can_execute(&duel.state));
    }

    #[test]
    fn undo_revives_and_returns_the_attacker() {
        let mut duel = duel(GridMap::flat(5, 5), Position::new(1, 1), Position::new(2, 1), 2.0);
        let mut command = duel.attack(Position::new(1, 1), Position::new(2, 1));
        command.execute(&mut duel.state).unwrap();

        command.undo(&mut duel.state).unwrap();
        let defender = duel.state.unit(duel.defender).unwrap();
        assert_eq!(defender.health, 2.0);
        assert_eq!(defender.position, Position::new(2, 1));
        assert_eq!(duel.state.unit(duel.attacker).unwrap().position, Position::new(1, 1));
        assert!(!duel.state.is_exhausted(duel.attacker));
    }

    #[test]
    fn attack_failed_still_exhausts() {
        let mut duel = duel(GridMap::flat(5, 5), Position::new(0, 0), Position::new(4, 0), 10.0);
        let command = duel.attack(Position::new(0, 0), Position::new(4, 0));

        assert!(!command.can_execute(&duel.state));
        assert!(command.attack_failed(&mut duel.state));
        assert!(duel.state.is_exhausted(duel.attacker));
    }
}
