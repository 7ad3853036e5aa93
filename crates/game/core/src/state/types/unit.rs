use std::collections::BTreeMap;

use crate::config::BattleConfig;
use crate::state::error::RegistryError;

use super::{Position, Side, UnitId};

/// Deployment request describing a unit before it is placed on the grid.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitSpec {
    pub name: String,
    pub side: Side,
    pub action_points: u32,
    pub health: f32,
    /// Strategic-layer budget; carried through untouched by combat.
    #[cfg_attr(feature = "serde", serde(default = "UnitSpec::default_move_points"))]
    pub move_points: u32,
}

impl UnitSpec {
    pub const DEFAULT_MOVE_POINTS: u32 = 2;

    pub fn new(name: impl Into<String>, side: Side, action_points: u32, health: f32) -> Self {
        Self {
            name: name.into(),
            side,
            action_points,
            health,
            move_points: Self::DEFAULT_MOVE_POINTS,
        }
    }

    #[cfg(feature = "serde")]
    fn default_move_points() -> u32 {
        Self::DEFAULT_MOVE_POINTS
    }
}

/// Live combat state of a deployed unit.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitState {
    pub id: UnitId,
    pub name: String,
    pub side: Side,
    pub action_points: u32,
    pub health: f32,
    pub move_points: u32,
    pub position: Position,
    /// Set once the unit has acted (or been skipped) during its side's turn.
    pub exhausted: bool,
}

impl UnitState {
    pub fn from_spec(id: UnitId, spec: UnitSpec, position: Position) -> Self {
        Self {
            id,
            name: spec.name,
            side: spec.side,
            action_points: spec.action_points,
            health: spec.health,
            move_points: spec.move_points,
            position,
            exhausted: false,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    pub fn is_hostile_to(&self, other: &UnitState) -> bool {
        self.side != other.side
    }
}

/// Entity registry: the single source of truth for every unit in a battle.
///
/// Units that drop to zero health move from the active roster to `fallen`,
/// where undo can still find them.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitsState {
    active: BTreeMap<UnitId, UnitState>,
    fallen: BTreeMap<UnitId, UnitState>,
    next_id: u32,
}

impl UnitsState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: UnitId) -> Option<&UnitState> {
        self.active.get(&id)
    }

    pub fn get_mut(&mut self, id: UnitId) -> Option<&mut UnitState> {
        self.active.get_mut(&id)
    }

    pub fn fallen(&self, id: UnitId) -> Option<&UnitState> {
        self.fallen.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &UnitState> {
        self.active.values()
    }

    pub fn by_side(&self, side: Side) -> impl Iterator<Item = &UnitState> {
        self.active.values().filter(move |unit| unit.side == side)
    }

    pub fn ids_by_side(&self, side: Side) -> Vec<UnitId> {
        self.by_side(side).map(|unit| unit.id).collect()
    }

    pub fn count_by_side(&self, side: Side) -> usize {
        self.by_side(side).count()
    }

    pub fn find_by_name(&self, name: &str) -> Option<&UnitState> {
        self.active
            .values()
            .chain(self.fallen.values())
            .find(|unit| unit.name == name)
    }

    /// Registers a new unit and returns its freshly allocated id.
    ///
    /// # Errors
    ///
    /// Fails if the name is already taken (by a live or fallen unit) or the
    /// side's roster is full.
    pub fn register(&mut self, spec: UnitSpec, position: Position) -> Result<UnitId, RegistryError> {
        if self.find_by_name(&spec.name).is_some() {
            return Err(RegistryError::DuplicateName { name: spec.name });
        }
        if self.count_by_side(spec.side) >= BattleConfig::MAX_UNITS_PER_SIDE {
            return Err(RegistryError::RosterFull {
                side: spec.side,
                max: BattleConfig::MAX_UNITS_PER_SIDE,
            });
        }

        let id = UnitId(self.next_id);
        self.next_id = self
            .next_id
            .checked_add(1)
            .ok_or(RegistryError::IdOverflow)?;
        self.active.insert(id, UnitState::from_spec(id, spec, position));
        Ok(id)
    }

    /// Moves a unit from the active roster to the fallen list.
    pub fn retire(&mut self, id: UnitId) -> Option<&UnitState> {
        let unit = self.active.remove(&id)?;
        self.fallen.insert(id, unit);
        self.fallen.get(&id)
    }

    /// Returns a fallen unit to the active roster.
    pub fn reinstate(&mut self, id: UnitId) -> Option<&mut UnitState> {
        let unit = self.fallen.remove(&id)?;
        self.active.insert(id, unit);
        self.active.get_mut(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_rejects_duplicate_names() {
        let mut units = UnitsState::new();
        units
            .register(UnitSpec::new("Aldric", Side::Player, 2, 10.0), Position::ORIGIN)
            .unwrap();

        let err = units
            .register(UnitSpec::new("Aldric", Side::Enemy, 1, 5.0), Position::new(1, 0))
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::DuplicateName {
                name: "Aldric".into()
            }
        );
    }

    #[test]
    fn retired_units_leave_the_roster_but_keep_their_name() {
        let mut units = UnitsState::new();
        let id = units
            .register(UnitSpec::new("Mira", Side::Enemy, 2, 4.0), Position::ORIGIN)
            .unwrap();

        units.retire(id);
        assert_eq!(units.count_by_side(Side::Enemy), 0);
        assert!(units.fallen(id).is_some());
        assert!(units.find_by_name("Mira").is_some());

        units.reinstate(id);
        assert_eq!(units.count_by_side(Side::Enemy), 1);
    }
}
