//! Authoritative battle state representation.
//!
//! This module owns the unit registry, the placement map, and turn
//! bookkeeping. Commands and the engine mutate it; range queries and the
//! planner only read it.
mod error;
pub mod types;

use crate::env::MapOracle;
pub use error::{DeploymentError, RegistryError};
pub use types::{
    Position, Side, TileMap, TileView, TurnState, UnitId, UnitSpec, UnitState, UnitsState,
    WorldState,
};

/// Canonical snapshot of a battle in progress.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleState {
    pub units: UnitsState,
    pub world: WorldState,
    pub turn: TurnState,
}

impl BattleState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Places a unit on the grid.
    ///
    /// # Errors
    ///
    /// Rejects out-of-bounds, non-traversable and occupied tiles, plus any
    /// registry failure (duplicate name, full roster).
    pub fn deploy<M>(
        &mut self,
        map: &M,
        spec: UnitSpec,
        position: Position,
    ) -> Result<UnitId, DeploymentError>
    where
        M: MapOracle + ?Sized,
    {
        let Some(view) = self.world.tile_view(map, position) else {
            let dimensions = map.dimensions();
            return Err(DeploymentError::OutOfBounds {
                position,
                width: dimensions.width,
                height: dimensions.height,
            });
        };
        if !view.is_traversable() {
            return Err(DeploymentError::NotTraversable { position });
        }
        if let Some(occupant) = view.occupant() {
            return Err(DeploymentError::Occupied { position, occupant });
        }

        let id = self.units.register(spec, position)?;
        // Tile was checked free above.
        let _ = self.world.tile_map.place(position, id);
        Ok(id)
    }

    /// Like [`deploy`](Self::deploy) but additionally requires `position` to
    /// be one of `spawn_points`.
    pub fn deploy_at_spawn<M>(
        &mut self,
        map: &M,
        spec: UnitSpec,
        position: Position,
        spawn_points: &[Position],
    ) -> Result<UnitId, DeploymentError>
    where
        M: MapOracle + ?Sized,
    {
        if !spawn_points.contains(&position) {
            return Err(DeploymentError::NotSpawnPoint {
                position,
                side: spec.side,
            });
        }
        self.deploy(map, spec, position)
    }

    pub fn unit(&self, id: UnitId) -> Option<&UnitState> {
        self.units.get(id)
    }

    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut UnitState> {
        self.units.get_mut(id)
    }

    pub fn occupant(&self, position: Position) -> Option<UnitId> {
        self.world.tile_map.occupant(position)
    }

    pub fn unit_at(&self, position: Position) -> Option<&UnitState> {
        self.occupant(position).and_then(|id| self.units.get(id))
    }

    /// Returns a merged tile view that combines static terrain with the occupant.
    pub fn tile_view<M>(&self, map: &M, position: Position) -> Option<TileView>
    where
        M: MapOracle + ?Sized,
    {
        self.world.tile_view(map, position)
    }

    pub fn active_count(&self, side: Side) -> usize {
        self.units.count_by_side(side)
    }

    /// Moves a live unit to `to`, keeping the placement map in sync.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::UnknownUnit` if the unit is not deployed, and
    /// leaves state untouched if `to` holds another unit (returns `Ok(false)`).
    pub fn relocate(&mut self, id: UnitId, to: Position) -> Result<bool, RegistryError> {
        let unit = self
            .units
            .get_mut(id)
            .ok_or(RegistryError::UnknownUnit { unit: id })?;
        if !self.world.tile_map.relocate(unit.position, to, id) {
            return Ok(false);
        }
        unit.position = to;
        Ok(true)
    }

    /// Marks a unit as having acted this turn.
    pub fn exhaust(&mut self, id: UnitId) -> bool {
        let Some(unit) = self.units.get_mut(id) else {
            return false;
        };
        unit.exhausted = true;
        self.turn.mark_exhausted(id);
        true
    }

    pub fn restore(&mut self, id: UnitId) {
        if let Some(unit) = self.units.get_mut(id) {
            unit.exhausted = false;
        }
        self.turn.unmark_exhausted(id);
    }

    pub fn is_exhausted(&self, id: UnitId) -> bool {
        self.units.get(id).is_some_and(|unit| unit.exhausted)
    }

    /// Removes a dead unit from the grid and the active roster.
    pub fn remove_fallen(&mut self, id: UnitId) -> Option<(Side, Position)> {
        let unit = self.units.get(id)?;
        let (side, position) = (unit.side, unit.position);
        self.world.tile_map.remove(position, id);
        self.turn.unmark_exhausted(id);
        self.units.retire(id);
        Some((side, position))
    }

    /// Puts a fallen unit back on its last tile if that tile is free.
    pub fn reinstate_fallen(&mut self, id: UnitId) -> bool {
        let Some(position) = self.units.fallen(id).map(|unit| unit.position) else {
            return false;
        };
        if self.world.tile_map.place(position, id).is_err() {
            return false;
        }
        self.units.reinstate(id).is_some()
    }

    /// Side that has lost every unit, checking the player side first.
    pub fn defeated_side(&self) -> Option<Side> {
        Side::ALL
            .into_iter()
            .find(|side| self.active_count(*side) == 0)
    }
}
