use std::collections::BTreeMap;

use crate::env::{MapOracle, StaticTile, TerrainKind};

use super::{Position, UnitId};

/// Aggregated world-level state layered on top of the static terrain.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldState {
    pub tile_map: TileMap,
}

impl WorldState {
    pub fn new(tile_map: TileMap) -> Self {
        Self { tile_map }
    }

    /// Produces a merged view combining static tile data with the occupant.
    pub fn tile_view<M>(&self, map: &M, position: Position) -> Option<TileView>
    where
        M: MapOracle + ?Sized,
    {
        let static_tile = map.tile(position)?;
        Some(TileView {
            position,
            static_tile,
            occupant: self.tile_map.occupant(position),
        })
    }
}

/// Placement map: at most one unit per coordinate.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileMap {
    occupancy: BTreeMap<Position, UnitId>,
}

impl TileMap {
    pub fn occupancy(&self) -> &BTreeMap<Position, UnitId> {
        &self.occupancy
    }

    pub fn occupant(&self, position: Position) -> Option<UnitId> {
        self.occupancy.get(&position).copied()
    }

    /// Places a unit, returning the current occupant if the tile is taken.
    pub fn place(&mut self, position: Position, unit: UnitId) -> Result<(), UnitId> {
        match self.occupancy.get(&position) {
            Some(&occupant) if occupant != unit => Err(occupant),
            _ => {
                self.occupancy.insert(position, unit);
                Ok(())
            }
        }
    }

    pub fn remove(&mut self, position: Position, unit: UnitId) -> bool {
        if self.occupant(position) == Some(unit) {
            self.occupancy.remove(&position);
            true
        } else {
            false
        }
    }

    /// Moves `unit` from `from` to `to`. Fails without changes if the unit is
    /// not at `from` or `to` holds somebody else.
    pub fn relocate(&mut self, from: Position, to: Position, unit: UnitId) -> bool {
        if self.occupant(from) != Some(unit) {
            return false;
        }
        if matches!(self.occupant(to), Some(other) if other != unit) {
            return false;
        }
        self.occupancy.remove(&from);
        self.occupancy.insert(to, unit);
        true
    }
}

/// Aggregated tile information used by range queries and commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileView {
    position: Position,
    static_tile: StaticTile,
    occupant: Option<UnitId>,
}

impl TileView {
    pub fn position(&self) -> Position {
        self.position
    }

    pub fn static_tile(&self) -> &StaticTile {
        &self.static_tile
    }

    pub fn occupant(&self) -> Option<UnitId> {
        self.occupant
    }

    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    pub fn is_traversable(&self) -> bool {
        self.static_tile.is_traversable()
    }

    pub fn terrain(&self) -> TerrainKind {
        self.static_tile.terrain
    }
}
