use crate::state::Position;

use super::OracleError;

/// Static terrain oracle exposing immutable grid layout information.
///
/// Tiles never change once the grid is built; dynamic placement lives in
/// [`crate::state::WorldState`].
pub trait MapOracle: Send + Sync {
    fn dimensions(&self) -> MapDimensions;
    fn tile(&self, position: Position) -> Option<StaticTile>;

    fn contains(&self, position: Position) -> bool {
        self.dimensions().contains(position)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapDimensions {
    pub width: u32,
    pub height: u32,
}

impl MapDimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub const fn square(size: u32) -> Self {
        Self::new(size, size)
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && position.x < self.width as i32
            && position.y < self.height as i32
    }

    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Immutable descriptor for a single grid tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StaticTile {
    pub elevation: i32,
    pub blocking: bool,
    pub terrain: TerrainKind,
}

impl StaticTile {
    pub const fn new(elevation: i32, blocking: bool, terrain: TerrainKind) -> Self {
        Self {
            elevation,
            blocking,
            terrain,
        }
    }

    /// Open ground at the given elevation.
    pub const fn ground(elevation: i32) -> Self {
        Self::new(elevation, false, TerrainKind::Default)
    }

    pub const fn wall() -> Self {
        Self::new(0, true, TerrainKind::Default)
    }

    pub const fn water() -> Self {
        Self::new(0, false, TerrainKind::Water)
    }

    /// Water is never traversable, whatever the `blocking` flag says.
    pub fn is_traversable(self) -> bool {
        !self.blocking && self.terrain.is_traversable()
    }
}

/// Terrain classes for grid tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TerrainKind {
    #[default]
    Default,
    Water,
}

impl TerrainKind {
    pub fn is_traversable(self) -> bool {
        matches!(self, TerrainKind::Default)
    }
}

/// Dense rectangular grid stored column-major (`index = x * height + y`).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridMap {
    dimensions: MapDimensions,
    tiles: Vec<StaticTile>,
}

impl GridMap {
    /// Builds a grid from an explicit tile list.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::TileCountMismatch` if the tile count does not
    /// match the dimensions.
    pub fn from_tiles(dimensions: MapDimensions, tiles: Vec<StaticTile>) -> Result<Self, OracleError> {
        if tiles.len() != dimensions.area() {
            return Err(OracleError::TileCountMismatch {
                expected: dimensions.area(),
                actual: tiles.len(),
            });
        }
        Ok(Self { dimensions, tiles })
    }

    /// Creates a grid of open ground at elevation 0.
    pub fn flat(width: u32, height: u32) -> Self {
        let dimensions = MapDimensions::new(width, height);
        Self {
            dimensions,
            tiles: vec![StaticTile::ground(0); dimensions.area()],
        }
    }

    /// Replaces a single tile (builder pattern). Out-of-bounds positions are ignored.
    #[must_use]
    pub fn with_tile(mut self, position: Position, tile: StaticTile) -> Self {
        self.set_tile(position, tile);
        self
    }

    /// Sets the elevation of a single tile (builder pattern).
    #[must_use]
    pub fn with_elevation(mut self, position: Position, elevation: i32) -> Self {
        if let Some(index) = self.index(position) {
            self.tiles[index].elevation = elevation;
        }
        self
    }

    pub fn set_tile(&mut self, position: Position, tile: StaticTile) -> bool {
        match self.index(position) {
            Some(index) => {
                self.tiles[index] = tile;
                true
            }
            None => false,
        }
    }

    pub fn tiles(&self) -> &[StaticTile] {
        &self.tiles
    }

    fn index(&self, position: Position) -> Option<usize> {
        if !self.dimensions.contains(position) {
            return None;
        }
        Some(position.x as usize * self.dimensions.height as usize + position.y as usize)
    }
}

impl MapOracle for GridMap {
    fn dimensions(&self) -> MapDimensions {
        self.dimensions
    }

    fn tile(&self, position: Position) -> Option<StaticTile> {
        self.index(position).map(|index| self.tiles[index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn water_is_never_traversable() {
        assert!(!StaticTile::water().is_traversable());
        assert!(!StaticTile::new(0, false, TerrainKind::Water).is_traversable());
        assert!(!StaticTile::wall().is_traversable());
        assert!(StaticTile::ground(3).is_traversable());
    }

    #[test]
    fn grid_lookup_is_column_major() {
        let dimensions = MapDimensions::new(2, 3);
        let tiles = (0..6).map(StaticTile::ground).collect();
        let map = GridMap::from_tiles(dimensions, tiles).unwrap();

        assert_eq!(map.tile(Position::new(0, 2)).unwrap().elevation, 2);
        assert_eq!(map.tile(Position::new(1, 0)).unwrap().elevation, 3);
        assert_eq!(map.tile(Position::new(2, 0)), None);
        assert_eq!(map.tile(Position::new(-1, 0)), None);
    }

    #[test]
    fn rejects_tile_count_mismatch() {
        let result = GridMap::from_tiles(MapDimensions::square(3), vec![StaticTile::default(); 8]);
        assert!(matches!(
            result,
            Err(OracleError::TileCountMismatch {
                expected: 9,
                actual: 8
            })
        ));
    }
}
