//! Battle map loader.
//!
//! Maps are square. Tiles are listed column by column (`index = x * size + y`);
//! an empty list means flat open ground, refined by per-tile overrides.

use std::path::Path;

use serde::Deserialize;
use tactics_core::{GridMap, MapDimensions, Position, Side, StaticTile};
use tracing::debug;

use crate::battlefield::{BattleMap, Engagement, MapKind, SpawnPoints};
use crate::LoadError;
use crate::loaders::{LoadResult, read_file};

/// Map data structure for RON files.
#[derive(Debug, Clone, Deserialize)]
struct MapDataRon {
    name: String,
    #[serde(default)]
    kind: MapKind,
    #[serde(default)]
    difficulty: u8,
    size: u32,
    #[serde(default)]
    tiles: Vec<StaticTile>,
    #[serde(default)]
    overrides: Vec<(i32, i32, StaticTile)>,
    #[serde(default)]
    spawn_points: Vec<(Engagement, Side, Vec<(i32, i32)>)>,
}

/// Loader for battle maps from RON files.
pub struct MapLoader;

impl MapLoader {
    /// Load a battle map from a RON file.
    pub fn load(path: &Path) -> LoadResult<BattleMap> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse a battle map from RON text.
    ///
    /// # Errors
    ///
    /// Fails on malformed RON, a tile list that does not cover `size * size`
    /// cells, or an override outside the map.
    pub fn parse(content: &str) -> LoadResult<BattleMap> {
        let data: MapDataRon = ron::from_str(content)?;
        let dimensions = MapDimensions::square(data.size);

        let mut grid = if data.tiles.is_empty() {
            GridMap::flat(data.size, data.size)
        } else {
            if data.tiles.len() != dimensions.area() {
                return Err(LoadError::NotSquare {
                    size: data.size,
                    expected: dimensions.area(),
                    actual: data.tiles.len(),
                });
            }
            GridMap::from_tiles(dimensions, data.tiles)?
        };

        for (x, y, tile) in data.overrides {
            if !grid.set_tile(Position::new(x, y), tile) {
                return Err(LoadError::OverrideOutOfBounds {
                    x,
                    y,
                    size: data.size,
                });
            }
        }

        let spawn_points = data
            .spawn_points
            .into_iter()
            .map(|(engagement, side, positions)| SpawnPoints {
                engagement,
                side,
                positions: positions
                    .into_iter()
                    .map(|(x, y)| Position::new(x, y))
                    .collect(),
            })
            .collect();

        debug!(
            target: "content::map",
            name = %data.name,
            size = data.size,
            "battle map loaded"
        );

        Ok(BattleMap {
            name: data.name,
            kind: data.kind,
            difficulty: data.difficulty,
            grid,
            spawn_points,
        })
    }
}
