use serde::{Deserialize, Serialize};
use tactics_core::{BattleState, GridMap, Position, Side, UnitId, UnitSpec};
use tracing::debug;

use crate::LoadError;

/// Terrain family of a battle map.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MapKind {
    #[default]
    Plains,
    Forest,
    Mountain,
}

/// How the two armies meet, which selects the spawn points in use.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Engagement {
    #[default]
    Attacking,
    Defending,
    Ambushing,
}

/// Tiles one side may deploy onto for one engagement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpawnPoints {
    pub engagement: Engagement,
    pub side: Side,
    pub positions: Vec<Position>,
}

/// Square battle map with its deployment zones.
#[derive(Clone, Debug, PartialEq)]
pub struct BattleMap {
    pub name: String,
    pub kind: MapKind,
    pub difficulty: u8,
    pub grid: GridMap,
    pub spawn_points: Vec<SpawnPoints>,
}

impl BattleMap {
    /// Spawn tiles for `side` in `engagement`; empty when the map defines none.
    pub fn spawn_points_for(&self, engagement: Engagement, side: Side) -> &[Position] {
        self.spawn_points
            .iter()
            .find(|points| points.engagement == engagement && points.side == side)
            .map(|points| points.positions.as_slice())
            .unwrap_or(&[])
    }
}

/// A unit and the tile it starts on.
#[derive(Clone, Debug, PartialEq)]
pub struct Placement {
    pub spec: UnitSpec,
    pub position: Position,
}

/// Everything needed to start a battle.
#[derive(Clone, Debug, PartialEq)]
pub struct Scenario {
    pub map: BattleMap,
    pub engagement: Engagement,
    pub placements: Vec<Placement>,
}

impl Scenario {
    /// Deploys every placement onto a fresh battle state.
    ///
    /// When the map defines spawn points for a side in this engagement, that
    /// side's units must start on one of them.
    pub fn deploy(&self) -> Result<(BattleState, Vec<UnitId>), LoadError> {
        let mut state = BattleState::new();
        let mut ids = Vec::with_capacity(self.placements.len());

        for placement in &self.placements {
            let spawn_points = self
                .map
                .spawn_points_for(self.engagement, placement.spec.side);
            let result = if spawn_points.is_empty() {
                state.deploy(&self.map.grid, placement.spec.clone(), placement.position)
            } else {
                state.deploy_at_spawn(
                    &self.map.grid,
                    placement.spec.clone(),
                    placement.position,
                    spawn_points,
                )
            };
            let id = result.map_err(|source| LoadError::Deployment {
                name: placement.spec.name.clone(),
                source,
            })?;
            debug!(
                target: "content::scenario",
                unit = %id,
                name = %placement.spec.name,
                position = %placement.position,
                "unit deployed"
            );
            ids.push(id);
        }

        Ok((state, ids))
    }
}
