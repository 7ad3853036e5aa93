//! Scenario loader.
//!
//! A scenario names a map file (relative to the scenario file) and lists the
//! units deployed at the start of the battle.

use std::path::Path;

use serde::Deserialize;
use tactics_core::{Position, Side, UnitSpec};

use crate::battlefield::{BattleMap, Engagement, Placement, Scenario};
use crate::loaders::{LoadResult, MapLoader, read_file};

#[derive(Debug, Clone, Deserialize)]
struct ScenarioRon {
    map: String,
    #[serde(default)]
    engagement: Engagement,
    units: Vec<UnitRon>,
}

#[derive(Debug, Clone, Deserialize)]
struct UnitRon {
    name: String,
    side: Side,
    action_points: u32,
    health: f32,
    #[serde(default = "default_move_points")]
    move_points: u32,
    at: (i32, i32),
}

fn default_move_points() -> u32 {
    UnitSpec::DEFAULT_MOVE_POINTS
}

/// Loader for scenarios from RON files.
pub struct ScenarioLoader;

impl ScenarioLoader {
    /// Load a scenario and the map it references.
    pub fn load(path: &Path) -> LoadResult<Scenario> {
        let content = read_file(path)?;
        let data: ScenarioRon = ron::from_str(&content)?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        let map = MapLoader::load(&base.join(&data.map))?;
        Ok(Self::build(data, map))
    }

    /// Parse scenario RON against an already loaded map; the `map` field is
    /// ignored.
    pub fn parse(content: &str, map: BattleMap) -> LoadResult<Scenario> {
        let data: ScenarioRon = ron::from_str(content)?;
        Ok(Self::build(data, map))
    }

    fn build(data: ScenarioRon, map: BattleMap) -> Scenario {
        let placements = data
            .units
            .into_iter()
            .map(|unit| Placement {
                position: Position::new(unit.at.0, unit.at.1),
                spec: UnitSpec {
                    name: unit.name,
                    side: unit.side,
                    action_points: unit.action_points,
                    health: unit.health,
                    move_points: unit.move_points,
                },
            })
            .collect();

        Scenario {
            map,
            engagement: data.engagement,
            placements,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LoadError;
    use tactics_core::DeploymentError;

    fn skirmish_map() -> BattleMap {
        MapLoader::parse(
            r#"(
                name: "Field",
                size: 5,
                spawn_points: [
                    (Attacking, Player, [(0, 0), (1, 0)]),
                    (Attacking, Enemy, [(4, 4)]),
                ],
            )"#,
        )
        .unwrap()
    }

    #[test]
    fn deploys_units_on_their_spawn_points() {
        let scenario = ScenarioLoader::parse(
            r#"(
                map: "field.ron",
                units: [
                    (name: "Aldric", side: Player, action_points: 2, health: 10.0, at: (0, 0)),
                    (name: "Mira", side: Player, action_points: 1, health: 6.0, at: (1, 0)),
                    (name: "Grub", side: Enemy, action_points: 2, health: 8.0, at: (4, 4)),
                ],
            )"#,
            skirmish_map(),
        )
        .unwrap();

        let (state, ids) = scenario.deploy().unwrap();
        assert_eq!(ids.len(), 3);
        assert_eq!(state.active_count(Side::Player), 2);
        assert_eq!(state.unit(ids[2]).unwrap().move_points, UnitSpec::DEFAULT_MOVE_POINTS);
    }

    #[test]
    fn rejects_placement_off_the_spawn_points() {
        let scenario = ScenarioLoader::parse(
            r#"(
                map: "field.ron",
                engagement: Attacking,
                units: [(name: "Grub", side: Enemy, action_points: 2, health: 8.0, at: (2, 2))],
            )"#,
            skirmish_map(),
        )
        .unwrap();

        assert!(matches!(
            scenario.deploy(),
            Err(LoadError::Deployment {
                source: DeploymentError::NotSpawnPoint { .. },
                ..
            })
        ));
    }
}
