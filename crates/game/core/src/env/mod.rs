//! Traits describing read-only battle data.
//!
//! The terrain oracle exposes static grid geometry; the [`Env`] aggregate
//! bundles it with the rule configuration so commands and queries can access
//! everything they need without hard coupling to concrete implementations.
mod error;
mod map;

pub use error::OracleError;
pub use map::{GridMap, MapDimensions, MapOracle, StaticTile, TerrainKind};

use crate::config::BattleConfig;

static DEFAULT_CONFIG: BattleConfig = BattleConfig::new();

/// Aggregates read-only oracles required by commands and range queries.
#[derive(Clone, Copy, Debug)]
pub struct Env<'a, M>
where
    M: MapOracle + ?Sized,
{
    map: Option<&'a M>,
    config: Option<&'a BattleConfig>,
}

pub type BattleEnv<'a> = Env<'a, dyn MapOracle + 'a>;

impl<'a, M> Env<'a, M>
where
    M: MapOracle + ?Sized,
{
    pub fn new(map: Option<&'a M>, config: Option<&'a BattleConfig>) -> Self {
        Self { map, config }
    }

    pub fn with_all(map: &'a M, config: &'a BattleConfig) -> Self {
        Self::new(Some(map), Some(config))
    }

    pub fn empty() -> Self {
        Self {
            map: None,
            config: None,
        }
    }

    /// Returns the MapOracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::MapNotAvailable` if no map oracle was provided.
    pub fn map(&self) -> Result<&'a M, OracleError> {
        self.map.ok_or(OracleError::MapNotAvailable)
    }

    /// Returns the rule configuration, falling back to the defaults.
    pub fn config(&self) -> &'a BattleConfig {
        self.config.unwrap_or(&DEFAULT_CONFIG)
    }
}

impl<'a, M> Env<'a, M>
where
    M: MapOracle + 'a,
{
    /// Converts this environment into a trait-object based `BattleEnv`.
    pub fn as_battle_env(&self) -> BattleEnv<'a> {
        let map: Option<&'a dyn MapOracle> = self.map.map(|map| map as _);
        Env::new(map, self.config)
    }
}

impl<'a> BattleEnv<'a> {
    /// Builds a trait-object environment directly from a concrete map.
    pub fn from_map<M: MapOracle + 'a>(map: &'a M, config: &'a BattleConfig) -> Self {
        let map: &'a dyn MapOracle = map;
        Env::new(Some(map), Some(config))
    }
}
