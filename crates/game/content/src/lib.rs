//! Data-driven battle content and loaders.
//!
//! This crate houses the on-disk formats for battles:
//! - Battle maps: square terrain grids with per-engagement spawn points
//! - Scenarios: a map reference plus the rosters deployed onto it
//!
//! Content is turned into `tactics-core` values ([`GridMap`], [`BattleState`])
//! and never appears in battle state itself.
//!
//! [`GridMap`]: tactics_core::GridMap
//! [`BattleState`]: tactics_core::BattleState

pub mod battlefield;
pub mod error;
pub mod loaders;

pub use battlefield::{BattleMap, Engagement, MapKind, Placement, Scenario, SpawnPoints};
pub use error::LoadError;
pub use loaders::{MapLoader, ScenarioLoader};
