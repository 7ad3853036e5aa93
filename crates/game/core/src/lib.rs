//! Deterministic rules for square-grid tactical battles.
//!
//! `tactics-core` defines the canonical combat rules (terrain queries, range
//! computation, commands, turn bookkeeping) and exposes pure APIs that are
//! reused by the runtime, the content loaders and offline tools. All battle
//! mutation flows through [`action::Command::execute`] and the
//! [`engine::BattleEngine`] turn bookkeeping.
pub mod action;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod grid;
pub mod state;

pub use action::{
    AttackCommand, AttackError, AttackPlan, BattleCommand, Command, CommandError, CommandHistory,
    CommandKind, MoveCommand, MoveError, MovePlan, Strike,
};
pub use config::BattleConfig;
pub use engine::{BattleEngine, BattlePhase, CommandOutcome, TurnError};
pub use env::{BattleEnv, GridMap, MapDimensions, MapOracle, OracleError, StaticTile, TerrainKind};
pub use error::{ErrorSeverity, GameError};
pub use grid::{
    BLOCKED_COST, CardinalDirection, Reachable, RangeStep, TileRange, collect_range,
    compute_range, legal_moves_for, step_cost,
};
pub use state::{
    BattleState, DeploymentError, Position, RegistryError, Side, TileMap, TileView, TurnState,
    UnitId, UnitSpec, UnitState, UnitsState, WorldState,
};
