pub mod common;
pub mod turn;
pub mod unit;
pub mod world;

pub use common::{Position, Side, UnitId};
pub use turn::TurnState;
pub use unit::{UnitSpec, UnitState, UnitsState};
pub use world::{TileMap, TileView, WorldState};
