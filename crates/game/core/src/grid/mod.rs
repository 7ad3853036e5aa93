//! Grid & range engine.
//!
//! Pure queries over static terrain: directional range walks with
//! elevation-aware step costs, and the legal move/attack set of a unit.
//! Unanswerable queries (out of bounds, zero distance, diagonal) yield `None`.
mod direction;
mod moves;
mod range;

pub use direction::CardinalDirection;
pub use moves::{Reachable, legal_moves_for};
pub use range::{BLOCKED_COST, RangeStep, TileRange, collect_range, compute_range, step_cost};
