//! Command layer.
//!
//! Move and attack commands validate themselves against a precomputed
//! [`crate::TileRange`] and the live battle state, execute their effect, and
//! support best-effort undo.
mod combat;
mod command;
mod history;
mod movement;

pub use combat::{AttackCommand, AttackError, AttackPlan, Strike};
pub use command::{BattleCommand, Command, CommandError, CommandKind};
pub use history::CommandHistory;
pub use movement::{MoveCommand, MoveError, MovePlan};
