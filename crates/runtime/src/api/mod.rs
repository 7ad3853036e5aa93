//! Public runtime API surface.
//!
//! This module gathers the types exposed to consumers of the runtime crate so
//! the session and the planner can stay focused on battle flow.

pub mod errors;
pub mod providers;

pub use errors::{Result, RuntimeError};
pub use providers::{Intent, IntentProvider, ScriptedIntentProvider};
