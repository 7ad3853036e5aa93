//! Intent sources other than the front-end.

pub mod ai;

pub use ai::{AiAction, PlannerIntentProvider, SidePlan, TacticalPlanner};
