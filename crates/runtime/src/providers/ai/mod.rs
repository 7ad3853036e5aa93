//! Tactical planner for planner-driven sides.
//!
//! Planning is a single greedy pass per unit:
//!
//! 1. **Candidate generation**: one attack per reachable opponent, one move
//!    per legal destination ([`ActionCandidateGenerator`])
//! 2. **Scoring**: attacks favour wounded targets and heavy damage, moves
//!    favour high ground at the standoff distance ([`scoring`])
//! 3. **Selection**: the highest finite score wins ([`TacticalPlanner`])
//!
//! Execution with fallback lives in [`crate::session`], since it needs the
//! mutable battle state.

pub mod context;
pub mod generator;
pub mod planner;
pub mod provider;
pub mod scoring;
pub mod types;

pub use context::AiContext;
pub use generator::ActionCandidateGenerator;
pub use planner::TacticalPlanner;
pub use provider::PlannerIntentProvider;
pub use types::{AiAction, SidePlan};
