//! Unified error types surfaced by the runtime API.
//!
//! Wraps turn-rule and command failures so clients can bubble them up with
//! consistent context.
use thiserror::Error;

use tactics_core::{CommandError, ErrorSeverity, GameError, Side, TurnError};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Turn(#[from] TurnError),

    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("{side} is driven by the planner and does not accept commands")]
    PlannerControlled { side: Side },

    #[error("{side} is not driven by the planner")]
    NotPlannerControlled { side: Side },

    #[error("intent provider failed: {reason}")]
    Provider { reason: String },
}

impl RuntimeError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            RuntimeError::Turn(err) => err.severity(),
            RuntimeError::Command(err) => err.severity(),
            RuntimeError::PlannerControlled { .. } | RuntimeError::NotPlannerControlled { .. } => {
                ErrorSeverity::Validation
            }
            RuntimeError::Provider { .. } => ErrorSeverity::Internal,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            RuntimeError::Turn(err) => err.error_code(),
            RuntimeError::Command(err) => err.error_code(),
            RuntimeError::PlannerControlled { .. } => "RUNTIME_PLANNER_CONTROLLED",
            RuntimeError::NotPlannerControlled { .. } => "RUNTIME_NOT_PLANNER_CONTROLLED",
            RuntimeError::Provider { .. } => "RUNTIME_PROVIDER",
        }
    }
}
