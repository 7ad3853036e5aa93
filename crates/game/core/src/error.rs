//! Common error infrastructure for tactics-core.
//!
//! This module provides shared types and traits used across all error types in
//! the crate. Domain-specific errors (e.g., `MoveError`, `AttackError`) are
//! defined in their respective modules alongside the commands they validate.
//!
//! Range queries never produce errors: an unanswerable query (out of bounds,
//! zero distance, diagonal) is reported in-band as `None`.

/// Severity level of an error, used for categorization and logging priority.
///
/// - **Recoverable**: the battle situation forbids the action right now
///   (blocked path, exhausted unit); another action may succeed
/// - **Validation**: the request itself is malformed (unknown unit, friendly target)
/// - **Internal**: state inconsistency that indicates a bug
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - the same unit may try a different action.
    ///
    /// Examples: path blocked, not enough action points
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: unit not found, attacking a friendly unit
    Validation,

    /// Internal error - unexpected state inconsistency.
    ///
    /// Examples: occupancy map disagrees with unit position
    Internal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Common trait for all tactics-core errors.
///
/// Provides a uniform interface for error classification across the crate so
/// the runtime can pick log levels without matching on every variant.
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Default implementation uses the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
