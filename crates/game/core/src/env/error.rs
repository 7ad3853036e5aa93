//! Oracle access errors.

use crate::error::{ErrorSeverity, GameError};

/// Errors that occur when accessing or building terrain data.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OracleError {
    /// MapOracle is not available in the environment.
    #[error("MapOracle not available")]
    MapNotAvailable,

    /// Tile list does not cover the declared grid.
    #[error("grid expects {expected} tiles, got {actual}")]
    TileCountMismatch { expected: usize, actual: usize },
}

impl GameError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            OracleError::MapNotAvailable => ErrorSeverity::Internal,
            OracleError::TileCountMismatch { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            OracleError::MapNotAvailable => "ORACLE_MAP_NOT_AVAILABLE",
            OracleError::TileCountMismatch { .. } => "ORACLE_TILE_COUNT_MISMATCH",
        }
    }
}
