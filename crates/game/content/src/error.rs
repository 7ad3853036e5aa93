use std::path::PathBuf;

use tactics_core::{DeploymentError, OracleError};

/// Errors raised while reading or materializing battle content.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse RON: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("map of size {size} needs {expected} tiles, found {actual}")]
    NotSquare {
        size: u32,
        expected: usize,
        actual: usize,
    },

    #[error("tile override ({x}, {y}) lies outside a {size}x{size} map")]
    OverrideOutOfBounds { x: i32, y: i32, size: u32 },

    #[error(transparent)]
    Grid(#[from] OracleError),

    #[error("cannot deploy `{name}`: {source}")]
    Deployment {
        name: String,
        #[source]
        source: DeploymentError,
    },
}
