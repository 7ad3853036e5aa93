//! Content loaders for reading battle data from RON files.

pub mod map;
pub mod scenario;

pub use map::MapLoader;
pub use scenario::ScenarioLoader;

use std::path::Path;

use crate::LoadError;

/// Common result type for loaders.
pub type LoadResult<T> = Result<T, LoadError>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}
