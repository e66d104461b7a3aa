//! Storage error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading or writing the storage file.
#[derive(Debug, Error)]
pub enum StorageError {
    /// No platform data directory could be determined.
    #[error("could not determine the user data directory; pass --data-dir")]
    DataDirNotFound,

    /// Reading or writing the storage file failed.
    #[error("storage I/O error at {path}: {source}")]
    Io {
        /// File or directory being accessed
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The storage contents could not be serialized.
    #[error("failed to serialize storage contents: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
