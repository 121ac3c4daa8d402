use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading, writing or watching the state file.
#[derive(Error, Debug)]
pub enum StoreError {
    /// I/O operation on the state file failed
    #[error("I/O error on '{path}': {details}")]
    Io {
        /// File or directory involved
        path: PathBuf,
        /// I/O error details
        details: String,
    },

    /// A value could not be encoded as JSON
    #[error("failed to encode state: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The state file could not be watched
    #[error("failed to watch '{path}': {details}")]
    Watch {
        /// Directory being watched
        path: PathBuf,
        /// Watcher error details
        details: String,
    },
}

impl StoreError {
    /// Creates an I/O error with path context.
    pub fn io(error: impl std::fmt::Display, path: impl Into<PathBuf>) -> Self {
        StoreError::Io {
            path: path.into(),
            details: error.to_string(),
        }
    }
}
