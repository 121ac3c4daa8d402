use std::path::Path;

use thiserror::Error;

use crate::{services::mpris::MediaError, store::StoreError, tracker::TrackerError};

/// Error types for the explored application.
///
/// Covers configuration loading and validation, plus the errors surfaced by
/// the tracker, the persistence store and the MPRIS host adapter.
#[derive(Error, Debug)]
pub enum ExploredError {
    /// Configuration validation error
    #[error("configuration validation failed for '{component}': {details}")]
    ConfigValidation {
        /// Component that failed validation
        component: String,
        /// Validation error details
        details: String,
    },

    /// I/O operation error
    #[error("I/O error on '{path}': {details}")]
    IoError {
        /// Path where I/O error occurred
        path: std::path::PathBuf,
        /// I/O error details
        details: String,
    },

    /// Standard I/O operation error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error with location context
    #[error("failed to parse TOML at '{location}': {details}")]
    TomlParseError {
        /// Location of TOML being parsed (file path or "string")
        location: String,
        /// Parse error details
        details: String,
    },

    /// Progress tracking stopped on a fatal error
    #[error(transparent)]
    Tracker(#[from] TrackerError),

    /// State file could not be read or written
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Media player host failure
    #[error(transparent)]
    Media(#[from] MediaError),
}

/// A specialized `Result` type for explored operations.
pub type Result<T> = std::result::Result<T, ExploredError>;

impl ExploredError {
    /// Creates a TOML parsing error with optional file path context.
    ///
    /// # Arguments
    ///
    /// * `error` - The underlying parsing error
    /// * `path` - Optional path to the file that failed to parse
    pub fn toml_parse(error: impl std::fmt::Display, path: Option<&Path>) -> Self {
        let location = match path {
            Some(p) => {
                let clean_path = p.canonicalize().unwrap_or_else(|_| p.to_path_buf());
                clean_path.to_string_lossy().to_string()
            }
            None => "string".to_string(),
        };

        ExploredError::TomlParseError {
            location,
            details: error.to_string(),
        }
    }

    /// Creates a validation error for a single configuration field.
    pub fn invalid_field(component: &str, field: &str, reason: impl std::fmt::Display) -> Self {
        ExploredError::ConfigValidation {
            component: component.to_string(),
            details: format!("'{field}' {reason}"),
        }
    }
}
