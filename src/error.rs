//! Error types for NoBox
//!
//! Provides a unified error type for all store operations.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type alias using NoboxError
pub type Result<T> = std::result::Result<T, NoboxError>;

/// Unified error type for NoBox operations
#[derive(Debug, Error)]
pub enum NoboxError {
    // -------------------------------------------------------------------------
    // Storage Errors
    // -------------------------------------------------------------------------
    /// Underlying filesystem failure (permissions, disk full, ...)
    #[error("{}: {source}", path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    // -------------------------------------------------------------------------
    // Format Errors
    // -------------------------------------------------------------------------
    /// File exists but does not hold a valid mapping in the expected format
    #[error("{} is not a valid collection: {message}", path.display())]
    Format { path: PathBuf, message: String },

    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Lookup Errors
    // -------------------------------------------------------------------------
    #[error("{0} not found")]
    NotFound(String),

    // -------------------------------------------------------------------------
    // Input Errors
    // -------------------------------------------------------------------------
    #[error("Invalid name '{0}': must be non-empty and contain no path separators")]
    InvalidName(String),

    /// The import stream itself could not be read
    #[error("Failed to read input: {0}")]
    Input(#[from] io::Error),
}

impl NoboxError {
    /// Wrap an I/O error with the path it happened on
    pub fn storage(path: &Path, source: io::Error) -> Self {
        NoboxError::Storage {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Build a format error for a file that failed to parse
    pub fn format(path: &Path, message: impl ToString) -> Self {
        NoboxError::Format {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }
}
