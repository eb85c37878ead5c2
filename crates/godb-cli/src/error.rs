//! Error types for the godb CLI
//!
//! Errors are user-facing; messages say what went wrong and what to try.

use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Error type for CLI operations
#[derive(Error, Debug)]
pub enum CliError {
    /// Store-layer failure (loading, querying, exporting)
    #[error(transparent)]
    Store(#[from] godb_common::GodbError),

    /// Database operation failed (SQLx)
    #[error("Database error: {0}. Check the --db path points at a loaded database.")]
    Database(#[from] sqlx::Error),

    /// File system operation failed
    #[error("File operation failed: {0}. Check file permissions and disk space.")]
    Io(#[from] std::io::Error),

    /// JSON serialization failed
    #[error("Failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV/TSV serialization failed
    #[error("Failed to write tabular output: {0}")]
    Csv(#[from] csv::Error),

    /// A command argument did not validate
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// GO-rule validation found violations
    #[error("Validation found {0} rule(s) with violations. See report above.")]
    ValidationFailed(usize),
}

impl CliError {
    /// Create an invalid-argument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        CliError::InvalidArgument(msg.into())
    }
}
