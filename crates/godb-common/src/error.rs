//! Error types for godb
//!
//! All errors are designed to be user-facing with clear messages and, where
//! possible, a suggestion for how to recover.

use thiserror::Error;

/// Result type alias for godb operations
pub type Result<T> = std::result::Result<T, GodbError>;

/// Main error type for godb
#[derive(Error, Debug)]
pub enum GodbError {
    /// File system operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Database operation failed (SQLx)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Delimited file parsing failed
    #[error("Failed to parse delimited file: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Required input missing or malformed
    #[error("Configuration error: {0}")]
    Config(String),

    /// A caller-specified field name does not exist on the annotation schema
    #[error("Unknown annotation field: '{0}'. Run 'godb evidence unique-contributions --help' for the list of queryable fields.")]
    FieldReference(String),

    /// Target database already exists and overwrite was not requested
    #[error("Database exists: {0}. Use --force to overwrite.")]
    DatabaseExists(String),

    /// A source file has an unrecognized type
    #[error("Unknown source file type: {0}. Sources must be .gaf or .gpi files (optionally gzipped).")]
    UnknownSourceType(String),

    /// Feature is specified but not implemented
    #[error("Not implemented: {0}")]
    Unimplemented(String),

    /// Generic anyhow error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GodbError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a field reference error
    pub fn field_reference(field: impl Into<String>) -> Self {
        Self::FieldReference(field.into())
    }

    /// Create an unimplemented error
    pub fn unimplemented(msg: impl Into<String>) -> Self {
        Self::Unimplemented(msg.into())
    }
}
