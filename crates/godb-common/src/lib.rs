//! godb Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, utilities, and error handling for the godb project.
//!
//! # Overview
//!
//! This crate provides common functionality used across all godb workspace members:
//!
//! - **Error Handling**: Custom error types and result types
//! - **Logging**: Centralized tracing initialization
//! - **Types**: The GAF annotation model and the allow-listed field enum
//!
//! # Example
//!
//! ```no_run
//! use godb_common::{Result, GodbError};
//! use godb_common::types::AnnotationField;
//!
//! fn parse_group_field(name: &str) -> Result<AnnotationField> {
//!     let field: AnnotationField = name.parse()?;
//!     Ok(field)
//! }
//! ```

pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{GodbError, Result};
