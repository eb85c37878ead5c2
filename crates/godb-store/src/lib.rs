//! godb Store Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Database layer for godb: loading GAF/GPI annotation files and semsql
//! ontology exports into an analytical SQLite database, and querying it.
//!
//! # Overview
//!
//! - **Loading**: bulk-copy semsql ontology tables, apply the schema,
//!   stream GAF/GPI files into staging tables, materialize derived views
//! - **Validation**: run the registered GO-rule violation views
//! - **Export**: filtered GAF 2.2 serialization
//! - **Evidence Queries**: the redundancy engine
//!   ([`queries::evidence::EvidenceRedundancyAnalyzer`])
//!
//! The store handle is a plain [`sqlx::SqlitePool`], acquired through
//! [`config::LoaderConfig::connect`] or [`config::open_read_only`] and owned
//! by the caller; query components borrow it for the duration of a call.

pub mod config;
pub mod export;
pub mod loader;
pub mod queries;
pub mod schema;

// Re-export commonly used types
pub use config::{open_read_only, open_read_write, LoaderConfig, MEMORY_DB};
pub use export::GafExportFilter;
pub use queries::evidence::EvidenceRedundancyAnalyzer;
