//! Loader configuration and database connection handling
//!
//! The configuration is an explicit value struct passed by reference into
//! the load functions; there is no process-wide connection state. The pool
//! returned by [`LoaderConfig::connect`] is owned by the caller and passed
//! into query components for the duration of each call.

use std::path::Path;
use std::str::FromStr;

use godb_common::{GodbError, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::info;

/// In-memory database sentinel, matching the CLI `--db` default
pub const MEMORY_DB: &str = ":memory:";

/// Configuration for loading the GO database
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Path to the SQLite database to create, or ":memory:"
    pub db: String,

    /// Paths of GAF sources
    pub sources: Vec<String>,

    /// Paths of GPI sources
    pub gpi_sources: Vec<String>,

    /// Paths to GO SQLite databases (semsql exports)
    pub go_db_paths: Vec<String>,

    /// Additional SQLite ontology databases to bulk load
    pub additional_db_paths: Vec<String>,

    /// If true, subsequent load calls append (not implemented)
    pub append: bool,

    /// If true, overwrite an existing database file
    pub force: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            db: MEMORY_DB.to_string(),
            sources: Vec::new(),
            gpi_sources: Vec::new(),
            go_db_paths: Vec::new(),
            additional_db_paths: Vec::new(),
            append: false,
            force: false,
        }
    }
}

impl LoaderConfig {
    /// Create a configuration targeting the given database path
    pub fn new(db: impl Into<String>) -> Self {
        Self {
            db: db.into(),
            ..Self::default()
        }
    }

    /// Short name/handle for the database (basename minus suffix)
    pub fn name(&self) -> String {
        if self.is_memory() {
            return "memory".to_string();
        }
        Path::new(&self.db)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.db.clone())
    }

    /// Check if the target database is in memory
    pub fn is_memory(&self) -> bool {
        self.db == MEMORY_DB
    }

    /// All ontology database paths, primary first
    pub fn semsql_paths(&self) -> Vec<String> {
        let mut paths = self.go_db_paths.clone();
        paths.extend(self.additional_db_paths.iter().cloned());
        paths
    }

    /// Validate the configuration before loading.
    ///
    /// An existing database file is removed when `force` is set and rejected
    /// otherwise. Append mode is not implemented.
    pub fn check(&self) -> Result<()> {
        if self.is_memory() {
            return Ok(());
        }
        let path = Path::new(&self.db);
        if path.exists() {
            if self.append {
                return Err(GodbError::unimplemented("append mode"));
            }
            if self.force {
                std::fs::remove_file(path)?;
                return Ok(());
            }
            return Err(GodbError::DatabaseExists(self.db.clone()));
        }
        Ok(())
    }

    /// Open a writable connection pool to the target database.
    ///
    /// The pool is limited to a single connection: SQLite in-memory
    /// databases are per-connection, and the loader is a single writer.
    pub async fn connect(&self) -> Result<SqlitePool> {
        info!(db = %self.db, "Connecting to database");
        let options = if self.is_memory() {
            SqliteConnectOptions::from_str("sqlite::memory:")?
        } else {
            SqliteConnectOptions::new()
                .filename(&self.db)
                .create_if_missing(true)
        };
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        Ok(pool)
    }
}

/// Open an existing database read-write without creating it (for
/// post-load maintenance such as materializing views)
pub async fn open_read_write(db: &str) -> Result<SqlitePool> {
    if db != MEMORY_DB && !Path::new(db).exists() {
        return Err(GodbError::config(format!("Database file not found: {db}")));
    }
    info!(db = %db, "Opening database read-write");
    let options = SqliteConnectOptions::new().filename(db);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;
    Ok(pool)
}

/// Open an existing database read-only (for query and export commands)
pub async fn open_read_only(db: &str) -> Result<SqlitePool> {
    if db != MEMORY_DB && !Path::new(db).exists() {
        return Err(GodbError::config(format!("Database file not found: {db}")));
    }
    info!(db = %db, "Opening database read-only");
    let options = SqliteConnectOptions::new().filename(db).read_only(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;
    Ok(pool)
}
