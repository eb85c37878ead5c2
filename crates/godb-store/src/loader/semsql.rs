//! Bulk loading of semsql SQLite ontology exports
//!
//! Each ontology database is attached under a per-index alias; the closure
//! tables are created from the first database and appended from any
//! subsequent ones, then the database is detached.

use std::path::Path;

use godb_common::{GodbError, Result};
use sqlx::SqlitePool;
use tracing::{debug, info};

/// Ontology tables copied from each semsql export
pub const ONTOLOGY_TABLES: [&str; 4] = [
    "edge",
    "entailed_edge",
    "statements",
    "rdfs_subclass_of_statement",
];

/// Bulk load one or more semsql ontology databases
pub async fn bulk_load_semsql(pool: &SqlitePool, paths: &[String]) -> Result<()> {
    if paths.is_empty() {
        return Err(GodbError::config(
            "At least one ontology database path is required",
        ));
    }

    // ATTACH is connection-scoped; hold one connection for the whole copy.
    let mut conn = pool.acquire().await?;

    for (idx, db_path) in paths.iter().enumerate() {
        info!(
            db = %db_path,
            index = idx + 1,
            total = paths.len(),
            "Processing ontology database"
        );
        if !Path::new(db_path).exists() {
            return Err(GodbError::config(format!(
                "Ontology database not found: {db_path}"
            )));
        }

        let alias = format!("semsql_{idx}");
        let attach = attach_sql(db_path, &alias);
        debug!(sql = %attach, "Attaching ontology database");
        sqlx::query(&attach).execute(&mut *conn).await?;

        for table in ONTOLOGY_TABLES {
            let sql = if idx == 0 {
                format!("CREATE TABLE {table} AS SELECT * FROM {alias}.{table}")
            } else {
                format!("INSERT INTO {table} SELECT * FROM {alias}.{table}")
            };
            debug!(sql = %sql, "Copying ontology table");
            sqlx::query(&sql).execute(&mut *conn).await?;
        }

        sqlx::query(&format!("DETACH DATABASE {alias}"))
            .execute(&mut *conn)
            .await?;
    }

    for table in ONTOLOGY_TABLES {
        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&mut *conn)
            .await?;
        info!(
            table = %table,
            rows = count,
            databases = paths.len(),
            "Ontology table loaded"
        );
    }

    Ok(())
}

/// Build the ATTACH statement for an ontology database.
///
/// The path goes in as a `file:` URI with an explicit `mode=rw`: SQLite
/// attaches plain paths with the main connection's open flags, so a
/// `:memory:` main would attach a fresh empty in-memory database instead
/// of the file. ATTACH has no bind support, hence the literal escaping.
fn attach_sql(db_path: &str, alias: &str) -> String {
    format!(
        "ATTACH DATABASE 'file:{}?mode=rw' AS {alias}",
        escape_sql_literal(db_path)
    )
}

/// Escape a path for use in an ATTACH string literal (no bind support there)
fn escape_sql_literal(path: &str) -> String {
    path.replace('\'', "''")
}
