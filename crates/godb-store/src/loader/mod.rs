//! Loading orchestration: semsql bulk copy, DDL, GAF/GPI sources, derived
//! tables, and GO-rule validation.

pub mod gaf;
pub mod semsql;

use godb_common::{GodbError, Result};
use sqlx::{Row, SqlitePool};
use tracing::info;

use crate::config::LoaderConfig;
use crate::schema;

/// Execute all steps to load the GO database.
///
/// Order matters: the ontology tables must exist before the DDL's closure
/// views are created, and the derived views are materialized last.
pub async fn load_all(config: &LoaderConfig) -> Result<SqlitePool> {
    config.check()?;
    let pool = config.connect().await?;
    semsql::bulk_load_semsql(&pool, &config.semsql_paths()).await?;
    schema::load_ddl(&pool).await?;
    gaf::load_gaf(&pool, &config.sources).await?;
    gaf::load_gpi(&pool, &config.gpi_sources).await?;
    load_derived_tables(&pool).await?;
    info!("All load steps completed");
    Ok(pool)
}

/// Convert a view into a table of the same name
pub async fn materialize_view(pool: &SqlitePool, view_name: &str) -> Result<()> {
    let view_name = validate_identifier(view_name)?;
    info!(view = %view_name, "Materializing view");
    let tmp = format!("{view_name}__tmp");
    sqlx::query(&format!("CREATE TABLE {tmp} AS SELECT * FROM {view_name}"))
        .execute(pool)
        .await?;
    sqlx::query(&format!("DROP VIEW {view_name}"))
        .execute(pool)
        .await?;
    sqlx::query(&format!("ALTER TABLE {tmp} RENAME TO {view_name}"))
        .execute(pool)
        .await?;
    Ok(())
}

/// Materialize the derived relations the query layer depends on
pub async fn load_derived_tables(pool: &SqlitePool) -> Result<()> {
    info!("Materializing derived tables");
    materialize_view(pool, "gaf_association").await?;
    materialize_view(pool, "gpi").await?;
    Ok(())
}

/// Run every registered GO-rule violation view and collect messages.
///
/// Zero messages means the database passed validation. Each violating view
/// contributes its violation count and up to five sample rows.
pub async fn validate_db(pool: &SqlitePool) -> Result<Vec<String>> {
    info!("Validating the database");
    let rules = sqlx::query("SELECT view_name, rule_id, title FROM gorule_view ORDER BY rule_id")
        .fetch_all(pool)
        .await?;

    let mut messages = Vec::new();
    for rule in rules {
        let view_name: String = rule.try_get("view_name")?;
        let rule_id: String = rule.try_get("rule_id")?;
        let title: String = rule.try_get("title")?;
        let view_name = validate_identifier(&view_name)?;

        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {view_name}"))
            .fetch_one(pool)
            .await?;
        if count == 0 {
            continue;
        }
        messages.push(format!("{rule_id} ({title}): {count} violation(s)"));

        let samples = sqlx::query(&format!(
            "SELECT db, db_object_id, ontology_class_ref, evidence_type FROM {view_name} LIMIT 5"
        ))
        .fetch_all(pool)
        .await?;
        for row in samples {
            let db: String = row.try_get("db")?;
            let object_id: String = row.try_get("db_object_id")?;
            let class_ref: String = row.try_get("ontology_class_ref")?;
            let evidence: String = row.try_get("evidence_type")?;
            messages.push(format!("{rule_id}: {db}:{object_id} {class_ref} {evidence}"));
        }
    }
    Ok(messages)
}

/// Reject identifiers that cannot be safely spliced into DDL statements
pub(crate) fn validate_identifier(name: &str) -> Result<&str> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !name.starts_with(|c: char| c.is_ascii_digit());
    if valid {
        Ok(name)
    } else {
        Err(GodbError::config(format!("Invalid identifier: {name}")))
    }
}
