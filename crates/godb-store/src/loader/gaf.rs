//! GAF / GPI source loading
//!
//! Sources are tab-delimited files, optionally gzipped. Comment lines
//! begin with `!` and are skipped. Rows are inserted into the flat staging
//! tables with bound parameters inside a single transaction per source.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use flate2::read::GzDecoder;
use godb_common::{GodbError, Result};
use sqlx::SqlitePool;
use tracing::info;

/// Number of columns in a GAF 2.x row
pub const GAF_COLUMNS: usize = 17;

/// Number of columns in a GPI 1.2 row
pub const GPI_COLUMNS: usize = 10;

const GAF_INSERT: &str = "INSERT INTO gaf_association_flat VALUES \
    (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)";

const GPI_INSERT: &str = "INSERT INTO gpi_version_1_2_flat VALUES \
    (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)";

/// Load all GAF sources
pub async fn load_gaf(pool: &SqlitePool, sources: &[String]) -> Result<()> {
    info!(sources = ?sources, "Loading GAF data");
    for source in sources {
        load_gaf_source(pool, source).await?;
    }
    Ok(())
}

/// Load all GPI sources
pub async fn load_gpi(pool: &SqlitePool, sources: &[String]) -> Result<()> {
    info!(sources = ?sources, "Loading GPI data");
    for source in sources {
        load_gpi_source(pool, source).await?;
    }
    Ok(())
}

/// Load a single GAF source, supporting both plain and gzipped files
pub async fn load_gaf_source(pool: &SqlitePool, source: &str) -> Result<u64> {
    let count = load_delimited(pool, source, GAF_INSERT, GAF_COLUMNS).await?;
    info!(source = %source, rows = count, "Loaded GAF source");
    Ok(count)
}

/// Load a single GPI source
pub async fn load_gpi_source(pool: &SqlitePool, source: &str) -> Result<u64> {
    let count = load_delimited(pool, source, GPI_INSERT, GPI_COLUMNS).await?;
    info!(source = %source, rows = count, "Loaded GPI source");
    Ok(count)
}

/// Open a source file, transparently decompressing `.gz`
fn open_source(source: &str) -> Result<Box<dyn Read>> {
    let path = Path::new(source);
    if !path.exists() {
        return Err(GodbError::config(format!("Source file not found: {source}")));
    }
    let file = File::open(path)?;
    if source.ends_with(".gz") {
        Ok(Box::new(GzDecoder::new(file)))
    } else {
        Ok(Box::new(file))
    }
}

/// Stream a tab-delimited source into a staging table
async fn load_delimited(
    pool: &SqlitePool,
    source: &str,
    insert_sql: &str,
    columns: usize,
) -> Result<u64> {
    let reader = open_source(source)?;
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .comment(Some(b'!'))
        .flexible(true)
        .quoting(false)
        .from_reader(reader);

    let mut tx = pool.begin().await?;
    let mut count = 0u64;
    for record in csv_reader.records() {
        let record = record?;
        if record.len() > columns {
            return Err(GodbError::config(format!(
                "Row {} of {} has {} columns, expected at most {}",
                count + 1,
                source,
                record.len(),
                columns
            )));
        }
        let mut query = sqlx::query(insert_sql);
        for i in 0..columns {
            // Short rows are padded with empty trailing columns.
            query = query.bind(record.get(i).unwrap_or("").to_string());
        }
        query.execute(&mut *tx).await?;
        count += 1;
    }
    tx.commit().await?;
    Ok(count)
}
