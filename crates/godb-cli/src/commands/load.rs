//! `godb load` command implementation
//!
//! Builds the analytical database from GAF/GPI files and semsql exports.

use godb_store::{loader, LoaderConfig};
use tracing::info;

use crate::error::{CliError, Result};

/// Load sources into a new database
#[allow(clippy::too_many_arguments)]
pub async fn run(
    db: String,
    sources: Vec<String>,
    gpi_sources: Vec<String>,
    go_db_paths: Vec<String>,
    additional_db_paths: Vec<String>,
    force: bool,
    validate: bool,
) -> Result<()> {
    if go_db_paths.is_empty() {
        return Err(CliError::invalid_argument(
            "at least one --go-db semsql export is required",
        ));
    }

    let config = LoaderConfig {
        db,
        sources,
        gpi_sources,
        go_db_paths,
        additional_db_paths,
        append: false,
        force,
    };

    info!(db = %config.db, "Loading database");
    let pool = loader::load_all(&config).await?;
    println!("Loaded database '{}'", config.name());

    if validate {
        let violations = loader::validate_db(&pool).await?;
        if violations.is_empty() {
            println!("All GO-rule checks passed.");
        } else {
            for violation in &violations {
                println!("{violation}");
            }
            return Err(CliError::ValidationFailed(violations.len()));
        }
    }

    Ok(())
}
