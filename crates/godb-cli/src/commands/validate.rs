//! `godb validate` command implementation
//!
//! Runs every registered GO-rule view against a loaded database and
//! reports the violations.

use godb_store::{loader, open_read_only};

use crate::error::{CliError, Result};

/// Run the GO-rule checks
pub async fn run(db: String) -> Result<()> {
    let pool = open_read_only(&db).await?;
    let violations = loader::validate_db(&pool).await?;

    if violations.is_empty() {
        println!("All GO-rule checks passed.");
        return Ok(());
    }

    for violation in &violations {
        println!("{violation}");
    }
    Err(CliError::ValidationFailed(violations.len()))
}
