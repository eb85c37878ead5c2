//! `godb materialize` command implementation
//!
//! Replaces a derived view with a table of the same name so that later
//! queries pay the view cost once instead of per query.

use godb_store::{loader, open_read_write};

use crate::error::Result;

/// Materialize a view in place
pub async fn run(db: String, view: String) -> Result<()> {
    let pool = open_read_write(&db).await?;
    loader::materialize_view(&pool, &view).await?;
    println!("Materialized view '{view}'");
    Ok(())
}
