//! Schema definition (DDL) loading
//!
//! The DDL ships embedded in the crate and is applied in a fixed order:
//! staging tables and derived views first, then the GO-rule violation
//! views, then the ad-hoc closure views. The closure views reference the
//! bulk-loaded semsql tables, so [`load_ddl`] must run after
//! [`crate::loader::semsql::bulk_load_semsql`].

use godb_common::Result;
use sqlx::SqlitePool;
use tracing::{debug, info};

/// GAF/GPI staging tables and derived views
pub const GAF_DDL: &str = include_str!("../sql/gaf_ddl.sql");

/// GO-rule violation views and their registry
pub const GO_RULES_DDL: &str = include_str!("../sql/go_rules.sql");

/// Closure views over the semsql ontology tables
pub const ADHOC_VIEWS_DDL: &str = include_str!("../sql/adhoc_views.sql");

/// Apply all DDL files to the database
pub async fn load_ddl(pool: &SqlitePool) -> Result<()> {
    info!("Loading DDL");
    for ddl in [GAF_DDL, GO_RULES_DDL, ADHOC_VIEWS_DDL] {
        debug!(ddl = %ddl, "Applying DDL");
        sqlx::raw_sql(ddl).execute(pool).await?;
    }
    Ok(())
}
