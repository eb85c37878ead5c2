//! `godb export` command implementation
//!
//! Streams filtered annotations out as GAF 2.2.

use godb_store::{export, open_read_only, GafExportFilter};
use tracing::info;

use crate::error::Result;
use crate::output::open_output;

/// Filter arguments for the export command
#[derive(Debug, Default)]
pub struct ExportArgs {
    pub output: Option<String>,
    pub taxon: Option<String>,
    pub taxon_closure: Option<String>,
    pub exclude_taxon: Vec<String>,
    pub exclude_taxon_closure: Vec<String>,
    pub assigned_by: Option<String>,
    pub aspect: Option<String>,
    pub evidence_type: Option<String>,
    pub term: Option<String>,
    pub raw_where: Option<String>,
    pub limit: Option<i64>,
}

/// Export filtered GAF
pub async fn run(db: String, args: ExportArgs) -> Result<()> {
    let pool = open_read_only(&db).await?;
    let filter = GafExportFilter {
        raw_where: args.raw_where,
        db_object_taxon: args.taxon,
        taxon_closure: args.taxon_closure,
        exclude_taxon: args.exclude_taxon,
        exclude_taxon_closure: args.exclude_taxon_closure,
        assigned_by: args.assigned_by,
        aspect: args.aspect,
        evidence_type: args.evidence_type,
        ontology_class_ref: args.term,
        limit: args.limit,
    };

    let mut out = open_output(args.output.as_deref())?;
    let count = export::export_gaf(&pool, &filter, &mut out).await?;
    info!(rows = count, "Export complete");
    eprintln!("Exported {count} annotations");
    Ok(())
}
