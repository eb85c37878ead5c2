//! Filtered GAF 2.2 export
//!
//! Filters are a structured value object translated to a bound-parameter
//! WHERE clause; no user input is spliced into SQL. Taxon filters accept
//! `taxon:NNNN`, `NCBITaxon:NNNN`, or a bare numeric id, and closure-aware
//! taxon filters include all entailed descendants via `entailed_is_a`.

use std::io::Write;

use futures::TryStreamExt;
use godb_common::Result;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use tracing::{debug, info};

/// GAF column order, matching the `gaf_association_flat` table
pub const GAF_EXPORT_COLUMNS: [&str; 17] = [
    "db",
    "db_object_id",
    "db_object_symbol",
    "qualifiers",
    "ontology_class_ref",
    "supporting_references",
    "evidence_type",
    "with_or_from",
    "aspect",
    "db_object_name",
    "db_object_synonyms",
    "db_object_type",
    "db_object_taxon",
    "annotation_date_string",
    "assigned_by",
    "annotation_extensions",
    "gene_product_form",
];

/// Structured filter for GAF export
#[derive(Debug, Clone, Default)]
pub struct GafExportFilter {
    /// Extra raw WHERE fragment (power-user escape hatch, combined with AND)
    pub raw_where: Option<String>,

    /// Filter by exact taxon (e.g. "taxon:9606")
    pub db_object_taxon: Option<String>,

    /// Filter by taxon and all entailed descendants (e.g. "NCBITaxon:10239")
    pub taxon_closure: Option<String>,

    /// Exclude specific taxa
    pub exclude_taxon: Vec<String>,

    /// Exclude taxa and all their entailed descendants
    pub exclude_taxon_closure: Vec<String>,

    /// Filter by assigning group
    pub assigned_by: Option<String>,

    /// Filter by aspect (F, P, or C)
    pub aspect: Option<String>,

    /// Filter by evidence code
    pub evidence_type: Option<String>,

    /// Filter by GO term
    pub ontology_class_ref: Option<String>,

    /// Limit number of exported rows
    pub limit: Option<i64>,
}

/// Normalize a taxon id to the `NCBITaxon:` form used by the ontology tables
pub fn normalize_ncbi_taxon(taxon: &str) -> String {
    match taxon.split_once(':') {
        Some((prefix, id)) if prefix.eq_ignore_ascii_case("taxon") => format!("NCBITaxon:{id}"),
        Some(_) => taxon.to_string(),
        None => format!("NCBITaxon:{taxon}"),
    }
}

/// Normalize a taxon id to the `taxon:` form used in GAF column 13
pub fn normalize_gaf_taxon(taxon: &str) -> String {
    match taxon.split_once(':') {
        Some((prefix, id)) if prefix.eq_ignore_ascii_case("ncbitaxon") => format!("taxon:{id}"),
        Some(_) => taxon.to_string(),
        None => format!("taxon:{taxon}"),
    }
}

/// Build the export query for a filter
fn build_export_query(filter: &GafExportFilter) -> QueryBuilder<'static, Sqlite> {
    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT ");
    qb.push(GAF_EXPORT_COLUMNS.join(", "));
    qb.push(" FROM gaf_association_flat WHERE 1=1");

    if let Some(ref raw) = filter.raw_where {
        let fragment = raw.trim().trim_start_matches("WHERE").trim();
        if !fragment.is_empty() {
            qb.push(" AND (").push(fragment.to_string()).push(")");
        }
    }

    if let Some(ref taxon) = filter.taxon_closure {
        let ncbi = normalize_ncbi_taxon(taxon);
        qb.push(
            " AND db_object_taxon IN (\
             SELECT DISTINCT 'taxon:' || REPLACE(subject, 'NCBITaxon:', '') \
             FROM entailed_is_a WHERE object = ",
        );
        qb.push_bind(ncbi.clone());
        qb.push(" UNION SELECT ");
        qb.push_bind(normalize_gaf_taxon(&ncbi));
        qb.push(")");
    } else if let Some(ref taxon) = filter.db_object_taxon {
        qb.push(" AND db_object_taxon = ");
        qb.push_bind(normalize_gaf_taxon(taxon));
    }

    if let Some(ref assigned_by) = filter.assigned_by {
        qb.push(" AND assigned_by = ");
        qb.push_bind(assigned_by.clone());
    }
    if let Some(ref aspect) = filter.aspect {
        qb.push(" AND aspect = ");
        qb.push_bind(aspect.clone());
    }
    if let Some(ref evidence_type) = filter.evidence_type {
        qb.push(" AND evidence_type = ");
        qb.push_bind(evidence_type.clone());
    }
    if let Some(ref class_ref) = filter.ontology_class_ref {
        qb.push(" AND ontology_class_ref = ");
        qb.push_bind(class_ref.clone());
    }

    if !filter.exclude_taxon.is_empty() {
        qb.push(" AND db_object_taxon NOT IN (");
        {
            let mut separated = qb.separated(", ");
            for taxon in &filter.exclude_taxon {
                separated.push_bind(normalize_gaf_taxon(taxon));
            }
        }
        qb.push(")");
    }

    for taxon in &filter.exclude_taxon_closure {
        let ncbi = normalize_ncbi_taxon(taxon);
        qb.push(
            " AND db_object_taxon NOT IN (\
             SELECT DISTINCT 'taxon:' || REPLACE(subject, 'NCBITaxon:', '') \
             FROM entailed_is_a WHERE object = ",
        );
        qb.push_bind(ncbi.clone());
        qb.push(" UNION SELECT ");
        qb.push_bind(normalize_gaf_taxon(&ncbi));
        qb.push(")");
    }

    if let Some(limit) = filter.limit {
        qb.push(" LIMIT ");
        qb.push_bind(limit);
    }

    qb
}

/// Export GAF data matching the filter, streaming rows to the writer.
///
/// Writes the GAF 2.2 header block followed by one tab-delimited row per
/// annotation (NULL columns become empty fields). Returns the row count.
pub async fn export_gaf<W: Write>(
    pool: &SqlitePool,
    filter: &GafExportFilter,
    out: &mut W,
) -> Result<u64> {
    writeln!(out, "!gaf-version: 2.2")?;
    writeln!(out, "!generated-by: godb")?;
    writeln!(
        out,
        "!date-generated: {}",
        chrono::Local::now().format("%Y-%m-%d")
    )?;
    writeln!(out, "!")?;

    let mut qb = build_export_query(filter);
    debug!(sql = %qb.sql(), "Executing export query");

    let mut rows = qb.build().fetch(pool);
    let mut count = 0u64;
    while let Some(row) = rows.try_next().await? {
        let mut fields = Vec::with_capacity(GAF_EXPORT_COLUMNS.len());
        for i in 0..GAF_EXPORT_COLUMNS.len() {
            let value: Option<String> = row.try_get(i)?;
            fields.push(value.unwrap_or_default());
        }
        writeln!(out, "{}", fields.join("\t"))?;
        count += 1;
    }

    info!(records = count, "Exported GAF records");
    Ok(count)
}
