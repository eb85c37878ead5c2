//! Common types used across godb
//!
//! The annotation model mirrors the GAF 2.2 column set. List-valued GAF
//! columns (supporting references, with/from, synonyms, extensions) are
//! stored pipe-delimited in the database and split at this boundary.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::{GodbError, Result};

/// Separator for list-valued GAF columns
pub const LIST_SEPARATOR: char = '|';

/// Split a pipe-delimited GAF column into a list, treating empty as no values
pub fn split_list(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(LIST_SEPARATOR).map(|s| s.to_string()).collect()
}

/// Join a list back into its canonical pipe-delimited scalar form
pub fn join_list(values: &[String]) -> String {
    values.join("|")
}

// ============================================================================
// Annotation Model
// ============================================================================

/// Raw annotation row as stored in the `gaf_association` table.
///
/// Columns are carried verbatim (list columns still pipe-delimited).
/// `internal_id` is the SQLite rowid and serves as row identity for the
/// redundancy engine's self-exclusion rule.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AnnotationRow {
    pub internal_id: i64,
    pub db: String,
    pub db_object_id: String,
    pub db_object_symbol: Option<String>,
    pub qualifiers: Option<String>,
    pub ontology_class_ref: String,
    pub supporting_references: Option<String>,
    pub evidence_type: String,
    pub with_or_from: Option<String>,
    pub aspect: Option<String>,
    pub db_object_name: Option<String>,
    pub db_object_synonyms: Option<String>,
    pub db_object_type: Option<String>,
    pub db_object_taxon: Option<String>,
    pub annotation_date: Option<String>,
    pub assigned_by: Option<String>,
    pub annotation_extensions: Option<String>,
    pub gene_product_form: Option<String>,
}

/// A single GO annotation (GAF 2.2 record) with list columns split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    /// Row identity within the loaded database
    pub internal_id: i64,

    /// Source database (GAF column 1, e.g. "UniProtKB")
    pub db: String,

    /// Gene/product identifier (GAF column 2) - the annotation subject
    pub db_object_id: String,

    /// Gene symbol (GAF column 3)
    pub db_object_symbol: Option<String>,

    /// Qualifiers (GAF column 4, e.g. "NOT|enables")
    pub qualifiers: Option<String>,

    /// GO term asserted (GAF column 5)
    pub ontology_class_ref: String,

    /// Supporting references / evidentiary method (GAF column 6)
    pub supporting_references: Vec<String>,

    /// Evidence code (GAF column 7, e.g. IEA, EXP, IBA)
    pub evidence_type: String,

    /// With/from identifiers (GAF column 8)
    pub with_or_from: Vec<String>,

    /// Ontology aspect (GAF column 9: F, P, or C)
    pub aspect: Option<String>,

    /// Gene/product name (GAF column 10)
    pub db_object_name: Option<String>,

    /// Synonyms (GAF column 11)
    pub db_object_synonyms: Vec<String>,

    /// Object type (GAF column 12, e.g. "protein")
    pub db_object_type: Option<String>,

    /// Taxon (GAF column 13, e.g. "taxon:9606")
    pub db_object_taxon: Option<String>,

    /// Annotation date (GAF column 14, YYYYMMDD)
    pub annotation_date: Option<String>,

    /// Assigning group (GAF column 15)
    pub assigned_by: Option<String>,

    /// Annotation extensions (GAF column 16)
    pub annotation_extensions: Vec<String>,

    /// Gene product form id (GAF column 17)
    pub gene_product_form: Option<String>,
}

impl From<AnnotationRow> for Annotation {
    fn from(row: AnnotationRow) -> Self {
        Self {
            internal_id: row.internal_id,
            db: row.db,
            db_object_id: row.db_object_id,
            db_object_symbol: row.db_object_symbol,
            qualifiers: row.qualifiers,
            ontology_class_ref: row.ontology_class_ref,
            supporting_references: split_list(row.supporting_references.as_deref().unwrap_or("")),
            evidence_type: row.evidence_type,
            with_or_from: split_list(row.with_or_from.as_deref().unwrap_or("")),
            aspect: row.aspect,
            db_object_name: row.db_object_name,
            db_object_synonyms: split_list(row.db_object_synonyms.as_deref().unwrap_or("")),
            db_object_type: row.db_object_type,
            db_object_taxon: row.db_object_taxon,
            annotation_date: row.annotation_date,
            assigned_by: row.assigned_by,
            annotation_extensions: split_list(row.annotation_extensions.as_deref().unwrap_or("")),
            gene_product_form: row.gene_product_form,
        }
    }
}

// ============================================================================
// Allow-Listed Field Access
// ============================================================================

/// Queryable/groupable annotation field.
///
/// Caller-supplied field names (the redundancy `--method` and summary
/// `--group-by` parameters) are resolved through this enum, so an unknown
/// name is rejected at the boundary before any query is issued, and the
/// SQL column name never comes from user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationField {
    Db,
    DbObjectId,
    DbObjectSymbol,
    Qualifiers,
    OntologyClassRef,
    SupportingReferences,
    EvidenceType,
    WithOrFrom,
    Aspect,
    DbObjectName,
    DbObjectSynonyms,
    DbObjectType,
    DbObjectTaxon,
    AnnotationDate,
    AssignedBy,
    AnnotationExtensions,
    GeneProductForm,
}

impl AnnotationField {
    /// All fields, in GAF column order
    pub const ALL: [AnnotationField; 17] = [
        AnnotationField::Db,
        AnnotationField::DbObjectId,
        AnnotationField::DbObjectSymbol,
        AnnotationField::Qualifiers,
        AnnotationField::OntologyClassRef,
        AnnotationField::SupportingReferences,
        AnnotationField::EvidenceType,
        AnnotationField::WithOrFrom,
        AnnotationField::Aspect,
        AnnotationField::DbObjectName,
        AnnotationField::DbObjectSynonyms,
        AnnotationField::DbObjectType,
        AnnotationField::DbObjectTaxon,
        AnnotationField::AnnotationDate,
        AnnotationField::AssignedBy,
        AnnotationField::AnnotationExtensions,
        AnnotationField::GeneProductForm,
    ];

    /// SQL column name in the `gaf_association` table
    pub fn column(self) -> &'static str {
        match self {
            AnnotationField::Db => "db",
            AnnotationField::DbObjectId => "db_object_id",
            AnnotationField::DbObjectSymbol => "db_object_symbol",
            AnnotationField::Qualifiers => "qualifiers",
            AnnotationField::OntologyClassRef => "ontology_class_ref",
            AnnotationField::SupportingReferences => "supporting_references",
            AnnotationField::EvidenceType => "evidence_type",
            AnnotationField::WithOrFrom => "with_or_from",
            AnnotationField::Aspect => "aspect",
            AnnotationField::DbObjectName => "db_object_name",
            AnnotationField::DbObjectSynonyms => "db_object_synonyms",
            AnnotationField::DbObjectType => "db_object_type",
            AnnotationField::DbObjectTaxon => "db_object_taxon",
            AnnotationField::AnnotationDate => "annotation_date",
            AnnotationField::AssignedBy => "assigned_by",
            AnnotationField::AnnotationExtensions => "annotation_extensions",
            AnnotationField::GeneProductForm => "gene_product_form",
        }
    }

    /// Whether the field is pipe-delimited in GAF
    pub fn is_list(self) -> bool {
        matches!(
            self,
            AnnotationField::SupportingReferences
                | AnnotationField::WithOrFrom
                | AnnotationField::DbObjectSynonyms
                | AnnotationField::AnnotationExtensions
        )
    }

    /// Canonical scalar value of this field on an annotation.
    ///
    /// List-valued fields are normalized to their pipe-joined form so they
    /// can serve as deterministic group keys; absent fields yield "".
    pub fn value_of(self, annotation: &Annotation) -> String {
        fn opt(v: &Option<String>) -> String {
            v.clone().unwrap_or_default()
        }
        match self {
            AnnotationField::Db => annotation.db.clone(),
            AnnotationField::DbObjectId => annotation.db_object_id.clone(),
            AnnotationField::DbObjectSymbol => opt(&annotation.db_object_symbol),
            AnnotationField::Qualifiers => opt(&annotation.qualifiers),
            AnnotationField::OntologyClassRef => annotation.ontology_class_ref.clone(),
            AnnotationField::SupportingReferences => join_list(&annotation.supporting_references),
            AnnotationField::EvidenceType => annotation.evidence_type.clone(),
            AnnotationField::WithOrFrom => join_list(&annotation.with_or_from),
            AnnotationField::Aspect => opt(&annotation.aspect),
            AnnotationField::DbObjectName => opt(&annotation.db_object_name),
            AnnotationField::DbObjectSynonyms => join_list(&annotation.db_object_synonyms),
            AnnotationField::DbObjectType => opt(&annotation.db_object_type),
            AnnotationField::DbObjectTaxon => opt(&annotation.db_object_taxon),
            AnnotationField::AnnotationDate => opt(&annotation.annotation_date),
            AnnotationField::AssignedBy => opt(&annotation.assigned_by),
            AnnotationField::AnnotationExtensions => join_list(&annotation.annotation_extensions),
            AnnotationField::GeneProductForm => opt(&annotation.gene_product_form),
        }
    }
}

impl std::str::FromStr for AnnotationField {
    type Err = GodbError;

    fn from_str(s: &str) -> Result<Self> {
        AnnotationField::ALL
            .iter()
            .copied()
            .find(|f| f.column() == s)
            .ok_or_else(|| GodbError::field_reference(s))
    }
}

impl std::fmt::Display for AnnotationField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.column())
    }
}
