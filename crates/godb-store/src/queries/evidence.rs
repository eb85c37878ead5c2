//! Evidence redundancy analysis for GO annotations
//!
//! The core question: which annotations attributed to one evidentiary
//! method or reference are rendered non-novel by annotations from other
//! sources? An annotation for gene product `g` at class `c` is REDUNDANT
//! when another annotation for the same `g` exists whose method satisfies
//! the comparator clause and whose class is at least as specific as `c`
//! under the `isa_partof_closure` relation (closure pairs run from
//! descendant to ancestor, and the closure is reflexive, so an
//! equally-specific annotation on the exact same class counts).
//!
//! All operations are read-only against the annotation and closure tables
//! and return materialized value objects; the analyzer borrows the pool
//! and owns no state of its own.

use std::collections::HashMap;

use godb_common::types::{Annotation, AnnotationField, AnnotationRow};
use godb_common::{GodbError, Result};
use serde::{Deserialize, Serialize};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::{debug, warn};

/// Evidence type used when the caller does not specify one
pub const DEFAULT_EVIDENCE_TYPE: &str = "IEA";

/// Annotation columns selected by every redundancy query, with the rowid
/// exposed as `internal_id` (row identity for self-exclusion)
const ANNOTATION_SELECT: &str = "SELECT a.rowid AS internal_id, a.db, a.db_object_id, \
     a.db_object_symbol, a.qualifiers, a.ontology_class_ref, a.supporting_references, \
     a.evidence_type, a.with_or_from, a.aspect, a.db_object_name, a.db_object_synonyms, \
     a.db_object_type, a.db_object_taxon, a.annotation_date, a.assigned_by, \
     a.annotation_extensions, a.gene_product_form FROM gaf_association a WHERE 1=1";

// ============================================================================
// Result Types
// ============================================================================

/// Result of a unique-contribution or redundancy query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UniqueContributions {
    /// Matching annotations (set semantics; ordering unspecified)
    pub annotations: Vec<Annotation>,

    /// Cardinality of `annotations`
    pub count: usize,

    /// The field that was evaluated for redundancy
    pub method: AnnotationField,

    /// Evidence filter applied, if any
    pub evidence_type: Option<String>,

    /// Comparator restriction applied, if any
    pub comparator_methods: Option<Vec<String>>,
}

/// One group in a contribution summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionSummary {
    /// Group key values, aligned with the result's `group_by_fields`
    pub group_values: Vec<String>,

    /// Number of unique contributions in this group
    pub contribution_count: usize,
}

/// Result of a contribution summary query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContributionSummaryResult {
    /// Groups sorted by descending count, ties broken by group-key order
    pub summaries: Vec<ContributionSummary>,

    /// Un-grouped total from the underlying unique-contribution query;
    /// always equals the sum of the group counts
    pub total_unique: usize,

    /// Fields the summary is grouped by
    pub group_by_fields: Vec<AnnotationField>,
}

/// Comparison between two sets of references at (gene, class) granularity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceComparison {
    /// Distinct (gene, class) pairs annotated by set 1 but not set 2
    pub unique_to_set1: i64,

    /// Distinct (gene, class) pairs annotated by set 2 but not set 1
    pub unique_to_set2: i64,

    /// Distinct (gene, class) pairs annotated by both sets
    pub overlap: i64,

    /// Distinct (gene, class) pairs annotated by set 1, measured directly
    pub total_set1: i64,

    /// Distinct (gene, class) pairs annotated by set 2, measured directly
    pub total_set2: i64,

    pub reference_set1: Vec<String>,
    pub reference_set2: Vec<String>,
    pub evidence_type: Option<String>,
}

// ============================================================================
// Query Construction
// ============================================================================

/// Push the comparator clause for the inner (a2) annotation.
///
/// `None` compares against every other value of the method column;
/// `Some(values)` restricts the comparison to exactly those values. The
/// empty-list case never reaches here (handled by the caller: nothing to
/// compare against means nothing is redundant).
fn push_comparator_clause(
    qb: &mut QueryBuilder<'static, Sqlite>,
    method: AnnotationField,
    comparator_methods: Option<&[String]>,
) {
    let col = method.column();
    match comparator_methods {
        None => {
            qb.push(format!("a2.{col} != a.{col}"));
        },
        Some(values) => {
            qb.push(format!("a2.{col} IN ("));
            {
                let mut separated = qb.separated(", ");
                for value in values {
                    separated.push_bind(value.clone());
                }
            }
            qb.push(")");
        },
    }
}

/// Push the closure-aware comparator subquery: does a row from another
/// source place the same gene product at least as precisely?
fn push_redundancy_exists(
    qb: &mut QueryBuilder<'static, Sqlite>,
    method: AnnotationField,
    comparator_methods: Option<&[String]>,
    negated: bool,
) {
    qb.push(if negated {
        " AND NOT EXISTS ("
    } else {
        " AND EXISTS ("
    });
    qb.push(
        "SELECT 1 FROM gaf_association a2 \
         INNER JOIN isa_partof_closure ipc ON a2.ontology_class_ref = ipc.subject \
         WHERE ipc.object = a.ontology_class_ref \
         AND a2.db_object_id = a.db_object_id \
         AND a2.rowid != a.rowid \
         AND ",
    );
    push_comparator_clause(qb, method, comparator_methods);
    qb.push(")");
}

/// Build the unique-contribution query
fn build_unique_query(
    method: AnnotationField,
    evidence_type: Option<&str>,
    comparator_methods: Option<&[String]>,
) -> QueryBuilder<'static, Sqlite> {
    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(ANNOTATION_SELECT);

    if let Some(evidence) = evidence_type {
        qb.push(" AND a.evidence_type = ");
        qb.push_bind(evidence.to_string());
    }

    match comparator_methods {
        // Explicit empty comparator set: nothing to compare against, so no
        // annotation is ever redundant; skip the subquery entirely.
        Some([]) => {},
        other => push_redundancy_exists(&mut qb, method, other, true),
    }

    qb
}

/// Push an IN clause over distinct reference values
fn push_reference_set(qb: &mut QueryBuilder<'static, Sqlite>, alias: &str, set: &[String]) {
    qb.push(format!("{alias}.supporting_references IN ("));
    {
        let mut separated = qb.separated(", ");
        for reference in set {
            separated.push_bind(reference.clone());
        }
    }
    qb.push(")");
}

// ============================================================================
// Analyzer
// ============================================================================

/// Analyze redundancy of evidence methods in GO annotations.
///
/// Borrows the store handle for its lifetime; every operation is
/// side-effect free and safe to run concurrently against the same snapshot.
pub struct EvidenceRedundancyAnalyzer<'a> {
    pool: &'a SqlitePool,
}

impl<'a> EvidenceRedundancyAnalyzer<'a> {
    /// Create an analyzer over an already-open database
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Find annotations whose contribution is unique: no other annotation
    /// from a comparator source places the same gene product at a class at
    /// least as specific.
    ///
    /// - `method`: the field evaluated for redundancy (the CLI defaults to
    ///   `supporting_references`)
    /// - `evidence_type`: optional evidence filter on the outer annotation
    /// - `comparator_methods`: `None` compares against all other method
    ///   values; an explicit empty list compares against nothing, so every
    ///   matching annotation is unique
    pub async fn unique_contributions(
        &self,
        method: AnnotationField,
        evidence_type: Option<&str>,
        comparator_methods: Option<&[String]>,
    ) -> Result<UniqueContributions> {
        let mut qb = build_unique_query(method, evidence_type, comparator_methods);
        debug!(sql = %qb.sql(), "Running unique contributions query");

        let rows: Vec<AnnotationRow> = qb.build_query_as().fetch_all(self.pool).await?;
        let annotations: Vec<Annotation> = rows.into_iter().map(Annotation::from).collect();

        Ok(UniqueContributions {
            count: annotations.len(),
            annotations,
            method,
            evidence_type: evidence_type.map(str::to_string),
            comparator_methods: comparator_methods.map(<[String]>::to_vec),
        })
    }

    /// Check whether a method's contributions are redundant for a given
    /// evidence type. Identical to [`Self::unique_contributions`] with a
    /// mandatory evidence filter (default `IEA`).
    pub async fn check_redundancy(
        &self,
        method: AnnotationField,
        evidence_type: &str,
        comparator_methods: Option<&[String]>,
    ) -> Result<UniqueContributions> {
        self.unique_contributions(method, Some(evidence_type), comparator_methods)
            .await
    }

    /// Summarize unique contributions grouped by the given fields
    /// (default: `[evidence_type, method]`).
    ///
    /// List-valued group fields are canonicalized to their pipe-joined
    /// scalar form before grouping. Unknown field names never reach this
    /// point: they are rejected when parsed into [`AnnotationField`].
    pub async fn summarize_unique_contributions(
        &self,
        method: AnnotationField,
        evidence_type: Option<&str>,
        comparator_methods: Option<&[String]>,
        group_by: Option<&[AnnotationField]>,
    ) -> Result<ContributionSummaryResult> {
        let group_by_fields: Vec<AnnotationField> = match group_by {
            Some(fields) if !fields.is_empty() => fields.to_vec(),
            _ => vec![AnnotationField::EvidenceType, method],
        };

        let unique = self
            .unique_contributions(method, evidence_type, comparator_methods)
            .await?;

        let mut counts: HashMap<Vec<String>, usize> = HashMap::new();
        for annotation in &unique.annotations {
            let key: Vec<String> = group_by_fields
                .iter()
                .map(|field| field.value_of(annotation))
                .collect();
            *counts.entry(key).or_insert(0) += 1;
        }

        let mut summaries: Vec<ContributionSummary> = counts
            .into_iter()
            .map(|(group_values, contribution_count)| ContributionSummary {
                group_values,
                contribution_count,
            })
            .collect();
        summaries.sort_by(|a, b| {
            b.contribution_count
                .cmp(&a.contribution_count)
                .then_with(|| a.group_values.cmp(&b.group_values))
        });

        Ok(ContributionSummaryResult {
            summaries,
            total_unique: unique.count,
            group_by_fields,
        })
    }

    /// Find annotations where a specific reference is redundant: another
    /// annotation with a different reference already places the same gene
    /// product at a class at least as specific. The complement of
    /// [`Self::unique_contributions`] restricted to that reference.
    pub async fn find_redundant_references(
        &self,
        reference: &str,
        evidence_type: &str,
    ) -> Result<UniqueContributions> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(ANNOTATION_SELECT);
        qb.push(" AND a.supporting_references = ");
        qb.push_bind(reference.to_string());
        qb.push(" AND a.evidence_type = ");
        qb.push_bind(evidence_type.to_string());
        push_redundancy_exists(&mut qb, AnnotationField::SupportingReferences, None, false);

        debug!(sql = %qb.sql(), "Running redundant references query");
        let rows: Vec<AnnotationRow> = qb.build_query_as().fetch_all(self.pool).await?;
        let annotations: Vec<Annotation> = rows.into_iter().map(Annotation::from).collect();

        Ok(UniqueContributions {
            count: annotations.len(),
            annotations,
            method: AnnotationField::SupportingReferences,
            evidence_type: Some(evidence_type.to_string()),
            comparator_methods: None,
        })
    }

    /// Compare two sets of references at distinct (gene, class) pair
    /// granularity.
    ///
    /// This is a flat overlap calculation: the closure relation is
    /// deliberately NOT consulted here, unlike the redundancy predicates.
    /// Totals are measured directly rather than derived; a measured total
    /// disagreeing with `unique + overlap` (duplicate-row pathology) is
    /// logged and the measured value returned.
    pub async fn compare_reference_sets(
        &self,
        reference_set1: &[String],
        reference_set2: &[String],
        evidence_type: Option<&str>,
    ) -> Result<ReferenceComparison> {
        if reference_set1.is_empty() {
            return Err(GodbError::config(
                "reference set 1 must contain at least one reference",
            ));
        }
        if reference_set2.is_empty() {
            return Err(GodbError::config(
                "reference set 2 must contain at least one reference",
            ));
        }

        let unique_to_set1 = self
            .count_unique_to(reference_set1, reference_set2, evidence_type)
            .await?;
        let unique_to_set2 = self
            .count_unique_to(reference_set2, reference_set1, evidence_type)
            .await?;
        let overlap = self
            .count_overlap(reference_set1, reference_set2, evidence_type)
            .await?;
        let total_set1 = self.count_total(reference_set1, evidence_type).await?;
        let total_set2 = self.count_total(reference_set2, evidence_type).await?;

        if total_set1 != unique_to_set1 + overlap {
            warn!(
                total = total_set1,
                unique = unique_to_set1,
                overlap = overlap,
                "Set 1 total does not equal unique + overlap"
            );
        }
        if total_set2 != unique_to_set2 + overlap {
            warn!(
                total = total_set2,
                unique = unique_to_set2,
                overlap = overlap,
                "Set 2 total does not equal unique + overlap"
            );
        }

        Ok(ReferenceComparison {
            unique_to_set1,
            unique_to_set2,
            overlap,
            total_set1,
            total_set2,
            reference_set1: reference_set1.to_vec(),
            reference_set2: reference_set2.to_vec(),
            evidence_type: evidence_type.map(str::to_string),
        })
    }

    /// Count (gene, class) pairs annotated by `set` with no annotation
    /// from `other_set` on the same pair
    async fn count_unique_to(
        &self,
        set: &[String],
        other_set: &[String],
        evidence_type: Option<&str>,
    ) -> Result<i64> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT COUNT(DISTINCT a1.db_object_id || ':' || a1.ontology_class_ref) \
             FROM gaf_association a1 WHERE 1=1",
        );
        if let Some(evidence) = evidence_type {
            qb.push(" AND a1.evidence_type = ");
            qb.push_bind(evidence.to_string());
        }
        qb.push(" AND ");
        push_reference_set(&mut qb, "a1", set);
        qb.push(
            " AND NOT EXISTS (SELECT 1 FROM gaf_association a2 \
             WHERE a2.db_object_id = a1.db_object_id \
             AND a2.ontology_class_ref = a1.ontology_class_ref AND ",
        );
        push_reference_set(&mut qb, "a2", other_set);
        // The other set only claims a pair through rows passing the same
        // evidence filter, keeping total = unique + overlap.
        if let Some(evidence) = evidence_type {
            qb.push(" AND a2.evidence_type = ");
            qb.push_bind(evidence.to_string());
        }
        qb.push(")");

        debug!(sql = %qb.sql(), "Running unique-to-set query");
        Ok(qb.build_query_scalar().fetch_one(self.pool).await?)
    }

    /// Count (gene, class) pairs annotated by both sets
    async fn count_overlap(
        &self,
        set1: &[String],
        set2: &[String],
        evidence_type: Option<&str>,
    ) -> Result<i64> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT COUNT(DISTINCT a1.db_object_id || ':' || a1.ontology_class_ref) \
             FROM gaf_association a1 \
             INNER JOIN gaf_association a2 ON a1.db_object_id = a2.db_object_id \
             AND a1.ontology_class_ref = a2.ontology_class_ref WHERE 1=1",
        );
        // Filter both sides so the overlap is symmetric in its arguments.
        if let Some(evidence) = evidence_type {
            qb.push(" AND a1.evidence_type = ");
            qb.push_bind(evidence.to_string());
            qb.push(" AND a2.evidence_type = ");
            qb.push_bind(evidence.to_string());
        }
        qb.push(" AND ");
        push_reference_set(&mut qb, "a1", set1);
        qb.push(" AND ");
        push_reference_set(&mut qb, "a2", set2);

        debug!(sql = %qb.sql(), "Running overlap query");
        Ok(qb.build_query_scalar().fetch_one(self.pool).await?)
    }

    /// Count (gene, class) pairs annotated by a set, measured directly
    async fn count_total(&self, set: &[String], evidence_type: Option<&str>) -> Result<i64> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT COUNT(DISTINCT a1.db_object_id || ':' || a1.ontology_class_ref) \
             FROM gaf_association a1 WHERE 1=1",
        );
        if let Some(evidence) = evidence_type {
            qb.push(" AND a1.evidence_type = ");
            qb.push_bind(evidence.to_string());
        }
        qb.push(" AND ");
        push_reference_set(&mut qb, "a1", set);

        Ok(qb.build_query_scalar().fetch_one(self.pool).await?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_query_default_comparator() {
        let mut qb = build_unique_query(AnnotationField::SupportingReferences, Some("IEA"), None);
        let sql = qb.sql();
        assert!(sql.contains("NOT EXISTS"));
        assert!(sql.contains("a2.supporting_references != a.supporting_references"));
        assert!(sql.contains("a2.rowid != a.rowid"));
        assert!(sql.contains("isa_partof_closure"));
    }

    #[test]
    fn test_unique_query_explicit_comparators() {
        let comparators = vec!["GO_REF:0000002".to_string(), "GO_REF:0000043".to_string()];
        let mut qb = build_unique_query(
            AnnotationField::SupportingReferences,
            None,
            Some(&comparators),
        );
        let sql = qb.sql();
        assert!(sql.contains("a2.supporting_references IN ("));
        assert!(!sql.contains("a.evidence_type ="));
    }

    #[test]
    fn test_unique_query_empty_comparator_skips_subquery() {
        let mut qb = build_unique_query(AnnotationField::SupportingReferences, Some("IEA"), Some(&[]));
        let sql = qb.sql();
        assert!(!sql.contains("EXISTS"));
        assert!(sql.contains("a.evidence_type ="));
    }

    #[test]
    fn test_unique_query_method_column() {
        let mut qb = build_unique_query(AnnotationField::AssignedBy, None, None);
        assert!(qb.sql().contains("a2.assigned_by != a.assigned_by"));
    }
}
