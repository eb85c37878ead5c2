//! Integration tests for the evidence redundancy analyzer
//!
//! Fixtures build the post-load schema directly: a materialized
//! `gaf_association` table and an `isa_partof_closure` table with explicit
//! reflexive pairs, mirroring what `load_all` produces.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use godb_common::types::AnnotationField;
use godb_common::GodbError;
use godb_store::EvidenceRedundancyAnalyzer;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::collections::HashSet;

const FIXTURE_SCHEMA: &str = "
CREATE TABLE gaf_association (
    db TEXT NOT NULL,
    db_object_id TEXT NOT NULL,
    db_object_symbol TEXT,
    qualifiers TEXT,
    ontology_class_ref TEXT NOT NULL,
    supporting_references TEXT,
    evidence_type TEXT NOT NULL,
    with_or_from TEXT,
    aspect TEXT,
    db_object_name TEXT,
    db_object_synonyms TEXT,
    db_object_type TEXT,
    db_object_taxon TEXT,
    annotation_date TEXT,
    assigned_by TEXT,
    annotation_extensions TEXT,
    gene_product_form TEXT
);
CREATE TABLE isa_partof_closure (
    subject TEXT NOT NULL,
    object TEXT NOT NULL
);
";

async fn fixture_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    sqlx::raw_sql(FIXTURE_SCHEMA).execute(&pool).await.unwrap();
    pool
}

/// Insert an annotation with the fields the engine interprets
async fn insert_annotation(
    pool: &SqlitePool,
    gene: &str,
    class_ref: &str,
    reference: &str,
    evidence: &str,
) {
    insert_annotation_by(pool, gene, class_ref, reference, evidence, "GO_Central").await;
}

async fn insert_annotation_by(
    pool: &SqlitePool,
    gene: &str,
    class_ref: &str,
    reference: &str,
    evidence: &str,
    assigned_by: &str,
) {
    sqlx::query(
        "INSERT INTO gaf_association \
         (db, db_object_id, db_object_symbol, qualifiers, ontology_class_ref, \
          supporting_references, evidence_type, with_or_from, aspect, db_object_name, \
          db_object_synonyms, db_object_type, db_object_taxon, annotation_date, \
          assigned_by, annotation_extensions, gene_product_form) \
         VALUES ('UniProtKB', ?, NULL, NULL, ?, ?, ?, NULL, 'C', NULL, NULL, \
                 'protein', 'taxon:9606', '20240101', ?, NULL, NULL)",
    )
    .bind(gene)
    .bind(class_ref)
    .bind(reference)
    .bind(evidence)
    .bind(assigned_by)
    .execute(pool)
    .await
    .unwrap();
}

/// Register a class in the closure (its reflexive pair)
async fn insert_class(pool: &SqlitePool, class_ref: &str) {
    insert_closure(pool, class_ref, class_ref).await;
}

/// Insert a closure pair: subject is at least as specific as object
async fn insert_closure(pool: &SqlitePool, subject: &str, object: &str) {
    sqlx::query("INSERT INTO isa_partof_closure (subject, object) VALUES (?, ?)")
        .bind(subject)
        .bind(object)
        .execute(pool)
        .await
        .unwrap();
}

fn gene_ids(result: &godb_store::queries::evidence::UniqueContributions) -> HashSet<i64> {
    result.annotations.iter().map(|a| a.internal_id).collect()
}

// ============================================================================
// Closure Reflexivity (P1)
// ============================================================================

/// An equally-specific annotation on the exact same class makes the other
/// source's annotation redundant: reflexive closure pairs must match.
#[tokio::test]
async fn test_same_class_other_source_is_redundant() {
    let pool = fixture_pool().await;
    insert_class(&pool, "GO:0005737").await;
    insert_annotation(&pool, "P1", "GO:0005737", "GO_REF:0000002", "IEA").await;
    insert_annotation(&pool, "P1", "GO:0005737", "PMID:123", "EXP").await;

    let analyzer = EvidenceRedundancyAnalyzer::new(&pool);
    let result = analyzer
        .unique_contributions(AnnotationField::SupportingReferences, Some("IEA"), None)
        .await
        .unwrap();

    assert_eq!(result.count, 0);
    assert!(result.annotations.is_empty());
}

// ============================================================================
// Subsumption Direction (spec scenario)
// ============================================================================

/// IEA at the broader term (intracellular) is redundant when an EXP row at
/// the more specific term (cytosol) exists for the same gene; the EXP row
/// itself stays unique.
#[tokio::test]
async fn test_iea_at_broader_term_is_redundant() {
    let pool = fixture_pool().await;
    // cytosol and intracellular, with cytosol subsumed by intracellular
    insert_class(&pool, "GO:0005737").await;
    insert_class(&pool, "GO:0005622").await;
    insert_closure(&pool, "GO:0005737", "GO:0005622").await;

    insert_annotation(&pool, "G1", "GO:0005737", "PMID:1", "EXP").await;
    insert_annotation(&pool, "G1", "GO:0005622", "GO_REF:0000002", "IEA").await;

    let analyzer = EvidenceRedundancyAnalyzer::new(&pool);

    let iea = analyzer
        .unique_contributions(AnnotationField::SupportingReferences, Some("IEA"), None)
        .await
        .unwrap();
    assert_eq!(iea.count, 0, "broader IEA term is covered by specific EXP");

    let exp = analyzer
        .unique_contributions(AnnotationField::SupportingReferences, Some("EXP"), None)
        .await
        .unwrap();
    assert_eq!(exp.count, 1, "specific EXP is not covered by broader IEA");
    assert_eq!(exp.annotations[0].ontology_class_ref, "GO:0005737");
}

/// The redundancy predicate only applies within a single gene product.
#[tokio::test]
async fn test_other_gene_does_not_make_redundant() {
    let pool = fixture_pool().await;
    insert_class(&pool, "GO:0005737").await;
    insert_annotation(&pool, "G1", "GO:0005737", "GO_REF:0000002", "IEA").await;
    insert_annotation(&pool, "G2", "GO:0005737", "PMID:1", "EXP").await;

    let analyzer = EvidenceRedundancyAnalyzer::new(&pool);
    let result = analyzer
        .unique_contributions(AnnotationField::SupportingReferences, Some("IEA"), None)
        .await
        .unwrap();
    assert_eq!(result.count, 1);
}

// ============================================================================
// Comparator Semantics (P2 and edge cases)
// ============================================================================

/// Growing the comparator set can only shrink (or keep) the unique set.
#[tokio::test]
async fn test_comparator_monotonicity() {
    let pool = fixture_pool().await;
    insert_class(&pool, "GO:0005622").await;
    insert_class(&pool, "GO:0005737").await;
    insert_closure(&pool, "GO:0005737", "GO:0005622").await;

    insert_annotation(&pool, "G1", "GO:0005622", "GO_REF:T", "IEA").await;
    insert_annotation(&pool, "G1", "GO:0005737", "R1", "EXP").await;

    let analyzer = EvidenceRedundancyAnalyzer::new(&pool);

    // S1 = {R9}: no comparator rows, target stays unique.
    let small = analyzer
        .unique_contributions(
            AnnotationField::SupportingReferences,
            Some("IEA"),
            Some(&["R9".to_string()]),
        )
        .await
        .unwrap();

    // S2 = {R9, R1}: superset, target becomes redundant.
    let large = analyzer
        .unique_contributions(
            AnnotationField::SupportingReferences,
            Some("IEA"),
            Some(&["R9".to_string(), "R1".to_string()]),
        )
        .await
        .unwrap();

    assert_eq!(small.count, 1);
    assert_eq!(large.count, 0);
    assert!(gene_ids(&large).is_subset(&gene_ids(&small)));
}

/// Explicit empty comparator list: nothing to compare against, so every
/// annotation passing the evidence filter is unique.
#[tokio::test]
async fn test_empty_comparator_list_means_nothing_redundant() {
    let pool = fixture_pool().await;
    insert_class(&pool, "GO:0005737").await;
    insert_annotation(&pool, "P1", "GO:0005737", "GO_REF:0000002", "IEA").await;
    insert_annotation(&pool, "P1", "GO:0005737", "PMID:123", "EXP").await;

    let analyzer = EvidenceRedundancyAnalyzer::new(&pool);
    let result = analyzer
        .unique_contributions(AnnotationField::SupportingReferences, Some("IEA"), Some(&[]))
        .await
        .unwrap();
    assert_eq!(result.count, 1);
}

/// An annotation is never redundant against itself, even when the
/// comparator set names its own method.
#[tokio::test]
async fn test_annotation_not_redundant_against_itself() {
    let pool = fixture_pool().await;
    insert_class(&pool, "GO:0005737").await;
    insert_annotation(&pool, "P1", "GO:0005737", "GO_REF:0000002", "IEA").await;

    let analyzer = EvidenceRedundancyAnalyzer::new(&pool);
    let result = analyzer
        .unique_contributions(
            AnnotationField::SupportingReferences,
            Some("IEA"),
            Some(&["GO_REF:0000002".to_string()]),
        )
        .await
        .unwrap();
    assert_eq!(result.count, 1, "sole row must not match itself");
}

/// With an explicit comparator set, a distinct row with the same method
/// value is a legitimate comparator.
#[tokio::test]
async fn test_distinct_row_same_method_counts_in_explicit_set() {
    let pool = fixture_pool().await;
    insert_class(&pool, "GO:0005737").await;
    insert_annotation(&pool, "P1", "GO:0005737", "GO_REF:0000002", "IEA").await;
    insert_annotation(&pool, "P1", "GO:0005737", "GO_REF:0000002", "IEA").await;

    let analyzer = EvidenceRedundancyAnalyzer::new(&pool);
    let result = analyzer
        .unique_contributions(
            AnnotationField::SupportingReferences,
            Some("IEA"),
            Some(&["GO_REF:0000002".to_string()]),
        )
        .await
        .unwrap();
    assert_eq!(result.count, 0, "each duplicate is covered by the other");
}

/// The redundancy method is a parameter: assigned_by works like any other
/// allow-listed field.
#[tokio::test]
async fn test_method_field_assigned_by() {
    let pool = fixture_pool().await;
    insert_class(&pool, "GO:0005737").await;
    insert_annotation_by(&pool, "P1", "GO:0005737", "GO_REF:1", "IEA", "UniProt").await;
    insert_annotation_by(&pool, "P1", "GO:0005737", "GO_REF:1", "IEA", "MGI").await;

    let analyzer = EvidenceRedundancyAnalyzer::new(&pool);
    let result = analyzer
        .unique_contributions(AnnotationField::AssignedBy, Some("IEA"), None)
        .await
        .unwrap();
    // Each row is covered by the other assigner's equally-specific row.
    assert_eq!(result.count, 0);
}

// ============================================================================
// check_redundancy
// ============================================================================

#[tokio::test]
async fn test_check_redundancy_is_evidence_filtered_unique_contributions() {
    let pool = fixture_pool().await;
    insert_class(&pool, "GO:0005737").await;
    insert_annotation(&pool, "P1", "GO:0005737", "GO_REF:0000002", "IEA").await;
    insert_annotation(&pool, "P2", "GO:0005737", "PMID:123", "EXP").await;

    let analyzer = EvidenceRedundancyAnalyzer::new(&pool);
    let checked = analyzer
        .check_redundancy(AnnotationField::SupportingReferences, "IEA", None)
        .await
        .unwrap();
    let unique = analyzer
        .unique_contributions(AnnotationField::SupportingReferences, Some("IEA"), None)
        .await
        .unwrap();
    assert_eq!(checked.count, unique.count);
    assert_eq!(checked.evidence_type.as_deref(), Some("IEA"));
}

// ============================================================================
// Complement Relationship (P3)
// ============================================================================

/// For a fixed reference and evidence type, every annotation is either
/// unique or redundant: never both, never neither.
#[tokio::test]
async fn test_unique_and_redundant_partition_reference_rows() {
    let pool = fixture_pool().await;
    insert_class(&pool, "GO:0005622").await;
    insert_class(&pool, "GO:0005737").await;
    insert_class(&pool, "GO:0016020").await;
    insert_closure(&pool, "GO:0005737", "GO:0005622").await;

    let reference = "GO_REF:0000002";
    // Redundant: covered by the PMID row at the more specific class.
    insert_annotation(&pool, "G1", "GO:0005622", reference, "IEA").await;
    insert_annotation(&pool, "G1", "GO:0005737", "PMID:1", "EXP").await;
    // Unique: nothing covers the membrane annotation.
    insert_annotation(&pool, "G2", "GO:0016020", reference, "IEA").await;

    let analyzer = EvidenceRedundancyAnalyzer::new(&pool);
    let redundant = analyzer
        .find_redundant_references(reference, "IEA")
        .await
        .unwrap();
    let unique = analyzer
        .unique_contributions(AnnotationField::SupportingReferences, Some("IEA"), None)
        .await
        .unwrap();

    let redundant_ids = gene_ids(&redundant);
    let unique_ids: HashSet<i64> = unique
        .annotations
        .iter()
        .filter(|a| a.supporting_references == vec![reference.to_string()])
        .map(|a| a.internal_id)
        .collect();

    assert_eq!(redundant.count, 1);
    assert_eq!(unique_ids.len(), 1);
    assert!(redundant_ids.is_disjoint(&unique_ids));
    assert_eq!(redundant_ids.len() + unique_ids.len(), 2);
}

// ============================================================================
// Summaries (P4)
// ============================================================================

#[tokio::test]
async fn test_summary_totals_and_ordering() {
    let pool = fixture_pool().await;
    insert_class(&pool, "GO:0005737").await;
    insert_class(&pool, "GO:0016020").await;
    insert_class(&pool, "GO:0005634").await;
    // Three unique IEA annotations from ref A, one from ref B.
    insert_annotation(&pool, "G1", "GO:0005737", "GO_REF:A", "IEA").await;
    insert_annotation(&pool, "G2", "GO:0005737", "GO_REF:A", "IEA").await;
    insert_annotation(&pool, "G3", "GO:0016020", "GO_REF:A", "IEA").await;
    insert_annotation(&pool, "G4", "GO:0005634", "GO_REF:B", "IEA").await;

    let analyzer = EvidenceRedundancyAnalyzer::new(&pool);
    let summary = analyzer
        .summarize_unique_contributions(
            AnnotationField::SupportingReferences,
            Some("IEA"),
            None,
            None,
        )
        .await
        .unwrap();

    assert_eq!(
        summary.group_by_fields,
        vec![
            AnnotationField::EvidenceType,
            AnnotationField::SupportingReferences
        ]
    );
    let total: usize = summary
        .summaries
        .iter()
        .map(|s| s.contribution_count)
        .sum();
    assert_eq!(total, summary.total_unique);
    assert_eq!(summary.total_unique, 4);

    // Sorted by descending count; the ref A group first.
    assert_eq!(summary.summaries[0].contribution_count, 3);
    assert_eq!(
        summary.summaries[0].group_values,
        vec!["IEA".to_string(), "GO_REF:A".to_string()]
    );
}

#[tokio::test]
async fn test_summary_custom_group_by_and_tie_break() {
    let pool = fixture_pool().await;
    insert_class(&pool, "GO:0005737").await;
    insert_annotation_by(&pool, "G1", "GO:0005737", "R1", "IEA", "MGI").await;
    insert_annotation_by(&pool, "G2", "GO:0005737", "R1", "IEA", "UniProt").await;

    let analyzer = EvidenceRedundancyAnalyzer::new(&pool);
    let summary = analyzer
        .summarize_unique_contributions(
            AnnotationField::SupportingReferences,
            Some("IEA"),
            None,
            Some(&[AnnotationField::AssignedBy]),
        )
        .await
        .unwrap();

    // Equal counts: deterministic ordering by group key.
    assert_eq!(summary.summaries.len(), 2);
    assert_eq!(summary.summaries[0].group_values, vec!["MGI".to_string()]);
    assert_eq!(
        summary.summaries[1].group_values,
        vec!["UniProt".to_string()]
    );
}

#[tokio::test]
async fn test_summary_empty_result() {
    let pool = fixture_pool().await;
    let analyzer = EvidenceRedundancyAnalyzer::new(&pool);
    let summary = analyzer
        .summarize_unique_contributions(
            AnnotationField::SupportingReferences,
            Some("IEA"),
            None,
            None,
        )
        .await
        .unwrap();
    assert!(summary.summaries.is_empty());
    assert_eq!(summary.total_unique, 0);
}

// ============================================================================
// Reference Set Comparison (P5 and scenario)
// ============================================================================

#[tokio::test]
async fn test_compare_reference_sets_scenario() {
    let pool = fixture_pool().await;
    // 3 pairs unique to ref1.
    insert_annotation(&pool, "G1", "GO:0000001", "GO_REF:1", "IEA").await;
    insert_annotation(&pool, "G2", "GO:0000002", "GO_REF:1", "IEA").await;
    insert_annotation(&pool, "G3", "GO:0000003", "GO_REF:1", "IEA").await;
    // 2 pairs unique to ref2.
    insert_annotation(&pool, "G4", "GO:0000004", "GO_REF:2", "IEA").await;
    insert_annotation(&pool, "G5", "GO:0000005", "GO_REF:2", "IEA").await;
    // 1 shared pair annotated by both.
    insert_annotation(&pool, "G6", "GO:0000006", "GO_REF:1", "IEA").await;
    insert_annotation(&pool, "G6", "GO:0000006", "GO_REF:2", "IEA").await;

    let analyzer = EvidenceRedundancyAnalyzer::new(&pool);
    let comparison = analyzer
        .compare_reference_sets(
            &["GO_REF:1".to_string()],
            &["GO_REF:2".to_string()],
            None,
        )
        .await
        .unwrap();

    assert_eq!(comparison.unique_to_set1, 3);
    assert_eq!(comparison.unique_to_set2, 2);
    assert_eq!(comparison.overlap, 1);
    assert_eq!(comparison.total_set1, 4);
    assert_eq!(comparison.total_set2, 3);
}

#[tokio::test]
async fn test_compare_reference_sets_symmetry() {
    let pool = fixture_pool().await;
    insert_annotation(&pool, "G1", "GO:0000001", "GO_REF:1", "IEA").await;
    insert_annotation(&pool, "G2", "GO:0000002", "GO_REF:2", "IEA").await;
    insert_annotation(&pool, "G3", "GO:0000003", "GO_REF:1", "IEA").await;
    insert_annotation(&pool, "G3", "GO:0000003", "GO_REF:2", "IEA").await;

    let set1 = vec!["GO_REF:1".to_string()];
    let set2 = vec!["GO_REF:2".to_string()];

    let analyzer = EvidenceRedundancyAnalyzer::new(&pool);
    let forward = analyzer
        .compare_reference_sets(&set1, &set2, None)
        .await
        .unwrap();
    let backward = analyzer
        .compare_reference_sets(&set2, &set1, None)
        .await
        .unwrap();

    assert_eq!(forward.unique_to_set1, backward.unique_to_set2);
    assert_eq!(forward.unique_to_set2, backward.unique_to_set1);
    assert_eq!(forward.overlap, backward.overlap);
}

/// Set comparison is a flat (gene, class) overlap: the subsumption closure
/// is deliberately not consulted.
#[tokio::test]
async fn test_compare_reference_sets_ignores_closure() {
    let pool = fixture_pool().await;
    insert_class(&pool, "GO:0005622").await;
    insert_class(&pool, "GO:0005737").await;
    insert_closure(&pool, "GO:0005737", "GO:0005622").await;
    insert_annotation(&pool, "G1", "GO:0005737", "GO_REF:1", "IEA").await;
    insert_annotation(&pool, "G1", "GO:0005622", "GO_REF:2", "IEA").await;

    let analyzer = EvidenceRedundancyAnalyzer::new(&pool);
    let comparison = analyzer
        .compare_reference_sets(
            &["GO_REF:1".to_string()],
            &["GO_REF:2".to_string()],
            None,
        )
        .await
        .unwrap();

    assert_eq!(comparison.unique_to_set1, 1);
    assert_eq!(comparison.unique_to_set2, 1);
    assert_eq!(comparison.overlap, 0);
}

#[tokio::test]
async fn test_compare_reference_sets_evidence_filter() {
    let pool = fixture_pool().await;
    insert_annotation(&pool, "G1", "GO:0000001", "GO_REF:1", "IEA").await;
    insert_annotation(&pool, "G2", "GO:0000002", "GO_REF:1", "EXP").await;
    insert_annotation(&pool, "G3", "GO:0000003", "GO_REF:2", "IEA").await;

    let analyzer = EvidenceRedundancyAnalyzer::new(&pool);
    let comparison = analyzer
        .compare_reference_sets(
            &["GO_REF:1".to_string()],
            &["GO_REF:2".to_string()],
            Some("IEA"),
        )
        .await
        .unwrap();

    assert_eq!(comparison.total_set1, 1, "EXP row filtered out");
    assert_eq!(comparison.total_set2, 1);
}

/// Symmetry must survive an evidence filter: a pair claimed by set 1
/// under IEA and by set 2 only under EXP is not an IEA overlap, no
/// matter which set comes first, and totals still partition.
#[tokio::test]
async fn test_compare_reference_sets_symmetric_under_evidence_filter() {
    let pool = fixture_pool().await;
    insert_annotation(&pool, "G1", "GO:0000001", "GO_REF:1", "IEA").await;
    insert_annotation(&pool, "G1", "GO:0000001", "GO_REF:2", "EXP").await;

    let set1 = vec!["GO_REF:1".to_string()];
    let set2 = vec!["GO_REF:2".to_string()];

    let analyzer = EvidenceRedundancyAnalyzer::new(&pool);
    let forward = analyzer
        .compare_reference_sets(&set1, &set2, Some("IEA"))
        .await
        .unwrap();
    let backward = analyzer
        .compare_reference_sets(&set2, &set1, Some("IEA"))
        .await
        .unwrap();

    assert_eq!(forward.overlap, 0, "the EXP row does not count under IEA");
    assert_eq!(forward.overlap, backward.overlap);
    assert_eq!(forward.unique_to_set1, 1);
    assert_eq!(forward.unique_to_set1, backward.unique_to_set2);
    assert_eq!(forward.total_set1, forward.unique_to_set1 + forward.overlap);
    assert_eq!(forward.total_set2, forward.unique_to_set2 + forward.overlap);
}

#[tokio::test]
async fn test_compare_reference_sets_rejects_empty_set() {
    let pool = fixture_pool().await;
    let analyzer = EvidenceRedundancyAnalyzer::new(&pool);
    let err = analyzer
        .compare_reference_sets(&[], &["GO_REF:2".to_string()], None)
        .await
        .unwrap_err();
    assert!(matches!(err, GodbError::Config(_)));
}

// ============================================================================
// Empty Results Are Values
// ============================================================================

#[tokio::test]
async fn test_zero_matches_is_a_valid_result() {
    let pool = fixture_pool().await;
    insert_class(&pool, "GO:0005737").await;
    insert_annotation(&pool, "P1", "GO:0005737", "GO_REF:0000002", "IEA").await;

    let analyzer = EvidenceRedundancyAnalyzer::new(&pool);
    let result = analyzer
        .unique_contributions(AnnotationField::SupportingReferences, Some("EXP"), None)
        .await
        .unwrap();
    assert_eq!(result.count, 0);
    assert!(result.annotations.is_empty());

    let redundant = analyzer
        .find_redundant_references("GO_REF:0000002", "IEA")
        .await
        .unwrap();
    assert_eq!(redundant.count, 0, "nothing else covers the only row");
}
