//! Output rendering for query results
//!
//! Tabular results go out as TSV or CSV with a header row; JSON output
//! serializes the whole result object, comparator metadata included.
//! Row counts and human-readable reports go to stderr or stdout directly
//! in the command modules.

use std::fs::File;
use std::io::{self, Write};

use godb_common::types::AnnotationField;
use godb_store::queries::evidence::{
    ContributionSummaryResult, ReferenceComparison, UniqueContributions,
};

use crate::error::Result;
use crate::OutputFormat;

/// Open the output target: a file when a path is given, stdout otherwise
pub fn open_output(path: Option<&str>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => Ok(Box::new(File::create(path)?)),
        None => Ok(Box::new(io::stdout())),
    }
}

fn delimited_writer(out: &mut dyn Write, delimiter: u8) -> csv::Writer<&mut dyn Write> {
    csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(out)
}

/// Write annotations in the requested format.
///
/// TSV/CSV rows carry the 17 GAF columns in order, list columns joined
/// back to pipe-delimited form. JSON carries the full result object.
pub fn write_annotations(
    result: &UniqueContributions,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, result)?;
            writeln!(out)?;
        },
        OutputFormat::Tsv | OutputFormat::Csv => {
            let delimiter = if format == OutputFormat::Tsv { b'\t' } else { b',' };
            let mut writer = delimited_writer(out, delimiter);
            writer.write_record(AnnotationField::ALL.iter().map(|f| f.column()))?;
            for annotation in &result.annotations {
                writer.write_record(
                    AnnotationField::ALL
                        .iter()
                        .map(|field| field.value_of(annotation)),
                )?;
            }
            writer.flush()?;
        },
    }
    Ok(())
}

/// Write a contribution summary in the requested format
pub fn write_summary(
    result: &ContributionSummaryResult,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, result)?;
            writeln!(out)?;
        },
        OutputFormat::Tsv | OutputFormat::Csv => {
            let delimiter = if format == OutputFormat::Tsv { b'\t' } else { b',' };
            let mut writer = delimited_writer(out, delimiter);
            let mut header: Vec<String> = result
                .group_by_fields
                .iter()
                .map(|f| f.column().to_string())
                .collect();
            header.push("unique_contributions".to_string());
            writer.write_record(&header)?;
            for summary in &result.summaries {
                let mut record = summary.group_values.clone();
                record.push(summary.contribution_count.to_string());
                writer.write_record(&record)?;
            }
            writer.flush()?;
        },
    }
    Ok(())
}

/// Write a reference-set comparison as a human-readable report
pub fn write_comparison(result: &ReferenceComparison, out: &mut dyn Write) -> Result<()> {
    writeln!(out, "Reference set comparison")?;
    if let Some(evidence) = &result.evidence_type {
        writeln!(out, "  Evidence type:    {evidence}")?;
    }
    writeln!(out, "  Set 1:            {}", result.reference_set1.join(", "))?;
    writeln!(out, "  Set 2:            {}", result.reference_set2.join(", "))?;
    writeln!(out)?;
    writeln!(out, "  Unique to set 1:  {}", result.unique_to_set1)?;
    writeln!(out, "  Unique to set 2:  {}", result.unique_to_set2)?;
    writeln!(out, "  Overlap:          {}", result.overlap)?;
    writeln!(out, "  Total set 1:      {}", result.total_set1)?;
    writeln!(out, "  Total set 2:      {}", result.total_set2)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use godb_common::types::{Annotation, AnnotationRow};

    fn sample_result() -> UniqueContributions {
        let row = AnnotationRow {
            internal_id: 1,
            db: "UniProtKB".to_string(),
            db_object_id: "P12345".to_string(),
            db_object_symbol: Some("ABC1".to_string()),
            qualifiers: None,
            ontology_class_ref: "GO:0005737".to_string(),
            supporting_references: Some("PMID:1|GO_REF:0000002".to_string()),
            evidence_type: "IEA".to_string(),
            with_or_from: None,
            aspect: Some("C".to_string()),
            db_object_name: None,
            db_object_synonyms: None,
            db_object_type: Some("protein".to_string()),
            db_object_taxon: Some("taxon:9606".to_string()),
            annotation_date: Some("20240101".to_string()),
            assigned_by: Some("UniProt".to_string()),
            annotation_extensions: None,
            gene_product_form: None,
        };
        UniqueContributions {
            annotations: vec![Annotation::from(row)],
            count: 1,
            method: AnnotationField::SupportingReferences,
            evidence_type: Some("IEA".to_string()),
            comparator_methods: None,
        }
    }

    #[test]
    fn test_tsv_output_has_header_and_joined_lists() {
        let mut buf = Vec::new();
        write_annotations(&sample_result(), OutputFormat::Tsv, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert!(lines.next().unwrap().starts_with("db\tdb_object_id"));
        let row = lines.next().unwrap();
        assert!(row.contains("PMID:1|GO_REF:0000002"));
        assert!(row.contains("GO:0005737"));
    }

    #[test]
    fn test_json_output_includes_metadata() {
        let mut buf = Vec::new();
        write_annotations(&sample_result(), OutputFormat::Json, &mut buf).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["count"], 1);
        assert_eq!(value["evidence_type"], "IEA");
        assert_eq!(value["method"], "supporting_references");
    }

    #[test]
    fn test_comparison_report() {
        let comparison = ReferenceComparison {
            unique_to_set1: 3,
            unique_to_set2: 2,
            overlap: 1,
            total_set1: 4,
            total_set2: 3,
            reference_set1: vec!["GO_REF:1".to_string()],
            reference_set2: vec!["GO_REF:2".to_string()],
            evidence_type: None,
        };
        let mut buf = Vec::new();
        write_comparison(&comparison, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("Unique to set 1:  3"));
        assert!(text.contains("Overlap:          1"));
    }
}
