//! `godb evidence` command implementations
//!
//! Front end for the redundancy engine: field names are parsed into
//! [`AnnotationField`] here so unknown fields are rejected before any
//! query runs.

use godb_common::types::AnnotationField;
use godb_store::{open_read_only, EvidenceRedundancyAnalyzer};

use crate::error::Result;
use crate::output::{open_output, write_annotations, write_comparison, write_summary};
use crate::EvidenceCommand;

/// Dispatch an evidence subcommand
pub async fn run(db: String, command: &EvidenceCommand) -> Result<()> {
    let pool = open_read_only(&db).await?;
    let analyzer = EvidenceRedundancyAnalyzer::new(&pool);

    match command {
        EvidenceCommand::UniqueContributions {
            method,
            evidence_type,
            comparators,
            summary,
            group_by,
            format,
            output,
        } => {
            let method: AnnotationField = method.parse()?;
            let comparators = parse_comparators(comparators);
            let mut out = open_output(output.as_deref())?;

            if *summary {
                let group_by = group_by
                    .iter()
                    .map(|name| name.parse())
                    .collect::<godb_common::Result<Vec<AnnotationField>>>()?;
                let group_by = if group_by.is_empty() {
                    None
                } else {
                    Some(group_by.as_slice())
                };
                let result = analyzer
                    .summarize_unique_contributions(
                        method,
                        evidence_type.as_deref(),
                        comparators,
                        group_by,
                    )
                    .await?;
                write_summary(&result, *format, &mut out)?;
                eprintln!(
                    "{} unique contributions in {} group(s)",
                    result.total_unique,
                    result.summaries.len()
                );
            } else {
                let result = analyzer
                    .unique_contributions(method, evidence_type.as_deref(), comparators)
                    .await?;
                write_annotations(&result, *format, &mut out)?;
                eprintln!("{} unique contributions", result.count);
            }
        },

        EvidenceCommand::FindRedundant {
            reference,
            evidence_type,
            format,
            output,
        } => {
            let result = analyzer
                .find_redundant_references(reference, evidence_type)
                .await?;
            let mut out = open_output(output.as_deref())?;
            write_annotations(&result, *format, &mut out)?;
            eprintln!(
                "{} annotations where '{reference}' is redundant",
                result.count
            );
        },

        EvidenceCommand::CompareReferences {
            set1,
            set2,
            evidence_type,
            output,
        } => {
            let result = analyzer
                .compare_reference_sets(set1, set2, evidence_type.as_deref())
                .await?;
            let mut out = open_output(output.as_deref())?;
            write_comparison(&result, &mut out)?;
        },
    }

    Ok(())
}

/// Distinguish "no comparator restriction" (flag absent) from an explicit
/// restriction. clap collects repeatable flags into a Vec, so an absent
/// flag arrives as an empty Vec and maps to None.
fn parse_comparators(comparators: &[String]) -> Option<&[String]> {
    if comparators.is_empty() {
        None
    } else {
        Some(comparators)
    }
}
