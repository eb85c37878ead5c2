//! godb CLI Library
//!
//! Command-line interface for the GO annotation analytical database.
//!
//! # Overview
//!
//! - **Loading**: build a database from GAF/GPI files and semsql ontology
//!   exports (`godb load`)
//! - **Validation**: run the registered GO-rule checks (`godb validate`)
//! - **Maintenance**: materialize derived views (`godb materialize`)
//! - **Export**: write filtered GAF 2.2 (`godb export`)
//! - **Evidence Analysis**: the redundancy engine
//!   (`godb evidence unique-contributions` and friends)

pub mod commands;
pub mod error;
pub mod output;

// Re-export commonly used types
pub use error::{CliError, Result};

use clap::{Parser, Subcommand, ValueEnum};

/// godb - GO annotation analytical database
#[derive(Parser, Debug)]
#[command(name = "godb")]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the SQLite database
    #[arg(long, env = "GODB_DB", default_value = "go.db", global = true)]
    pub db: String,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a database from annotation and ontology sources
    Load {
        /// GAF source files (.gaf or .gaf.gz)
        #[arg(short, long = "source")]
        sources: Vec<String>,

        /// GPI source files (.gpi or .gpi.gz)
        #[arg(long = "gpi-source")]
        gpi_sources: Vec<String>,

        /// semsql GO SQLite exports to bulk load
        #[arg(long = "go-db")]
        go_db_paths: Vec<String>,

        /// Additional semsql ontology databases (e.g. NCBITaxon)
        #[arg(long = "additional-db")]
        additional_db_paths: Vec<String>,

        /// Overwrite an existing database file
        #[arg(short, long)]
        force: bool,

        /// Run the GO-rule checks after loading
        #[arg(long)]
        validate: bool,
    },

    /// Run the registered GO-rule checks against a loaded database
    Validate,

    /// Replace a derived view with a materialized table of the same name
    Materialize {
        /// View name (e.g. "gaf_association")
        view: String,
    },

    /// Export annotations as GAF 2.2
    Export {
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<String>,

        /// Filter by exact GAF taxon (e.g. "taxon:9606")
        #[arg(long)]
        taxon: Option<String>,

        /// Filter by taxon and all entailed descendants (e.g. "NCBITaxon:10239")
        #[arg(long)]
        taxon_closure: Option<String>,

        /// Exclude a taxon (repeatable)
        #[arg(long = "exclude-taxon")]
        exclude_taxon: Vec<String>,

        /// Exclude a taxon and all its entailed descendants (repeatable)
        #[arg(long = "exclude-taxon-closure")]
        exclude_taxon_closure: Vec<String>,

        /// Filter by assigning group
        #[arg(long)]
        assigned_by: Option<String>,

        /// Filter by aspect (F, P, or C)
        #[arg(long)]
        aspect: Option<String>,

        /// Filter by evidence code
        #[arg(long)]
        evidence_type: Option<String>,

        /// Filter by GO term
        #[arg(long)]
        term: Option<String>,

        /// Extra raw SQL WHERE fragment (advanced)
        #[arg(long = "where")]
        raw_where: Option<String>,

        /// Limit the number of exported rows
        #[arg(long)]
        limit: Option<i64>,
    },

    /// Evidence redundancy analysis
    Evidence {
        #[command(subcommand)]
        command: EvidenceCommand,
    },
}

/// Evidence analysis subcommands
#[derive(Subcommand, Debug)]
pub enum EvidenceCommand {
    /// Find annotations whose contribution is not subsumed by other sources
    UniqueContributions {
        /// Annotation field evaluated for redundancy
        #[arg(short, long, default_value = "supporting_references")]
        method: String,

        /// Restrict to an evidence code (e.g. IEA)
        #[arg(short, long)]
        evidence_type: Option<String>,

        /// Compare only against these method values (repeatable)
        #[arg(short, long = "comparator")]
        comparators: Vec<String>,

        /// Print grouped counts instead of individual annotations
        #[arg(short, long)]
        summary: bool,

        /// Summary grouping fields (repeatable; default: evidence_type + method)
        #[arg(short, long = "group-by")]
        group_by: Vec<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "tsv")]
        format: OutputFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Find annotations where a reference is subsumed by other references
    FindRedundant {
        /// The supporting reference to check (e.g. "GO_REF:0000002")
        #[arg(short, long)]
        reference: String,

        /// Evidence code of the checked annotations
        #[arg(short, long, default_value = godb_store::queries::evidence::DEFAULT_EVIDENCE_TYPE)]
        evidence_type: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "tsv")]
        format: OutputFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Compare annotation coverage of two reference sets
    CompareReferences {
        /// References in the first set (repeatable)
        #[arg(long = "set1", required = true)]
        set1: Vec<String>,

        /// References in the second set (repeatable)
        #[arg(long = "set2", required = true)]
        set2: Vec<String>,

        /// Restrict the comparison to an evidence code
        #[arg(short, long)]
        evidence_type: Option<String>,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<String>,
    },
}

/// Output formats for tabular results
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Tab-separated values
    Tsv,
    /// Comma-separated values
    Csv,
    /// Pretty-printed JSON
    Json,
}
