//! godb CLI - Main entry point

use clap::Parser;
use godb_cli::{commands, Cli, Commands};
use godb_common::logging::{init_logging, LogConfig, LogLevel};
use std::process;
use tracing::error;

#[tokio::main]
async fn main() {
    // Parse command-line arguments
    let cli = Cli::parse();

    // Verbose flag wins over defaults; GODB_LOG_* variables win over both
    let log_config = if cli.verbose {
        LogConfig::console(LogLevel::Debug)
    } else {
        LogConfig::console(LogLevel::Warn)
    };
    let log_config = if std::env::vars().any(|(key, _)| key.starts_with("GODB_LOG_")) {
        LogConfig::from_env().unwrap_or(log_config)
    } else {
        log_config
    };

    // Initialize logging (the CLI still works without it)
    let _ = init_logging(&log_config);

    // Execute command
    let result = execute_command(cli).await;

    if let Err(e) = result {
        error!(error = %e, "Command failed");
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// Execute the CLI command
async fn execute_command(cli: Cli) -> godb_cli::Result<()> {
    match cli.command {
        Commands::Load {
            sources,
            gpi_sources,
            go_db_paths,
            additional_db_paths,
            force,
            validate,
        } => {
            commands::load::run(
                cli.db,
                sources,
                gpi_sources,
                go_db_paths,
                additional_db_paths,
                force,
                validate,
            )
            .await
        }

        Commands::Validate => commands::validate::run(cli.db).await,

        Commands::Materialize { view } => commands::materialize::run(cli.db, view).await,

        Commands::Export {
            output,
            taxon,
            taxon_closure,
            exclude_taxon,
            exclude_taxon_closure,
            assigned_by,
            aspect,
            evidence_type,
            term,
            raw_where,
            limit,
        } => {
            commands::export::run(
                cli.db,
                commands::export::ExportArgs {
                    output,
                    taxon,
                    taxon_closure,
                    exclude_taxon,
                    exclude_taxon_closure,
                    assigned_by,
                    aspect,
                    evidence_type,
                    term,
                    raw_where,
                    limit,
                },
            )
            .await
        }

        Commands::Evidence { ref command } => commands::evidence::run(cli.db.clone(), command).await,
    }
}
