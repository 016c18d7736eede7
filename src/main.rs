//! maildir-link - Maildir projection of mail-index search results
//!
//! Entry point for the CLI application.

use anyhow::{Context, Result};
use clap::Parser;
use maildir_link::config::{CliArgs, LinkConfig};
use maildir_link::index::{Query, SqliteIndex};
use maildir_link::linker::LinkCoordinator;
use maildir_link::report;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    // Parse CLI arguments
    let args = CliArgs::parse();

    // Setup logging
    setup_logging(args.verbose)?;

    // Validate and create config
    let config = LinkConfig::from_args(args).context("Invalid configuration")?;

    // Open the index read-only and bind the query
    let index = SqliteIndex::open_read_only(&config.index_path)
        .context("Failed to open mail index")?;
    let query = Query::new(&index, config.query.as_str());

    // Run the projection
    let coordinator = LinkCoordinator::new(config.options.clone());
    let summary = coordinator.run(&query).context("Projection failed")?;

    report::print_summary(&summary, &config.options);

    Ok(())
}

fn setup_logging(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("maildir_link=debug,warn")
    } else {
        EnvFilter::new("maildir_link=info,warn")
    };

    // Summaries own stdout; diagnostics go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}
