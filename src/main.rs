//! maildir-extract - Parallel Maildir Attachment Extractor
//!
//! Entry point for the CLI application.

use anyhow::{Context, Result};
use clap::Parser;
use maildir_extract::config::{CliArgs, ExtractConfig};
use maildir_extract::progress::{print_header, print_summary, ProgressReporter};
use maildir_extract::walker::ExtractCoordinator;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
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
    let args = CliArgs::parse();

    setup_logging(args.verbose)?;

    let config = ExtractConfig::from_args(args).context("Invalid configuration")?;

    if config.verbose {
        print_header(
            config.targets.len(),
            config.worker_count,
            &config.output_dir.display().to_string(),
            config.pattern.as_str(),
        );
    }

    let verbose = config.verbose;
    let dry_run = config.dry_run;
    let output_dir = config.output_dir.display().to_string();
    let show_progress = config.show_progress;

    let coordinator = ExtractCoordinator::new(config);

    let result = if show_progress {
        let reporter = Arc::new(ProgressReporter::new());
        reporter.set_status("Scanning mailboxes...");
        let updater = Arc::clone(&reporter);
        let result = coordinator
            .run_with_progress(move |progress| updater.update(&progress))
            .context("Extraction failed")?;
        reporter.finish("Extraction finished");
        result
    } else {
        coordinator.run().context("Extraction failed")?
    };

    if verbose {
        print_summary(&result, &output_dir, dry_run);
    }

    if result.totals.failures > 0 {
        info!(failures = result.totals.failures, "Some attachments could not be saved");
    }

    Ok(())
}

fn setup_logging(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("maildir_extract=debug,warn")
    } else {
        EnvFilter::new("maildir_extract=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    Ok(())
}
