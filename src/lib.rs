//! dirdupes - find folders that hold the same files
//!
//! Catalogs files under one or more directory trees, groups files whose
//! name (optionally also size) recurs in more than one directory, and
//! reports which directories share the most. An optional interactive review
//! walks the overlapping directory pairs and moves one side's copies to the
//! trash on background workers, recording every attempt in an audit log.
//!
//! # Pipeline
//!
//! 1. [`catalog`]: walk and filter the folders into a full catalog
//! 2. [`duplicates`]: aggregate the catalog into groups, counts and pairs
//! 3. [`output`]: write the flat text report
//! 4. [`review`] + [`actions`]: optional pairwise review and deletion

pub mod actions;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod review;
pub mod signal;

use std::io;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use yansi::Paint;

use crate::actions::platform_backend;
use crate::catalog::{CatalogBuilder, CatalogConfig};
use crate::cli::Cli;
use crate::config::RunConfig;
use crate::duplicates::{aggregate, Aggregation, MatchMode};
use crate::error::ExitCode;
use crate::output::TextReport;
use crate::progress::{phase_marker, Progress, ProgressCallback};
use crate::review::{
    ConsolePrompter, ReviewConfig, ReviewDriver, ReviewState, ReviewSummary, SystemBrowser,
};

/// Run dirdupes for a parsed command line.
///
/// Logging must already be initialized.
///
/// # Errors
///
/// Returns an error if the configuration cannot be resolved, no folder can
/// be cataloged, cataloging is interrupted, or the report cannot be written.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    if cli.no_color {
        yansi::disable();
    }

    let config = RunConfig::resolve(&cli).context("Failed to load configuration")?;
    let shutdown = signal::install_handler().context("Failed to set up Ctrl+C handling")?;
    let quiet = cli.quiet;

    log::debug!("Resolved configuration: {config:?}");

    phase_marker(quiet, "Cataloging files");
    let progress: Arc<dyn ProgressCallback> = Arc::new(Progress::new(quiet));
    let catalog = CatalogBuilder::new(CatalogConfig::from(&config))
        .with_shutdown_flag(shutdown.flag())
        .with_progress_callback(progress)
        .build(&config.folders)
        .context("Failed to build the file catalog")?;
    let skipped = catalog.skipped.len();

    phase_marker(quiet, "Grouping files by name");
    let aggregation = aggregate(catalog.entries, MatchMode::from_check_size(config.check_size));

    phase_marker(
        quiet,
        &format!("Writing report to {}", config.output_path.display()),
    );
    TextReport::new(&aggregation)
        .write_file(&config.output_path)
        .context("Failed to write the report")?;

    if !quiet {
        print_summary(&aggregation, skipped);
    }

    if config.interactive_delete && !aggregation.is_empty() {
        phase_marker(quiet, "Reviewing folder pairs");
        let summary = ReviewDriver::new(
            &aggregation,
            ConsolePrompter::stdio(),
            SystemBrowser,
            io::stdout(),
            platform_backend(),
        )
        .with_config(ReviewConfig {
            log_path: config.deletion_log_path.clone(),
            ..ReviewConfig::default()
        })
        .with_shutdown_flag(shutdown.flag())
        .run();

        if !quiet {
            print_review_summary(&summary, &config.deletion_log_path);
        }
        if shutdown.requested() {
            return Ok(ExitCode::Interrupted);
        }
    }

    Ok(if aggregation.is_empty() {
        ExitCode::NoDuplicates
    } else if skipped > 0 {
        ExitCode::PartialSuccess
    } else {
        ExitCode::Success
    })
}

fn print_summary(aggregation: &Aggregation, skipped: usize) {
    let stats = aggregation.stats();
    println!(
        "{} files cataloged, {} names shared by {} folders ({} folder pairs)",
        stats.entries,
        stats.duplicate_groups.bold(),
        stats.directories.bold(),
        stats.directory_pairs
    );
    if skipped > 0 {
        println!("{}", format!("{skipped} files or folders could not be read").yellow());
    }
}

fn print_review_summary(summary: &ReviewSummary, log_path: &Path) {
    println!(
        "{} pairs reviewed, {} declined, {} aborted, {} deletion jobs",
        summary.pairs.len() - summary.count(ReviewState::Skipped),
        summary.count(ReviewState::Declined),
        summary.count(ReviewState::Aborted),
        summary.dispatched_jobs
    );
    if summary.abandoned_workers > 0 {
        println!(
            "{}",
            format!(
                "{} deletion jobs were still running; check {} later",
                summary.abandoned_workers,
                log_path.display()
            )
            .yellow()
        );
    } else if summary.dispatched_jobs > 0 {
        println!("Deletion outcomes recorded in {}", log_path.display());
    }
}
