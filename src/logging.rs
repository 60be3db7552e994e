//! Diagnostic logging for dirdupes.
//!
//! Diagnostics go through the `log` facade with an `env_logger` backend on
//! stderr. They are separate from the deletion audit log, which is a plain
//! append-only file written by the deletion workers.
//!
//! Log levels are determined by (in priority order):
//!
//! 1. `RUST_LOG` environment variable (if set)
//! 2. CLI flags: `--quiet` (error only) or `--verbose` (debug/trace)
//! 3. Default: info level
//!
//! Debug builds print a timestamp; verbose runs add the module path and,
//! for background deletion workers, the thread name.
//!
//! # Example
//!
//! ```rust,no_run
//! use dirdupes::logging::init_logging;
//!
//! init_logging(1, false);
//! log::debug!("Debug output enabled");
//! ```

use env_logger::Builder;
use log::LevelFilter;
use std::env;
use std::io::Write;

/// Initialize the logging subsystem based on CLI verbosity flags.
///
/// Must be called at most once per process.
pub fn init_logging(verbose: u8, quiet: bool) {
    let mut builder = Builder::new();

    let from_env = env::var("RUST_LOG").is_ok();
    if from_env {
        builder.parse_default_env();
    } else {
        builder.filter_level(determine_level(verbose, quiet));
    }

    configure_format(&mut builder, verbose);
    builder.init();

    if !from_env {
        log::debug!("Logging initialized at level: {:?}", determine_level(verbose, quiet));
    }
}

fn determine_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

/// Label for the emitting thread when it is a named background worker.
fn worker_label() -> Option<String> {
    let current = std::thread::current();
    current
        .name()
        .filter(|name| name.starts_with("dirdupes-"))
        .map(|name| format!(" <{name}>"))
}

fn configure_format(builder: &mut Builder, verbose: u8) {
    let timestamps = cfg!(debug_assertions);

    builder.format(move |buf, record| {
        let level = record.level();
        let level_style = buf.default_level_style(level);

        if timestamps {
            let timestamp = buf.timestamp_seconds();
            write!(buf, "{timestamp} ")?;
        }
        write!(buf, "{level_style}{level:<5}{level_style:#}")?;

        if verbose >= 1 {
            write!(buf, " [{}]", record.module_path().unwrap_or("unknown"))?;
            if let Some(label) = worker_label() {
                write!(buf, "{label}")?;
            }
        }

        writeln!(buf, " {}", record.args())
    });
}
