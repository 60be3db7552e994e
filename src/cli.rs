//! Command-line interface definitions for dirdupes.
//!
//! This module defines all CLI arguments using the clap derive API. Every
//! catalog and review setting can also come from a config file or from
//! `DIRDUPES_*` environment variables; see [`crate::config`].
//!
//! # Example
//!
//! ```bash
//! # Report folders sharing file names
//! dirdupes --folders ~/Photos /mnt/backup
//!
//! # Only JPEGs, matching on name and size, skipping tiny files
//! dirdupes --folders ~/Photos /mnt/backup --extensions jpg jpeg --check-size --minimum-size 10KB
//!
//! # Review the overlapping folders and delete one side's copies
//! dirdupes --folders ~/Photos /mnt/backup --interactive-delete
//! ```

use clap::Parser;
use std::path::PathBuf;

/// Find files duplicated by name across directory trees.
///
/// dirdupes catalogs every file under the given folders, groups files that
/// share a name (optionally also a size) in more than one folder, and reports
/// which folders overlap the most. With --interactive-delete it walks the
/// overlapping folder pairs and moves one side's copies to the trash.
#[derive(Debug, Parser)]
#[command(name = "dirdupes")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    pub no_color: bool,

    /// Print errors as JSON objects on stderr
    #[arg(long)]
    pub json_errors: bool,

    /// Configuration file (TOML)
    ///
    /// If not specified, the platform config directory is checked for
    /// dirdupes/config.toml.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Folders to find duplicates in
    #[arg(long, value_name = "DIR", num_args = 1..)]
    pub folders: Vec<PathBuf>,

    /// Absolute folder paths to skip entirely
    #[arg(long, value_name = "PATH", num_args = 1..)]
    pub exclude_folders: Vec<PathBuf>,

    /// File names to skip (gitignore-style patterns, e.g. thumbs.db or *.tmp)
    #[arg(long, value_name = "NAME", num_args = 1..)]
    pub exclude_filenames: Vec<String>,

    /// Folder names to skip wherever they appear (e.g. node_modules)
    #[arg(long, value_name = "NAME", num_args = 1..)]
    pub exclude_folder_names: Vec<String>,

    /// Only consider files with these extensions (without the dot, case-insensitive)
    #[arg(long, value_name = "EXT", num_args = 1..)]
    pub extensions: Vec<String>,

    /// Also match on file size: same-named files of different sizes are not duplicates
    #[arg(long)]
    pub check_size: bool,

    /// Minimum file size to consider (e.g., 1KB, 1MB, 1GB)
    ///
    /// Supports suffixes: B, KB, KiB, MB, MiB, GB, GiB, TB, TiB
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    pub minimum_size: Option<u64>,

    /// Where to write the report [default: ./file_duplicates.txt]
    #[arg(short, long, value_name = "PATH")]
    pub output_path: Option<PathBuf>,

    /// Where to append the deletion audit log [default: deletion_log.log]
    #[arg(long, value_name = "PATH")]
    pub deletion_log_path: Option<PathBuf>,

    /// Review overlapping folder pairs and optionally delete one side's copies
    #[arg(long)]
    pub interactive_delete: bool,
}

/// Parse a human-readable size string into bytes.
///
/// Supports suffixes: B, KB, KiB, MB, MiB, GB, GiB, TB, TiB
/// Case-insensitive. Numbers without suffix are treated as bytes.
///
/// # Examples
///
/// ```
/// use dirdupes::cli::parse_size;
///
/// assert_eq!(parse_size("1024").unwrap(), 1024);
/// assert_eq!(parse_size("1KB").unwrap(), 1000);
/// assert_eq!(parse_size("1KiB").unwrap(), 1024);
/// assert_eq!(parse_size("1MiB").unwrap(), 1_048_576);
/// ```
/// # Errors
///
/// Returns an error if the string is empty, contains an invalid number,
/// a negative number, or an unknown size suffix.
pub fn parse_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("Size cannot be empty".to_string());
    }

    let (num_str, suffix) = match s.find(|c: char| !c.is_ascii_digit() && c != '.') {
        Some(idx) => (&s[..idx], s[idx..].trim().to_uppercase()),
        None => (s, String::new()),
    };

    let num: f64 = num_str
        .parse()
        .map_err(|_| format!("Invalid number: '{num_str}'"))?;

    if num < 0.0 {
        return Err("Size cannot be negative".to_string());
    }

    let multiplier: u64 = match suffix.as_str() {
        "" | "B" => 1,
        "KB" | "K" => 1_000,
        "KIB" => 1_024,
        "MB" | "M" => 1_000_000,
        "MIB" => 1_048_576,
        "GB" | "G" => 1_000_000_000,
        "GIB" => 1_073_741_824,
        "TB" | "T" => 1_000_000_000_000,
        "TIB" => 1_099_511_627_776,
        _ => return Err(format!("Unknown size suffix: '{suffix}'")),
    };

    Ok((num * multiplier as f64) as u64)
}
