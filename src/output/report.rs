//! Flat text report for duplicate scan results.
//!
//! # Layout
//!
//! One line per duplicate key, tab separated:
//!
//! - name-only mode: `filename<TAB>dir1<TAB>dir2...`
//! - size-aware mode: `filename<TAB>size<TAB>dir1<TAB>dir2...`
//!
//! then a separator of 200 `#` characters, then one `directory<TAB>count`
//! line per directory (descending count), each followed by
//! `<TAB>partner<TAB>sharedCount` lines (descending shared count).
//!
//! # Example
//!
//! ```
//! use dirdupes::catalog::CatalogEntry;
//! use dirdupes::duplicates::{aggregate, MatchMode};
//! use dirdupes::output::TextReport;
//!
//! let aggregation = aggregate(
//!     vec![CatalogEntry::new("a.txt", "/x", None), CatalogEntry::new("a.txt", "/y", None)],
//!     MatchMode::NameOnly,
//! );
//! let text = TextReport::new(&aggregation).to_string().unwrap();
//! assert!(text.starts_with("a.txt\t/x\t/y\n"));
//! ```

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::duplicates::{Aggregation, MatchMode};

/// Width of the separator between the duplicate list and the folder summary.
pub const SEPARATOR_WIDTH: usize = 200;

/// Default report location.
pub const DEFAULT_REPORT_PATH: &str = "./file_duplicates.txt";

/// Errors that can occur while writing the report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The report file could not be created.
    #[error("cannot create report {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// I/O error during writing.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Text report formatter.
pub struct TextReport<'a> {
    aggregation: &'a Aggregation,
}

impl<'a> TextReport<'a> {
    /// Create a new report formatter.
    #[must_use]
    pub fn new(aggregation: &'a Aggregation) -> Self {
        Self { aggregation }
    }

    /// Write the report to the given writer.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::Io` if writing fails.
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<(), ReportError> {
        for group in self.aggregation.groups() {
            write!(writer, "{}", group.key.file_name)?;
            if self.aggregation.mode() == MatchMode::NameAndSize {
                match group.key.size {
                    Some(size) => write!(writer, "\t{size}")?,
                    None => write!(writer, "\t?")?,
                }
            }
            for directory in group.directories() {
                write!(writer, "\t{directory}")?;
            }
            writeln!(writer)?;
        }

        writeln!(writer, "{}", "#".repeat(SEPARATOR_WIDTH))?;

        for (directory, count) in self.aggregation.ranked_directories() {
            writeln!(writer, "{directory}\t{count}")?;
            for (partner, shared) in self.aggregation.ranked_partners(directory) {
                writeln!(writer, "\t{partner}\t{shared}")?;
            }
        }

        writer.flush()?;
        Ok(())
    }

    /// Generate the report as a string.
    ///
    /// # Errors
    ///
    /// Returns `ReportError` if formatting fails.
    pub fn to_string(&self) -> Result<String, ReportError> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    /// Write the report to a file, replacing any previous report.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::Create` if the file cannot be created and
    /// `ReportError::Io` if writing fails.
    pub fn write_file(&self, path: &Path) -> Result<(), ReportError> {
        let file = File::create(path).map_err(|source| ReportError::Create {
            path: path.to_path_buf(),
            source,
        })?;
        self.write_to(BufWriter::with_capacity(50_000, file))?;
        log::info!("Report written to {}", path.display());
        Ok(())
    }
}
