//! Append-only deletion audit log.
//!
//! Every deletion attempt produces exactly one self-contained line:
//!
//! ```text
//! 2024-05-01 10:22:03.123456: Deleted /backup/a.txt
//! 2024-05-01 10:22:03.124001: Error while trying to delete /backup/b.txt: permission denied
//! ```
//!
//! Several workers may append to the same file at once. Each line goes out
//! in a single write on a handle opened in append mode, so lines from
//! different workers interleave but never tear.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Local;

/// Default audit log location.
pub const DEFAULT_LOG_PATH: &str = "deletion_log.log";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Format a success line (without the trailing newline).
#[must_use]
pub fn success_line(timestamp: &str, path: &Path) -> String {
    format!("{timestamp}: Deleted {}", path.display())
}

/// Format a failure line (without the trailing newline).
#[must_use]
pub fn failure_line(timestamp: &str, path: &Path, error: &str) -> String {
    format!(
        "{timestamp}: Error while trying to delete {}: {error}",
        path.display()
    )
}

/// An open handle on the audit log.
#[derive(Debug)]
pub struct AuditLog {
    path: PathBuf,
    file: File,
}

impl AuditLog {
    /// Open (or create) the log in append mode.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the file cannot be opened for appending.
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    /// Location of the log.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record a successful deletion.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the line cannot be written.
    pub fn record_success(&mut self, path: &Path) -> io::Result<()> {
        let line = success_line(&now(), path);
        self.append(&line)
    }

    /// Record a failed deletion with the captured error text.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the line cannot be written.
    pub fn record_failure(&mut self, path: &Path, error: &str) -> io::Result<()> {
        let line = failure_line(&now(), path, error);
        self.append(&line)
    }

    fn append(&mut self, line: &str) -> io::Result<()> {
        let mut buf = String::with_capacity(line.len() + 1);
        buf.push_str(line);
        buf.push('\n');
        self.file.write_all(buf.as_bytes())?;
        self.file.flush()
    }
}

fn now() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}
