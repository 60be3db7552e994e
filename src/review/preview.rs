//! What the operator sees for one directory pair.
//!
//! At most [`DISPLAY_CAP`] shared files are listed, followed by a
//! `+N more files` line. Each listed file shows its size and modification
//! time in both directories. A file that cannot be stat'ed is shown as
//! `unreadable`; it never stops the review.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use bytesize::ByteSize;
use chrono::{DateTime, Local};
use rayon::prelude::*;
use yansi::Paint;

use crate::duplicates::Aggregation;

/// Maximum number of shared files listed per pair.
pub const DISPLAY_CAP: usize = 50;

const UNREADABLE: &str = "unreadable";

/// Size and modification time of one copy of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FileStat {
    /// Size in bytes, if the file could be stat'ed
    pub size: Option<u64>,
    /// Modification time, if available
    pub modified: Option<DateTime<Local>>,
}

impl FileStat {
    /// Stat `path`. Any failure degrades to unknown fields.
    #[must_use]
    pub fn read(path: &Path) -> Self {
        match fs::metadata(path) {
            Ok(meta) => Self {
                size: Some(meta.len()),
                modified: meta.modified().ok().map(DateTime::<Local>::from),
            },
            Err(e) => {
                log::debug!("Cannot stat {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Human-readable size or the unreadable marker.
    #[must_use]
    pub fn size_label(&self) -> String {
        self.size
            .map_or_else(|| UNREADABLE.to_string(), |s| ByteSize::b(s).to_string())
    }

    /// Local modification time or the unreadable marker.
    #[must_use]
    pub fn modified_label(&self) -> String {
        self.modified.map_or_else(
            || UNREADABLE.to_string(),
            |t| t.format("%Y-%m-%d %H:%M:%S").to_string(),
        )
    }
}

/// One listed file with both copies' stats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewRow {
    /// Shared file name
    pub file_name: String,
    /// Copy in the first directory
    pub first: FileStat,
    /// Copy in the second directory
    pub second: FileStat,
}

/// Display model for one directory pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairPreview {
    /// First directory
    pub first: String,
    /// Second directory
    pub second: String,
    /// Total shared files, including those not listed
    pub total: usize,
    /// Listed files, at most [`DISPLAY_CAP`]
    pub rows: Vec<PreviewRow>,
}

impl PairPreview {
    /// Build the preview for `(first, second)` from the aggregation.
    #[must_use]
    pub fn build(aggregation: &Aggregation, first: &str, second: &str) -> Self {
        let shared = aggregation.shared_groups(first, second);
        let groups = aggregation.groups();

        let targets: Vec<(String, Option<PathBuf>, Option<PathBuf>)> = shared
            .iter()
            .take(DISPLAY_CAP)
            .map(|&gi| {
                let group = &groups[gi];
                (
                    group.key.file_name.clone(),
                    group.path_in(first).cloned(),
                    group.path_in(second).cloned(),
                )
            })
            .collect();

        let rows = targets
            .into_par_iter()
            .map(|(file_name, a, b)| PreviewRow {
                file_name,
                first: a.as_deref().map(FileStat::read).unwrap_or_default(),
                second: b.as_deref().map(FileStat::read).unwrap_or_default(),
            })
            .collect();

        Self {
            first: first.to_string(),
            second: second.to_string(),
            total: shared.len(),
            rows,
        }
    }

    /// Shared files not listed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.total.saturating_sub(self.rows.len())
    }

    /// Render the preview.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if writing fails.
    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writeln!(writer)?;
        writeln!(
            writer,
            "{}",
            format!("{} files in common:", self.total).bold()
        )?;
        writeln!(writer, "  {} {}", "[1]".yellow(), self.first)?;
        writeln!(writer, "  {} {}", "[2]".yellow(), self.second)?;

        for row in &self.rows {
            writeln!(writer, "    {}", row.file_name.cyan())?;
            for (label, stat) in [("[1]", &row.first), ("[2]", &row.second)] {
                writeln!(
                    writer,
                    "        {label} {:>12}  {}",
                    stat.size_label(),
                    stat.modified_label()
                )?;
            }
        }

        let remaining = self.remaining();
        if remaining > 0 {
            writeln!(writer, "    +{remaining} more files")?;
        }
        Ok(())
    }
}
