//! The aggregation pass: catalog entries in, duplicate structures out.
//!
//! # Overview
//!
//! [`aggregate`] consumes the complete catalog and returns an immutable
//! [`Aggregation`] holding three views of the same data:
//!
//! 1. **Duplicate groups**: keys present in two or more directories
//! 2. **Dupe counts**: for each directory, how many qualifying groups it is in
//! 3. **Pair matrix**: for each ordered directory pair, the groups they share
//!
//! The pair matrix holds both `(A, B)` and `(B, A)`. The report lists each
//! directory's own partners, so the aggregator keeps both directions and
//! leaves de-duplication of pairs to the review driver.
//!
//! Aggregation cannot be incremental: whether a key qualifies depends on
//! every entry having been seen, so the catalog must be fully built first.
//!
//! # Example
//!
//! ```
//! use dirdupes::catalog::CatalogEntry;
//! use dirdupes::duplicates::{aggregate, MatchMode};
//!
//! let entries = vec![
//!     CatalogEntry::new("a.txt", "/x", None),
//!     CatalogEntry::new("a.txt", "/y", None),
//!     CatalogEntry::new("b.txt", "/x", None),
//! ];
//!
//! let aggregation = aggregate(entries, MatchMode::NameOnly);
//! assert_eq!(aggregation.groups().len(), 1);
//! assert_eq!(aggregation.dupe_count("/x"), 1);
//! assert_eq!(aggregation.common_files("/x", "/y"), vec!["a.txt"]);
//! assert_eq!(aggregation.common_files("/y", "/x"), vec!["a.txt"]);
//! ```

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use super::groups::{DuplicateGroup, DuplicateKey, MatchMode};
use crate::catalog::CatalogEntry;

/// Counters describing one aggregation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregationStats {
    /// Catalog entries consumed
    pub entries: usize,
    /// Distinct keys seen, qualifying or not
    pub distinct_keys: usize,
    /// Keys present in two or more directories
    pub duplicate_groups: usize,
    /// Directories that take part in at least one group
    pub directories: usize,
    /// Unordered directory pairs sharing at least one key
    pub directory_pairs: usize,
}

/// Result of the aggregation pass. Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    mode: MatchMode,
    groups: Vec<DuplicateGroup>,
    dupe_counts: HashMap<String, usize>,
    pairs: HashMap<String, HashMap<String, Vec<usize>>>,
    stats: AggregationStats,
}

/// Group the full catalog and derive the directory pair matrix.
///
/// Groups keep the order in which their key was first discovered and their
/// directories keep discovery order too; neither affects correctness.
#[must_use]
pub fn aggregate(entries: Vec<CatalogEntry>, mode: MatchMode) -> Aggregation {
    let entry_count = entries.len();
    let mut index: HashMap<DuplicateKey, usize> = HashMap::new();
    let mut building: Vec<(DuplicateGroup, HashSet<String>)> = Vec::new();

    for entry in entries {
        let key = DuplicateKey::for_mode(mode, &entry.file_name, entry.size);
        let slot = *index.entry(key).or_insert_with_key(|key| {
            building.push((DuplicateGroup::new(key.clone()), HashSet::new()));
            building.len() - 1
        });

        let (group, seen) = &mut building[slot];
        if seen.insert(entry.directory.clone()) {
            group.push_member(entry.directory, entry.path);
        } else {
            log::trace!(
                "Collapsing repeat of {} in {}",
                group.key,
                entry.directory
            );
        }
    }

    let distinct_keys = building.len();
    let groups: Vec<DuplicateGroup> = building
        .into_iter()
        .map(|(group, _)| group)
        .filter(DuplicateGroup::is_duplicate)
        .collect();

    let mut dupe_counts: HashMap<String, usize> = HashMap::new();
    let mut pairs: HashMap<String, HashMap<String, Vec<usize>>> = HashMap::new();

    for (gi, group) in groups.iter().enumerate() {
        for member in &group.members {
            *dupe_counts.entry(member.directory.clone()).or_insert(0) += 1;

            let partners = pairs.entry(member.directory.clone()).or_default();
            for other in &group.members {
                if other.directory == member.directory {
                    continue;
                }
                partners
                    .entry(other.directory.clone())
                    .or_default()
                    .push(gi);
            }
        }
    }

    let ordered_pairs: usize = pairs.values().map(HashMap::len).sum();
    let stats = AggregationStats {
        entries: entry_count,
        distinct_keys,
        duplicate_groups: groups.len(),
        directories: dupe_counts.len(),
        directory_pairs: ordered_pairs / 2,
    };

    log::info!(
        "Aggregated {} entries into {} duplicate group(s) across {} folder(s)",
        stats.entries,
        stats.duplicate_groups,
        stats.directories
    );

    Aggregation {
        mode,
        groups,
        dupe_counts,
        pairs,
        stats,
    }
}

/// Sort `(name, count)` rows by descending count, ties by name.
fn rank<'a>(rows: impl Iterator<Item = (&'a str, usize)>) -> Vec<(&'a str, usize)> {
    let mut rows: Vec<_> = rows.collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    rows
}

impl Aggregation {
    /// Matching mode the aggregation was built with.
    #[must_use]
    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Qualifying groups in key discovery order.
    #[must_use]
    pub fn groups(&self) -> &[DuplicateGroup] {
        &self.groups
    }

    /// Check whether any key qualified as a duplicate.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Counters for this pass.
    #[must_use]
    pub fn stats(&self) -> &AggregationStats {
        &self.stats
    }

    /// Number of qualifying groups `directory` takes part in.
    #[must_use]
    pub fn dupe_count(&self, directory: &str) -> usize {
        self.dupe_counts.get(directory).copied().unwrap_or(0)
    }

    /// Directories by descending dupe count, ties broken by name.
    #[must_use]
    pub fn ranked_directories(&self) -> Vec<(&str, usize)> {
        rank(self.dupe_counts.iter().map(|(d, c)| (d.as_str(), *c)))
    }

    /// Partners of `directory` by descending shared-file count, ties broken by name.
    #[must_use]
    pub fn ranked_partners(&self, directory: &str) -> Vec<(&str, usize)> {
        match self.pairs.get(directory) {
            Some(partners) => rank(partners.iter().map(|(d, g)| (d.as_str(), g.len()))),
            None => Vec::new(),
        }
    }

    /// Indices into [`groups`](Self::groups) shared by the ordered pair `(a, b)`.
    #[must_use]
    pub fn shared_groups(&self, a: &str, b: &str) -> &[usize] {
        self.pairs
            .get(a)
            .and_then(|partners| partners.get(b))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of keys shared by `a` and `b`.
    #[must_use]
    pub fn shared_count(&self, a: &str, b: &str) -> usize {
        self.shared_groups(a, b).len()
    }

    /// File names shared by `a` and `b`, in group order.
    #[must_use]
    pub fn common_files(&self, a: &str, b: &str) -> Vec<&str> {
        self.shared_groups(a, b)
            .iter()
            .map(|&gi| self.groups[gi].key.file_name.as_str())
            .collect()
    }

    /// On-disk paths of the files `a` and `b` share, taken from `side`.
    ///
    /// `side` must be `a` or `b`; any other directory yields nothing.
    #[must_use]
    pub fn shared_paths(&self, a: &str, b: &str, side: &str) -> Vec<PathBuf> {
        self.shared_groups(a, b)
            .iter()
            .filter_map(|&gi| self.groups[gi].path_in(side).cloned())
            .collect()
    }
}
