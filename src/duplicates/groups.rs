//! Duplicate keys and groups.
//!
//! # Overview
//!
//! A [`DuplicateGroup`] collects every directory that holds a file with the
//! same [`DuplicateKey`]. In name-only mode the key is the folded file name;
//! in size-aware mode it is the name plus the size in bytes, so two
//! same-named files of different sizes never meet.
//!
//! Directories are the unit of comparison: a directory appears at most once
//! per group, in the order it was first discovered.
//!
//! # Example
//!
//! ```
//! use dirdupes::duplicates::{DuplicateKey, MatchMode};
//!
//! let key = DuplicateKey::for_mode(MatchMode::NameAndSize, "a.txt", Some(100));
//! assert_eq!(key.size, Some(100));
//!
//! let key = DuplicateKey::for_mode(MatchMode::NameOnly, "a.txt", Some(100));
//! assert_eq!(key.size, None);
//! ```

use std::fmt;
use std::path::PathBuf;

/// How catalog entries are matched against each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// Same folded file name
    #[default]
    NameOnly,
    /// Same folded file name and same size in bytes
    NameAndSize,
}

impl MatchMode {
    /// Select the mode from the size-aware toggle.
    #[must_use]
    pub fn from_check_size(check_size: bool) -> Self {
        if check_size {
            Self::NameAndSize
        } else {
            Self::NameOnly
        }
    }
}

/// Key under which entries are grouped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DuplicateKey {
    /// Folded file name
    pub file_name: String,
    /// Size in bytes, only set in size-aware mode
    pub size: Option<u64>,
}

impl DuplicateKey {
    /// Build the key for an entry under the given mode.
    ///
    /// In size-aware mode an entry whose size is unknown keys as `None`,
    /// which only matches other entries of unknown size.
    #[must_use]
    pub fn for_mode(mode: MatchMode, file_name: &str, size: Option<u64>) -> Self {
        Self {
            file_name: file_name.to_string(),
            size: match mode {
                MatchMode::NameOnly => None,
                MatchMode::NameAndSize => size,
            },
        }
    }
}

impl fmt::Display for DuplicateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.size {
            Some(size) => write!(f, "{} ({} bytes)", self.file_name, size),
            None => write!(f, "{}", self.file_name),
        }
    }
}

/// One directory's copy of a duplicated file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupMember {
    /// Folded directory key
    pub directory: String,
    /// On-disk path of the first copy discovered in this directory
    pub path: PathBuf,
}

/// Directories sharing one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    /// The shared key
    pub key: DuplicateKey,
    /// Distinct directories in discovery order
    pub members: Vec<GroupMember>,
}

impl DuplicateGroup {
    /// Create an empty group for a key.
    #[must_use]
    pub fn new(key: DuplicateKey) -> Self {
        Self {
            key,
            members: Vec::new(),
        }
    }

    /// Append a member without checking for an existing entry.
    ///
    /// Callers keep their own seen-set so large groups stay linear.
    pub(crate) fn push_member(&mut self, directory: String, path: PathBuf) {
        debug_assert!(!self.contains(&directory), "directory {directory} added twice");
        self.members.push(GroupMember { directory, path });
    }

    /// Check whether a directory holds this key.
    #[must_use]
    pub fn contains(&self, directory: &str) -> bool {
        self.members.iter().any(|m| m.directory == directory)
    }

    /// On-disk path of this key inside `directory`, if it is a member.
    #[must_use]
    pub fn path_in(&self, directory: &str) -> Option<&PathBuf> {
        self.members
            .iter()
            .find(|m| m.directory == directory)
            .map(|m| &m.path)
    }

    /// Member directories in discovery order.
    pub fn directories(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|m| m.directory.as_str())
    }

    /// Number of distinct directories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Check if this group has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// A group only counts as a duplicate when two or more directories hold the key.
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        self.members.len() > 1
    }
}
