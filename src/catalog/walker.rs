//! Single-root traversal using jwalk.
//!
//! # Overview
//!
//! [`Walker`] walks one root folder and yields a [`CatalogEntry`] for each
//! regular file that passes the configured filters. Excluded folders are
//! pruned inside jwalk's `process_read_dir` hook so they are never read.
//!
//! Filters, in order:
//!
//! - folder pruning by basename or absolute path prefix
//! - file name exclusion patterns
//! - extension allow-list
//! - minimum size (only when sizes are collected)
//!
//! # Example
//!
//! ```no_run
//! use dirdupes::catalog::{CatalogConfig, Walker};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/home/user/Music"), CatalogConfig::default());
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(file) => println!("{} in {}", file.file_name, file.directory),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use ignore::gitignore::Gitignore;
use jwalk::WalkDir;

use super::path_utils::{fold_key, is_within};
use super::{CatalogConfig, CatalogEntry, CatalogError};

/// Folder pruning rules shared with jwalk's worker threads.
#[derive(Debug, Default)]
struct FolderExclusions {
    prefixes: Vec<PathBuf>,
    names: Vec<String>,
}

impl FolderExclusions {
    fn is_excluded(&self, path: &Path, name: &OsStr) -> bool {
        let folded = fold_key(&name.to_string_lossy());
        self.names.iter().any(|n| *n == folded)
            || self.prefixes.iter().any(|p| is_within(path, p))
    }
}

/// Directory walker for one root.
#[derive(Debug)]
pub struct Walker {
    root: PathBuf,
    config: CatalogConfig,
    filename_matcher: Option<Gitignore>,
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Walker {
    /// Create a new walker for the given root.
    ///
    /// The file name matcher is built from `config`; use
    /// [`with_filename_matcher`](Self::with_filename_matcher) to share one
    /// across several roots instead.
    #[must_use]
    pub fn new(root: &Path, config: CatalogConfig) -> Self {
        let filename_matcher = config.filename_matcher();
        Self {
            root: root.to_path_buf(),
            config,
            filename_matcher,
            shutdown_flag: None,
        }
    }

    /// Replace the file name exclusion matcher.
    #[must_use]
    pub fn with_filename_matcher(mut self, matcher: Option<Gitignore>) -> Self {
        self.filename_matcher = matcher;
        self
    }

    /// Set the shutdown flag for graceful termination.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    fn is_excluded_name(&self, folded_name: &str) -> bool {
        self.filename_matcher
            .as_ref()
            .is_some_and(|m| m.matched(folded_name, false).is_ignore())
    }

    fn passes_extension_filter(&self, path: &Path) -> bool {
        if self.config.extensions.is_empty() {
            return true;
        }

        let extension = path
            .extension()
            .map(|e| fold_key(&e.to_string_lossy()))
            .unwrap_or_default();

        self.config.extensions.iter().any(|e| *e == extension)
    }

    fn passes_size_filter(&self, size: u64) -> bool {
        self.config.minimum_size.is_none_or(|min| size >= min)
    }

    /// Walk the tree, yielding entries in deterministic (sorted) order.
    ///
    /// Errors are yielded as [`CatalogError`] values rather than stopping
    /// iteration.
    pub fn walk(&self) -> impl Iterator<Item = Result<CatalogEntry, CatalogError>> + '_ {
        let exclusions = Arc::new(FolderExclusions {
            prefixes: self.config.exclude_folders.clone(),
            names: self
                .config
                .exclude_folder_names
                .iter()
                .map(|n| fold_key(n))
                .collect(),
        });

        let walk_dir = WalkDir::new(&self.root)
            .follow_links(false)
            .skip_hidden(false)
            .process_read_dir(move |_depth, _path, _state, children| {
                children.retain(|child| match child {
                    Ok(entry) if entry.file_type().is_dir() => {
                        let excluded = exclusions.is_excluded(&entry.path(), entry.file_name());
                        if excluded {
                            log::debug!("Pruning excluded folder: {}", entry.path().display());
                        }
                        !excluded
                    }
                    _ => true,
                });
                children.sort_by(|a, b| match (a, b) {
                    (Ok(a), Ok(b)) => a.file_name().cmp(b.file_name()),
                    (Ok(_), Err(_)) => std::cmp::Ordering::Less,
                    (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
                    (Err(_), Err(_)) => std::cmp::Ordering::Equal,
                });
            });

        walk_dir.into_iter().filter_map(move |entry_result| {
            if self.is_shutdown_requested() {
                log::debug!("Walker: Shutdown requested, stopping iteration");
                return None;
            }

            match entry_result {
                Ok(entry) => {
                    if !entry.file_type().is_file() {
                        return None;
                    }
                    self.process_file(entry.path())
                }
                Err(e) => {
                    let path = e
                        .path()
                        .map_or_else(|| self.root.clone(), std::borrow::ToOwned::to_owned);
                    log::warn!("Walker error for {}: {}", path.display(), e);
                    Some(Err(CatalogError::Io {
                        path,
                        source: std::io::Error::other(e.to_string()),
                    }))
                }
            }
        })
    }

    fn process_file(&self, path: PathBuf) -> Option<Result<CatalogEntry, CatalogError>> {
        let name = fold_key(&path.file_name()?.to_string_lossy());

        if self.is_excluded_name(&name) {
            log::trace!("Skipping excluded file name: {}", path.display());
            return None;
        }

        if !self.passes_extension_filter(&path) {
            log::trace!("Skipping file due to extension filter: {}", path.display());
            return None;
        }

        let size = if self.config.needs_size() {
            match std::fs::metadata(&path) {
                Ok(meta) => Some(meta.len()),
                Err(e) => {
                    let err = io_error(&path, e);
                    log::warn!("Skipping file: {}", err);
                    return Some(Err(err));
                }
            }
        } else {
            None
        };

        if let Some(size) = size {
            if !self.passes_size_filter(size) {
                log::trace!(
                    "Skipping file due to size filter ({}): {}",
                    size,
                    path.display()
                );
                return None;
            }
        }

        CatalogEntry::from_path(path, size).map(Ok)
    }
}

/// Map an I/O error to the matching [`CatalogError`].
pub(crate) fn io_error(path: &Path, error: std::io::Error) -> CatalogError {
    use std::io::ErrorKind;

    match error.kind() {
        ErrorKind::PermissionDenied => CatalogError::PermissionDenied(path.to_path_buf()),
        ErrorKind::NotFound => CatalogError::NotFound(path.to_path_buf()),
        _ => CatalogError::Io {
            path: path.to_path_buf(),
            source: error,
        },
    }
}
