//! Catalog building: directory traversal and filtering.
//!
//! This module turns one or more root folders into a fully materialized
//! list of [`CatalogEntry`] values, one per regular file that survives the
//! exclusion, extension and size filters.
//!
//! # Architecture
//!
//! - [`walker`]: traversal of a single root with jwalk, filters applied inline
//! - [`path_utils`]: key folding (NFC + lower-case) and root de-duplication
//!
//! # Example
//!
//! ```no_run
//! use dirdupes::catalog::{CatalogBuilder, CatalogConfig};
//! use std::path::PathBuf;
//!
//! let config = CatalogConfig {
//!     extensions: vec!["jpg".to_string()],
//!     ..Default::default()
//! };
//!
//! let catalog = CatalogBuilder::new(config)
//!     .build(&[PathBuf::from("/photos"), PathBuf::from("/backup")])
//!     .unwrap();
//! println!("{} files cataloged", catalog.entries.len());
//! ```

pub mod path_utils;
pub mod walker;

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use ignore::gitignore::{Gitignore, GitignoreBuilder};

use crate::progress::ProgressCallback;
pub use walker::Walker;

/// One discovered file that passed every filter.
///
/// `file_name` and `directory` are comparison keys (NFC, lower-cased).
/// `path` is the on-disk location as discovered, which is what gets
/// stat'ed for display and handed to the trash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Folded file name
    pub file_name: String,
    /// Folded absolute path of the containing directory
    pub directory: String,
    /// Size in bytes, present when size-aware matching or a minimum size is configured
    pub size: Option<u64>,
    /// On-disk path of the file
    pub path: PathBuf,
}

impl CatalogEntry {
    /// Create an entry from a directory and file name.
    ///
    /// Both keys are folded; the on-disk path is the unfolded join.
    #[must_use]
    pub fn new(file_name: &str, directory: &str, size: Option<u64>) -> Self {
        Self {
            file_name: path_utils::fold_key(file_name),
            directory: path_utils::fold_key(directory),
            size,
            path: Path::new(directory).join(file_name),
        }
    }

    /// Create an entry from a file's on-disk path.
    ///
    /// Returns `None` for paths without a file name or parent (e.g. `/`).
    #[must_use]
    pub fn from_path(path: PathBuf, size: Option<u64>) -> Option<Self> {
        let file_name = path.file_name()?.to_string_lossy().into_owned();
        let directory = path.parent()?;
        Some(Self {
            file_name: path_utils::fold_key(&file_name),
            directory: path_utils::path_key(directory),
            size,
            path,
        })
    }
}

/// Filters applied while cataloging.
#[derive(Debug, Clone, Default)]
pub struct CatalogConfig {
    /// Absolute path prefixes that are never descended into.
    pub exclude_folders: Vec<PathBuf>,

    /// Gitignore-style patterns matched against the file name.
    /// A plain name such as `thumbs.db` matches that name exactly.
    pub exclude_filenames: Vec<String>,

    /// Folder basenames pruned anywhere in the tree (case-insensitive).
    pub exclude_folder_names: Vec<String>,

    /// Extension allow-list without the dot. Empty means every extension.
    pub extensions: Vec<String>,

    /// Record sizes so same-named files of different sizes stay apart.
    pub check_size: bool,

    /// Files smaller than this are skipped.
    pub minimum_size: Option<u64>,
}

impl CatalogConfig {
    /// Whether files need to be stat'ed for their size.
    #[must_use]
    pub fn needs_size(&self) -> bool {
        self.check_size || self.minimum_size.is_some()
    }

    /// Build the file name exclusion matcher.
    ///
    /// Invalid patterns are logged and ignored.
    #[must_use]
    pub fn filename_matcher(&self) -> Option<Gitignore> {
        if self.exclude_filenames.is_empty() {
            return None;
        }

        let mut builder = GitignoreBuilder::new("");
        // File names are folded before matching
        let _ = builder.case_insensitive(true);
        for pattern in &self.exclude_filenames {
            if let Err(e) = builder.add_line(None, pattern) {
                log::warn!("Invalid filename exclusion '{}': {}", pattern, e);
            }
        }

        match builder.build() {
            Ok(gitignore) if !gitignore.is_empty() => Some(gitignore),
            Ok(_) => None,
            Err(e) => {
                log::warn!("Failed to build filename exclusions: {}", e);
                None
            }
        }
    }
}

/// Errors that can occur while cataloging.
#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The specified path was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// The specified path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// An I/O error occurred while accessing a file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// None of the requested folders could be read.
    #[error("No readable folders to catalog")]
    NoReadableRoots,

    /// Cataloging was interrupted by user (Ctrl+C).
    #[error("Catalog building interrupted by user")]
    Interrupted,
}

/// A fully materialized catalog.
#[derive(Debug, Default)]
pub struct Catalog {
    /// Every entry that passed the filters, in discovery order
    pub entries: Vec<CatalogEntry>,
    /// Roots actually walked after de-duplication
    pub roots: Vec<PathBuf>,
    /// Non-fatal problems: unreadable roots and files that could not be stat'ed
    pub skipped: Vec<CatalogError>,
}

/// Builds a [`Catalog`] from a set of root folders.
pub struct CatalogBuilder {
    config: CatalogConfig,
    shutdown_flag: Option<Arc<AtomicBool>>,
    progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl CatalogBuilder {
    /// Create a builder with the given filters.
    #[must_use]
    pub fn new(config: CatalogConfig) -> Self {
        Self {
            config,
            shutdown_flag: None,
            progress_callback: None,
        }
    }

    /// Set the shutdown flag checked between entries.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Filters with exclusion prefixes made absolute, like the roots.
    fn resolved_config(&self) -> CatalogConfig {
        let mut config = self.config.clone();
        config.exclude_folders = self
            .config
            .exclude_folders
            .iter()
            .map(|prefix| match std::path::absolute(prefix) {
                Ok(absolute) => absolute,
                Err(e) => {
                    log::warn!("Cannot resolve excluded folder {}: {e}", prefix.display());
                    prefix.clone()
                }
            })
            .collect();
        config
    }

    /// Walk every root and collect the full catalog.
    ///
    /// # Errors
    ///
    /// - `NoReadableRoots` if none of the roots exists as a directory
    /// - `Interrupted` if the shutdown flag is raised mid-walk
    pub fn build(&self, roots: &[PathBuf]) -> Result<Catalog, CatalogError> {
        let mut catalog = Catalog::default();
        let config = self.resolved_config();

        let mut readable = Vec::with_capacity(roots.len());
        for root in roots {
            match resolve_root(root) {
                Ok(resolved) => readable.push(resolved),
                Err(e) => {
                    log::warn!("Skipping folder: {}", e);
                    catalog.skipped.push(e);
                }
            }
        }

        catalog.roots = path_utils::collapse_roots(readable);
        catalog.roots.retain(|root| {
            match config
                .exclude_folders
                .iter()
                .find(|p| path_utils::is_within(root, p))
            {
                Some(prefix) => {
                    log::warn!(
                        "Folder {} is excluded by {}, skipping",
                        root.display(),
                        prefix.display()
                    );
                    false
                }
                None => true,
            }
        });

        if catalog.roots.is_empty() {
            return Err(CatalogError::NoReadableRoots);
        }

        log::info!(
            "Cataloging {} folder(s): {:?}",
            catalog.roots.len(),
            catalog.roots.iter().map(|p| p.display()).collect::<Vec<_>>()
        );

        if let Some(ref callback) = self.progress_callback {
            callback.on_phase_start("catalog", 0);
        }

        let filename_matcher = config.filename_matcher();
        for root in &catalog.roots {
            let mut walker = Walker::new(root, config.clone())
                .with_filename_matcher(filename_matcher.clone());
            if let Some(ref flag) = self.shutdown_flag {
                walker = walker.with_shutdown_flag(Arc::clone(flag));
            }

            for result in walker.walk() {
                match result {
                    Ok(entry) => {
                        if let Some(ref callback) = self.progress_callback {
                            callback.on_progress(
                                catalog.entries.len() + 1,
                                &entry.path.to_string_lossy(),
                            );
                        }
                        catalog.entries.push(entry);
                    }
                    Err(e) => catalog.skipped.push(e),
                }
            }

            if self.is_shutdown_requested() {
                break;
            }
        }

        if let Some(ref callback) = self.progress_callback {
            callback.on_phase_end("catalog");
        }

        if self.is_shutdown_requested() {
            return Err(CatalogError::Interrupted);
        }

        log::info!(
            "Cataloged {} file(s), skipped {} problem(s)",
            catalog.entries.len(),
            catalog.skipped.len()
        );

        Ok(catalog)
    }
}

/// Make a root absolute and check it is a readable directory.
fn resolve_root(root: &Path) -> Result<PathBuf, CatalogError> {
    let absolute = std::path::absolute(root).map_err(|e| CatalogError::Io {
        path: root.to_path_buf(),
        source: e,
    })?;

    match std::fs::metadata(&absolute) {
        Ok(meta) if meta.is_dir() => Ok(absolute),
        Ok(_) => Err(CatalogError::NotADirectory(absolute)),
        Err(e) => Err(walker::io_error(&absolute, e)),
    }
}
