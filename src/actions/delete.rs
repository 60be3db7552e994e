//! Pluggable deletion backends.
//!
//! # Overview
//!
//! Deletion workers never call a platform mechanism directly. They go
//! through [`TrashBackend`], a single capability: move one path to a
//! recoverable trash location, or report why it could not.
//!
//! - [`SystemTrash`]: the platform recycle bin via the `trash` crate
//! - [`UnavailableTrash`]: fails every call, used when no backend can be initialized
//!
//! # Example
//!
//! ```no_run
//! use dirdupes::actions::delete::{SystemTrash, TrashBackend};
//! use std::path::Path;
//!
//! let backend = SystemTrash::new();
//! match backend.move_to_trash(Path::new("/path/to/duplicate.txt")) {
//!     Ok(()) => println!("Moved to trash"),
//!     Err(e) => eprintln!("Failed: {}", e),
//! }
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

/// Error type for deletion operations.
#[derive(Debug, Error)]
pub enum DeleteError {
    /// File was not found (may have been deleted or moved).
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// Permission denied when attempting to delete.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// Trash operation failed.
    #[error("trash operation failed for {path}: {message}")]
    TrashFailed { path: PathBuf, message: String },

    /// The deletion backend could not be initialized on this host.
    #[error("trash is unavailable: {0}")]
    BackendUnavailable(String),

    /// General I/O error.
    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DeleteError {
    /// Get the path associated with this error (if any).
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::NotFound(p)
            | Self::PermissionDenied(p)
            | Self::TrashFailed { path: p, .. }
            | Self::Io { path: p, .. } => Some(p),
            Self::BackendUnavailable(_) => None,
        }
    }

    fn from_io(path: &Path, e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: e,
            },
        }
    }
}

/// The single capability deletion workers depend on.
pub trait TrashBackend: Send + Sync {
    /// Prepare the backend. Called once per worker before its first file.
    ///
    /// # Errors
    ///
    /// Returns `BackendUnavailable` when the host cannot provide a trash.
    fn probe(&self) -> Result<(), DeleteError> {
        Ok(())
    }

    /// Move one file to a recoverable trash location.
    ///
    /// # Errors
    ///
    /// Returns the reason the file could not be moved.
    fn move_to_trash(&self, path: &Path) -> Result<(), DeleteError>;
}

/// The platform recycle bin.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTrash;

impl SystemTrash {
    /// Create the system trash backend.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl TrashBackend for SystemTrash {
    fn probe(&self) -> Result<(), DeleteError> {
        // Freedesktop trash lives under the user's data directory
        #[cfg(all(unix, not(target_os = "macos")))]
        {
            if directories::BaseDirs::new().is_none() {
                return Err(DeleteError::BackendUnavailable(
                    "no home directory to host the trash".to_string(),
                ));
            }
        }
        Ok(())
    }

    fn move_to_trash(&self, path: &Path) -> Result<(), DeleteError> {
        // trash reports missing files inconsistently across platforms
        fs::symlink_metadata(path).map_err(|e| DeleteError::from_io(path, e))?;

        trash::delete(path).map_err(|e| DeleteError::TrashFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        log::debug!("Moved to trash: {}", path.display());
        Ok(())
    }
}

/// A backend that could not be initialized. Every call fails.
#[derive(Debug, Clone)]
pub struct UnavailableTrash {
    reason: String,
}

impl UnavailableTrash {
    /// Create an unavailable backend with the reason it is unavailable.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl TrashBackend for UnavailableTrash {
    fn probe(&self) -> Result<(), DeleteError> {
        Err(DeleteError::BackendUnavailable(self.reason.clone()))
    }

    fn move_to_trash(&self, _path: &Path) -> Result<(), DeleteError> {
        Err(DeleteError::BackendUnavailable(self.reason.clone()))
    }
}

/// The trash backend for this platform.
#[must_use]
pub fn platform_backend() -> Arc<dyn TrashBackend> {
    if cfg!(any(target_os = "android", target_os = "ios")) {
        Arc::new(UnavailableTrash::new(format!(
            "no recycle bin on {}",
            std::env::consts::OS
        )))
    } else {
        Arc::new(SystemTrash::new())
    }
}
