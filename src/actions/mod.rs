//! File actions module.
//!
//! This module provides functionality for:
//! - Moving files to the trash through a pluggable backend
//! - Running deletion jobs on background workers
//! - Recording every attempt in an append-only audit log
//!
//! # Deletion
//!
//! Deletion is always recoverable: files go to the platform trash, never
//! removed permanently. Each confirmed side of a directory pair becomes one
//! [`DeletionJob`] processed by its own worker thread.
//!
//! ```no_run
//! use dirdupes::actions::{DeletionJob, DeletionWorker, SystemTrash, WaitOutcome, WORKER_WAIT};
//! use std::path::PathBuf;
//! use std::sync::Arc;
//!
//! let job = DeletionJob::new(
//!     vec![PathBuf::from("/backup/a.txt")],
//!     PathBuf::from("deletion_log.log"),
//! );
//! let handle = DeletionWorker::spawn(1, job, Arc::new(SystemTrash::new())).unwrap();
//! assert_eq!(handle.wait(WORKER_WAIT), WaitOutcome::Finished);
//! ```

pub mod audit;
pub mod delete;
pub mod worker;

// Re-export commonly used types
pub use audit::{AuditLog, DEFAULT_LOG_PATH};
pub use delete::{platform_backend, DeleteError, SystemTrash, TrashBackend, UnavailableTrash};
pub use worker::{
    run_job, DeletionJob, DeletionWorker, JobTally, WaitOutcome, WorkerHandle, WORKER_WAIT,
};
