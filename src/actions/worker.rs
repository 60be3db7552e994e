//! Background deletion workers.
//!
//! A [`DeletionJob`] is an immutable list of file paths. Each job runs on its
//! own named thread so the review can continue while files are moved to the
//! trash. Workers share nothing with the review except the audit log file.
//!
//! # Example
//!
//! ```no_run
//! use dirdupes::actions::{DeletionJob, DeletionWorker, SystemTrash, WORKER_WAIT};
//! use std::path::PathBuf;
//! use std::sync::Arc;
//!
//! let job = DeletionJob::new(
//!     vec![PathBuf::from("/backup/a.txt")],
//!     PathBuf::from("deletion_log.log"),
//! );
//! let handle = DeletionWorker::spawn(1, job, Arc::new(SystemTrash::new())).unwrap();
//! handle.wait(WORKER_WAIT);
//! ```

use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use super::audit::AuditLog;
use super::delete::{DeleteError, TrashBackend};

/// How long the driver waits for each worker at the end of a run.
pub const WORKER_WAIT: Duration = Duration::from_secs(10 * 60);

/// The set of files to delete for one confirmed side of a pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionJob {
    /// Files to delete, in processing order.
    pub paths: Vec<PathBuf>,
    /// Audit log the worker appends to.
    pub log_path: PathBuf,
}

impl DeletionJob {
    /// Create a job.
    #[must_use]
    pub fn new(paths: Vec<PathBuf>, log_path: PathBuf) -> Self {
        Self { paths, log_path }
    }

    /// Number of files in the job.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Whether the job has no files.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Tally of one worker's run, reported through the diagnostic log only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JobTally {
    /// Files moved to the trash.
    pub deleted: usize,
    /// Files that could not be deleted.
    pub failed: usize,
    /// Audit lines that could not be written.
    pub unlogged: usize,
}

/// Result of waiting on a worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The worker finished its job.
    Finished,
    /// The wait expired; the worker was left running.
    TimedOut,
    /// The worker thread panicked.
    Panicked,
}

/// Spawns deletion jobs on background threads.
pub struct DeletionWorker;

impl DeletionWorker {
    /// Start a worker for `job`.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the operating system refuses to create the thread.
    pub fn spawn(
        id: usize,
        job: DeletionJob,
        backend: Arc<dyn TrashBackend>,
    ) -> io::Result<WorkerHandle> {
        let (done_tx, done_rx) = mpsc::channel();
        let files = job.len();

        let thread = thread::Builder::new()
            .name(format!("dirdupes-delete-{id}"))
            .spawn(move || {
                let tally = run_job(&job, backend.as_ref());
                log::debug!(
                    "Deletion worker {id} finished: {} deleted, {} failed",
                    tally.deleted,
                    tally.failed
                );
                // Receiver may already be gone if the driver stopped waiting
                let _ = done_tx.send(());
            })?;

        log::debug!("Started deletion worker {id} for {files} files");
        Ok(WorkerHandle {
            id,
            files,
            done: done_rx,
            thread,
        })
    }
}

/// Handle on a running worker.
#[derive(Debug)]
pub struct WorkerHandle {
    id: usize,
    files: usize,
    done: Receiver<()>,
    thread: JoinHandle<()>,
}

impl WorkerHandle {
    /// Worker identifier.
    #[must_use]
    pub fn id(&self) -> usize {
        self.id
    }

    /// Number of files in the worker's job.
    #[must_use]
    pub fn files(&self) -> usize {
        self.files
    }

    /// Whether the worker thread has exited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Wait at most `timeout` for the worker to finish.
    ///
    /// A worker that is still running when the wait expires is detached and
    /// keeps running until the process exits.
    #[must_use]
    pub fn wait(self, timeout: Duration) -> WaitOutcome {
        match self.done.recv_timeout(timeout) {
            // Disconnected means the thread exited without signalling
            Ok(()) | Err(RecvTimeoutError::Disconnected) => match self.thread.join() {
                Ok(()) => WaitOutcome::Finished,
                Err(_) => {
                    log::error!("Deletion worker {} panicked", self.id);
                    WaitOutcome::Panicked
                }
            },
            Err(RecvTimeoutError::Timeout) => {
                log::warn!(
                    "Deletion worker {} did not finish within {}s; abandoning it",
                    self.id,
                    timeout.as_secs()
                );
                WaitOutcome::TimedOut
            }
        }
    }
}

/// Process every file of `job`, one audit line per attempt.
///
/// If the audit log cannot be opened the job is abandoned before any file is
/// touched. A backend that fails its probe turns every file into a logged
/// failure.
pub fn run_job(job: &DeletionJob, backend: &dyn TrashBackend) -> JobTally {
    let mut tally = JobTally::default();

    let mut audit = match AuditLog::open(&job.log_path) {
        Ok(audit) => audit,
        Err(e) => {
            log::error!(
                "Cannot open deletion log {}: {e}; skipping {} files",
                job.log_path.display(),
                job.len()
            );
            return tally;
        }
    };

    let probe = backend.probe().map_err(|e| e.to_string());
    if let Err(reason) = &probe {
        log::error!("Trash backend unavailable: {reason}");
    }

    for path in &job.paths {
        let result = match &probe {
            Ok(()) => backend.move_to_trash(path),
            Err(reason) => Err(DeleteError::BackendUnavailable(reason.clone())),
        };

        let written = match &result {
            Ok(()) => {
                tally.deleted += 1;
                audit.record_success(path)
            }
            Err(e) => {
                tally.failed += 1;
                log::debug!("Failed to delete {}: {e}", path.display());
                audit.record_failure(path, &e.to_string())
            }
        };

        if let Err(e) = written {
            tally.unlogged += 1;
            log_unrecorded(audit.path(), path, result.is_ok(), &e);
        }
    }

    tally
}

fn log_unrecorded(log_path: &Path, path: &Path, deleted: bool, error: &io::Error) {
    log::error!(
        "Could not write to {} for {} ({}): {error}",
        log_path.display(),
        path.display(),
        if deleted { "deleted" } else { "not deleted" }
    );
}
