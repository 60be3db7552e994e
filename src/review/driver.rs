//! The interactive review loop.
//!
//! # Overview
//!
//! The driver walks the pair matrix once per unordered pair, highest ranked
//! directories first:
//!
//! 1. Outer loop: directories by descending dupe count
//! 2. Inner loop: that directory's partners by descending shared count
//! 3. A pair whose mirror was already presented is skipped without a prompt
//!
//! Each presented pair may end in a [`DeletionJob`] handed to a background
//! worker. The loop never waits on workers while iterating; it waits on all
//! of them, each for at most [`ReviewConfig::worker_wait`], when iteration
//! ends for any reason.

use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use yansi::Paint;

use super::browser::{FileBrowser, BROWSER_STAGGER};
use super::preview::PairPreview;
use super::prompt::Prompter;
use super::state::{PairReview, ReviewState, Side};
use super::ReviewError;
use crate::actions::{
    DeletionJob, DeletionWorker, TrashBackend, WaitOutcome, WorkerHandle, DEFAULT_LOG_PATH,
    WORKER_WAIT,
};
use crate::duplicates::Aggregation;

/// Driver settings.
#[derive(Debug, Clone)]
pub struct ReviewConfig {
    /// Audit log every worker appends to
    pub log_path: PathBuf,
    /// Delay between opening the two browser windows
    pub stagger: Duration,
    /// Bound on the final wait for each worker
    pub worker_wait: Duration,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            log_path: PathBuf::from(DEFAULT_LOG_PATH),
            stagger: BROWSER_STAGGER,
            worker_wait: WORKER_WAIT,
        }
    }
}

/// Outcome of a review session.
#[derive(Debug, Default)]
pub struct ReviewSummary {
    /// Every pair considered, in iteration order, with its final state
    pub pairs: Vec<PairReview>,
    /// Deletion jobs handed to workers
    pub dispatched_jobs: usize,
    /// Workers still running when their wait expired
    pub abandoned_workers: usize,
    /// Iteration stopped early (Ctrl+C or operator input closed)
    pub interrupted: bool,
}

impl ReviewSummary {
    /// Number of pairs that ended in `state`.
    #[must_use]
    pub fn count(&self, state: ReviewState) -> usize {
        self.pairs.iter().filter(|p| p.state() == state).count()
    }
}

/// Walks directory pairs, asks the operator, dispatches deletion jobs.
pub struct ReviewDriver<'a, P, B, W> {
    aggregation: &'a Aggregation,
    prompter: P,
    browser: B,
    output: W,
    backend: Arc<dyn TrashBackend>,
    config: ReviewConfig,
    shutdown_flag: Option<Arc<AtomicBool>>,
    visited: HashSet<(String, String)>,
    workers: Vec<WorkerHandle>,
}

impl<'a, P: Prompter, B: FileBrowser, W: Write> ReviewDriver<'a, P, B, W> {
    /// Create a driver over a finished aggregation.
    pub fn new(
        aggregation: &'a Aggregation,
        prompter: P,
        browser: B,
        output: W,
        backend: Arc<dyn TrashBackend>,
    ) -> Self {
        Self {
            aggregation,
            prompter,
            browser,
            output,
            backend,
            config: ReviewConfig::default(),
            shutdown_flag: None,
            visited: HashSet::new(),
            workers: Vec::new(),
        }
    }

    /// Replace the default settings.
    #[must_use]
    pub fn with_config(mut self, config: ReviewConfig) -> Self {
        self.config = config;
        self
    }

    /// Stop presenting pairs once `flag` is set.
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

    /// Review every pair, then wait for the dispatched workers.
    pub fn run(mut self) -> ReviewSummary {
        let mut summary = ReviewSummary::default();
        let aggregation = self.aggregation;

        'outer: for (directory, _) in aggregation.ranked_directories() {
            for (partner, shared) in aggregation.ranked_partners(directory) {
                if self.is_shutdown_requested() {
                    log::info!("Review interrupted");
                    summary.interrupted = true;
                    break 'outer;
                }

                let mut review = PairReview::new(directory, partner, shared);
                let result = self.review_pair(&mut review);
                if review.state() == ReviewState::Dispatched {
                    summary.dispatched_jobs += 1;
                }
                summary.pairs.push(review);

                if let Err(e) = result {
                    match e {
                        ReviewError::Interrupted => log::info!("Review interrupted"),
                        e => log::warn!("Review stopped: {e}"),
                    }
                    summary.interrupted = true;
                    break 'outer;
                }
            }
        }

        self.finish(&mut summary);
        summary
    }

    fn review_pair(&mut self, review: &mut PairReview) -> Result<(), ReviewError> {
        let mirror = (review.second.clone(), review.first.clone());
        if self.visited.contains(&mirror) {
            return review.advance(ReviewState::Skipped);
        }
        self.visited
            .insert((review.first.clone(), review.second.clone()));

        PairPreview::build(self.aggregation, &review.first, &review.second)
            .write_to(&mut self.output)?;
        review.advance(ReviewState::Previewed)?;

        let inspect = self
            .prompter
            .confirm("Open both folders to inspect them?")?;
        self.stop_if_interrupted(review, ReviewState::Declined)?;
        if inspect {
            self.open_both(&review.first, &review.second)?;
        }

        let delete = self
            .prompter
            .confirm("Delete the shared files from one of these folders?")?;
        self.stop_if_interrupted(review, ReviewState::Declined)?;
        if !delete {
            return review.advance(ReviewState::Declined);
        }
        review.advance(ReviewState::AwaitingTarget)?;

        let choice = self
            .prompter
            .choose_target(&review.first, &review.second)?;
        self.stop_if_interrupted(review, ReviewState::Aborted)?;
        let Some(side) = choice else {
            writeln!(self.output, "{}", "Invalid selection, nothing deleted.".yellow())?;
            return review.advance(ReviewState::Aborted);
        };
        review.target = Some(side);

        if self.dispatch(review, side)? {
            review.advance(ReviewState::Dispatched)
        } else {
            review.advance(ReviewState::Aborted)
        }
    }

    /// Ctrl+C does not interrupt a blocking read, so the flag is checked
    /// again once each answer arrives. A set flag ends the pair in `state`.
    fn stop_if_interrupted(
        &self,
        review: &mut PairReview,
        state: ReviewState,
    ) -> Result<(), ReviewError> {
        if self.is_shutdown_requested() {
            review.advance(state)?;
            return Err(ReviewError::Interrupted);
        }
        Ok(())
    }

    /// Hand the full shared-file list for `side` to a new worker.
    fn dispatch(&mut self, review: &PairReview, side: Side) -> Result<bool, ReviewError> {
        let target = review.directory(side);
        let paths = self
            .aggregation
            .shared_paths(&review.first, &review.second, target);
        let job = DeletionJob::new(paths, self.config.log_path.clone());
        let files = job.len();

        match DeletionWorker::spawn(self.workers.len() + 1, job, Arc::clone(&self.backend)) {
            Ok(handle) => {
                self.workers.push(handle);
                writeln!(
                    self.output,
                    "{} deleting {files} files from {target} in the background",
                    "==>".green().bold()
                )?;
                Ok(true)
            }
            Err(e) => {
                log::error!("Could not start deletion worker: {e}");
                writeln!(self.output, "{}", "Could not start deletion, nothing deleted.".red())?;
                Ok(false)
            }
        }
    }

    fn open_both(&mut self, first: &str, second: &str) -> Result<(), ReviewError> {
        let first_dir = self.on_disk_dir(first, second);
        let second_dir = self.on_disk_dir(second, first);

        self.open_one(&first_dir)?;
        thread::sleep(self.config.stagger);
        self.open_one(&second_dir)
    }

    fn open_one(&mut self, dir: &Path) -> Result<(), ReviewError> {
        if let Err(e) = self.browser.open(dir) {
            log::warn!("Could not open {}: {e}", dir.display());
            writeln!(
                self.output,
                "{} {}: {e}",
                "Could not open".yellow(),
                dir.display()
            )?;
        }
        Ok(())
    }

    /// Directory keys are case-folded; recover the real path from a member file.
    fn on_disk_dir(&self, directory: &str, partner: &str) -> PathBuf {
        self.aggregation
            .shared_groups(directory, partner)
            .first()
            .and_then(|&gi| self.aggregation.groups()[gi].path_in(directory))
            .and_then(|p| p.parent())
            .map_or_else(|| PathBuf::from(directory), Path::to_path_buf)
    }

    fn finish(&mut self, summary: &mut ReviewSummary) {
        if self.workers.is_empty() {
            return;
        }

        // Output may be closed here; waiting on workers still matters
        let _ = writeln!(
            self.output,
            "{} waiting for {} deletion jobs to finish",
            "==>".cyan().bold(),
            self.workers.len()
        );

        for handle in self.workers.drain(..) {
            if handle.wait(self.config.worker_wait) == WaitOutcome::TimedOut {
                summary.abandoned_workers += 1;
            }
        }

        if summary.abandoned_workers > 0 {
            log::warn!(
                "{} deletion jobs still running; see {} for their outcome",
                summary.abandoned_workers,
                self.config.log_path.display()
            );
        }
    }
}
