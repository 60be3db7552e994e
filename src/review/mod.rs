//! Interactive review of directory pairs.
//!
//! This module provides functionality for:
//! - Presenting each unordered directory pair once, highest overlap first
//! - Optionally opening both folders in the file browser
//! - Confirming deletion and choosing which side to delete
//! - Dispatching deletion jobs to background workers
//!
//! # Example
//!
//! ```no_run
//! use dirdupes::actions::SystemTrash;
//! use dirdupes::duplicates::Aggregation;
//! use dirdupes::review::{ConsolePrompter, ReviewDriver, SystemBrowser};
//! use std::sync::Arc;
//!
//! let aggregation = Aggregation::default();
//! let summary = ReviewDriver::new(
//!     &aggregation,
//!     ConsolePrompter::stdio(),
//!     SystemBrowser,
//!     std::io::stdout(),
//!     Arc::new(SystemTrash::new()),
//! )
//! .run();
//! println!("{} deletion jobs", summary.dispatched_jobs);
//! ```

pub mod browser;
pub mod driver;
pub mod preview;
pub mod prompt;
pub mod state;

use std::io;

use thiserror::Error;

pub use browser::{FileBrowser, SystemBrowser, BROWSER_STAGGER};
pub use driver::{ReviewConfig, ReviewDriver, ReviewSummary};
pub use preview::{FileStat, PairPreview, PreviewRow, DISPLAY_CAP};
pub use prompt::{parse_confirmation, ConsolePrompter, Prompter};
pub use state::{PairReview, ReviewState, Side};

/// Errors that end a review session early.
#[derive(Debug, Error)]
pub enum ReviewError {
    /// Operator input or review output failed.
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),

    /// Ctrl+C arrived while the operator was answering a prompt.
    #[error("review interrupted")]
    Interrupted,

    /// A pair was moved to a state its current state cannot reach.
    #[error("invalid review transition from {from} to {to}")]
    InvalidTransition {
        from: ReviewState,
        to: ReviewState,
    },
}
