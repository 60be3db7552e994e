//! Output formatters for aggregation results.
//!
//! - [`report`]: the flat tab-separated text report
//!
//! # Example
//!
//! ```no_run
//! use dirdupes::duplicates::Aggregation;
//! use dirdupes::output::TextReport;
//! use std::path::Path;
//!
//! let aggregation = Aggregation::default();
//! TextReport::new(&aggregation)
//!     .write_file(Path::new("./file_duplicates.txt"))
//!     .unwrap();
//! ```

pub mod report;

pub use report::{ReportError, TextReport, DEFAULT_REPORT_PATH, SEPARATOR_WIDTH};
