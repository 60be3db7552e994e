//! Structured error handling and exit codes.

use serde::Serialize;

use crate::catalog::CatalogError;

/// Exit codes for the dirdupes application.
///
/// - 0: Success (completed normally, duplicates found)
/// - 1: General error (unexpected failure)
/// - 2: No duplicates found (completed normally, no duplicates)
/// - 3: Partial success (completed, but some files or folders were skipped)
/// - 130: Interrupted by user (Ctrl+C)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: duplicates were found and reported.
    Success = 0,
    /// General error: an unexpected error occurred.
    GeneralError = 1,
    /// No duplicates: the catalog was built but no name recurs across folders.
    NoDuplicates = 2,
    /// Partial success: completed but some entries could not be read.
    PartialSuccess = 3,
    /// Interrupted: the run was interrupted by user (Ctrl+C).
    Interrupted = 130,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "DD000",
            Self::GeneralError => "DD001",
            Self::NoDuplicates => "DD002",
            Self::PartialSuccess => "DD003",
            Self::Interrupted => "DD130",
        }
    }

    /// Exit code for an error that reached the top level.
    #[must_use]
    pub fn for_error(err: &anyhow::Error) -> Self {
        let interrupted = err
            .chain()
            .filter_map(|cause| cause.downcast_ref::<CatalogError>())
            .any(|e| matches!(e, CatalogError::Interrupted));
        if interrupted {
            Self::Interrupted
        } else {
            Self::GeneralError
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "DD001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message, including its causes
    pub message: String,
    /// Whether the operation was interrupted
    pub interrupted: bool,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{err:#}"),
            interrupted: exit_code == ExitCode::Interrupted,
        }
    }
}
