//! Ctrl+C handling.
//!
//! Pressing Ctrl+C sets one process-wide [`Interrupt`] flag. Catalog walking
//! stops as soon as it sees the flag and the run ends without a report. The
//! review driver checks it before each pair, stops presenting pairs, and
//! then still waits on the deletion workers it already started, so a second
//! run never races a half-finished audit log.
//!
//! ```rust,no_run
//! use dirdupes::signal::install_handler;
//!
//! let interrupt = install_handler().expect("Failed to install signal handler");
//! // Hand `interrupt.flag()` to CatalogBuilder and ReviewDriver
//! let flag = interrupt.flag();
//! ```

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

/// Process-wide interruption flag set by the Ctrl+C hook.
#[derive(Debug, Clone, Default)]
pub struct Interrupt {
    flag: Arc<AtomicBool>,
}

impl Interrupt {
    /// Whether Ctrl+C was pressed since the last [`install_handler`] call.
    #[must_use]
    pub fn requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Set the flag as the hook would.
    pub fn trigger(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// The shared flag, for components that poll it.
    #[must_use]
    pub fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }

    fn clear(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// Ctrl+C hook registration failure.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SignalError {
    #[error("could not register the Ctrl+C hook: {0}")]
    InstallFailed(String),
}

// ctrlc accepts exactly one hook per process
static HOOK: OnceLock<Result<Interrupt, SignalError>> = OnceLock::new();

/// Register the Ctrl+C hook on first use and return the shared flag, cleared.
///
/// Every `run_app` call goes through here, so a flag left set by an earlier
/// run in the same process does not leak into the next one.
///
/// # Errors
///
/// Returns `SignalError::InstallFailed` if the hook could not be registered.
pub fn install_handler() -> Result<Interrupt, SignalError> {
    let interrupt = HOOK.get_or_init(register).clone()?;
    interrupt.clear();
    Ok(interrupt)
}

fn register() -> Result<Interrupt, SignalError> {
    let interrupt = Interrupt::default();
    let hook = interrupt.clone();

    ctrlc::set_handler(move || {
        hook.trigger();
        let mut stderr = std::io::stderr();
        let _ = writeln!(stderr, "\nInterrupted. Finishing started deletions...");
        let _ = stderr.flush();
        log::info!("Ctrl+C received; stopping after the current step");
    })
    .map_err(|e| SignalError::InstallFailed(e.to_string()))?;

    log::debug!("Ctrl+C hook registered");
    Ok(interrupt)
}
