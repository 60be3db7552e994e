//! Opening folders in the platform file browser.

use std::io;
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::Duration;

/// Delay before the second window opens so it is not hidden behind the first.
pub const BROWSER_STAGGER: Duration = Duration::from_millis(500);

/// Something that can show a folder to the operator.
pub trait FileBrowser {
    /// Open `dir` without waiting for the viewer to close.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the viewer could not be launched.
    fn open(&self, dir: &Path) -> io::Result<()>;
}

/// The platform's default file browser.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemBrowser;

impl SystemBrowser {
    /// Launcher program for this platform.
    #[must_use]
    pub fn program() -> &'static str {
        if cfg!(target_os = "windows") {
            "explorer"
        } else if cfg!(target_os = "macos") {
            "open"
        } else {
            "xdg-open"
        }
    }
}

impl FileBrowser for SystemBrowser {
    fn open(&self, dir: &Path) -> io::Result<()> {
        // The child is never waited on
        Command::new(Self::program())
            .arg(dir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        log::debug!("Opened {} with {}", dir.display(), Self::program());
        Ok(())
    }
}
