//! Handing URLs to Launch Services.
//!
//! `open(1)` passes a URL to the application registered for its scheme,
//! e.g. FaceTime for `tel:`.

use std::process::{Command, Stdio};

use thiserror::Error;

/// Errors raised while handing a URL to the system.
#[derive(Debug, Error)]
pub enum OpenError {
    /// The URL was empty.
    #[error("no URL given")]
    Empty,

    /// `open` could not be started.
    #[error("failed to run open: {0}")]
    Spawn(#[from] std::io::Error),

    /// `open` ran but reported a failure.
    #[error("open exited with {0}")]
    Failed(std::process::ExitStatus),
}

/// Result type for opener operations.
pub type Result<T> = std::result::Result<T, OpenError>;

/// Pass `url` to the application registered for its scheme.
///
/// # Errors
///
/// Returns an error if `url` is empty or `open` fails.
pub fn open_url(url: &str) -> Result<()> {
    if url.trim().is_empty() {
        return Err(OpenError::Empty);
    }

    tracing::debug!(url, "Opening URL");
    let status = Command::new("open")
        .arg(url)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()?;

    if status.success() {
        Ok(())
    } else {
        Err(OpenError::Failed(status))
    }
}
