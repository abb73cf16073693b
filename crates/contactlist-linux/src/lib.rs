//! Linux-specific implementation for contactlist
//!
//! This crate provides Linux-specific functionality for the contactlist project.

#![cfg(target_os = "linux")]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::process::{Command, Stdio};

/// Initialize Linux-specific components
///
/// # Errors
///
/// Returns an error if initialization fails
pub fn init() -> Result<(), Box<dyn std::error::Error>> {
    Ok(())
}

/// Get platform name
#[must_use]
pub fn platform_name() -> &'static str {
    "Linux"
}

/// Hand `url` to the desktop's handler for its scheme via `xdg-open`.
///
/// # Errors
///
/// Returns an error if `url` is empty, `xdg-open` is missing, or it exits
/// with a failure status.
pub fn open_url(url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if url.trim().is_empty() {
        return Err("no URL given".into());
    }

    tracing::debug!(url, "Opening URL");
    let status = Command::new("xdg-open")
        .arg(url)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()?;

    if status.success() {
        Ok(())
    } else {
        Err(format!("xdg-open exited with {status}").into())
    }
}
