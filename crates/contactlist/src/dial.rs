//! Dial capability.
//!
//! Calling a contact hands a `tel://` address to the host and returns
//! immediately. Nothing is awaited and nothing is reported back: an address
//! the host cannot use is dropped silently.

use std::sync::Mutex;

use tracing::{debug, warn};
use url::Url;

/// Address prefix used when none is configured.
pub const DEFAULT_SCHEME: &str = "tel://";

/// Host-side hand-off for call addresses.
///
/// Implementors pass the address to whatever the platform uses to start a
/// call (a URL opener, a softphone, ...).
pub trait Dialer: Send + Sync {
    /// The name of this dialer (for logging/debugging).
    fn name(&self) -> &'static str;

    /// Hand `address` to the host.
    ///
    /// # Errors
    ///
    /// Returns a description of the failure if the host rejected the address.
    fn dial(&self, address: &str) -> Result<(), String>;
}

/// Build the call address for a number.
///
/// The number is prefixed with `scheme` and otherwise left untouched.
/// Returns `None` if the result does not parse as a URL.
#[must_use]
pub fn call_address(scheme: &str, number: &str) -> Option<String> {
    let address = format!("{scheme}{number}");
    match Url::parse(&address) {
        Ok(_) => Some(address),
        Err(e) => {
            debug!(number, error = %e, "Number is not dialable");
            None
        }
    }
}

/// Start a call to `number`. Best effort, fire-and-forget.
///
/// Malformed numbers are ignored and host failures are only logged.
pub fn initiate_call(dialer: &dyn Dialer, scheme: &str, number: &str) {
    let Some(address) = call_address(scheme, number) else {
        return;
    };

    debug!(dialer = dialer.name(), %address, "Initiating call");
    if let Err(message) = dialer.dial(&address) {
        warn!(dialer = dialer.name(), %address, "Call hand-off failed: {}", message);
    }
}

/// A dialer that only remembers the addresses it was given.
///
/// Used for dry runs and tests.
#[derive(Debug, Default)]
pub struct RecordingDialer {
    addresses: Mutex<Vec<String>>,
}

impl RecordingDialer {
    /// Create an empty recording dialer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every address handed to this dialer, oldest first.
    #[must_use]
    pub fn addresses(&self) -> Vec<String> {
        self.addresses
            .lock()
            .map(|addresses| addresses.clone())
            .unwrap_or_default()
    }
}

impl Dialer for RecordingDialer {
    fn name(&self) -> &'static str {
        "recording"
    }

    fn dial(&self, address: &str) -> Result<(), String> {
        self.addresses
            .lock()
            .map_err(|_| "recording dialer lock poisoned".to_string())?
            .push(address.to_string());
        Ok(())
    }
}
