//! `contactlist` - A persistent contacts list
//!
//! This library provides the storage, search, confirmed deletion and dialing
//! behind a contacts list screen. Presentation is left to the caller; the
//! `contacts` binary is one such caller.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod contact;
pub mod controller;
pub mod deletion;
pub mod dial;
pub mod error;
pub mod logging;
pub mod search;
pub mod storage;

pub use config::Config;
pub use contact::{Contact, ContactDraft, ContactId};
pub use controller::{ListController, Notice, Section};
pub use deletion::{DeleteOutcome, DeletionFlow, DeletionState};
pub use dial::{initiate_call, Dialer, RecordingDialer};
pub use error::{Error, Result};
pub use logging::init_logging;
pub use storage::{ContactStore, Storage, StorageStats, StoreEvent};
