//! Two-step deletion flow.
//!
//! A deletion is requested against a contact's identity, then either
//! confirmed or cancelled. The identity captured at request time is resolved
//! against the store at confirm time, so re-ordering or re-filtering the list
//! in between can never redirect the deletion to a different contact.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::contact::{Contact, ContactId};
use crate::error::{Error, Result};
use crate::storage::ContactStore;

/// State of the deletion flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeletionState {
    /// No deletion requested.
    #[default]
    Idle,
    /// Waiting for the user to confirm or cancel deleting this contact.
    PendingConfirmation(ContactId),
}

/// What a confirmed deletion did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The contact was removed.
    Deleted(Contact),
    /// The contact no longer existed. Treated as success.
    AlreadyGone(ContactId),
    /// Confirm arrived with nothing pending (e.g. a second confirm).
    NothingPending,
}

impl DeleteOutcome {
    /// Check whether the store was changed.
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        matches!(self, Self::Deleted(_))
    }
}

/// The request → confirm/cancel state machine.
#[derive(Debug, Default)]
pub struct DeletionFlow {
    state: DeletionState,
}

impl DeletionFlow {
    /// Create an idle flow.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> DeletionState {
        self.state
    }

    /// The contact awaiting confirmation, if any.
    #[must_use]
    pub fn pending(&self) -> Option<ContactId> {
        match self.state {
            DeletionState::Idle => None,
            DeletionState::PendingConfirmation(id) => Some(id),
        }
    }

    /// Ask to delete `id`. A request made while another is pending replaces it.
    pub fn request(&mut self, id: ContactId) {
        if let DeletionState::PendingConfirmation(previous) = self.state {
            debug!(%previous, %id, "Replacing pending deletion");
        }
        self.state = DeletionState::PendingConfirmation(id);
    }

    /// Abandon the pending deletion without touching the store.
    ///
    /// Returns the identity that was pending, if any.
    pub fn cancel(&mut self) -> Option<ContactId> {
        let pending = self.pending();
        self.state = DeletionState::Idle;
        if let Some(id) = pending {
            debug!(%id, "Deletion cancelled");
        }
        pending
    }

    /// Confirm the pending deletion and delete the contact now.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Persistence`] if the removal could not be made
    /// durable. The flow is idle afterwards either way.
    pub fn confirm(&mut self, store: &dyn ContactStore) -> Result<DeleteOutcome> {
        match self.take_pending() {
            Some(id) => delete_confirmed(store, id),
            None => Ok(DeleteOutcome::NothingPending),
        }
    }

    /// Confirm the pending deletion and delete the contact after `delay`.
    ///
    /// The flow returns to idle immediately; the delete runs on a one-shot
    /// timer task so input handling is never blocked. Must be called from
    /// within a tokio runtime.
    pub fn confirm_deferred(
        &mut self,
        store: Arc<dyn ContactStore>,
        delay: Duration,
    ) -> JoinHandle<Result<DeleteOutcome>> {
        let pending = self.take_pending();
        tokio::spawn(async move {
            let Some(id) = pending else {
                return Ok(DeleteOutcome::NothingPending);
            };
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            delete_confirmed(store.as_ref(), id)
        })
    }

    fn take_pending(&mut self) -> Option<ContactId> {
        let pending = self.pending();
        self.state = DeletionState::Idle;
        pending
    }
}

fn delete_confirmed(store: &dyn ContactStore, id: ContactId) -> Result<DeleteOutcome> {
    match store.delete(id) {
        Ok(contact) => Ok(DeleteOutcome::Deleted(contact)),
        Err(Error::NotFound { id }) => {
            debug!(%id, "Contact already gone");
            Ok(DeleteOutcome::AlreadyGone(id))
        }
        Err(err) => Err(err),
    }
}
