//! List controller.
//!
//! Owns the search text and the rows currently rendered, derives the name
//! filter from the text, and keeps the rows in step with the store through
//! its change notifications.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast::{self, error::TryRecvError};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::contact::{Contact, ContactId};
use crate::deletion::{DeleteOutcome, DeletionFlow, DeletionState};
use crate::dial::{initiate_call, Dialer};
use crate::error::Result;
use crate::search::NameFilter;
use crate::storage::{ContactStore, StoreEvent};

/// A run of rows sharing one name, shown under that name as a heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section<'a> {
    /// The shared name.
    pub title: &'a str,
    /// Rows in list order.
    pub contacts: &'a [Contact],
}

/// A user-visible, dismissible, non-fatal message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Text to show.
    pub message: String,
}

/// Search, listing and deletion state for one contacts screen.
#[derive(Debug)]
pub struct ListController {
    store: Arc<dyn ContactStore>,
    events: broadcast::Receiver<StoreEvent>,
    search_text: String,
    filter: Option<NameFilter>,
    contacts: Vec<Contact>,
    deletion: DeletionFlow,
    notice: Option<Notice>,
}

impl ListController {
    /// Create a controller over `store` and render the unfiltered list.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial query fails.
    pub fn new(store: Arc<dyn ContactStore>) -> Result<Self> {
        let events = store.subscribe();
        let mut controller = Self {
            store,
            events,
            search_text: String::new(),
            filter: None,
            contacts: Vec::new(),
            deletion: DeletionFlow::new(),
            notice: None,
        };
        controller.refresh()?;
        Ok(controller)
    }

    /// The current search text.
    #[must_use]
    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    /// The active filter, `None` when the search text is empty.
    #[must_use]
    pub fn filter(&self) -> Option<&NameFilter> {
        self.filter.as_ref()
    }

    /// Replace the search text and re-query.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails; the search text is updated regardless.
    pub fn set_search_text(&mut self, text: impl Into<String>) -> Result<&[Contact]> {
        self.search_text = text.into();
        self.filter = NameFilter::from_search_text(&self.search_text);
        self.refresh()?;
        Ok(&self.contacts)
    }

    /// Re-query the store with the active filter.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn refresh(&mut self) -> Result<()> {
        let filter = self.filter.as_ref().map(NameFilter::text);
        self.contacts = self.store.query(filter)?;
        debug!(rows = self.contacts.len(), filter, "List refreshed");
        Ok(())
    }

    /// Apply pending store notifications, re-querying if anything changed.
    ///
    /// Returns whether the rows were refreshed.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn sync(&mut self) -> Result<bool> {
        let mut changed = false;
        loop {
            match self.events.try_recv() {
                Ok(event) => {
                    debug!(?event, "Store changed");
                    changed = true;
                }
                Err(TryRecvError::Lagged(skipped)) => {
                    debug!(skipped, "Missed store notifications");
                    changed = true;
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
        if changed {
            self.refresh()?;
        }
        Ok(changed)
    }

    /// The rows of the current render pass.
    #[must_use]
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    /// The row at `index` in the current render pass.
    #[must_use]
    pub fn contact_at(&self, index: usize) -> Option<&Contact> {
        self.contacts.get(index)
    }

    /// The rows grouped into consecutive runs with an equal name.
    #[must_use]
    pub fn sections(&self) -> Vec<Section<'_>> {
        self.contacts
            .chunk_by(|a, b| a.name == b.name)
            .map(|run| Section {
                title: &run[0].name,
                contacts: run,
            })
            .collect()
    }

    /// Start deleting the row at `index`.
    ///
    /// The row's identity is captured now; later re-queries do not change
    /// which contact a confirm removes. Returns the captured identity, or
    /// `None` if `index` is out of range.
    pub fn request_delete_at(&mut self, index: usize) -> Option<ContactId> {
        let id = self.contact_at(index)?.id;
        self.deletion.request(id);
        Some(id)
    }

    /// Start deleting the contact with the given identity.
    pub fn request_delete(&mut self, id: ContactId) {
        self.deletion.request(id);
    }

    /// State of the deletion flow.
    #[must_use]
    pub fn deletion_state(&self) -> DeletionState {
        self.deletion.state()
    }

    /// Cancel the pending deletion.
    pub fn cancel_delete(&mut self) -> Option<ContactId> {
        self.deletion.cancel()
    }

    /// Confirm the pending deletion, then bring the rows up to date.
    ///
    /// # Errors
    ///
    /// A removal that could not be persisted is recorded as the current
    /// notice and returned. The record stays in the store and in the list.
    pub fn confirm_delete(&mut self) -> Result<DeleteOutcome> {
        let result = self.deletion.confirm(self.store.as_ref());
        self.finish_delete(result)
    }

    /// Confirm the pending deletion; the contact is removed after `delay`.
    ///
    /// Hand the task's result to [`ListController::finish_delete`] once it
    /// completes. Must be called from within a tokio runtime.
    pub fn confirm_delete_deferred(
        &mut self,
        delay: Duration,
    ) -> JoinHandle<Result<DeleteOutcome>> {
        self.deletion.confirm_deferred(Arc::clone(&self.store), delay)
    }

    /// Record the result of a confirmed deletion.
    ///
    /// On success the rows are brought up to date. On failure the error
    /// becomes the current notice and is returned.
    ///
    /// # Errors
    ///
    /// Returns the deletion error, or an error if the refresh query fails.
    pub fn finish_delete(&mut self, result: Result<DeleteOutcome>) -> Result<DeleteOutcome> {
        match result {
            Ok(outcome) => {
                self.sync()?;
                Ok(outcome)
            }
            Err(err) => {
                warn!(error = %err, "Deletion failed");
                self.notice = Some(Notice {
                    message: format!("Could not delete contact: {err}"),
                });
                Err(err)
            }
        }
    }

    /// The notice to show, if any.
    #[must_use]
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Dismiss the current notice.
    pub fn dismiss_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    /// Call the contact at `index`. Does nothing if `index` is out of range.
    pub fn call_at(&self, index: usize, dialer: &dyn Dialer, scheme: &str) {
        if let Some(contact) = self.contact_at(index) {
            initiate_call(dialer, scheme, &contact.number);
        }
    }
}
