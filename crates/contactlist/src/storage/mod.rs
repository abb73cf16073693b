//! Storage layer for contactlist.
//!
//! This module provides `SQLite`-based persistent storage for contacts,
//! including name-filtered sorted queries and change notifications.

pub mod migrations;
pub mod schema;

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::contact::{Contact, ContactDraft, ContactId};
use crate::error::{Error, Result};
use crate::search::{fold, NameFilter};

/// Capacity of the change notification channel.
const EVENT_CAPACITY: usize = 64;

/// Columns selected for every contact read, in `row_to_contact` order.
const CONTACT_COLUMNS: &str = "id, name, second_name, number, created_at";

/// A change committed to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    /// A contact was inserted.
    Inserted(ContactId),
    /// A contact was deleted.
    Deleted(ContactId),
}

/// Handle to a persistent contact collection.
///
/// Components receive the store explicitly (usually as
/// `Arc<dyn ContactStore>`) rather than reaching for shared global state.
pub trait ContactStore: Send + Sync + fmt::Debug {
    /// Contacts whose name contains `filter` (case- and diacritic-insensitive),
    /// or every contact when `filter` is `None`, ordered ascending by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    fn query(&self, filter: Option<&str>) -> Result<Vec<Contact>>;

    /// Insert a new contact with a freshly assigned identity.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Persistence`] if the write cannot be made durable.
    fn insert(&self, draft: &ContactDraft) -> Result<Contact>;

    /// Delete the contact with the given identity, returning it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no such contact exists and
    /// [`Error::Persistence`] if the removal cannot be made durable.
    fn delete(&self, id: ContactId) -> Result<Contact>;

    /// Look up a single contact.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    fn get(&self, id: ContactId) -> Result<Option<Contact>>;

    /// Subscribe to change notifications for successful inserts and deletes.
    fn subscribe(&self) -> broadcast::Receiver<StoreEvent>;
}

/// Storage engine for contacts.
///
/// Every mutation runs in its own transaction; a failed write is rolled back
/// so the durable state never diverges from what callers were told. Failed
/// writes are retried `write_retries` times before the error is returned.
pub struct Storage {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Mutex<Connection>,
    /// Change notifications.
    events: broadcast::Sender<StoreEvent>,
    /// Extra attempts for a write that failed to persist.
    write_retries: u32,
}

impl fmt::Debug for Storage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Storage")
            .field("path", &self.path)
            .field("write_retries", &self.write_retries)
            .field("subscribers", &self.events.receiver_count())
            .finish_non_exhaustive()
    }
}

impl Storage {
    /// Open or create a storage database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    /// Initializes the schema if this is a new database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        // WAL keeps readers from blocking the writer
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        migrations::initialize_schema(&conn)?;

        info!("Database opened successfully at {}", path.display());
        Ok(Self::from_connection(path, conn))
    }

    /// Create an in-memory storage instance for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self::from_connection(PathBuf::from(":memory:"), conn))
    }

    fn from_connection(path: PathBuf, conn: Connection) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            path,
            conn: Mutex::new(conn),
            events,
            write_retries: 1,
        }
    }

    /// Set how many times a write that failed to persist is retried.
    #[must_use]
    pub fn with_write_retries(mut self, retries: u32) -> Self {
        self.write_retries = retries;
        self
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Count total contacts in storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn count(&self) -> Result<i64> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM contacts", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Get database statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn stats(&self) -> Result<StorageStats> {
        let total_contacts = self.count()?;

        let newest: Option<String> = self
            .lock()?
            .query_row(
                "SELECT created_at FROM contacts ORDER BY id DESC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?;
        let last_added = newest
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map(|dt| dt.with_timezone(&Utc));

        let db_size_bytes = if self.is_in_memory() {
            0
        } else {
            std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
        };

        Ok(StorageStats {
            total_contacts,
            last_added,
            db_size_bytes,
        })
    }

    fn is_in_memory(&self) -> bool {
        self.path.to_string_lossy() == ":memory:"
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| Error::internal("storage connection lock poisoned"))
    }

    fn insert_once(&self, draft: &ContactDraft, created_at: DateTime<Utc>) -> Result<ContactId> {
        let mut conn = self.lock()?;
        let tx = conn
            .transaction()
            .map_err(|e| Error::persistence("insert", e))?;

        tx.execute(
            r"
            INSERT INTO contacts (name, second_name, number, search_name, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ",
            params![
                draft.name,
                draft.second_name,
                draft.number,
                fold(&draft.name),
                created_at.to_rfc3339(),
            ],
        )
        .map_err(|e| Error::persistence("insert", e))?;

        let id = ContactId::new(tx.last_insert_rowid());
        tx.commit().map_err(|e| Error::persistence("insert", e))?;
        Ok(id)
    }

    fn delete_once(&self, id: ContactId) -> Result<Contact> {
        let mut conn = self.lock()?;
        let tx = conn
            .transaction()
            .map_err(|e| Error::persistence("delete", e))?;

        let contact = tx
            .query_row(
                &format!("SELECT {CONTACT_COLUMNS} FROM contacts WHERE id = ?1"),
                [id.get()],
                Self::row_to_contact,
            )
            .optional()?
            .ok_or_else(|| Error::not_found(id))?;

        tx.execute("DELETE FROM contacts WHERE id = ?1", [id.get()])
            .map_err(|e| Error::persistence("delete", e))?;
        tx.commit().map_err(|e| Error::persistence("delete", e))?;
        Ok(contact)
    }

    fn notify(&self, event: StoreEvent) {
        // No subscribers is not an error
        let _ = self.events.send(event);
    }

    /// Convert a database row to a Contact struct.
    fn row_to_contact(row: &rusqlite::Row) -> rusqlite::Result<Contact> {
        let id: i64 = row.get(0)?;
        let created_at_str: String = row.get(4)?;

        let created_at = DateTime::parse_from_rfc3339(&created_at_str).map_or_else(
            |_| {
                warn!(id, "Unparseable created_at: {}", created_at_str);
                DateTime::<Utc>::UNIX_EPOCH
            },
            |dt| dt.with_timezone(&Utc),
        );

        Ok(Contact {
            id: ContactId::new(id),
            name: row.get(1)?,
            second_name: row.get(2)?,
            number: row.get(3)?,
            created_at,
        })
    }
}

impl ContactStore for Storage {
    fn query(&self, filter: Option<&str>) -> Result<Vec<Contact>> {
        let conn = self.lock()?;
        let contacts = match filter.and_then(NameFilter::from_search_text) {
            Some(filter) => {
                debug!(filter = filter.text(), "Querying contacts");
                let mut stmt = conn.prepare(&format!(
                    "SELECT {CONTACT_COLUMNS} FROM contacts
                     WHERE instr(search_name, ?1) > 0
                     ORDER BY name ASC, id ASC"
                ))?;
                let rows = stmt
                    .query_map([filter.folded()], Self::row_to_contact)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                rows
            }
            None => {
                debug!("Querying all contacts");
                let mut stmt = conn.prepare(&format!(
                    "SELECT {CONTACT_COLUMNS} FROM contacts ORDER BY name ASC, id ASC"
                ))?;
                let rows = stmt
                    .query_map([], Self::row_to_contact)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                rows
            }
        };
        Ok(contacts)
    }

    fn insert(&self, draft: &ContactDraft) -> Result<Contact> {
        let created_at = Utc::now();
        let id = retry_persistence(self.write_retries, "insert", || {
            self.insert_once(draft, created_at)
        })?;

        info!(%id, name = %draft.name, "Inserted contact");
        self.notify(StoreEvent::Inserted(id));

        Ok(Contact {
            id,
            name: draft.name.clone(),
            second_name: draft.second_name.clone(),
            number: draft.number.clone(),
            created_at,
        })
    }

    fn delete(&self, id: ContactId) -> Result<Contact> {
        let contact = retry_persistence(self.write_retries, "delete", || self.delete_once(id))?;

        info!(%id, name = %contact.name, "Deleted contact");
        self.notify(StoreEvent::Deleted(id));
        Ok(contact)
    }

    fn get(&self, id: ContactId) -> Result<Option<Contact>> {
        let result = self
            .lock()?
            .query_row(
                &format!("SELECT {CONTACT_COLUMNS} FROM contacts WHERE id = ?1"),
                [id.get()],
                Self::row_to_contact,
            )
            .optional()?;
        Ok(result)
    }

    fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }
}

/// Run a write, retrying it up to `retries` more times while it fails to persist.
///
/// Only [`Error::Persistence`] is retried; every other error is returned as is.
fn retry_persistence<T>(
    retries: u32,
    operation: &'static str,
    mut write: impl FnMut() -> Result<T>,
) -> Result<T> {
    let mut attempt = 0;
    loop {
        match write() {
            Err(err) if err.is_persistence() && attempt < retries => {
                attempt += 1;
                warn!(operation, attempt, error = %err, "Write failed to persist, retrying");
            }
            result => return result,
        }
    }
}

/// Statistics about the storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageStats {
    /// Total number of contacts stored.
    pub total_contacts: i64,
    /// When the most recently added contact was created.
    pub last_added: Option<DateTime<Utc>>,
    /// Size of the database file in bytes.
    pub db_size_bytes: u64,
}
