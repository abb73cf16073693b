//! Core contact types for contactlist.
//!
//! This module defines the records held by the store and the draft the add
//! flow supplies to create one.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stable identity of a stored contact.
///
/// Assigned by the store at insert time and never reused for another record.
/// It is independent of the contact's position in any sorted or filtered view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactId(i64);

impl ContactId {
    /// Wrap a raw row id.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// The raw row id.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ContactId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// Fields supplied by the add flow for a new contact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDraft {
    /// Display name; section key and primary sort key.
    pub name: String,
    /// Secondary display field.
    pub second_name: String,
    /// Phone-number-shaped text. Stored as given.
    pub number: String,
}

impl ContactDraft {
    /// Create a draft from its three fields.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        second_name: impl Into<String>,
        number: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            second_name: second_name.into(),
            number: number.into(),
        }
    }
}

/// A stored contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Identity assigned by the store.
    pub id: ContactId,
    /// Display name; section key and primary sort key.
    pub name: String,
    /// Secondary display field.
    pub second_name: String,
    /// Phone-number-shaped text.
    pub number: String,
    /// When the contact was added.
    pub created_at: DateTime<Utc>,
}
