//! `SQLite` schema definitions for contactlist.
//!
//! This module contains the SQL statements for creating and managing
//! the database schema.

/// SQL statement to create the contacts table.
///
/// `AUTOINCREMENT` keeps row ids from being reused after a delete, so a
/// stale identity can never resolve to a different contact.
pub const CREATE_CONTACTS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS contacts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    second_name TEXT NOT NULL DEFAULT '',
    number TEXT NOT NULL,
    search_name TEXT NOT NULL,
    created_at TEXT NOT NULL
)
";

/// SQL statement to create an index on name for sorted listing.
pub const CREATE_NAME_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_contacts_name ON contacts(name, id)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    CREATE_CONTACTS_TABLE,
    CREATE_NAME_INDEX,
    CREATE_METADATA_TABLE,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_statements_not_empty() {
        assert!(!SCHEMA_STATEMENTS.is_empty());
        for stmt in SCHEMA_STATEMENTS {
            assert!(!stmt.is_empty());
        }
    }

    #[test]
    fn test_create_contacts_table_contains_required_columns() {
        assert!(CREATE_CONTACTS_TABLE.contains("id INTEGER PRIMARY KEY AUTOINCREMENT"));
        assert!(CREATE_CONTACTS_TABLE.contains("name TEXT NOT NULL"));
        assert!(CREATE_CONTACTS_TABLE.contains("second_name TEXT NOT NULL"));
        assert!(CREATE_CONTACTS_TABLE.contains("number TEXT NOT NULL"));
        assert!(CREATE_CONTACTS_TABLE.contains("search_name TEXT NOT NULL"));
    }

    #[test]
    fn test_create_metadata_table_structure() {
        assert!(CREATE_METADATA_TABLE.contains("key TEXT PRIMARY KEY"));
        assert!(CREATE_METADATA_TABLE.contains("value TEXT NOT NULL"));
    }
}
