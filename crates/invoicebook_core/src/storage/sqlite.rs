//! SQLite-backed durable key-value storage.
//!
//! # Invariants
//! - Entries live in the `kv_entries` table created by migration 1.
//! - Each `set` is a single upsert statement, so a key is either fully
//!   replaced or untouched.

use super::{KeyValueStorage, StorageResult};
use crate::db::{open_db, open_db_in_memory};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// Durable storage over one migrated SQLite connection.
pub struct SqliteKeyValueStorage {
    conn: Connection,
}

impl SqliteKeyValueStorage {
    /// Opens (creating when missing) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let conn = open_db(path)?;
        Ok(Self { conn })
    }

    /// Opens a private in-memory database. Contents vanish on drop.
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = open_db_in_memory()?;
        Ok(Self { conn })
    }
}

impl KeyValueStorage for SqliteKeyValueStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO kv_entries (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }
}
