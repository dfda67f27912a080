//! Durable key-value storage backing the record store.
//!
//! # Responsibility
//! - Define the whole-value `get/set` contract the store persists through.
//! - Provide a SQLite-backed durable implementation and an in-memory one.
//!
//! # Invariants
//! - `set` replaces the entire value for a key; there are no partial writes.
//! - A missing key reads as `Ok(None)`, never as an error.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod memory;
mod sqlite;

pub use memory::MemoryKeyValueStorage;
pub use sqlite::SqliteKeyValueStorage;

pub type StorageResult<T> = Result<T, StorageError>;

/// Transport-level failure of the durable storage backend.
#[derive(Debug)]
pub enum StorageError {
    Db(DbError),
    /// Backend refused the operation (e.g. read-only or detached handle).
    Unavailable(String),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Unavailable(message) => write!(f, "storage unavailable: {message}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Whole-value key-value store, modelled on browser local storage.
pub trait KeyValueStorage {
    /// Reads the current value for `key`.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    /// Replaces the value for `key`.
    fn set(&mut self, key: &str, value: &str) -> StorageResult<()>;
}
