//! Record store: the single owner and writer of client/invoice collections.
//!
//! # Responsibility
//! - Load both collections once from durable storage.
//! - Assign identifiers and creation timestamps.
//! - Re-serialize the owning collection after every mutation.
//!
//! # Invariants
//! - Identifiers are never reused within a collection, even after delete.
//! - "Not found" is a sentinel (`None` / `false`), never an error.
//! - A failed write surfaces as `StoreError`; the in-memory change is kept.
//! - A record JSON cannot represent is rejected before memory changes.

use crate::model::RecordId;
use crate::storage::StorageError;
use crate::validation::ValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod collection;
pub mod record_store;

pub use collection::Collection;

pub type StoreResult<T> = Result<T, StoreError>;

/// Record store failure. Missing records are not errors.
#[derive(Debug)]
pub enum StoreError {
    /// Strict mode rejected the payload; nothing was changed or written.
    Validation(ValidationError),
    /// Writing `key` to durable storage failed.
    Persistence { key: String, source: StorageError },
    /// Encoding `key` as JSON failed.
    Serialization {
        key: String,
        source: serde_json::Error,
    },
    /// Opening durable storage failed.
    Storage(StorageError),
    /// `field` holds a value JSON cannot carry (NaN or infinity); nothing
    /// was changed or written.
    Unencodable {
        kind: &'static str,
        id: RecordId,
        field: &'static str,
    },
    /// Every identifier has been handed out for this record kind.
    IdsExhausted { kind: &'static str },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Persistence { key, source } => {
                write!(f, "failed to persist `{key}`: {source}")
            }
            Self::Serialization { key, source } => {
                write!(f, "failed to encode `{key}`: {source}")
            }
            Self::Storage(err) => write!(f, "{err}"),
            Self::Unencodable { kind, id, field } => {
                write!(f, "{kind} {id} has a non-finite `{field}`")
            }
            Self::IdsExhausted { kind } => write!(f, "no {kind} identifiers left"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Persistence { source, .. } => Some(source),
            Self::Serialization { source, .. } => Some(source),
            Self::Storage(err) => Some(err),
            Self::Unencodable { .. } | Self::IdsExhausted { .. } => None,
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StorageError> for StoreError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}
