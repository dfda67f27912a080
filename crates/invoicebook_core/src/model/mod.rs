//! Domain model for clients and invoices.
//!
//! # Responsibility
//! - Define the persisted record shapes and their JSON encoding.
//! - Define creation payloads (`New*`) and partial update payloads (`*Patch`).
//!
//! # Invariants
//! - `id` and `created_at` are assigned by the store and never carried by a patch.
//! - Invoice status only moves `unpaid -> paid`; patches cannot touch it.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

pub mod client;
pub mod invoice;

/// Integer identifier shared by both collections.
pub type RecordId = u64;

/// A record owned by one persisted collection.
pub trait Record: Clone + Serialize + DeserializeOwned {
    /// Durable storage key holding the JSON array of this record kind.
    const STORAGE_KEY: &'static str;
    /// Short label used in log events.
    const KIND: &'static str;

    fn id(&self) -> RecordId;

    /// Name of a field whose value would not survive a JSON round trip.
    fn unencodable_field(&self) -> Option<&'static str> {
        None
    }
}

/// Creation payload that becomes a record once the store stamps it.
pub trait NewRecord {
    type Record: Record;

    fn into_record(self, id: RecordId, created_at: DateTime<Utc>) -> Self::Record;
}

/// Partial update applied over an existing record.
pub trait RecordPatch<R: Record> {
    /// Overwrites supplied fields; omitted fields are retained.
    fn apply_to(self, record: &mut R);
}

/// Trims text input.
pub fn normalize_text(value: impl Into<String>) -> String {
    let value = value.into();
    let trimmed = value.trim();
    if trimmed.len() == value.len() {
        value
    } else {
        trimmed.to_string()
    }
}

/// Trims optional text input; blank text becomes `None`.
pub fn normalize_optional_text(value: Option<String>) -> Option<String> {
    value
        .map(normalize_text)
        .filter(|value| !value.is_empty())
}

// Stored arrays written by older front-ends keep blank optional fields as "".
pub(crate) fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(normalize_optional_text(value))
}
