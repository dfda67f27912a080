//! One persisted, insertion-ordered record collection.

use super::{StoreError, StoreResult};
use crate::model::{NewRecord, Record, RecordId, RecordPatch};
use crate::storage::KeyValueStorage;
use chrono::Utc;
use log::{debug, error, warn};
use serde_json::Value;

/// In-memory copy of one collection plus its identifier sequence.
///
/// Every mutating method writes the whole collection back through the
/// storage handle it is given.
#[derive(Debug, Clone)]
pub struct Collection<R: Record> {
    records: Vec<R>,
    /// `None` once `RecordId::MAX` has been handed out.
    next_id: Option<RecordId>,
}

impl<R: Record> Default for Collection<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            next_id: Some(1),
        }
    }
}

impl<R: Record> Collection<R> {
    /// Storage key of the persisted identifier sequence.
    pub fn sequence_key() -> String {
        format!("{}.next_id", R::STORAGE_KEY)
    }

    /// Loads the collection, treating absent or unreadable data as empty.
    ///
    /// Malformed entries inside an otherwise valid array are skipped.
    pub fn load<S: KeyValueStorage + ?Sized>(storage: &S) -> Self {
        let records = load_records::<R, S>(storage);
        let after_max = match records.iter().map(Record::id).max() {
            Some(max) => max.checked_add(1),
            None => Some(1),
        };
        let next_id = match load_sequence(storage, &Self::sequence_key()) {
            Some(Some(persisted)) => after_max.map(|after| after.max(persisted)),
            Some(None) => None,
            None => after_max,
        };

        debug!(
            "event=collection_load module=repo status=ok kind={} count={} exhausted={}",
            R::KIND,
            records.len(),
            next_id.is_none()
        );
        Self { records, next_id }
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Identifier the next `add` will assign; `None` when ids are exhausted.
    pub fn next_id(&self) -> Option<RecordId> {
        self.next_id
    }

    /// First record with `id`.
    pub fn get(&self, id: RecordId) -> Option<&R> {
        self.records.iter().find(|record| record.id() == id)
    }

    /// Stamps `fields` with a fresh id and timestamp, appends, persists.
    ///
    /// Fails without touching memory or storage when no id is left or the
    /// record cannot be stored losslessly.
    pub fn add<N, S>(&mut self, fields: N, storage: &mut S) -> StoreResult<R>
    where
        N: NewRecord<Record = R>,
        S: KeyValueStorage + ?Sized,
    {
        let id = self
            .next_id
            .ok_or(StoreError::IdsExhausted { kind: R::KIND })?;

        let record = fields.into_record(id, Utc::now());
        ensure_encodable(&record)?;

        self.next_id = id.checked_add(1);
        self.records.push(record.clone());
        self.persist(storage)?;

        debug!(
            "event=record_add module=repo status=ok kind={} id={id}",
            R::KIND
        );
        Ok(record)
    }

    /// Shallow-merges `patch` over the record with `id`.
    pub fn update<P, S>(&mut self, id: RecordId, patch: P, storage: &mut S) -> StoreResult<Option<R>>
    where
        P: RecordPatch<R>,
        S: KeyValueStorage + ?Sized,
    {
        self.modify(id, |record| patch.apply_to(record), storage)
    }

    /// Applies `change` to the record with `id` and persists.
    ///
    /// Returns `Ok(None)` without writing when no record matches. A change
    /// that leaves the record unencodable is discarded.
    pub fn modify<S>(
        &mut self,
        id: RecordId,
        change: impl FnOnce(&mut R),
        storage: &mut S,
    ) -> StoreResult<Option<R>>
    where
        S: KeyValueStorage + ?Sized,
    {
        let Some(record) = self.records.iter_mut().find(|record| record.id() == id) else {
            debug!(
                "event=record_update module=repo status=not_found kind={} id={id}",
                R::KIND
            );
            return Ok(None);
        };
        let mut updated = record.clone();
        change(&mut updated);
        ensure_encodable(&updated)?;
        *record = updated.clone();
        self.persist(storage)?;

        debug!(
            "event=record_update module=repo status=ok kind={} id={id}",
            R::KIND
        );
        Ok(Some(updated))
    }

    /// Removes the record with `id`; returns whether one was removed.
    pub fn delete<S>(&mut self, id: RecordId, storage: &mut S) -> StoreResult<bool>
    where
        S: KeyValueStorage + ?Sized,
    {
        let Some(index) = self.records.iter().position(|record| record.id() == id) else {
            debug!(
                "event=record_delete module=repo status=not_found kind={} id={id}",
                R::KIND
            );
            return Ok(false);
        };
        self.records.remove(index);
        self.persist(storage)?;

        debug!(
            "event=record_delete module=repo status=ok kind={} id={id}",
            R::KIND
        );
        Ok(true)
    }

    /// Writes the full collection, then the identifier sequence.
    pub fn persist<S: KeyValueStorage + ?Sized>(&self, storage: &mut S) -> StoreResult<()> {
        let key = R::STORAGE_KEY;
        let encoded =
            serde_json::to_string(&self.records).map_err(|source| StoreError::Serialization {
                key: key.to_string(),
                source,
            })?;
        write_entry(storage, key, &encoded)?;
        // Losing this write is harmless: load() never goes below max id + 1.
        let sequence = self
            .next_id
            .map_or_else(|| SEQUENCE_EXHAUSTED.to_string(), |next| next.to_string());
        write_entry(storage, &Self::sequence_key(), &sequence)
    }
}

const SEQUENCE_EXHAUSTED: &str = "exhausted";

fn ensure_encodable<R: Record>(record: &R) -> StoreResult<()> {
    match record.unencodable_field() {
        Some(field) => {
            warn!(
                "event=record_check module=repo status=rejected kind={} id={} field={field}",
                R::KIND,
                record.id()
            );
            Err(StoreError::Unencodable {
                kind: R::KIND,
                id: record.id(),
                field,
            })
        }
        None => Ok(()),
    }
}

fn write_entry<S: KeyValueStorage + ?Sized>(
    storage: &mut S,
    key: &str,
    value: &str,
) -> StoreResult<()> {
    storage.set(key, value).map_err(|source| {
        error!(
            "event=persist module=repo status=error key={key} bytes={} error={source}",
            value.len()
        );
        StoreError::Persistence {
            key: key.to_string(),
            source,
        }
    })
}

fn load_records<R: Record, S: KeyValueStorage + ?Sized>(storage: &S) -> Vec<R> {
    let key = R::STORAGE_KEY;
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(err) => {
            warn!("event=collection_load module=repo status=unreadable key={key} error={err}");
            return Vec::new();
        }
    };

    let entries = match serde_json::from_str::<Vec<Value>>(&raw) {
        Ok(entries) => entries,
        Err(err) => {
            warn!("event=collection_load module=repo status=unreadable key={key} error={err}");
            return Vec::new();
        }
    };

    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value::<R>(entry) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(
                    "event=collection_load module=repo status=skipped key={key} index={index} error={err}"
                );
                None
            }
        })
        .collect()
}

/// `Some(None)` means the sequence was persisted as exhausted.
fn load_sequence<S: KeyValueStorage + ?Sized>(storage: &S, key: &str) -> Option<Option<RecordId>> {
    match storage.get(key) {
        Ok(Some(raw)) => {
            let raw = raw.trim();
            if raw == SEQUENCE_EXHAUSTED {
                Some(None)
            } else {
                raw.parse::<RecordId>().ok().map(Some)
            }
        }
        Ok(None) => None,
        Err(err) => {
            warn!("event=sequence_load module=repo status=unreadable key={key} error={err}");
            None
        }
    }
}
