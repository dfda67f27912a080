//! In-memory key-value storage for tests and throwaway sessions.

use super::{KeyValueStorage, StorageError, StorageResult};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Map-backed storage. Clones share the same entries, so dropping a store
/// and opening a new one on a clone behaves like reopening a browser tab.
#[derive(Debug, Clone, Default)]
pub struct MemoryKeyValueStorage {
    entries: Arc<Mutex<BTreeMap<String, String>>>,
    read_only: bool,
}

impl MemoryKeyValueStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a handle over the same entries that rejects every write.
    pub fn read_only(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
            read_only: true,
        }
    }

    /// Returns a snapshot of all entries.
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.lock().map(|entries| entries.clone()).unwrap_or_default()
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, BTreeMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| StorageError::Unavailable("memory storage lock poisoned".to_string()))
    }

    fn ensure_writable(&self, key: &str) -> StorageResult<()> {
        if self.read_only {
            return Err(StorageError::Unavailable(format!(
                "read-only handle refused write to `{key}`"
            )));
        }
        Ok(())
    }
}

impl KeyValueStorage for MemoryKeyValueStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.ensure_writable(key)?;
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
