use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::{Storage, StoreError};

/// A memory-based storage backend over a [`BTreeMap`].
///
/// Keeps all data in the process and resets on restart. Entries never
/// expire: the TTL passed to [`Storage::put`] is ignored, so a session
/// stored here outlives its nominal deadline until it is deleted.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries, for tests and diagnostics.
    pub fn len(&self) -> usize {
        self.entries.lock().expect("memory store lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl Storage for MemoryStore {
    async fn put(
        &self,
        key: &str,
        value: String,
        _ttl: Option<Duration>,
    ) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().expect("memory store lock poisoned");
        entries.insert(key.to_owned(), value);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().expect("memory store lock poisoned");
        Ok(entries.get(key).cloned())
    }

    async fn delete(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut entries = self.entries.lock().expect("memory store lock poisoned");
        Ok(entries.remove(key))
    }
}
