use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{Storage, StoreError};

/// On-disk envelope around every stored value.
///
/// Sled itself has no expiry, so the deadline travels with the value and is
/// checked on every read. Encoded with postcard to keep entries compact.
#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    /// Milliseconds since the Unix epoch after which the entry is dead.
    expires_at_ms: Option<u64>,
    value: String,
}

impl Envelope {
    fn is_expired(&self, now_ms: u64) -> bool {
        self.expires_at_ms.is_some_and(|deadline| deadline <= now_ms)
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}

/// A sled-based storage backend with per-entry TTL.
///
/// This is the TTL-capable key-value variant: entries written with a TTL
/// become unreadable once the deadline passes and are purged lazily on the
/// next read. Data survives process restarts.
#[derive(Debug, Clone)]
pub struct SledStore {
    db: sled::Db,
}

impl SledStore {
    /// Creates a temporary in-memory sled store (for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be created.
    pub fn new() -> Result<Self, StoreError> {
        let db = sled::Config::new().temporary(true).open()?;
        Ok(Self { db })
    }

    /// Opens a sled database at the specified path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self, StoreError> {
        let db = sled::open(path)?;
        Ok(Self { db })
    }

    /// Returns a reference to the underlying sled database.
    #[must_use]
    pub fn db(&self) -> &sled::Db {
        &self.db
    }

    /// Reads and decodes the envelope under `key`, if any.
    fn read_envelope(&self, key: &str) -> Result<Option<Envelope>, StoreError> {
        match self.db.get(key.as_bytes())? {
            Some(ivec) => Ok(Some(postcard::from_bytes(&ivec)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl Storage for SledStore {
    async fn put(
        &self,
        key: &str,
        value: String,
        ttl: Option<Duration>,
    ) -> Result<(), StoreError> {
        let envelope = Envelope {
            expires_at_ms: ttl.map(|ttl| now_ms() + ttl.as_millis() as u64),
            value,
        };
        let bytes = postcard::to_allocvec(&envelope)?;
        self.db.insert(key.as_bytes(), bytes)?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match self.read_envelope(key)? {
            Some(envelope) if envelope.is_expired(now_ms()) => {
                self.db.remove(key.as_bytes())?;
                Ok(None)
            }
            Some(envelope) => Ok(Some(envelope.value)),
            None => Ok(None),
        }
    }

    async fn delete(&self, key: &str) -> Result<Option<String>, StoreError> {
        match self.db.remove(key.as_bytes())? {
            Some(ivec) => {
                let envelope: Envelope = postcard::from_bytes(&ivec)?;
                if envelope.is_expired(now_ms()) {
                    Ok(None)
                } else {
                    Ok(Some(envelope.value))
                }
            }
            None => Ok(None),
        }
    }
}
