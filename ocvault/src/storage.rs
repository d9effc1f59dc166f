use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

#[cfg(feature = "memory-storage")]
pub mod memory;
#[cfg(feature = "remote-storage")]
pub mod remote;
#[cfg(feature = "sled-storage")]
pub mod sled;

/// A shared, backend-erased storage handle as held by the stores.
pub type SharedStorage = Arc<dyn Storage>;

/// Error type shared by all storage backends.
///
/// Backends fail for different reasons (embedded database errors, codec
/// errors, HTTP transport errors), but callers only ever propagate the
/// failure, so one concrete enum covers all of them.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[cfg(feature = "sled-storage")]
    #[error("sled error: {0}")]
    Sled(#[from] ::sled::Error),
    #[cfg(feature = "sled-storage")]
    #[error("envelope codec error: {0}")]
    Codec(#[from] postcard::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[cfg(feature = "remote-storage")]
    #[error("cache request error: {0}")]
    Http(#[from] reqwest::Error),
    #[cfg(feature = "remote-storage")]
    #[error("cache responded with status {0}")]
    RemoteStatus(u16),
}

/// A trait defining a pluggable storage backend.
///
/// All persisted payloads in the vault are JSON text, so operations are
/// defined over string keys and string values. The backend is chosen once at
/// configuration time and shared behind [`SharedStorage`]; implementations
/// must therefore take `&self` and be safe to call concurrently.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Stores the given key-value pair, replacing any previous value.
    ///
    /// `ttl` is honored only by TTL-capable backends; the others ignore it
    /// and keep the entry until it is deleted or the process restarts.
    async fn put(&self, key: &str, value: String, ttl: Option<Duration>)
    -> Result<(), StoreError>;

    /// Retrieves the value associated with the given key.
    ///
    /// Missing keys and expired entries both read as `None`.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Removes the value associated with the given key, returning the
    /// previous live value if there was one.
    async fn delete(&self, key: &str) -> Result<Option<String>, StoreError>;
}
