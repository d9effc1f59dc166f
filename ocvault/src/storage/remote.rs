use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;

use super::{Storage, StoreError};

/// A storage backend that talks to an external cache service over HTTP.
///
/// The protocol is a plain REST key-value surface rooted at the configured
/// base URL: `PUT {base}/cache/{key}` stores the raw body, `GET` returns it,
/// `DELETE` removes it, and 404 on either read means the key is absent.
///
/// The cache owns its own eviction; the TTL passed to [`Storage::put`] is
/// not forwarded.
#[derive(Debug, Clone)]
pub struct RemoteCacheStore {
    base_url: String,
    client: reqwest::Client,
}

impl RemoteCacheStore {
    /// Creates a new client for the cache service at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            client: reqwest::Client::new(),
        }
    }

    fn entry_url(&self, key: &str) -> String {
        format!("{}/cache/{key}", self.base_url)
    }
}

#[async_trait]
impl Storage for RemoteCacheStore {
    async fn put(
        &self,
        key: &str,
        value: String,
        _ttl: Option<Duration>,
    ) -> Result<(), StoreError> {
        let response = self
            .client
            .put(self.entry_url(key))
            .body(value)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(StoreError::RemoteStatus(response.status().as_u16()))
        }
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let response = self.client.get(self.entry_url(key)).send().await?;

        match response.status() {
            status if status.is_success() => Ok(Some(response.text().await?)),
            StatusCode::NOT_FOUND => Ok(None),
            status => Err(StoreError::RemoteStatus(status.as_u16())),
        }
    }

    async fn delete(&self, key: &str) -> Result<Option<String>, StoreError> {
        let response = self.client.delete(self.entry_url(key)).send().await?;

        match response.status() {
            status if status.is_success() => Ok(Some(response.text().await?)),
            StatusCode::NOT_FOUND => Ok(None),
            status => Err(StoreError::RemoteStatus(status.as_u16())),
        }
    }
}
