use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::VaultError;
use crate::storage::SharedStorage;

/// Fixed storage quota reported for the admin account, in bytes (50 GiB).
/// Purely informational: `storage_used` is never updated against it.
pub const STORAGE_QUOTA: u64 = 53_687_091_200;

/// Lifetime of a stored session: 7 days. Only TTL-capable backends enforce
/// it; elsewhere a session lives until revoked or the process restarts.
pub const SESSION_TTL: Duration = Duration::from_secs(604_800);

/// Prefix of synthetic tokens issued in degraded mode (no backing store).
/// Any token of this shape authenticates as the hardcoded admin.
pub const FALLBACK_TOKEN_PREFIX: &str = "mock_token_";

/// The single admin identity. Not persisted as an entity of its own; a copy
/// is serialized into each session entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
    pub email: String,
    pub role: String,
    pub storage_quota: u64,
    pub storage_used: u64,
}

impl User {
    /// Builds the admin identity for the configured username.
    pub fn admin(username: &str) -> Self {
        User {
            id: 1,
            username: username.to_owned(),
            email: format!("{username}@ocvault.com"),
            role: "admin".to_owned(),
            storage_quota: STORAGE_QUOTA,
            storage_used: 0,
        }
    }

    /// The identity behind fallback tokens. Always the literal `admin`
    /// username, regardless of configuration, matching the original service.
    fn fallback_admin() -> Self {
        Self::admin("admin")
    }
}

fn session_key(token: &str) -> String {
    format!("session:{token}")
}

/// Maps bearer tokens to the authenticated admin identity.
///
/// With a configured backend, tokens are random UUIDs stored under
/// `session:{token}` with [`SESSION_TTL`]. Without one the store runs in
/// degraded mode: it issues [`FALLBACK_TOKEN_PREFIX`]-shaped tokens, stores
/// nothing, and accepts any token of that shape.
#[derive(Clone)]
pub struct SessionStore {
    backend: Option<SharedStorage>,
}

impl SessionStore {
    /// Creates a session store over the given backend.
    pub fn new(backend: SharedStorage) -> Self {
        SessionStore {
            backend: Some(backend),
        }
    }

    /// Creates a degraded-mode session store with no backend.
    pub fn degraded() -> Self {
        SessionStore { backend: None }
    }

    /// Issues a fresh token for `user` and persists the mapping.
    ///
    /// # Errors
    ///
    /// Returns a [`VaultError::Store`] if serializing the user or writing to
    /// the backend fails.
    pub async fn issue(&self, user: &User) -> Result<String, VaultError> {
        match &self.backend {
            Some(backend) => {
                let token = Uuid::new_v4().to_string();
                let payload = serde_json::to_string(user)?;
                backend
                    .put(&session_key(&token), payload, Some(SESSION_TTL))
                    .await?;
                Ok(token)
            }
            None => {
                tracing::debug!("no session backend configured, issuing fallback token");
                Ok(format!("{FALLBACK_TOKEN_PREFIX}{}", Uuid::new_v4()))
            }
        }
    }

    /// Resolves a token to its user, if it authenticates.
    ///
    /// A stored mapping wins; otherwise a token with the fallback prefix
    /// resolves to the hardcoded admin, and anything else to `None`.
    ///
    /// # Errors
    ///
    /// Returns a [`VaultError::Store`] if the backend read fails or the
    /// stored payload cannot be decoded.
    pub async fn resolve(&self, token: &str) -> Result<Option<User>, VaultError> {
        if let Some(backend) = &self.backend {
            if let Some(payload) = backend.get(&session_key(token)).await? {
                return Ok(Some(serde_json::from_str(&payload)?));
            }
        }

        if token.starts_with(FALLBACK_TOKEN_PREFIX) {
            return Ok(Some(User::fallback_admin()));
        }

        Ok(None)
    }

    /// Deletes the token's mapping if a backend is configured.
    ///
    /// In degraded mode this is a no-op and fallback tokens stay valid;
    /// there is nothing stored to delete.
    ///
    /// # Errors
    ///
    /// Returns a [`VaultError::Store`] if the backend delete fails.
    pub async fn revoke(&self, token: &str) -> Result<(), VaultError> {
        if let Some(backend) = &self.backend {
            backend.delete(&session_key(token)).await?;
        }
        Ok(())
    }
}
