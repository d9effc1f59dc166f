use crate::storage::StoreError;

/// Errors that can occur while serving a vault request.
///
/// Every variant is terminal for the request that raised it; nothing is
/// retried internally. The HTTP layer maps these onto status codes
/// (401 / 404 / 405 / 500).
#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    /// The request carried no token, or a token that resolves to no user.
    #[error("Unauthorized")]
    Unauthorized,
    /// Login credentials did not match the configured admin account.
    #[error("Invalid credentials")]
    InvalidCredentials,
    /// A delete referenced a file id not present in the user's list.
    #[error("File not found")]
    FileNotFound,
    /// The route exists but not for this HTTP verb.
    #[error("Method not allowed")]
    MethodNotAllowed,
    /// The backing store failed; the underlying message is surfaced to the
    /// caller in the response body.
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

impl From<serde_json::Error> for VaultError {
    fn from(e: serde_json::Error) -> Self {
        VaultError::Store(StoreError::Json(e))
    }
}
