use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use ocvault::VaultError;

/// Request-level error, carrying the status mapping for [`VaultError`].
///
/// Every error renders as `{"error": message}` with permissive CORS applied
/// by the router layer.
#[derive(Debug)]
pub struct ApiError(pub VaultError);

impl From<VaultError> for ApiError {
    fn from(e: VaultError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            VaultError::Unauthorized | VaultError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            VaultError::FileNotFound => StatusCode::NOT_FOUND,
            VaultError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            VaultError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self.0, "storage failure while serving request");
        }

        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}
