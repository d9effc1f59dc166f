use std::env;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, Method, StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use ocvault::{
    FileRecordStore, NewFileRecord, SessionStore, SharedStorage, User, VaultConfig, VaultError,
};

use crate::error::ApiError;

/// Shared state handed to every handler: the configured credentials and the
/// two stores, constructed once at startup over the selected backend.
#[derive(Clone)]
pub struct AppState {
    pub config: VaultConfig,
    pub sessions: SessionStore,
    pub files: FileRecordStore,
}

impl AppState {
    /// Builds the state over an optional backend; `None` means degraded
    /// mode for both stores.
    pub fn new(config: VaultConfig, backend: Option<SharedStorage>) -> Self {
        let (sessions, files) = match backend {
            Some(backend) => (
                SessionStore::new(Arc::clone(&backend)),
                FileRecordStore::new(backend),
            ),
            None => (SessionStore::degraded(), FileRecordStore::degraded()),
        };
        AppState {
            config,
            sessions,
            files,
        }
    }
}

/// Builds the `/api` router with permissive CORS and request tracing.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .route(
            "/api/auth/login",
            post(login).fallback(method_not_allowed),
        )
        .route(
            "/api/auth/logout",
            post(logout).fallback(method_not_allowed),
        )
        .route("/api/auth/me", get(me).fallback(method_not_allowed))
        .route(
            "/api/files",
            get(list_files)
                .post(upload_file)
                .fallback(method_not_allowed),
        )
        .route(
            "/api/files/:id",
            delete(delete_file).fallback(method_not_allowed),
        )
        .route("/api/debug-env", get(debug_env))
        .fallback(not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Pulls the bearer token out of the `Authorization` header, tolerating a
/// missing `Bearer ` prefix the way the original service did.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let raw = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    Some(raw.strip_prefix("Bearer ").unwrap_or(raw))
}

/// Resolves the request's token to a user or fails with 401.
async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<User, ApiError> {
    let token = bearer_token(headers).ok_or(VaultError::Unauthorized)?;
    state
        .sessions
        .resolve(token)
        .await?
        .ok_or_else(|| VaultError::Unauthorized.into())
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    username: String,
    password: String,
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if !state
        .config
        .credentials_match(&request.username, &request.password)
    {
        return Err(VaultError::InvalidCredentials.into());
    }

    let user = User::admin(&state.config.admin_username);
    let token = state.sessions.issue(&user).await?;
    tracing::info!(username = %user.username, "admin logged in");

    Ok(Json(json!({ "token": token, "user": user })))
}

/// Best-effort logout: revokes when the backend supports it and always
/// reports success, token or no token.
async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(token) = bearer_token(&headers) {
        state.sessions.revoke(token).await?;
    }
    Ok(Json(json!({ "message": "Logged out successfully" })))
}

async fn me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let user = authenticate(&state, &headers).await?;
    Ok(Json(json!({ "user": user })))
}

async fn list_files(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let user = authenticate(&state, &headers).await?;
    let files = state.files.list(user.id).await?;
    Ok(Json(json!({ "files": files })))
}

async fn upload_file(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(fields): Json<NewFileRecord>,
) -> Result<impl IntoResponse, ApiError> {
    let user = authenticate(&state, &headers).await?;
    let record = state.files.append(user.id, fields).await?;
    tracing::debug!(file_id = %record.id, user_id = user.id, "file metadata stored");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "fileId": record.id,
            "message": "File uploaded successfully",
        })),
    ))
}

async fn delete_file(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(file_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let user = authenticate(&state, &headers).await?;
    state.files.remove(user.id, &file_id).await?;
    Ok(Json(json!({ "message": "File deleted successfully" })))
}

/// Reports whether admin credentials are configured without exposing them:
/// lengths and a first/last-character hint only.
async fn debug_env() -> impl IntoResponse {
    let username = env::var("ADMIN_USERNAME").ok();
    let password = env::var("ADMIN_PASSWORD").ok();

    let username_hint = match username.as_deref() {
        Some(name) if !name.is_empty() => {
            let first = name.chars().next().unwrap_or('?');
            let last = name.chars().last().unwrap_or('?');
            format!("{first}...{last}")
        }
        _ => "NOT SET".to_owned(),
    };

    Json(json!({
        "hasAdminUsername": username.is_some(),
        "hasAdminPassword": password.is_some(),
        "usernameLength": username.as_deref().map_or(0, str::len),
        "passwordLength": password.as_deref().map_or(0, str::len),
        "usernameHint": username_hint,
    }))
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not Found" })))
}

async fn method_not_allowed() -> ApiError {
    ApiError(VaultError::MethodNotAllowed)
}
