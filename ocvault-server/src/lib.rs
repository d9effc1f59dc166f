//! HTTP surface for the OC Vault file-metadata store.
//!
//! The router is exposed separately from the binary so integration tests can
//! drive it in-process.

mod error;
mod routes;

pub use error::ApiError;
pub use routes::{app, AppState};
