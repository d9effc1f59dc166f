//! # OC Vault
//!
//! Core library for a minimal file-metadata vault: a single-admin session
//! model and per-user ordered file-record lists, both persisted through a
//! pluggable key-value storage backend.
//!
//! ## Features
//!
//! - Interchangeable storage backends behind one [`Storage`] trait
//! - Bearer-token sessions with TTL on TTL-capable backends
//! - Degraded mode that stays usable without any configured backend
//! - Whole-sequence file-record persistence matching the original service

mod config;
mod error;
mod files;
mod session;
mod storage;

pub use config::{BackendConfig, VaultConfig, DEFAULT_ADMIN_PASSWORD, DEFAULT_ADMIN_USERNAME};
pub use error::VaultError;
pub use files::{FileRecord, FileRecordStore, NewFileRecord};
pub use session::{SessionStore, User, FALLBACK_TOKEN_PREFIX, SESSION_TTL, STORAGE_QUOTA};
pub use storage::{SharedStorage, Storage, StoreError};

#[cfg(feature = "memory-storage")]
pub use storage::memory::MemoryStore;
#[cfg(feature = "remote-storage")]
pub use storage::remote::RemoteCacheStore;
#[cfg(feature = "sled-storage")]
pub use storage::sled::SledStore;
