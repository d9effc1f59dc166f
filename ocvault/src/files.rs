use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::VaultError;
use crate::storage::SharedStorage;

/// A stored file-metadata record.
///
/// Metadata fields are free-form and copied verbatim from the upload with no
/// validation; only `id`, `userId`, `date`, and `favorite` are assigned by
/// the store. Records are immutable once appended (no operation toggles
/// `favorite`) and are only ever removed wholesale by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub id: String,
    pub user_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_size: Option<u64>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compressed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compression_ratio: Option<f64>,
    /// Optional payload blob, stored inline with the record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    /// Record-creation timestamp, ISO 8601.
    pub date: String,
    pub favorite: bool,
}

/// Client-supplied fields of an upload, before the store assigns the rest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFileRecord {
    pub name: Option<String>,
    pub size: Option<u64>,
    pub original_size: Option<u64>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub compressed: Option<bool>,
    pub compression_ratio: Option<f64>,
    pub data: Option<String>,
    pub thumbnail: Option<String>,
}

fn files_key(user_id: u64) -> String {
    format!("files:{user_id}")
}

fn build_record(user_id: u64, fields: NewFileRecord) -> FileRecord {
    FileRecord {
        id: Uuid::new_v4().to_string(),
        user_id,
        name: fields.name,
        size: fields.size,
        original_size: fields.original_size,
        kind: fields.kind,
        compressed: fields.compressed,
        compression_ratio: fields.compression_ratio,
        data: fields.data,
        thumbnail: fields.thumbnail,
        date: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        favorite: false,
    }
}

/// Per-user ordered collection of [`FileRecord`]s.
///
/// The persistence unit is the whole sequence: every mutation loads the full
/// JSON array under `files:{userId}`, edits it, and writes it back. There is
/// no locking or compare-and-swap, so two concurrent writers to the same
/// user's list can lose the first write. That matches the original service
/// and is kept as documented behavior.
#[derive(Clone)]
pub struct FileRecordStore {
    backend: Option<SharedStorage>,
}

impl FileRecordStore {
    /// Creates a file-record store over the given backend.
    pub fn new(backend: SharedStorage) -> Self {
        FileRecordStore {
            backend: Some(backend),
        }
    }

    /// Creates a degraded-mode store with no backend: lists are always
    /// empty and appended records are not persisted.
    pub fn degraded() -> Self {
        FileRecordStore { backend: None }
    }

    async fn load(&self, user_id: u64) -> Result<Vec<FileRecord>, VaultError> {
        let Some(backend) = &self.backend else {
            return Ok(Vec::new());
        };
        match backend.get(&files_key(user_id)).await? {
            Some(payload) => Ok(serde_json::from_str(&payload)?),
            None => Ok(Vec::new()),
        }
    }

    async fn persist(&self, user_id: u64, files: &[FileRecord]) -> Result<(), VaultError> {
        if let Some(backend) = &self.backend {
            let payload = serde_json::to_string(files)?;
            backend.put(&files_key(user_id), payload, None).await?;
        }
        Ok(())
    }

    /// Returns the user's full stored sequence, in append order.
    ///
    /// # Errors
    ///
    /// Returns a [`VaultError::Store`] if the backend read fails or the
    /// stored sequence cannot be decoded.
    pub async fn list(&self, user_id: u64) -> Result<Vec<FileRecord>, VaultError> {
        self.load(user_id).await
    }

    /// Builds a record from the upload fields, appends it to the user's
    /// sequence, and persists the sequence back.
    ///
    /// In degraded mode the record is still built and returned, but nothing
    /// is persisted, mirroring the original no-store path.
    ///
    /// # Errors
    ///
    /// Returns a [`VaultError::Store`] if loading or writing the sequence
    /// fails.
    pub async fn append(
        &self,
        user_id: u64,
        fields: NewFileRecord,
    ) -> Result<FileRecord, VaultError> {
        let record = build_record(user_id, fields);

        let mut files = self.load(user_id).await?;
        files.push(record.clone());
        self.persist(user_id, &files).await?;

        Ok(record)
    }

    /// Removes the first record matching `file_id` from the user's sequence
    /// and returns it; the rest keep their relative order.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::FileNotFound`] if no record has that id, or a
    /// [`VaultError::Store`] if loading or writing the sequence fails.
    pub async fn remove(&self, user_id: u64, file_id: &str) -> Result<FileRecord, VaultError> {
        let mut files = self.load(user_id).await?;

        let position = files
            .iter()
            .position(|file| file.id == file_id)
            .ok_or(VaultError::FileNotFound)?;
        let removed = files.remove(position);

        self.persist(user_id, &files).await?;
        Ok(removed)
    }
}
