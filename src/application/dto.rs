use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::application::ports::PresignedUrl;
use crate::domain::entities::{Storage, StorageVersion};
use crate::domain::value_objects::{ContentHash, FileEntry};

/// Request to prepare an upload for a prospective version
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrepareRequest {
    pub owner_id: String,
    pub storage_name: String,
    pub storage_type: String,
    pub files: Vec<FileEntryDto>,
    pub created_by: Option<String>,
}

/// A file entry on the wire (path + hash + size)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileEntryDto {
    pub path: String,
    pub hash: String,
    pub size: u64,
}

impl From<&FileEntry> for FileEntryDto {
    fn from(entry: &FileEntry) -> Self {
        Self {
            path: entry.path.clone(),
            hash: entry.hash.as_hex().to_string(),
            size: entry.size,
        }
    }
}

/// Presigned write targets for a pending upload
#[derive(Debug, Clone)]
pub struct UploadTargets {
    pub archive: PresignedUrl,
    pub manifest: PresignedUrl,
}

/// Outcome of the prepare phase.
///
/// `uploads` is None exactly when the version already exists (the dedup
/// short-circuit): the flow then terminates with a single commit call and
/// no object-store interaction.
#[derive(Debug, Clone)]
pub struct PrepareResponse {
    pub version_id: ContentHash,
    pub existing: bool,
    pub session_token: String,
    pub uploads: Option<UploadTargets>,
}

/// Request to commit a prepared upload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitRequest {
    pub owner_id: String,
    pub storage_name: String,
    pub storage_type: String,
    pub session_token: String,
    pub message: Option<String>,
    pub created_by: Option<String>,
}

/// Version summary returned by commit and resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionSummary {
    pub version_id: String,
    pub storage_id: String,
    pub size: u64,
    pub file_count: u64,
    pub message: Option<String>,
    pub created_by: Option<String>,
    pub created_at: String,
}

impl From<&StorageVersion> for VersionSummary {
    fn from(version: &StorageVersion) -> Self {
        Self {
            version_id: version.id().to_string(),
            storage_id: version.storage_id().to_string(),
            size: version.size_bytes(),
            file_count: version.file_count(),
            message: version.message().map(|m| m.to_string()),
            created_by: version.created_by().map(|c| c.to_string()),
            created_at: version.created_at().to_rfc3339(),
        }
    }
}

/// Storage summary for creation and lookup responses
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageSummary {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub storage_type: String,
    pub head_version_id: Option<String>,
    pub size: u64,
    pub file_count: u64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Storage> for StorageSummary {
    fn from(storage: &Storage) -> Self {
        Self {
            id: storage.id().to_string(),
            owner_id: storage.owner_id().to_string(),
            name: storage.name().to_string(),
            storage_type: storage.storage_type().to_string(),
            head_version_id: storage.head_version_id().map(|h| h.to_string()),
            size: storage.size_bytes(),
            file_count: storage.file_count(),
            created_at: storage.created_at().to_rfc3339(),
            updated_at: storage.updated_at().to_rfc3339(),
        }
    }
}

/// A file's metadata plus its content bytes, as fed to the blob uploader
#[derive(Debug, Clone)]
pub struct FileBlob {
    pub entry: FileEntry,
    pub content: Bytes,
}

/// Dedup outcome of a blob upload batch. Counts are observability, not
/// correctness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobUploadReport {
    pub new_count: usize,
    pub existing_count: usize,
    pub hashes: Vec<ContentHash>,
}
