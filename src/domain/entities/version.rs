use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::ContentHash;

/// A committed version of a storage. Immutable once created.
///
/// The id is the content hash of the storage id and sorted file list —
/// derived, never random — which makes it both a globally unique key and
/// the deduplication token for repeated uploads of identical content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageVersion {
    id: ContentHash,
    storage_id: Uuid,
    object_key_prefix: String,
    size_bytes: u64,
    file_count: u64,
    message: Option<String>,
    created_by: Option<String>,
    created_at: DateTime<Utc>,
}

impl StorageVersion {
    pub fn new(
        id: ContentHash,
        storage_id: Uuid,
        object_key_prefix: String,
        size_bytes: u64,
        file_count: u64,
        message: Option<String>,
        created_by: Option<String>,
    ) -> Self {
        Self {
            id,
            storage_id,
            object_key_prefix,
            size_bytes,
            file_count,
            message,
            created_by,
            created_at: Utc::now(),
        }
    }

    /// Reconstruct from storage (e.g., database)
    #[allow(clippy::too_many_arguments)]
    pub fn reconstruct(
        id: ContentHash,
        storage_id: Uuid,
        object_key_prefix: String,
        size_bytes: u64,
        file_count: u64,
        message: Option<String>,
        created_by: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            storage_id,
            object_key_prefix,
            size_bytes,
            file_count,
            message,
            created_by,
            created_at,
        }
    }

    pub fn id(&self) -> &ContentHash {
        &self.id
    }

    pub fn storage_id(&self) -> Uuid {
        self.storage_id
    }

    pub fn object_key_prefix(&self) -> &str {
        &self.object_key_prefix
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    pub fn file_count(&self) -> u64 {
        self.file_count
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn created_by(&self) -> Option<&str> {
        self.created_by.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
