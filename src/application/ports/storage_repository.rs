use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::entities::{Storage, StorageVersion};
use crate::domain::value_objects::{ContentHash, OwnerId, StorageName, StorageType};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Everything `commit_version` needs to insert the version row.
#[derive(Debug, Clone)]
pub struct NewVersion {
    pub id: ContentHash,
    pub object_key_prefix: String,
    pub size_bytes: u64,
    pub file_count: u64,
    pub message: Option<String>,
    pub created_by: Option<String>,
}

/// Port owning the only writes to `Storage` and `StorageVersion`.
///
/// `commit_version` is the single operation requiring atomicity: version
/// insert (no-op on conflict, so retried commits are safe) plus HEAD and
/// aggregate update in one transaction. HEAD races between commits of
/// different content resolve last-writer-wins; same-content commits are
/// idempotent and converge.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait StorageRepository: Send + Sync {
    /// Create the storage, failing with Conflict if the (owner, name,
    /// type) triple already exists
    async fn create(
        &self,
        owner_id: &OwnerId,
        name: &StorageName,
        storage_type: StorageType,
    ) -> Result<Storage, RepositoryError>;

    /// Create the storage if absent, otherwise return the existing row
    async fn create_or_get(
        &self,
        owner_id: &OwnerId,
        name: &StorageName,
        storage_type: StorageType,
    ) -> Result<Storage, RepositoryError>;

    /// Find a storage by its unique (owner, name, type) triple
    async fn find(
        &self,
        owner_id: &OwnerId,
        name: &StorageName,
        storage_type: StorageType,
    ) -> Result<Option<Storage>, RepositoryError>;

    /// Find a version by exact id
    async fn find_version(
        &self,
        storage_id: Uuid,
        version_id: &ContentHash,
    ) -> Result<Option<StorageVersion>, RepositoryError>;

    /// Versions of a storage whose id starts with `prefix` (validated hex)
    async fn find_versions_by_prefix(
        &self,
        storage_id: Uuid,
        prefix: &str,
    ) -> Result<Vec<StorageVersion>, RepositoryError>;

    /// List versions newest-first
    async fn list_versions(
        &self,
        storage_id: Uuid,
        limit: i64,
    ) -> Result<Vec<StorageVersion>, RepositoryError>;

    /// Atomically insert the version (no-op if it exists) and repoint
    /// HEAD + aggregates. Returns the stored version row, which may
    /// predate this call when the commit is a retry.
    async fn commit_version(
        &self,
        storage_id: Uuid,
        version: &NewVersion,
    ) -> Result<StorageVersion, RepositoryError>;

    /// Current HEAD version row, or None if the storage has no versions
    async fn head(&self, storage_id: Uuid) -> Result<Option<StorageVersion>, RepositoryError>;
}
