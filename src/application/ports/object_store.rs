use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
#[cfg(test)]
use mockall::automock;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ObjectStoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Invalid object key: {0}")]
    InvalidKey(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Time-limited URL the caller uses to read or write an object directly,
/// bypassing the application tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresignedUrl {
    pub url: String,
    pub expires_at: DateTime<Utc>,
}

/// Port for the object store holding archives, manifests, and blobs.
///
/// Writes are not transactional and cannot be rolled back; the upload
/// protocol enforces write-before-commit ordering instead. Puts must be
/// idempotent: overwriting an existing key with identical content is
/// success, not an error.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write an object under the given key, creating or overwriting it
    async fn put(&self, key: &str, bytes: Bytes) -> Result<(), ObjectStoreError>;

    /// Read an object's full contents
    async fn get(&self, key: &str) -> Result<Bytes, ObjectStoreError>;

    /// Check whether an object exists
    async fn exists(&self, key: &str) -> Result<bool, ObjectStoreError>;

    /// Generate a presigned PUT URL valid for `ttl_secs`
    async fn presign_put(&self, key: &str, ttl_secs: u64) -> Result<PresignedUrl, ObjectStoreError>;

    /// Generate a presigned GET URL valid for `ttl_secs`
    async fn presign_get(&self, key: &str, ttl_secs: u64) -> Result<PresignedUrl, ObjectStoreError>;
}
