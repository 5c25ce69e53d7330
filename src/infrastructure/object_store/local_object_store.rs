use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{Duration, Utc};
use sha2::{Digest, Sha256};
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::application::ports::{ObjectStore, ObjectStoreError, PresignedUrl};

/// Object store backed by a local directory tree.
///
/// Keys map directly to relative paths under the root. Writes go through
/// a temp file and an atomic rename so a concurrent reader never sees a
/// partial object; overwriting an existing key is allowed and replaces it
/// atomically. Presigned URLs are `base_url/key?expires=...&signature=...`
/// with an HMAC-style signature a fronting file server can verify with
/// the shared secret.
pub struct LocalObjectStore {
    root: PathBuf,
    base_url: String,
    url_secret: String,
}

impl LocalObjectStore {
    pub fn new(root: PathBuf, base_url: String, url_secret: String) -> Self {
        Self {
            root,
            base_url: base_url.trim_end_matches('/').to_string(),
            url_secret,
        }
    }

    /// Create the root and temp directories
    pub async fn init(&self) -> Result<(), ObjectStoreError> {
        fs::create_dir_all(self.root.join("temp")).await?;
        Ok(())
    }

    fn object_path(&self, key: &str) -> Result<PathBuf, ObjectStoreError> {
        validate_key(key)?;
        Ok(self.root.join(key))
    }

    fn sign(&self, key: &str, expires: i64) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.url_secret.as_bytes());
        hasher.update(b"|");
        hasher.update(key.as_bytes());
        hasher.update(b"|");
        hasher.update(expires.to_string().as_bytes());
        hex::encode(hasher.finalize())
    }

    fn presign(&self, key: &str, ttl_secs: u64) -> Result<PresignedUrl, ObjectStoreError> {
        validate_key(key)?;
        let expires_at = Utc::now() + Duration::seconds(ttl_secs as i64);
        let expires = expires_at.timestamp();
        let signature = self.sign(key, expires);
        Ok(PresignedUrl {
            url: format!(
                "{}/{key}?expires={expires}&signature={signature}",
                self.base_url
            ),
            expires_at,
        })
    }
}

/// Keys are relative slash-separated paths; anything that could escape
/// the root is rejected.
fn validate_key(key: &str) -> Result<(), ObjectStoreError> {
    if key.is_empty() || key.starts_with('/') || key.ends_with('/') {
        return Err(ObjectStoreError::InvalidKey(key.to_string()));
    }
    for segment in key.split('/') {
        if segment.is_empty() || segment == "." || segment == ".." || segment.contains('\\') {
            return Err(ObjectStoreError::InvalidKey(key.to_string()));
        }
    }
    Ok(())
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn put(&self, key: &str, bytes: Bytes) -> Result<(), ObjectStoreError> {
        let final_path = self.object_path(key)?;
        let temp_path = self.root.join("temp").join(Uuid::new_v4().to_string());

        if let Some(parent) = final_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut file = File::create(&temp_path).await?;
        if let Err(e) = write_all_and_sync(&mut file, &bytes).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(ObjectStoreError::Io(e));
        }
        drop(file);

        if let Err(e) = fs::rename(&temp_path, &final_path).await {
            warn!(key, "rename into place failed: {e}");
            let _ = fs::remove_file(&temp_path).await;
            return Err(ObjectStoreError::Io(e));
        }

        debug!(key, size = bytes.len(), "object written");
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Bytes, ObjectStoreError> {
        let path = self.object_path(key)?;
        match fs::read(&path).await {
            Ok(bytes) => Ok(Bytes::from(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ObjectStoreError::NotFound(key.to_string()))
            }
            Err(e) => Err(ObjectStoreError::Io(e)),
        }
    }

    async fn exists(&self, key: &str) -> Result<bool, ObjectStoreError> {
        let path = self.object_path(key)?;
        Ok(fs::metadata(&path).await.is_ok())
    }

    async fn presign_put(
        &self,
        key: &str,
        ttl_secs: u64,
    ) -> Result<PresignedUrl, ObjectStoreError> {
        self.presign(key, ttl_secs)
    }

    async fn presign_get(
        &self,
        key: &str,
        ttl_secs: u64,
    ) -> Result<PresignedUrl, ObjectStoreError> {
        self.presign(key, ttl_secs)
    }
}

async fn write_all_and_sync(file: &mut File, bytes: &[u8]) -> std::io::Result<()> {
    file.write_all(bytes).await?;
    file.sync_all().await
}

/// Verify a presigned URL's query parameters against the shared secret.
/// Exposed for the fronting file server; `expires` is a unix timestamp.
pub fn verify_signature(secret: &str, key: &str, expires: i64, signature: &str) -> bool {
    if Utc::now().timestamp() > expires {
        return false;
    }
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hasher.update(b"|");
    hasher.update(key.as_bytes());
    hasher.update(b"|");
    hasher.update(expires.to_string().as_bytes());
    hex::encode(hasher.finalize()) == signature
}
