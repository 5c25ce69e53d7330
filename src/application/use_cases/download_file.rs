use std::str::FromStr;
use std::sync::Arc;

use bytes::Bytes;
use tracing::debug;

use crate::application::errors::DownloadError;
use crate::application::object_keys;
use crate::application::ports::{ObjectStore, PresignedUrl, StorageRepository};
use crate::application::use_cases::ResolveVersionUseCase;
use crate::domain::entities::{Storage, StorageVersion};
use crate::domain::value_objects::{OwnerId, StorageName, StorageType};
use crate::{archive, domain::manifest::Manifest};

/// Use case: download from a version — either one file pulled selectively
/// out of the archive, or a presigned GET URL for the whole archive.
///
/// The version reference may be an exact id, a unique prefix, or absent
/// (HEAD). Single-file retrieval parses the archive directly instead of
/// unpacking everything; `path` and `./path` name the same entry.
pub struct DownloadFileUseCase {
    repository: Arc<dyn StorageRepository>,
    object_store: Arc<dyn ObjectStore>,
    resolver: ResolveVersionUseCase,
}

impl DownloadFileUseCase {
    pub fn new(repository: Arc<dyn StorageRepository>, object_store: Arc<dyn ObjectStore>) -> Self {
        let resolver = ResolveVersionUseCase::new(Arc::clone(&repository));
        Self {
            repository,
            object_store,
            resolver,
        }
    }

    /// Fetch one file's bytes from a version's archive.
    pub async fn get_file(
        &self,
        owner_id: &str,
        storage_name: &str,
        storage_type: &str,
        version_ref: Option<&str>,
        path: &str,
    ) -> Result<Bytes, DownloadError> {
        let (_, version) = self
            .locate(owner_id, storage_name, storage_type, version_ref)
            .await?;

        let archive_key = object_keys::archive_key(version.object_key_prefix());
        let archive_bytes = self.object_store.get(&archive_key).await?;
        debug!(
            version = version.id().short(),
            archive_size = archive_bytes.len(),
            "archive fetched for selective extraction"
        );

        archive::extract_file(&archive_bytes, path)
            .ok_or_else(|| DownloadError::FileNotFound(path.to_string()))
    }

    /// Presigned GET URL for a version's whole archive.
    pub async fn archive_url(
        &self,
        owner_id: &str,
        storage_name: &str,
        storage_type: &str,
        version_ref: Option<&str>,
        ttl_secs: u64,
    ) -> Result<PresignedUrl, DownloadError> {
        let (_, version) = self
            .locate(owner_id, storage_name, storage_type, version_ref)
            .await?;
        let archive_key = object_keys::archive_key(version.object_key_prefix());
        Ok(self.object_store.presign_get(&archive_key, ttl_secs).await?)
    }

    /// Fetch and parse a version's manifest.
    pub async fn get_manifest(
        &self,
        owner_id: &str,
        storage_name: &str,
        storage_type: &str,
        version_ref: Option<&str>,
    ) -> Result<Manifest, DownloadError> {
        let (_, version) = self
            .locate(owner_id, storage_name, storage_type, version_ref)
            .await?;
        let manifest_key = object_keys::manifest_key(version.object_key_prefix());
        let bytes = self.object_store.get(&manifest_key).await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            DownloadError::ObjectStore(crate::application::ports::ObjectStoreError::Internal(
                format!("manifest unreadable: {e}"),
            ))
        })
    }

    async fn locate(
        &self,
        owner_id: &str,
        storage_name: &str,
        storage_type: &str,
        version_ref: Option<&str>,
    ) -> Result<(Storage, StorageVersion), DownloadError> {
        let owner_id = OwnerId::from_str(owner_id)
            .map_err(|e| DownloadError::Resolve(resolve_not_found(e.to_string())))?;
        let name = StorageName::from_str(storage_name)
            .map_err(|e| DownloadError::Resolve(resolve_not_found(e.to_string())))?;
        let storage_type = StorageType::from_str(storage_type)
            .map_err(|e| DownloadError::Resolve(resolve_not_found(e.to_string())))?;

        let storage = self
            .repository
            .find(&owner_id, &name, storage_type)
            .await?
            .ok_or_else(|| DownloadError::Resolve(resolve_not_found(format!("storage {name}"))))?;

        let version = self.resolver.execute(&storage, version_ref).await?;
        Ok((storage, version))
    }
}

fn resolve_not_found(what: String) -> crate::application::errors::ResolveError {
    crate::application::errors::ResolveError::NotFound(what)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{MockObjectStore, MockStorageRepository};
    use crate::archive::{build_archive, ArchiveFile};
    use crate::domain::value_objects::ContentHash;
    use chrono::Utc;

    fn storage() -> Storage {
        Storage::new(
            OwnerId::from_str("user-1").unwrap(),
            StorageName::from_str("workspace").unwrap(),
            StorageType::Volume,
        )
    }

    fn version(storage_id: uuid::Uuid) -> StorageVersion {
        StorageVersion::new(
            ContentHash::from_str(&"a".repeat(64)).unwrap(),
            storage_id,
            format!("user-1/volume/workspace/{}", "a".repeat(64)),
            6,
            1,
            None,
            None,
        )
    }

    #[tokio::test]
    async fn test_get_file_from_head() {
        let stored = storage();
        let head = version(stored.id());

        let mut repo = MockStorageRepository::new();
        repo.expect_find()
            .times(1)
            .returning(move |_, _, _| Ok(Some(stored.clone())));
        repo.expect_head()
            .times(1)
            .returning(move |_| Ok(Some(head.clone())));

        let archive = build_archive(&[ArchiveFile {
            path: "./AGENTS.md".to_string(),
            content: Bytes::from_static(b"agents"),
        }])
        .unwrap();
        let mut store = MockObjectStore::new();
        store
            .expect_get()
            .times(1)
            .withf(|key| key.ends_with("/archive.tar.gz"))
            .returning(move |_| Ok(archive.clone()));

        let use_case = DownloadFileUseCase::new(Arc::new(repo), Arc::new(store));
        let bytes = use_case
            .get_file("user-1", "workspace", "volume", None, "AGENTS.md")
            .await
            .unwrap();
        assert_eq!(bytes, Bytes::from_static(b"agents"));
    }

    #[tokio::test]
    async fn test_get_file_missing_path() {
        let stored = storage();
        let head = version(stored.id());

        let mut repo = MockStorageRepository::new();
        repo.expect_find()
            .times(1)
            .returning(move |_, _, _| Ok(Some(stored.clone())));
        repo.expect_head()
            .times(1)
            .returning(move |_| Ok(Some(head.clone())));

        let archive = build_archive(&[]).unwrap();
        let mut store = MockObjectStore::new();
        store.expect_get().returning(move |_| Ok(archive.clone()));

        let use_case = DownloadFileUseCase::new(Arc::new(repo), Arc::new(store));
        let err = use_case
            .get_file("user-1", "workspace", "volume", None, "missing.txt")
            .await
            .unwrap_err();
        assert!(matches!(err, DownloadError::FileNotFound(_)));
    }

    #[tokio::test]
    async fn test_archive_url_uses_version_prefix() {
        let stored = storage();
        let target = version(stored.id());
        let expected_key = object_keys::archive_key(target.object_key_prefix());

        let mut repo = MockStorageRepository::new();
        repo.expect_find()
            .times(1)
            .returning(move |_, _, _| Ok(Some(stored.clone())));
        repo.expect_find_version()
            .times(1)
            .returning(move |_, _| Ok(Some(target.clone())));

        let mut store = MockObjectStore::new();
        let key_check = expected_key.clone();
        store
            .expect_presign_get()
            .times(1)
            .withf(move |key, ttl| key == key_check && *ttl == 600)
            .returning(|key, _| {
                Ok(PresignedUrl {
                    url: format!("https://objects.test/{key}"),
                    expires_at: Utc::now(),
                })
            });

        let use_case = DownloadFileUseCase::new(Arc::new(repo), Arc::new(store));
        let full_id = "a".repeat(64);
        let url = use_case
            .archive_url("user-1", "workspace", "volume", Some(&full_id), 600)
            .await
            .unwrap();
        assert!(url.url.contains("archive.tar.gz"));
    }

    #[tokio::test]
    async fn test_unknown_storage_is_not_found() {
        let mut repo = MockStorageRepository::new();
        repo.expect_find().times(1).returning(|_, _, _| Ok(None));
        let store = MockObjectStore::new();

        let use_case = DownloadFileUseCase::new(Arc::new(repo), Arc::new(store));
        let err = use_case
            .get_file("user-1", "workspace", "volume", None, "a.txt")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DownloadError::Resolve(crate::application::errors::ResolveError::NotFound(_))
        ));
    }
}
