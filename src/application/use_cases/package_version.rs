use std::sync::Arc;

use bytes::Bytes;
use tracing::info;

use crate::application::dto::FileBlob;
use crate::application::errors::PackageError;
use crate::application::object_keys;
use crate::application::ports::ObjectStore;
use crate::archive::{build_archive, ArchiveFile};
use crate::domain::manifest::Manifest;
use crate::domain::value_objects::{ContentHash, OwnerId, StorageName, StorageType};

/// Keys of the two objects a packaged version occupies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagedVersion {
    pub archive_key: String,
    pub manifest_key: String,
}

/// Use case: package a version's files and write them to the object
/// store.
///
/// Produces the gzip-compressed archive and the manifest for the file
/// set, then writes archive before manifest — commit treats the manifest
/// as the completeness marker, so it must land last. Used by server-side
/// packaging paths; sandbox guests instead upload the same two objects
/// through the presigned URLs from prepare.
pub struct PackageVersionUseCase {
    object_store: Arc<dyn ObjectStore>,
}

impl PackageVersionUseCase {
    pub fn new(object_store: Arc<dyn ObjectStore>) -> Self {
        Self { object_store }
    }

    pub async fn execute(
        &self,
        owner_id: &OwnerId,
        storage_type: StorageType,
        name: &StorageName,
        version_id: &ContentHash,
        files: &[FileBlob],
    ) -> Result<PackagedVersion, PackageError> {
        let archive_files: Vec<ArchiveFile> = files
            .iter()
            .map(|f| ArchiveFile {
                path: f.entry.path.clone(),
                content: f.content.clone(),
            })
            .collect();
        let archive = build_archive(&archive_files)?;

        let entries: Vec<_> = files.iter().map(|f| f.entry.clone()).collect();
        let manifest = Manifest::build(version_id.clone(), &entries);
        let manifest_bytes = serde_json::to_vec(&manifest)
            .map_err(|e| PackageError::Internal(format!("manifest serialization: {e}")))?;

        let prefix = object_keys::version_prefix(owner_id, storage_type, name, version_id);
        let archive_key = object_keys::archive_key(&prefix);
        let manifest_key = object_keys::manifest_key(&prefix);

        self.object_store.put(&archive_key, archive).await?;
        self.object_store
            .put(&manifest_key, Bytes::from(manifest_bytes))
            .await?;

        info!(
            version = version_id.short(),
            files = files.len(),
            "version packaged"
        );
        Ok(PackagedVersion {
            archive_key,
            manifest_key,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockObjectStore;
    use crate::domain::value_objects::FileEntry;
    use std::str::FromStr;
    use std::sync::Mutex;

    fn blob(path: &str, content: &'static [u8]) -> FileBlob {
        FileBlob {
            entry: FileEntry::new(
                path.to_string(),
                ContentHash::from_str(&"a".repeat(64)).unwrap(),
                content.len() as u64,
            )
            .unwrap(),
            content: Bytes::from_static(content),
        }
    }

    #[tokio::test]
    async fn test_package_writes_archive_then_manifest() {
        let mut store = MockObjectStore::new();
        let order: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&order);
        store.expect_put().times(2).returning(move |key, _| {
            seen.lock().unwrap().push(key.to_string());
            Ok(())
        });

        let use_case = PackageVersionUseCase::new(Arc::new(store));
        let packaged = use_case
            .execute(
                &OwnerId::from_str("user-1").unwrap(),
                StorageType::Artifact,
                &StorageName::from_str("output").unwrap(),
                &ContentHash::from_str(&"b".repeat(64)).unwrap(),
                &[blob("a.txt", b"aaa")],
            )
            .await
            .unwrap();

        let order = order.lock().unwrap();
        assert_eq!(order[0], packaged.archive_key);
        assert_eq!(order[1], packaged.manifest_key);
        assert!(packaged.archive_key.ends_with("/archive.tar.gz"));
        assert!(packaged.manifest_key.ends_with("/manifest.json"));
    }
}
