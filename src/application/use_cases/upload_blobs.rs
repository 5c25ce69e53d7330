use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use crate::application::dto::{BlobUploadReport, FileBlob};
use crate::application::errors::BlobUploadError;
use crate::application::object_keys;
use crate::application::ports::ObjectStore;
use crate::domain::value_objects::ContentHash;

/// Use case: upload file blobs with content-addressed deduplication.
///
/// Each blob lands at most once in the object store per distinct hash,
/// regardless of how many versions or storages reference it. A process-
/// local index remembers hashes already confirmed present so repeat
/// uploads skip the existence round trip; the index is best-effort and
/// correctness never depends on it. Two concurrent callers racing on the
/// same hash both "win" — the put is an idempotent overwrite of identical
/// bytes.
pub struct UploadBlobsUseCase {
    object_store: Arc<dyn ObjectStore>,
    known_hashes: DashMap<ContentHash, ()>,
}

impl UploadBlobsUseCase {
    pub fn new(object_store: Arc<dyn ObjectStore>) -> Self {
        Self {
            object_store,
            known_hashes: DashMap::new(),
        }
    }

    pub async fn execute(&self, blobs: Vec<FileBlob>) -> Result<BlobUploadReport, BlobUploadError> {
        let mut new_count = 0;
        let mut existing_count = 0;
        let mut hashes = Vec::with_capacity(blobs.len());

        for blob in blobs {
            let hash = blob.entry.hash.clone();

            if self.known_hashes.contains_key(&hash) {
                existing_count += 1;
                hashes.push(hash);
                continue;
            }

            let key = object_keys::blob_key(&hash);
            if self.object_store.exists(&key).await? {
                debug!(blob = hash.short(), "blob already stored");
                existing_count += 1;
            } else {
                self.object_store.put(&key, blob.content).await?;
                debug!(blob = hash.short(), size = blob.entry.size, "blob uploaded");
                new_count += 1;
            }

            self.known_hashes.insert(hash.clone(), ());
            hashes.push(hash);
        }

        Ok(BlobUploadReport {
            new_count,
            existing_count,
            hashes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockObjectStore;
    use crate::domain::value_objects::FileEntry;
    use bytes::Bytes;
    use std::str::FromStr;

    fn blob(path: &str, hash_char: char, content: &'static [u8]) -> FileBlob {
        FileBlob {
            entry: FileEntry::new(
                path.to_string(),
                ContentHash::from_str(&hash_char.to_string().repeat(64)).unwrap(),
                content.len() as u64,
            )
            .unwrap(),
            content: Bytes::from_static(content),
        }
    }

    #[tokio::test]
    async fn test_upload_new_blobs() {
        let mut store = MockObjectStore::new();
        store.expect_exists().times(2).returning(|_| Ok(false));
        store.expect_put().times(2).returning(|_, _| Ok(()));

        let use_case = UploadBlobsUseCase::new(Arc::new(store));
        let report = use_case
            .execute(vec![blob("a.txt", 'a', b"aaa"), blob("b.txt", 'b', b"bbb")])
            .await
            .unwrap();

        assert_eq!(report.new_count, 2);
        assert_eq!(report.existing_count, 0);
        assert_eq!(report.hashes.len(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_hash_writes_once() {
        let mut store = MockObjectStore::new();
        // Only the first sighting of the hash hits the store at all
        store.expect_exists().times(1).returning(|_| Ok(false));
        store.expect_put().times(1).returning(|_, _| Ok(()));

        let use_case = UploadBlobsUseCase::new(Arc::new(store));
        let report = use_case
            .execute(vec![
                blob("a.txt", 'a', b"same"),
                blob("copy-of-a.txt", 'a', b"same"),
            ])
            .await
            .unwrap();

        assert_eq!(report.new_count, 1);
        assert_eq!(report.existing_count, 1);
    }

    #[tokio::test]
    async fn test_existing_count_increments_across_batches() {
        let mut store = MockObjectStore::new();
        store.expect_exists().times(1).returning(|_| Ok(false));
        store.expect_put().times(1).returning(|_, _| Ok(()));

        let use_case = UploadBlobsUseCase::new(Arc::new(store));
        let first = use_case.execute(vec![blob("a.txt", 'a', b"x")]).await.unwrap();
        let second = use_case.execute(vec![blob("a.txt", 'a', b"x")]).await.unwrap();

        assert_eq!(first.new_count, 1);
        assert_eq!(second.new_count, 0);
        assert_eq!(second.existing_count, 1);
    }

    #[tokio::test]
    async fn test_store_existing_blob_is_not_rewritten() {
        let mut store = MockObjectStore::new();
        store.expect_exists().times(1).returning(|_| Ok(true));
        store.expect_put().times(0);

        let use_case = UploadBlobsUseCase::new(Arc::new(store));
        let report = use_case.execute(vec![blob("a.txt", 'a', b"x")]).await.unwrap();

        assert_eq!(report.new_count, 0);
        assert_eq!(report.existing_count, 1);
    }
}
