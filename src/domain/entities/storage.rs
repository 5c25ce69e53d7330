use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::StorageVersion;
use crate::domain::value_objects::{ContentHash, OwnerId, StorageName, StorageType};

/// Storage aggregate root — a named, versioned file collection.
///
/// Unique per (owner_id, name, storage_type). Created on first upload or
/// by an explicit creation call; mutated only by successful commits. HEAD,
/// size and file count always describe the version a successful commit
/// last pointed at; this core never deletes a storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Storage {
    id: Uuid,
    owner_id: OwnerId,
    name: StorageName,
    storage_type: StorageType,
    head_version_id: Option<ContentHash>,
    size_bytes: u64,
    file_count: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Storage {
    /// Create a new storage with no versions
    pub fn new(owner_id: OwnerId, name: StorageName, storage_type: StorageType) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_id,
            name,
            storage_type,
            head_version_id: None,
            size_bytes: 0,
            file_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Reconstruct from storage (e.g., database)
    #[allow(clippy::too_many_arguments)]
    pub fn reconstruct(
        id: Uuid,
        owner_id: OwnerId,
        name: StorageName,
        storage_type: StorageType,
        head_version_id: Option<ContentHash>,
        size_bytes: u64,
        file_count: u64,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            owner_id,
            name,
            storage_type,
            head_version_id,
            size_bytes,
            file_count,
            created_at,
            updated_at,
        }
    }

    /// Repoint HEAD and refresh aggregates after a committed version.
    ///
    /// Also applied when a commit confirms an already-existing version:
    /// HEAD is repointed to whichever version id was just confirmed.
    pub fn apply_commit(&mut self, version: &StorageVersion) {
        self.head_version_id = Some(version.id().clone());
        self.size_bytes = version.size_bytes();
        self.file_count = version.file_count();
        self.updated_at = Utc::now();
    }

    // Getters
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn owner_id(&self) -> &OwnerId {
        &self.owner_id
    }

    pub fn name(&self) -> &StorageName {
        &self.name
    }

    pub fn storage_type(&self) -> StorageType {
        self.storage_type
    }

    pub fn head_version_id(&self) -> Option<&ContentHash> {
        self.head_version_id.as_ref()
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    pub fn file_count(&self) -> u64 {
        self.file_count
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn create_test_storage() -> Storage {
        Storage::new(
            OwnerId::from_str("user-1").unwrap(),
            StorageName::from_str("workspace").unwrap(),
            StorageType::Volume,
        )
    }

    #[test]
    fn test_storage_new_has_no_head() {
        let storage = create_test_storage();
        assert!(storage.head_version_id().is_none());
        assert_eq!(storage.size_bytes(), 0);
        assert_eq!(storage.file_count(), 0);
    }

    #[test]
    fn test_storage_apply_commit() {
        let mut storage = create_test_storage();
        let version_id = ContentHash::from_str(&"a".repeat(64)).unwrap();
        let version = StorageVersion::new(
            version_id.clone(),
            storage.id(),
            "user-1/volume/workspace/aaaa".to_string(),
            1024,
            3,
            Some("first snapshot".to_string()),
            Some("run-1".to_string()),
        );

        storage.apply_commit(&version);

        assert_eq!(storage.head_version_id(), Some(&version_id));
        assert_eq!(storage.size_bytes(), 1024);
        assert_eq!(storage.file_count(), 3);
    }

    #[test]
    fn test_storage_apply_commit_repoints_head() {
        let mut storage = create_test_storage();
        let first = StorageVersion::new(
            ContentHash::from_str(&"a".repeat(64)).unwrap(),
            storage.id(),
            "p/a".to_string(),
            10,
            1,
            None,
            None,
        );
        let second = StorageVersion::new(
            ContentHash::from_str(&"b".repeat(64)).unwrap(),
            storage.id(),
            "p/b".to_string(),
            20,
            2,
            None,
            None,
        );

        storage.apply_commit(&first);
        storage.apply_commit(&second);

        assert_eq!(storage.head_version_id(), Some(second.id()));
        assert_eq!(storage.size_bytes(), 20);
        assert_eq!(storage.file_count(), 2);
    }
}
