use std::str::FromStr;
use std::sync::Arc;

use crate::application::dto::{StorageSummary, VersionSummary};
use crate::application::errors::StorageOpError;
use crate::application::ports::StorageRepository;
use crate::domain::value_objects::{OwnerId, StorageName, StorageType};

const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 200;

/// Use case: look up a storage and list its version history newest-first.
pub struct ListVersionsUseCase {
    repository: Arc<dyn StorageRepository>,
}

impl ListVersionsUseCase {
    pub fn new(repository: Arc<dyn StorageRepository>) -> Self {
        Self { repository }
    }

    pub async fn get_storage(
        &self,
        owner_id: &str,
        name: &str,
        storage_type: &str,
    ) -> Result<StorageSummary, StorageOpError> {
        let (summary, _) = self.lookup(owner_id, name, storage_type).await?;
        Ok(summary)
    }

    pub async fn execute(
        &self,
        owner_id: &str,
        name: &str,
        storage_type: &str,
        limit: Option<i64>,
    ) -> Result<Vec<VersionSummary>, StorageOpError> {
        let (_, storage_id) = self.lookup(owner_id, name, storage_type).await?;
        let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let versions = self.repository.list_versions(storage_id, limit).await?;
        Ok(versions.iter().map(VersionSummary::from).collect())
    }

    async fn lookup(
        &self,
        owner_id: &str,
        name: &str,
        storage_type: &str,
    ) -> Result<(StorageSummary, uuid::Uuid), StorageOpError> {
        let owner_id = OwnerId::from_str(owner_id)?;
        let name = StorageName::from_str(name)?;
        let storage_type = StorageType::from_str(storage_type)?;

        let storage = self
            .repository
            .find(&owner_id, &name, storage_type)
            .await?
            .ok_or_else(|| StorageOpError::NotFound(name.to_string()))?;
        Ok((StorageSummary::from(&storage), storage.id()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockStorageRepository;
    use crate::domain::entities::{Storage, StorageVersion};
    use crate::domain::value_objects::ContentHash;

    fn storage() -> Storage {
        Storage::new(
            OwnerId::from_str("user-1").unwrap(),
            StorageName::from_str("workspace").unwrap(),
            StorageType::Volume,
        )
    }

    fn version(storage_id: uuid::Uuid, fill: char) -> StorageVersion {
        let id = fill.to_string().repeat(64);
        StorageVersion::new(
            ContentHash::from_str(&id).unwrap(),
            storage_id,
            format!("user-1/volume/workspace/{id}"),
            10,
            2,
            None,
            None,
        )
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let stored = storage();
        let storage_id = stored.id();
        let mut repo = MockStorageRepository::new();
        repo.expect_find()
            .times(1)
            .returning(move |_, _, _| Ok(Some(stored.clone())));
        repo.expect_list_versions()
            .times(1)
            .withf(move |id, limit| *id == storage_id && *limit == DEFAULT_LIMIT)
            .returning(move |id, _| Ok(vec![version(id, 'b'), version(id, 'a')]));

        let use_case = ListVersionsUseCase::new(Arc::new(repo));
        let listed = use_case
            .execute("user-1", "workspace", "volume", None)
            .await
            .unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed[0].version_id.starts_with('b'));
    }

    #[tokio::test]
    async fn test_limit_is_clamped() {
        let stored = storage();
        let mut repo = MockStorageRepository::new();
        repo.expect_find()
            .times(1)
            .returning(move |_, _, _| Ok(Some(stored.clone())));
        repo.expect_list_versions()
            .times(1)
            .withf(|_, limit| *limit == MAX_LIMIT)
            .returning(|_, _| Ok(Vec::new()));

        let use_case = ListVersionsUseCase::new(Arc::new(repo));
        use_case
            .execute("user-1", "workspace", "volume", Some(10_000))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_unknown_storage_not_found() {
        let mut repo = MockStorageRepository::new();
        repo.expect_find().times(1).returning(|_, _, _| Ok(None));

        let use_case = ListVersionsUseCase::new(Arc::new(repo));
        let err = use_case
            .execute("user-1", "workspace", "volume", None)
            .await
            .unwrap_err();
        assert!(matches!(err, StorageOpError::NotFound(_)));
    }
}
