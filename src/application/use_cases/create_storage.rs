use std::str::FromStr;
use std::sync::Arc;

use tracing::info;

use crate::application::dto::StorageSummary;
use crate::application::errors::StorageOpError;
use crate::application::ports::StorageRepository;
use crate::domain::value_objects::{OwnerId, StorageName, StorageType};

/// Use case: explicitly create a storage before its first upload.
///
/// Prepare creates storages on demand, so this exists for callers that
/// want the name reserved up front and a Conflict when it is taken.
pub struct CreateStorageUseCase {
    repository: Arc<dyn StorageRepository>,
}

impl CreateStorageUseCase {
    pub fn new(repository: Arc<dyn StorageRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(
        &self,
        owner_id: &str,
        name: &str,
        storage_type: &str,
    ) -> Result<StorageSummary, StorageOpError> {
        let owner_id = OwnerId::from_str(owner_id)?;
        let name = StorageName::from_str(name)?;
        let storage_type = StorageType::from_str(storage_type)?;

        let storage = self.repository.create(&owner_id, &name, storage_type).await?;
        info!(
            storage_id = %storage.id(),
            name = %storage.name(),
            storage_type = %storage.storage_type(),
            "storage created"
        );
        Ok(StorageSummary::from(&storage))
    }
}
