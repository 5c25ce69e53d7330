use std::str::FromStr;
use std::sync::Arc;

use tracing::{info, warn};

use crate::application::dto::{CommitRequest, VersionSummary};
use crate::application::errors::CommitError;
use crate::application::object_keys;
use crate::application::ports::{NewVersion, ObjectStore, StorageRepository};
use crate::domain::manifest::Manifest;
use crate::domain::value_objects::{OwnerId, StorageName, StorageType, UploadSession};

/// Use case: commit a prepared upload — the final phase of the protocol.
///
/// Verifies the version's objects exist before touching metadata: the
/// archive and manifest must both be present (write-before-commit
/// ordering), otherwise the commit is rejected as UploadIncomplete with
/// nothing mutated. Aggregates come from the stored manifest. The metadata
/// write is a single transaction in the repository; calling commit twice
/// with the same session converges to the same stored state and returns
/// the same summary. A failed transaction leaves the object-store bytes as
/// unreferenced orphans for an external collector.
pub struct CommitVersionUseCase {
    repository: Arc<dyn StorageRepository>,
    object_store: Arc<dyn ObjectStore>,
}

impl CommitVersionUseCase {
    pub fn new(repository: Arc<dyn StorageRepository>, object_store: Arc<dyn ObjectStore>) -> Self {
        Self {
            repository,
            object_store,
        }
    }

    pub async fn execute(&self, request: CommitRequest) -> Result<VersionSummary, CommitError> {
        let owner_id = OwnerId::from_str(&request.owner_id)?;
        let name = StorageName::from_str(&request.storage_name)?;
        let storage_type = StorageType::from_str(&request.storage_type)?;
        let session = UploadSession::from_str(&request.session_token)?;

        let storage = self
            .repository
            .find(&owner_id, &name, storage_type)
            .await?
            .ok_or_else(|| CommitError::NotFound(format!("storage {name}")))?;

        let version_id = session.version_id().clone();

        if session.is_existing() {
            // Dedup commit: the row must already exist; only HEAD moves
            let existing = self
                .repository
                .find_version(storage.id(), &version_id)
                .await?
                .ok_or_else(|| {
                    CommitError::NotFound(format!("version {}", version_id.short()))
                })?;

            let committed = self
                .repository
                .commit_version(
                    storage.id(),
                    &NewVersion {
                        id: existing.id().clone(),
                        object_key_prefix: existing.object_key_prefix().to_string(),
                        size_bytes: existing.size_bytes(),
                        file_count: existing.file_count(),
                        message: existing.message().map(|m| m.to_string()),
                        created_by: existing.created_by().map(|c| c.to_string()),
                    },
                )
                .await?;

            info!(
                storage = %name,
                version = version_id.short(),
                "HEAD repointed to existing version"
            );
            return Ok(VersionSummary::from(&committed));
        }

        let prefix = object_keys::version_prefix(&owner_id, storage_type, &name, &version_id);
        let archive_key = object_keys::archive_key(&prefix);
        let manifest_key = object_keys::manifest_key(&prefix);

        // Write-before-commit: both objects must exist before any metadata
        // becomes reachable. Manifest-without-archive is incomplete too.
        if !self.object_store.exists(&archive_key).await? {
            warn!(storage = %name, version = version_id.short(), "archive missing at commit");
            return Err(CommitError::UploadIncomplete(format!(
                "archive not uploaded for version {}",
                version_id.short()
            )));
        }
        if !self.object_store.exists(&manifest_key).await? {
            warn!(storage = %name, version = version_id.short(), "manifest missing at commit");
            return Err(CommitError::UploadIncomplete(format!(
                "manifest not uploaded for version {}",
                version_id.short()
            )));
        }

        let manifest_bytes = self.object_store.get(&manifest_key).await?;
        let manifest: Manifest = serde_json::from_slice(&manifest_bytes).map_err(|e| {
            CommitError::UploadIncomplete(format!(
                "manifest unreadable for version {}: {e}",
                version_id.short()
            ))
        })?;
        if manifest.version != version_id {
            return Err(CommitError::UploadIncomplete(format!(
                "manifest names version {}, session names {}",
                manifest.version.short(),
                version_id.short()
            )));
        }

        let committed = self
            .repository
            .commit_version(
                storage.id(),
                &NewVersion {
                    id: version_id.clone(),
                    object_key_prefix: prefix,
                    size_bytes: manifest.total_size,
                    file_count: manifest.file_count,
                    message: request.message,
                    created_by: request.created_by,
                },
            )
            .await?;

        info!(
            storage = %name,
            version = version_id.short(),
            size = committed.size_bytes(),
            files = committed.file_count(),
            "version committed"
        );
        Ok(VersionSummary::from(&committed))
    }
}
