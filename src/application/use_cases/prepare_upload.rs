use std::str::FromStr;
use std::sync::Arc;

use rand::{distr::Alphanumeric, Rng};
use tracing::{debug, info};

use crate::application::dto::{PrepareRequest, PrepareResponse, UploadTargets};
use crate::application::errors::PrepareError;
use crate::application::object_keys;
use crate::application::ports::{ObjectStore, StorageRepository};
use crate::domain::hashing::VersionHasher;
use crate::domain::value_objects::{
    ContentHash, FileEntry, OwnerId, StorageName, StorageType, UploadSession,
};

const SESSION_TOKEN_ID_LEN: usize = 16;

/// Use case: prepare an upload — phase one of the upload/commit protocol.
///
/// Computes the deterministic version id for the submitted file list. If a
/// version with that id already exists for the storage, responds with an
/// `existing` session and no presigned URLs: the caller skips straight to
/// commit. Otherwise mints a pending session and presigned PUT URLs for
/// the archive and manifest objects. No upload state is held in process;
/// the session token is the only thing carried to commit.
pub struct PrepareUploadUseCase {
    repository: Arc<dyn StorageRepository>,
    object_store: Arc<dyn ObjectStore>,
    presign_ttl_secs: u64,
}

impl PrepareUploadUseCase {
    pub fn new(
        repository: Arc<dyn StorageRepository>,
        object_store: Arc<dyn ObjectStore>,
        presign_ttl_secs: u64,
    ) -> Self {
        Self {
            repository,
            object_store,
            presign_ttl_secs,
        }
    }

    pub async fn execute(&self, request: PrepareRequest) -> Result<PrepareResponse, PrepareError> {
        let owner_id = OwnerId::from_str(&request.owner_id)?;
        let name = StorageName::from_str(&request.storage_name)?;
        let storage_type = StorageType::from_str(&request.storage_type)?;

        let files = request
            .files
            .iter()
            .map(|f| {
                let hash = ContentHash::from_str(&f.hash)?;
                FileEntry::new(f.path.clone(), hash, f.size)
            })
            .collect::<Result<Vec<_>, _>>()?;

        // First upload creates the storage row
        let storage = self
            .repository
            .create_or_get(&owner_id, &name, storage_type)
            .await?;

        let version_id = VersionHasher::compute(storage.id(), &files);
        debug!(
            storage = %name,
            version = version_id.short(),
            files = files.len(),
            "prepared version id"
        );

        // Dedup short-circuit: identical content already committed
        if self
            .repository
            .find_version(storage.id(), &version_id)
            .await?
            .is_some()
        {
            info!(
                storage = %name,
                version = version_id.short(),
                "version exists, skipping upload"
            );
            let session = UploadSession::Existing {
                version_id: version_id.clone(),
            };
            return Ok(PrepareResponse {
                version_id,
                existing: true,
                session_token: session.to_string(),
                uploads: None,
            });
        }

        let prefix = object_keys::version_prefix(&owner_id, storage_type, &name, &version_id);
        let archive = self
            .object_store
            .presign_put(&object_keys::archive_key(&prefix), self.presign_ttl_secs)
            .await?;
        let manifest = self
            .object_store
            .presign_put(&object_keys::manifest_key(&prefix), self.presign_ttl_secs)
            .await?;

        let token_id: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(SESSION_TOKEN_ID_LEN)
            .map(char::from)
            .collect();
        let session = UploadSession::Pending {
            version_id: version_id.clone(),
            token_id,
        };

        info!(
            storage = %name,
            version = version_id.short(),
            "upload session created"
        );

        Ok(PrepareResponse {
            version_id,
            existing: false,
            session_token: session.to_string(),
            uploads: Some(UploadTargets { archive, manifest }),
        })
    }
}
