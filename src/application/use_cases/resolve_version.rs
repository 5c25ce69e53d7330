use std::str::FromStr;
use std::sync::Arc;

use tracing::debug;

use crate::application::errors::ResolveError;
use crate::application::ports::StorageRepository;
use crate::domain::entities::{Storage, StorageVersion};
use crate::domain::value_objects::ContentHash;

/// Use case: resolve a version reference to a concrete version row.
///
/// A full 64-hex reference resolves by exact id. Anything shorter is a
/// prefix, as in short-hash references in content-addressable systems:
/// zero matches is NotFound, one is the answer, and more than one is
/// Ambiguous — the caller must lengthen the prefix. Silently picking one
/// of several matches would hand the user content they did not ask for.
/// With no reference at all, HEAD is resolved.
pub struct ResolveVersionUseCase {
    repository: Arc<dyn StorageRepository>,
}

impl ResolveVersionUseCase {
    pub fn new(repository: Arc<dyn StorageRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(
        &self,
        storage: &Storage,
        version_ref: Option<&str>,
    ) -> Result<StorageVersion, ResolveError> {
        let Some(version_ref) = version_ref else {
            return self
                .repository
                .head(storage.id())
                .await?
                .ok_or_else(|| {
                    ResolveError::NotFound(format!("storage {} has no versions", storage.name()))
                });
        };

        if version_ref.is_empty() || !version_ref.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ResolveError::NotFound(version_ref.to_string()));
        }
        let version_ref = version_ref.to_lowercase();

        // Exact id first
        if let Ok(version_id) = ContentHash::from_str(&version_ref) {
            if let Some(version) = self
                .repository
                .find_version(storage.id(), &version_id)
                .await?
            {
                return Ok(version);
            }
            return Err(ResolveError::NotFound(version_ref));
        }

        let mut matches = self
            .repository
            .find_versions_by_prefix(storage.id(), &version_ref)
            .await?;
        debug!(prefix = %version_ref, matches = matches.len(), "prefix resolution");

        match matches.len() {
            0 => Err(ResolveError::NotFound(version_ref)),
            1 => Ok(matches.remove(0)),
            n => Err(ResolveError::Ambiguous {
                prefix: version_ref,
                matches: n,
            }),
        }
    }
}
