use std::str::FromStr;

use crate::domain::errors::DomainError;
use crate::domain::value_objects::ContentHash;

/// Upload session token — the only state carried between the prepare and
/// commit phases. No server-side memory of in-flight uploads exists.
///
/// Wire forms:
/// - `upload:{versionId}:{randomId}` — a pending upload the caller must
///   complete via the presigned URLs before committing
/// - `existing:{versionId}` — dedup short-circuit, no upload needed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadSession {
    Pending {
        version_id: ContentHash,
        token_id: String,
    },
    Existing {
        version_id: ContentHash,
    },
}

impl UploadSession {
    pub fn version_id(&self) -> &ContentHash {
        match self {
            UploadSession::Pending { version_id, .. } => version_id,
            UploadSession::Existing { version_id } => version_id,
        }
    }

    pub fn is_existing(&self) -> bool {
        matches!(self, UploadSession::Existing { .. })
    }
}

impl std::fmt::Display for UploadSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UploadSession::Pending {
                version_id,
                token_id,
            } => write!(f, "upload:{version_id}:{token_id}"),
            UploadSession::Existing { version_id } => write!(f, "existing:{version_id}"),
        }
    }
}

impl FromStr for UploadSession {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ':');
        let kind = parts.next().unwrap_or_default();
        match kind {
            "upload" => {
                let version_id = parts
                    .next()
                    .ok_or_else(|| DomainError::InvalidSessionToken(s.to_string()))?;
                let token_id = parts
                    .next()
                    .filter(|t| !t.is_empty())
                    .ok_or_else(|| DomainError::InvalidSessionToken(s.to_string()))?;
                let version_id = ContentHash::from_str(version_id)
                    .map_err(|_| DomainError::InvalidSessionToken(s.to_string()))?;
                Ok(UploadSession::Pending {
                    version_id,
                    token_id: token_id.to_string(),
                })
            }
            "existing" => {
                let version_id = parts
                    .next()
                    .ok_or_else(|| DomainError::InvalidSessionToken(s.to_string()))?;
                if parts.next().is_some() {
                    return Err(DomainError::InvalidSessionToken(s.to_string()));
                }
                let version_id = ContentHash::from_str(version_id)
                    .map_err(|_| DomainError::InvalidSessionToken(s.to_string()))?;
                Ok(UploadSession::Existing { version_id })
            }
            _ => Err(DomainError::InvalidSessionToken(s.to_string())),
        }
    }
}
