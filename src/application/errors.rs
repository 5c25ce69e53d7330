//! Use-case error types and their machine-readable mapping.
//!
//! The HTTP layer lives outside this crate; handlers only need
//! [`ErrorCode`] to build a structured response, so the mapping is
//! defined here rather than leaking use-case internals upward.

use thiserror::Error;

use crate::application::ports::{ObjectStoreError, RepositoryError};
use crate::domain::errors::DomainError;

/// Machine-readable error code with its HTTP status class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    NotFound,
    AmbiguousVersion,
    UploadIncomplete,
    Conflict,
    InvalidRequest,
    StorageBackend,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::AmbiguousVersion => "AMBIGUOUS_VERSION",
            ErrorCode::UploadIncomplete => "UPLOAD_INCOMPLETE",
            ErrorCode::Conflict => "CONFLICT",
            ErrorCode::InvalidRequest => "INVALID_REQUEST",
            ErrorCode::StorageBackend => "STORAGE_BACKEND_ERROR",
        }
    }

    /// HTTP status the external handler should respond with.
    /// Backend failures are 5xx and must not leak internal detail.
    pub fn http_status(&self) -> u16 {
        match self {
            ErrorCode::NotFound => 404,
            ErrorCode::AmbiguousVersion => 409,
            ErrorCode::UploadIncomplete => 400,
            ErrorCode::Conflict => 409,
            ErrorCode::InvalidRequest => 400,
            ErrorCode::StorageBackend => 500,
        }
    }
}

fn repository_code(err: &RepositoryError) -> ErrorCode {
    match err {
        RepositoryError::NotFound(_) => ErrorCode::NotFound,
        RepositoryError::Conflict(_) => ErrorCode::Conflict,
        RepositoryError::Database(_) | RepositoryError::Internal(_) => ErrorCode::StorageBackend,
    }
}

/// Errors from the prepare phase of the upload protocol
#[derive(Debug, Error)]
pub enum PrepareError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Object store error: {0}")]
    ObjectStore(#[from] ObjectStoreError),
}

impl PrepareError {
    pub fn code(&self) -> ErrorCode {
        match self {
            PrepareError::InvalidRequest(_) | PrepareError::Domain(_) => ErrorCode::InvalidRequest,
            PrepareError::Repository(e) => repository_code(e),
            PrepareError::ObjectStore(_) => ErrorCode::StorageBackend,
        }
    }
}

/// Errors from the commit phase of the upload protocol
#[derive(Debug, Error)]
pub enum CommitError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Storage not found: {0}")]
    NotFound(String),

    #[error("Upload incomplete: {0}")]
    UploadIncomplete(String),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Object store error: {0}")]
    ObjectStore(#[from] ObjectStoreError),
}

impl CommitError {
    pub fn code(&self) -> ErrorCode {
        match self {
            CommitError::InvalidRequest(_) | CommitError::Domain(_) => ErrorCode::InvalidRequest,
            CommitError::NotFound(_) => ErrorCode::NotFound,
            CommitError::UploadIncomplete(_) => ErrorCode::UploadIncomplete,
            CommitError::Repository(e) => repository_code(e),
            CommitError::ObjectStore(_) => ErrorCode::StorageBackend,
        }
    }
}

/// Errors from version resolution
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Version not found: {0}")]
    NotFound(String),

    #[error("Ambiguous version prefix {prefix:?}: {matches} matches")]
    Ambiguous { prefix: String, matches: usize },

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl ResolveError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ResolveError::NotFound(_) => ErrorCode::NotFound,
            ResolveError::Ambiguous { .. } => ErrorCode::AmbiguousVersion,
            ResolveError::Repository(e) => repository_code(e),
        }
    }
}

/// Errors from download operations
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("File not found in version: {0}")]
    FileNotFound(String),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Object store error: {0}")]
    ObjectStore(#[from] ObjectStoreError),
}

impl DownloadError {
    pub fn code(&self) -> ErrorCode {
        match self {
            DownloadError::Resolve(e) => e.code(),
            DownloadError::FileNotFound(_) => ErrorCode::NotFound,
            DownloadError::Repository(e) => repository_code(e),
            DownloadError::ObjectStore(_) => ErrorCode::StorageBackend,
        }
    }
}

/// Errors from server-side packaging
#[derive(Debug, Error)]
pub enum PackageError {
    #[error("Archive error: {0}")]
    Archive(#[from] crate::archive::ArchiveError),

    #[error("Object store error: {0}")]
    ObjectStore(#[from] ObjectStoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl PackageError {
    pub fn code(&self) -> ErrorCode {
        match self {
            PackageError::Archive(_) => ErrorCode::InvalidRequest,
            PackageError::ObjectStore(_) | PackageError::Internal(_) => ErrorCode::StorageBackend,
        }
    }
}

/// Errors from storage lifecycle operations (create, list)
#[derive(Debug, Error)]
pub enum StorageOpError {
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Storage not found: {0}")]
    NotFound(String),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl StorageOpError {
    pub fn code(&self) -> ErrorCode {
        match self {
            StorageOpError::Domain(_) => ErrorCode::InvalidRequest,
            StorageOpError::NotFound(_) => ErrorCode::NotFound,
            StorageOpError::Repository(e) => repository_code(e),
        }
    }
}

/// Errors from blob uploads
#[derive(Debug, Error)]
pub enum BlobUploadError {
    #[error("Object store error: {0}")]
    ObjectStore(#[from] ObjectStoreError),
}

impl BlobUploadError {
    pub fn code(&self) -> ErrorCode {
        ErrorCode::StorageBackend
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_status_classes() {
        assert_eq!(ErrorCode::NotFound.http_status(), 404);
        assert_eq!(ErrorCode::AmbiguousVersion.http_status(), 409);
        assert_eq!(ErrorCode::UploadIncomplete.http_status(), 400);
        assert_eq!(ErrorCode::Conflict.http_status(), 409);
        assert_eq!(ErrorCode::StorageBackend.http_status(), 500);
    }

    #[test]
    fn test_commit_error_codes() {
        let err = CommitError::UploadIncomplete("manifest missing".to_string());
        assert_eq!(err.code(), ErrorCode::UploadIncomplete);

        let err = CommitError::NotFound("workspace".to_string());
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[test]
    fn test_resolve_error_codes() {
        let err = ResolveError::Ambiguous {
            prefix: "abc".to_string(),
            matches: 2,
        };
        assert_eq!(err.code(), ErrorCode::AmbiguousVersion);
        assert!(err.to_string().contains("abc"));
    }

    #[test]
    fn test_conflict_maps_through_repository() {
        let err = PrepareError::Repository(RepositoryError::Conflict("workspace".to_string()));
        assert_eq!(err.code(), ErrorCode::Conflict);
    }
}
