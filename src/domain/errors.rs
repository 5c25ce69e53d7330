use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid storage name: {0}")]
    InvalidStorageName(String),

    #[error("Invalid owner id: {0}")]
    InvalidOwnerId(String),

    #[error("Invalid storage type: {0}")]
    InvalidStorageType(String),

    #[error("Content hash mismatch: expected {expected}, got {actual}")]
    ContentHashMismatch { expected: String, actual: String },

    #[error("Invalid file path: {0}")]
    InvalidFilePath(String),

    #[error("Invalid upload session token: {0}")]
    InvalidSessionToken(String),
}
