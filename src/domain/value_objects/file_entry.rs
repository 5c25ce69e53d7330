use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;
use crate::domain::value_objects::ContentHash;

/// A single file within a version: relative POSIX path, content hash, size.
///
/// This is the unit hashed into a version id and listed in a manifest.
/// Paths are stored without a `./` prefix; archive tooling sometimes adds
/// one, and the unpackager strips it when matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub path: String,
    pub hash: ContentHash,
    pub size: u64,
}

impl FileEntry {
    pub fn new(path: String, hash: ContentHash, size: u64) -> Result<Self, DomainError> {
        let path = normalize_path(&path)?;
        Ok(Self { path, hash, size })
    }
}

/// Validate and normalize a relative POSIX path.
///
/// Rejects absolute paths, `..` traversal, backslashes, and empty segments;
/// strips a single leading `./`.
pub fn normalize_path(path: &str) -> Result<String, DomainError> {
    let path = path.strip_prefix("./").unwrap_or(path);

    if path.is_empty() {
        return Err(DomainError::InvalidFilePath("empty path".to_string()));
    }
    if path.starts_with('/') {
        return Err(DomainError::InvalidFilePath(format!(
            "absolute path not allowed: {path}"
        )));
    }
    if path.contains('\\') {
        return Err(DomainError::InvalidFilePath(format!(
            "backslash not allowed: {path}"
        )));
    }
    if path.contains('\0') {
        return Err(DomainError::InvalidFilePath(
            "NUL byte in path".to_string(),
        ));
    }
    for segment in path.split('/') {
        if segment.is_empty() {
            return Err(DomainError::InvalidFilePath(format!(
                "empty path segment: {path}"
            )));
        }
        if segment == ".." {
            return Err(DomainError::InvalidFilePath(format!(
                "path traversal not allowed: {path}"
            )));
        }
    }

    Ok(path.to_string())
}
