use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Validated storage name (e.g., "workspace", "build-output").
///
/// Names are embedded in object-store keys, so the charset is kept to
/// characters that are safe in a key path segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StorageName(String);

impl StorageName {
    const MAX_LENGTH: usize = 100;

    pub fn new(value: String) -> Result<Self, DomainError> {
        if value.is_empty() {
            return Err(DomainError::InvalidStorageName(
                "Storage name cannot be empty".to_string(),
            ));
        }

        if value.len() > Self::MAX_LENGTH {
            return Err(DomainError::InvalidStorageName(format!(
                "Storage name too long: {} > {}",
                value.len(),
                Self::MAX_LENGTH
            )));
        }

        // Must be alphanumeric with underscores/hyphens/dots; a leading dot
        // would produce a hidden path segment in the object store
        if !value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
        {
            return Err(DomainError::InvalidStorageName(
                "Storage name must be alphanumeric with underscores/hyphens/dots".to_string(),
            ));
        }

        if value.starts_with('.') {
            return Err(DomainError::InvalidStorageName(
                "Storage name cannot start with a dot".to_string(),
            ));
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StorageName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for StorageName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_name_valid() {
        let name = StorageName::new("build-output.v2".to_string()).unwrap();
        assert_eq!(name.as_str(), "build-output.v2");
    }

    #[test]
    fn test_storage_name_empty() {
        let err = StorageName::new(String::new()).unwrap_err();
        assert!(matches!(err, DomainError::InvalidStorageName(_)));
    }

    #[test]
    fn test_storage_name_too_long() {
        let err = StorageName::new("a".repeat(101)).unwrap_err();
        assert!(matches!(err, DomainError::InvalidStorageName(_)));
    }

    #[test]
    fn test_storage_name_rejects_path_separators() {
        let err = StorageName::new("a/b".to_string()).unwrap_err();
        assert!(matches!(err, DomainError::InvalidStorageName(_)));
    }

    #[test]
    fn test_storage_name_rejects_leading_dot() {
        let err = StorageName::new(".hidden".to_string()).unwrap_err();
        assert!(matches!(err, DomainError::InvalidStorageName(_)));
    }
}
