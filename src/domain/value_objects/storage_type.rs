use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Kind of file collection a storage holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
    /// Mutable working state mounted into a sandbox
    Volume,
    /// Run outputs snapshotted out of a sandbox
    Artifact,
}

impl std::fmt::Display for StorageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageType::Volume => write!(f, "volume"),
            StorageType::Artifact => write!(f, "artifact"),
        }
    }
}

impl std::str::FromStr for StorageType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "volume" => Ok(StorageType::Volume),
            "artifact" => Ok(StorageType::Artifact),
            _ => Err(DomainError::InvalidStorageType(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_storage_type_round_trip() {
        for st in [StorageType::Volume, StorageType::Artifact] {
            let parsed = StorageType::from_str(&st.to_string()).unwrap();
            assert_eq!(parsed, st);
        }
    }

    #[test]
    fn test_storage_type_invalid() {
        let err = StorageType::from_str("bucket").unwrap_err();
        assert!(matches!(err, DomainError::InvalidStorageType(_)));
    }

    #[test]
    fn test_storage_type_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&StorageType::Artifact).unwrap(),
            "\"artifact\""
        );
    }
}
