use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Opaque owner identifier issued by the external identity provider.
///
/// Treated as a validated string rather than a UUID because the identity
/// provider's ids are not UUIDs. Owner ids appear in object-store keys, so
/// the same path-segment-safe charset as storage names applies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnerId(String);

impl OwnerId {
    const MAX_LENGTH: usize = 128;

    pub fn new(value: String) -> Result<Self, DomainError> {
        if value.is_empty() {
            return Err(DomainError::InvalidOwnerId(
                "Owner id cannot be empty".to_string(),
            ));
        }

        if value.len() > Self::MAX_LENGTH {
            return Err(DomainError::InvalidOwnerId(format!(
                "Owner id too long: {} > {}",
                value.len(),
                Self::MAX_LENGTH
            )));
        }

        if !value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(DomainError::InvalidOwnerId(
                "Owner id must be alphanumeric with underscores/hyphens".to_string(),
            ));
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OwnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for OwnerId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}
