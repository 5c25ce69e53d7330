//! Object-store key layout.
//!
//! Version payloads live under `{ownerId}/{type}/{name}/{versionId}/` with
//! exactly two objects, `manifest.json` and `archive.tar.gz`. Blob bytes
//! live in a shared content-addressed namespace independent of which
//! versions reference them.

use crate::domain::value_objects::{ContentHash, OwnerId, StorageName, StorageType};

pub const MANIFEST_OBJECT: &str = "manifest.json";
pub const ARCHIVE_OBJECT: &str = "archive.tar.gz";

/// Key prefix for a version's objects: `{owner}/{type}/{name}/{versionId}`
pub fn version_prefix(
    owner_id: &OwnerId,
    storage_type: StorageType,
    name: &StorageName,
    version_id: &ContentHash,
) -> String {
    format!("{owner_id}/{storage_type}/{name}/{version_id}")
}

pub fn manifest_key(version_prefix: &str) -> String {
    format!("{version_prefix}/{MANIFEST_OBJECT}")
}

pub fn archive_key(version_prefix: &str) -> String {
    format!("{version_prefix}/{ARCHIVE_OBJECT}")
}

/// Content-addressed blob key with two-char fan-out:
/// `blobs/sha256/{prefix}/{hash}`
pub fn blob_key(hash: &ContentHash) -> String {
    format!("blobs/sha256/{}/{}", hash.prefix(), hash.as_hex())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_version_key_layout() {
        let owner = OwnerId::from_str("user-1").unwrap();
        let name = StorageName::from_str("workspace").unwrap();
        let vid = ContentHash::from_str(&"a".repeat(64)).unwrap();

        let prefix = version_prefix(&owner, StorageType::Volume, &name, &vid);
        assert_eq!(prefix, format!("user-1/volume/workspace/{}", "a".repeat(64)));
        assert_eq!(manifest_key(&prefix), format!("{prefix}/manifest.json"));
        assert_eq!(archive_key(&prefix), format!("{prefix}/archive.tar.gz"));
    }

    #[test]
    fn test_blob_key_fan_out() {
        let hash = ContentHash::from_str(&("ab".to_string() + &"c".repeat(62))).unwrap();
        assert_eq!(
            blob_key(&hash),
            format!("blobs/sha256/ab/ab{}", "c".repeat(62))
        );
    }
}
