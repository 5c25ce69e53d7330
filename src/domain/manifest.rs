use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{ContentHash, FileEntry};

/// Per-version file listing, persisted as `manifest.json` next to the
/// archive.
///
/// `created_at` is the only non-deterministic field (wall clock at build
/// time) and is excluded from version-id hashing; everything else is a
/// pure function of the file list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub version: ContentHash,
    pub created_at: DateTime<Utc>,
    pub total_size: u64,
    pub file_count: u64,
    pub files: Vec<FileEntry>,
}

impl Manifest {
    /// Build the manifest for a version: entries sorted by path,
    /// aggregates derived from the list.
    pub fn build(version_id: ContentHash, files: &[FileEntry]) -> Self {
        let mut files: Vec<FileEntry> = files.to_vec();
        files.sort_by(|a, b| a.path.as_bytes().cmp(b.path.as_bytes()));

        let total_size = files.iter().map(|f| f.size).sum();
        let file_count = files.len() as u64;

        Self {
            version: version_id,
            created_at: Utc::now(),
            total_size,
            file_count,
            files,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn entry(path: &str, size: u64) -> FileEntry {
        FileEntry::new(
            path.to_string(),
            ContentHash::from_str(&"a".repeat(64)).unwrap(),
            size,
        )
        .unwrap()
    }

    fn vid() -> ContentHash {
        ContentHash::from_str(&"f".repeat(64)).unwrap()
    }

    #[test]
    fn test_manifest_aggregates() {
        let manifest = Manifest::build(vid(), &[entry("b", 5), entry("a", 7)]);
        assert_eq!(manifest.total_size, 12);
        assert_eq!(manifest.file_count, 2);
        assert_eq!(manifest.files[0].path, "a");
        assert_eq!(manifest.files[1].path, "b");
    }

    #[test]
    fn test_manifest_empty() {
        let manifest = Manifest::build(vid(), &[]);
        assert_eq!(manifest.total_size, 0);
        assert_eq!(manifest.file_count, 0);
        assert!(manifest.files.is_empty());
    }

    #[test]
    fn test_manifest_wire_names_are_camel_case() {
        let manifest = Manifest::build(vid(), &[entry("a.txt", 3)]);
        let json = serde_json::to_value(&manifest).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("totalSize").is_some());
        assert!(json.get("fileCount").is_some());
        assert_eq!(json["files"][0]["path"], "a.txt");
    }

    #[test]
    fn test_manifest_round_trip() {
        let manifest = Manifest::build(vid(), &[entry("a.txt", 3)]);
        let json = serde_json::to_string(&manifest).unwrap();
        let parsed: Manifest = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.version, manifest.version);
        assert_eq!(parsed.files, manifest.files);
    }
}
