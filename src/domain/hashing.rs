use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::domain::value_objects::{ContentHash, FileEntry};

/// Computes deterministic version ids from a storage's identity and file
/// list.
///
/// The version id is a pure function of `(storage_id, sorted file list)`:
/// identical content for the same storage always yields the same id, which
/// is what allows prepare-time deduplication across repeated submissions
/// of unchanged content. No network, no disk, no clock — manifest
/// `createdAt` is deliberately excluded.
///
/// Each field is fed to the digest as its little-endian u64 byte length
/// followed by the field bytes, so `("ab", "c")` and `("a", "bc")` cannot
/// collide through concatenation.
pub struct VersionHasher;

impl VersionHasher {
    /// Compute the version id for a storage and its file list.
    ///
    /// The input order of `files` is irrelevant; entries are sorted by
    /// path bytes before hashing. An empty file list is valid and hashes
    /// to a per-storage constant.
    pub fn compute(storage_id: Uuid, files: &[FileEntry]) -> ContentHash {
        let mut sorted: Vec<&FileEntry> = files.iter().collect();
        sorted.sort_by(|a, b| a.path.as_bytes().cmp(b.path.as_bytes()));

        let mut hasher = Sha256::new();
        feed_field(&mut hasher, storage_id.to_string().as_bytes());
        for file in sorted {
            feed_field(&mut hasher, file.path.as_bytes());
            feed_field(&mut hasher, file.hash.as_hex().as_bytes());
            feed_field(&mut hasher, &file.size.to_le_bytes());
        }

        let digest = hasher.finalize();
        // 32-byte digest always yields 64 valid hex chars
        ContentHash::from_hex(hex::encode(digest))
            .unwrap_or_else(|_| unreachable!("sha256 digest is always 64 hex chars"))
    }
}

fn feed_field(hasher: &mut Sha256, bytes: &[u8]) {
    hasher.update((bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
}
