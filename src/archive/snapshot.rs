use std::fs;
use std::io::Read;
use std::path::Path;

use bytes::Bytes;
use sha2::{Digest, Sha256};
use tracing::warn;

use crate::domain::value_objects::{ContentHash, FileEntry};

/// Directories never included in a snapshot: VCS state and the sandbox
/// runtime's own scratch area.
const SKIP_DIRS: &[&str] = &[".git", ".vm0"];

const READ_BUF_SIZE: usize = 64 * 1024;

/// Walk a working directory and hash every file into (entry, content)
/// pairs, skipping `.git` and `.vm0`.
///
/// Unreadable files are logged and skipped rather than failing the whole
/// snapshot; a sandbox can race file deletion against the walk.
pub fn snapshot_dir(root: &Path) -> std::io::Result<Vec<(FileEntry, Bytes)>> {
    let mut out = Vec::new();
    walk(root, "", &mut out)?;
    Ok(out)
}

fn walk(
    current: &Path,
    relative: &str,
    out: &mut Vec<(FileEntry, Bytes)>,
) -> std::io::Result<()> {
    for entry in fs::read_dir(current)? {
        let entry = entry?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if SKIP_DIRS.contains(&name.as_ref()) {
            continue;
        }

        let rel = if relative.is_empty() {
            name.to_string()
        } else {
            format!("{relative}/{name}")
        };

        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            walk(&entry.path(), &rel, out)?;
        } else if file_type.is_file() {
            match hash_file(&entry.path()) {
                Ok((hash, content)) => {
                    let size = content.len() as u64;
                    match FileEntry::new(rel.clone(), hash, size) {
                        Ok(file_entry) => out.push((file_entry, content)),
                        Err(e) => warn!(path = %rel, "skipping file with invalid path: {e}"),
                    }
                }
                Err(e) => warn!(path = %rel, "could not read file: {e}"),
            }
        }
        // Symlinks and special files are not snapshotted
    }
    Ok(())
}

fn hash_file(path: &Path) -> std::io::Result<(ContentHash, Bytes)> {
    let mut file = fs::File::open(path)?;
    let mut hasher = Sha256::new();
    let mut content = Vec::new();
    let mut buf = vec![0u8; READ_BUF_SIZE];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
        content.extend_from_slice(&buf[..n]);
    }
    let hash = ContentHash::from_hex(hex::encode(hasher.finalize()))
        .unwrap_or_else(|_| unreachable!("sha256 digest is always 64 hex chars"));
    Ok((hash, Bytes::from(content)))
}
