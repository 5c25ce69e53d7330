//! Archive packaging and selective retrieval.
//!
//! A version's payload is one gzip-compressed tar archive holding every
//! file with relative paths preserved. The tar layer is a hand-rolled
//! codec (`codec`) so header parsing stays unit-testable; this module
//! adds the gzip framing, single-file extraction, and the directory
//! snapshot walk used when packaging a working tree.

pub mod codec;
mod snapshot;

use std::io::{Read, Write};

use bytes::Bytes;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use thiserror::Error;

pub use codec::{CodecError, TarEntry};
pub use snapshot::snapshot_dir;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// An in-memory file destined for an archive.
#[derive(Debug, Clone)]
pub struct ArchiveFile {
    pub path: String,
    pub content: Bytes,
}

/// Build a gzip-compressed tar archive from an in-memory file set.
pub fn build_archive(files: &[ArchiveFile]) -> Result<Bytes, ArchiveError> {
    let mut tar = Vec::new();
    for file in files {
        codec::write_entry(&mut tar, &file.path, &file.content)?;
    }
    codec::write_trailer(&mut tar);

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&tar)?;
    Ok(Bytes::from(encoder.finish()?))
}

/// Extract one file from a gzip-compressed archive without unpacking the
/// rest.
///
/// `path` and `./path` match the same entry, in either direction. Empty
/// or corrupt input yields None, never an error.
pub fn extract_file(archive: &[u8], path: &str) -> Option<Bytes> {
    let wanted = codec::normalize_entry_path(path);
    let tar = gunzip(archive)?;
    codec::read_entries(&tar)
        .into_iter()
        .find(|entry| codec::normalize_entry_path(&entry.path) == wanted)
        .map(|entry| Bytes::from(entry.content))
}

/// List (path, size) for every regular file in a gzip-compressed archive.
/// Tolerates empty and corrupt input the same way as `extract_file`.
pub fn list_files(archive: &[u8]) -> Vec<(String, u64)> {
    let Some(tar) = gunzip(archive) else {
        return Vec::new();
    };
    codec::read_entries(&tar)
        .into_iter()
        .map(|entry| {
            let size = entry.content.len() as u64;
            (
                codec::normalize_entry_path(&entry.path).to_string(),
                size,
            )
        })
        .collect()
}

fn gunzip(data: &[u8]) -> Option<Vec<u8>> {
    let mut decoder = GzDecoder::new(data);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out).ok()?;
    Some(out)
}
