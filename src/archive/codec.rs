//! Minimal ustar codec.
//!
//! Archives are plain POSIX ustar: 512-byte header blocks with octal
//! size fields, file data padded to block size, and two zero blocks as
//! the end-of-archive sentinel. Only regular files are written; on read,
//! directories and other entry types are skipped. Header field offsets
//! live here so they are unit-testable in isolation from storage logic.

use thiserror::Error;

pub const BLOCK_SIZE: usize = 512;

const NAME_LEN: usize = 100;
const PREFIX_LEN: usize = 155;

const OFF_NAME: usize = 0;
const OFF_MODE: usize = 100;
const OFF_UID: usize = 108;
const OFF_GID: usize = 116;
const OFF_SIZE: usize = 124;
const OFF_MTIME: usize = 136;
const OFF_CHKSUM: usize = 148;
const OFF_TYPEFLAG: usize = 156;
const OFF_MAGIC: usize = 257;
const OFF_VERSION: usize = 263;
const OFF_PREFIX: usize = 345;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Path too long for ustar header: {0}")]
    PathTooLong(String),
}

/// One regular-file entry read back out of a tar stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TarEntry {
    pub path: String,
    pub content: Vec<u8>,
}

/// Append one regular-file entry (header + padded data) to `out`.
pub fn write_entry(out: &mut Vec<u8>, path: &str, content: &[u8]) -> Result<(), CodecError> {
    let (name, prefix) = split_path(path)?;

    let mut header = [0u8; BLOCK_SIZE];
    header[OFF_NAME..OFF_NAME + name.len()].copy_from_slice(name.as_bytes());
    write_octal(&mut header[OFF_MODE..OFF_MODE + 8], 0o644);
    write_octal(&mut header[OFF_UID..OFF_UID + 8], 0);
    write_octal(&mut header[OFF_GID..OFF_GID + 8], 0);
    write_octal12(&mut header[OFF_SIZE..OFF_SIZE + 12], content.len() as u64);
    write_octal12(&mut header[OFF_MTIME..OFF_MTIME + 12], 0);
    header[OFF_TYPEFLAG] = b'0';
    header[OFF_MAGIC..OFF_MAGIC + 6].copy_from_slice(b"ustar\0");
    header[OFF_VERSION..OFF_VERSION + 2].copy_from_slice(b"00");
    header[OFF_PREFIX..OFF_PREFIX + prefix.len()].copy_from_slice(prefix.as_bytes());

    // Checksum is computed with the chksum field itself read as spaces
    header[OFF_CHKSUM..OFF_CHKSUM + 8].fill(b' ');
    let sum: u64 = header.iter().map(|&b| b as u64).sum();
    write_checksum(&mut header[OFF_CHKSUM..OFF_CHKSUM + 8], sum);

    out.extend_from_slice(&header);
    out.extend_from_slice(content);
    let remainder = content.len() % BLOCK_SIZE;
    if remainder != 0 {
        out.resize(out.len() + BLOCK_SIZE - remainder, 0);
    }
    Ok(())
}

/// Append the end-of-archive sentinel (two zero blocks).
pub fn write_trailer(out: &mut Vec<u8>) {
    out.resize(out.len() + 2 * BLOCK_SIZE, 0);
}

/// Read all regular-file entries out of an uncompressed tar stream.
///
/// Tolerant by design: a truncated stream, a bad octal field, or a
/// checksum mismatch ends iteration early rather than failing, so an
/// empty or corrupt archive simply yields no (further) entries.
pub fn read_entries(data: &[u8]) -> Vec<TarEntry> {
    let mut entries = Vec::new();
    let mut offset = 0;

    while offset + BLOCK_SIZE <= data.len() {
        let header = &data[offset..offset + BLOCK_SIZE];
        if header.iter().all(|&b| b == 0) {
            break;
        }
        if !checksum_ok(header) {
            break;
        }

        let Some(size) = parse_octal(&header[OFF_SIZE..OFF_SIZE + 12]) else {
            break;
        };
        let size = size as usize;
        let data_start = offset + BLOCK_SIZE;
        let Some(data_end) = data_start.checked_add(size) else {
            break;
        };
        if data_end > data.len() {
            break;
        }

        let typeflag = header[OFF_TYPEFLAG];
        if typeflag == b'0' || typeflag == 0 {
            if let Some(path) = parse_path(header) {
                // Directories occasionally appear with a regular typeflag
                if !path.is_empty() && !path.ends_with('/') {
                    entries.push(TarEntry {
                        path,
                        content: data[data_start..data_end].to_vec(),
                    });
                }
            }
        }

        let padded = size.div_ceil(BLOCK_SIZE) * BLOCK_SIZE;
        offset = data_start + padded;
    }

    entries
}

/// Strip a single leading `./`, which archive tools sometimes prepend.
pub fn normalize_entry_path(path: &str) -> &str {
    path.strip_prefix("./").unwrap_or(path)
}

fn split_path(path: &str) -> Result<(&str, &str), CodecError> {
    if path.len() <= NAME_LEN {
        return Ok((path, ""));
    }
    // Split at a '/' so that name fits in 100 bytes and prefix in 155
    for (idx, byte) in path.bytes().enumerate() {
        if byte == b'/' && idx <= PREFIX_LEN && path.len() - idx - 1 <= NAME_LEN {
            return Ok((&path[idx + 1..], &path[..idx]));
        }
    }
    Err(CodecError::PathTooLong(path.to_string()))
}

fn parse_path(header: &[u8]) -> Option<String> {
    let name = read_str(&header[OFF_NAME..OFF_NAME + NAME_LEN])?;
    let is_ustar = &header[OFF_MAGIC..OFF_MAGIC + 5] == b"ustar";
    let prefix = if is_ustar {
        read_str(&header[OFF_PREFIX..OFF_PREFIX + PREFIX_LEN])?
    } else {
        String::new()
    };
    if prefix.is_empty() {
        Some(name)
    } else {
        Some(format!("{prefix}/{name}"))
    }
}

fn read_str(field: &[u8]) -> Option<String> {
    let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
    String::from_utf8(field[..end].to_vec()).ok()
}

fn parse_octal(field: &[u8]) -> Option<u64> {
    let text = std::str::from_utf8(field).ok()?;
    let text = text.trim_matches(|c| c == '\0' || c == ' ');
    if text.is_empty() {
        return Some(0);
    }
    u64::from_str_radix(text, 8).ok()
}

fn checksum_ok(header: &[u8]) -> bool {
    let Some(stored) = parse_octal(&header[OFF_CHKSUM..OFF_CHKSUM + 8]) else {
        return false;
    };
    let computed: u64 = header
        .iter()
        .enumerate()
        .map(|(i, &b)| {
            if (OFF_CHKSUM..OFF_CHKSUM + 8).contains(&i) {
                b' ' as u64
            } else {
                b as u64
            }
        })
        .sum();
    stored == computed
}

fn write_octal(field: &mut [u8], value: u64) {
    // Seven octal digits + NUL, the classic 8-byte numeric field
    let text = format!("{value:07o}");
    field[..7].copy_from_slice(text.as_bytes());
    field[7] = 0;
}

fn write_octal12(field: &mut [u8], value: u64) {
    let text = format!("{value:011o}");
    field[..11].copy_from_slice(text.as_bytes());
    field[11] = 0;
}

fn write_checksum(field: &mut [u8], sum: u64) {
    let text = format!("{sum:06o}");
    field[..6].copy_from_slice(text.as_bytes());
    field[6] = 0;
    field[7] = b' ';
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(files: &[(&str, &[u8])]) -> Vec<TarEntry> {
        let mut tar = Vec::new();
        for (path, content) in files {
            write_entry(&mut tar, path, content).unwrap();
        }
        write_trailer(&mut tar);
        read_entries(&tar)
    }

    #[test]
    fn test_single_entry_round_trip() {
        let entries = roundtrip(&[("hello.txt", b"hello world")]);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, "hello.txt");
        assert_eq!(entries[0].content, b"hello world");
    }

    #[test]
    fn test_multiple_entries_preserve_order() {
        let entries = roundtrip(&[("a.txt", b"aa"), ("dir/b.bin", &[0u8, 1, 2, 3])]);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].path, "a.txt");
        assert_eq!(entries[1].path, "dir/b.bin");
        assert_eq!(entries[1].content, vec![0u8, 1, 2, 3]);
    }

    #[test]
    fn test_empty_file_entry() {
        let entries = roundtrip(&[("empty", b"")]);
        assert_eq!(entries.len(), 1);
        assert!(entries[0].content.is_empty());
    }

    #[test]
    fn test_block_boundary_sizes() {
        let exactly_one_block = vec![7u8; BLOCK_SIZE];
        let just_over = vec![9u8; BLOCK_SIZE + 1];
        let entries = roundtrip(&[("a", &exactly_one_block), ("b", &just_over)]);
        assert_eq!(entries[0].content.len(), BLOCK_SIZE);
        assert_eq!(entries[1].content.len(), BLOCK_SIZE + 1);
    }

    #[test]
    fn test_empty_input_yields_no_entries() {
        assert!(read_entries(&[]).is_empty());
        assert!(read_entries(&[0u8; 2 * BLOCK_SIZE]).is_empty());
    }

    #[test]
    fn test_garbage_input_yields_no_entries() {
        let garbage = vec![0xffu8; 3 * BLOCK_SIZE];
        assert!(read_entries(&garbage).is_empty());
    }

    #[test]
    fn test_truncated_data_stops_cleanly() {
        let mut tar = Vec::new();
        write_entry(&mut tar, "a.txt", b"aaa").unwrap();
        write_entry(&mut tar, "b.txt", b"bbb").unwrap();
        // Chop into the second entry's data block
        tar.truncate(tar.len() - BLOCK_SIZE / 2);
        let entries = read_entries(&tar);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, "a.txt");
    }

    #[test]
    fn test_corrupt_checksum_stops_iteration() {
        let mut tar = Vec::new();
        write_entry(&mut tar, "a.txt", b"aaa").unwrap();
        tar[OFF_CHKSUM] = b'9';
        tar[OFF_CHKSUM + 1] = b'9';
        assert!(read_entries(&tar).is_empty());
    }

    #[test]
    fn test_long_path_uses_prefix_field() {
        let long_dir = "d".repeat(80);
        let path = format!("{long_dir}/{}/file.txt", "e".repeat(60));
        let entries = roundtrip(&[(&path, b"x")]);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, path);
    }

    #[test]
    fn test_unsplittable_long_path_is_rejected() {
        let path = "x".repeat(120);
        let mut tar = Vec::new();
        let err = write_entry(&mut tar, &path, b"x").unwrap_err();
        assert!(matches!(err, CodecError::PathTooLong(_)));
    }

    #[test]
    fn test_normalize_entry_path() {
        assert_eq!(normalize_entry_path("./AGENTS.md"), "AGENTS.md");
        assert_eq!(normalize_entry_path("AGENTS.md"), "AGENTS.md");
        assert_eq!(normalize_entry_path("a/./b"), "a/./b");
    }

    #[test]
    fn test_dot_slash_entries_survive_round_trip() {
        let entries = roundtrip(&[("./AGENTS.md", b"agents")]);
        assert_eq!(entries.len(), 1);
        assert_eq!(normalize_entry_path(&entries[0].path), "AGENTS.md");
    }
}
