//! BLAKE3 hashing utilities for stub integrity

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use blake3::Hasher;
use walkdir::WalkDir;

use crate::error::{Result, StubError};

/// Hash prefix for BLAKE3 hashes
pub const HASH_PREFIX: &str = "blake3:";

fn read_failed(path: &Path, e: &std::io::Error) -> StubError {
    StubError::FileReadFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    }
}

fn update_from_file(hasher: &mut Hasher, path: &Path) -> Result<()> {
    let file = File::open(path).map_err(|e| read_failed(path, &e))?;
    let mut reader = BufReader::new(file);
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = reader.read(&mut buffer).map_err(|e| read_failed(path, &e))?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }
    Ok(())
}

/// Calculate BLAKE3 hash of a stub directory's contents
///
/// Files are hashed in sorted path order together with their relative
/// paths, so renames change the hash and traversal order does not.
pub fn hash_directory(path: &Path) -> Result<String> {
    if !path.is_dir() {
        return Err(StubError::FileReadFailed {
            path: path.display().to_string(),
            reason: "not a directory".to_string(),
        });
    }

    let mut files: Vec<_> = WalkDir::new(path)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().is_file())
        .collect();
    files.sort_by(|a, b| a.path().cmp(b.path()));

    let mut hasher = Hasher::new();
    for entry in files {
        let file_path = entry.path();
        let relative_path = file_path
            .strip_prefix(path)
            .unwrap_or(file_path)
            .to_string_lossy()
            .replace('\\', "/");
        hasher.update(relative_path.as_bytes());
        hasher.update(b"\0");
        update_from_file(&mut hasher, file_path)?;
        hasher.update(b"\0");
    }

    Ok(format!("{}{}", HASH_PREFIX, hasher.finalize().to_hex()))
}

/// Verify a hash matches the expected value, with or without prefix
pub fn verify_hash(expected: &str, actual: &str) -> bool {
    let normalize = |h: &str| h.strip_prefix(HASH_PREFIX).unwrap_or(h).to_ascii_lowercase();
    normalize(expected) == normalize(actual)
}
