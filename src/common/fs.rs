//! Common file system operations with unified error handling

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{Result, StubError};

#[derive(Default, Clone)]
pub struct CopyOptions {
    pub exclude: Vec<String>,
}

impl CopyOptions {
    pub fn exclude_caches() -> Self {
        Self {
            exclude: vec!["__pycache__".to_string(), ".git".to_string()],
        }
    }
}

/// Copy a directory recursively with options
pub fn copy_dir_recursive<P1, P2>(src: P1, dst: P2, options: &CopyOptions) -> std::io::Result<()>
where
    P1: AsRef<Path>,
    P2: AsRef<Path>,
{
    let src_ref = src.as_ref();
    let dst_ref = dst.as_ref();

    if !dst_ref.exists() {
        fs::create_dir_all(dst_ref)?;
    }

    for entry in fs::read_dir(src_ref)? {
        let entry = entry?;
        let entry_path = entry.path();
        let file_name = entry.file_name();

        if options
            .exclude
            .iter()
            .any(|excluded| file_name.to_str() == Some(excluded.as_str()))
        {
            continue;
        }

        let dst_path = dst_ref.join(&file_name);

        if entry_path.is_dir() {
            copy_dir_recursive(&entry_path, &dst_path, options)?;
        } else {
            fs::copy(&entry_path, &dst_path)?;
        }
    }

    Ok(())
}

/// Replace `path` with `contents` without ever exposing a half-written file
///
/// Writes to a temporary file next to `path`, then renames it over the target.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let write_failed = |e: &dyn std::fmt::Display| StubError::FileWriteFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    };

    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent).map_err(|e| write_failed(&e))?;

    let mut file = NamedTempFile::new_in(parent).map_err(|e| write_failed(&e))?;
    file.write_all(contents).map_err(|e| write_failed(&e))?;
    file.as_file().sync_all().map_err(|e| write_failed(&e))?;
    file.persist(path).map_err(|e| write_failed(&e.error))?;
    Ok(())
}
