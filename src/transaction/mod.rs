//! Transaction support for all-or-nothing registry and manifest updates
//!
//! Files that an operation is about to rewrite are backed up first. If the
//! transaction is dropped without [`Transaction::commit`], every backed-up
//! file is restored (or removed again when it did not exist before),
//! directories created under the transaction are deleted, and directories
//! moved aside by [`Transaction::backup_dir`] are moved back.
//!
//! ## Usage
//!
//! ```ignore
//! let mut transaction = Transaction::new();
//! transaction.backup_file(&registry_index)?;
//! transaction.backup_file(&manifest_path)?;
//! transaction.backup_dir(&install_dir)?;
//!
//! // Perform operations...
//!
//! // On success:
//! transaction.commit();
//! ```


use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, StubError};

/// Original state of a file touched by the transaction
#[derive(Debug, Clone)]
struct FileBackup {
    path: PathBuf,
    /// `None` when the file did not exist
    content: Option<Vec<u8>>,
}

/// A directory moved out of the way until commit
#[derive(Debug, Clone)]
struct DirBackup {
    path: PathBuf,
    preserved: PathBuf,
}

/// A transaction over a set of files and directories
#[derive(Debug, Default)]
pub struct Transaction {
    backups: Vec<FileBackup>,

    /// Directories that existed before the transaction
    dir_backups: Vec<DirBackup>,

    /// Directories created during this transaction
    created_dirs: HashSet<PathBuf>,

    /// Whether the transaction has been committed
    committed: bool,
}

impl Transaction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember the current content of `path` so it can be restored
    ///
    /// Backing up the same path twice keeps the first snapshot.
    pub fn backup_file(&mut self, path: &Path) -> Result<()> {
        if self.backups.iter().any(|b| b.path == path) {
            return Ok(());
        }

        let content = if path.exists() {
            Some(fs::read(path).map_err(|e| StubError::FileReadFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?)
        } else {
            None
        };

        self.backups.push(FileBackup {
            path: path.to_path_buf(),
            content,
        });
        Ok(())
    }

    /// Track a directory that was created during this transaction
    pub fn track_dir_created(&mut self, path: impl Into<PathBuf>) {
        self.created_dirs.insert(path.into());
    }

    /// Move the directory at `path` aside so the operation can replace it
    ///
    /// It comes back on rollback and is deleted on commit. A missing
    /// directory is tracked as created instead.
    pub fn backup_dir(&mut self, path: &Path) -> Result<()> {
        if self.dir_backups.iter().any(|b| b.path == path) {
            return Ok(());
        }
        if !path.is_dir() {
            self.track_dir_created(path);
            return Ok(());
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let preserved = path.with_file_name(format!(".previous-{name}"));
        let move_failed = |e: std::io::Error| StubError::FileWriteFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        };
        if preserved.exists() {
            fs::remove_dir_all(&preserved).map_err(move_failed)?;
        }
        fs::rename(path, &preserved).map_err(move_failed)?;

        self.dir_backups.push(DirBackup {
            path: path.to_path_buf(),
            preserved,
        });
        Ok(())
    }

    /// Commit the transaction (prevent rollback)
    pub fn commit(mut self) {
        self.committed = true;
        for backup in &self.dir_backups {
            if let Err(e) = fs::remove_dir_all(&backup.preserved) {
                tracing::warn!(path = %backup.preserved.display(), error = %e, "failed to remove previous directory");
            }
        }
    }

    /// Restore everything recorded so far
    fn rollback(&mut self) {
        for backup in &self.backups {
            let restored = match &backup.content {
                Some(content) => fs::write(&backup.path, content),
                None if backup.path.exists() => fs::remove_file(&backup.path),
                None => Ok(()),
            };
            if let Err(e) = restored {
                tracing::warn!(path = %backup.path.display(), error = %e, "failed to restore file");
            }
        }

        // Deepest first so nested directories go before their parents
        let mut dirs: Vec<_> = self.created_dirs.iter().collect();
        dirs.sort_by_key(|p| std::cmp::Reverse(p.components().count()));
        for path in dirs {
            if path.is_dir() {
                if let Err(e) = fs::remove_dir_all(path) {
                    tracing::warn!(path = %path.display(), error = %e, "failed to remove directory");
                }
            }
        }

        for backup in &self.dir_backups {
            if backup.path.exists() {
                if let Err(e) = fs::remove_dir_all(&backup.path) {
                    tracing::warn!(path = %backup.path.display(), error = %e, "failed to remove directory");
                    continue;
                }
            }
            if let Err(e) = fs::rename(&backup.preserved, &backup.path) {
                tracing::warn!(path = %backup.path.display(), error = %e, "failed to restore directory");
            }
        }
    }
}

impl Drop for Transaction {
    fn drop(&mut self) {
        if !self.committed {
            tracing::debug!(files = self.backups.len(), "rolling back transaction");
            self.rollback();
        }
    }
}
