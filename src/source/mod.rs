//! Stub source resolution
//!
//! A [`StubSource`] turns an identifier into a [`StubBundle`]: a private,
//! verified copy of a stub directory that lives as long as the bundle value.
//! Identifiers are either paths to local stub directories or names listed in
//! the catalog.
//!
//! ## Module Organization
//!
//! - `metadata.rs`: `modules.json` parsing and firmware family
//! - `catalog.rs`: catalog index lookup

pub mod catalog;
pub mod metadata;

use std::path::{Component, Path, PathBuf};

use tempfile::TempDir;

use crate::common::fs::{CopyOptions, copy_dir_recursive};
use crate::error::{Result, StubError};
use crate::hash;

pub use catalog::Catalog;
pub use metadata::StubMetadata;

/// Resolves identifiers into staged stub bundles
pub trait StubSource {
    /// Stage the stub named by `identifier`
    ///
    /// The returned bundle owns its staging directory; dropping it removes
    /// the staged files.
    fn ready(&self, identifier: &str) -> Result<StubBundle>;
}

/// A staged, verified stub directory
#[derive(Debug)]
pub struct StubBundle {
    name: String,
    origin: String,
    path: PathBuf,
    metadata: StubMetadata,
    // Removed on drop
    _staging: TempDir,
}

impl StubBundle {
    /// Copy `source` into a fresh staging directory and verify the copy
    ///
    /// Verification requires a parseable `modules.json` and, when
    /// `expected_hash` is given, a matching directory hash.
    pub fn stage(
        name: Option<&str>,
        source: &Path,
        origin: impl Into<String>,
        expected_hash: Option<&str>,
    ) -> Result<Self> {
        let origin = origin.into();
        let label = name.map_or_else(|| origin.clone(), str::to_string);
        let verification = |reason: String| StubError::StubVerificationFailed {
            name: label.clone(),
            reason,
        };

        if let Some(name) = name {
            check_name(name).map_err(&verification)?;
        }

        let staging = tempfile::Builder::new()
            .prefix("mpstubs-stage-")
            .tempdir()?;
        let path = staging.path().join("stub");
        copy_dir_recursive(source, &path, &CopyOptions::exclude_caches())?;

        let metadata = StubMetadata::load(&path).map_err(|e| verification(e.to_string()))?;

        if let Some(expected) = expected_hash {
            let actual = hash::hash_directory(&path)?;
            if !hash::verify_hash(expected, &actual) {
                return Err(verification(format!(
                    "hash mismatch (expected {expected}, got {actual})"
                )));
            }
        }

        let name = match name {
            Some(n) => n.to_string(),
            None => metadata
                .name
                .clone()
                .or_else(|| {
                    source
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                })
                .ok_or_else(|| verification("stub directory has no name".to_string()))?,
        };
        check_name(&name).map_err(&verification)?;

        tracing::debug!(%name, staged = %path.display(), "staged stub bundle");
        Ok(Self {
            name,
            origin,
            path,
            metadata,
            _staging: staging,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Where the bundle was staged from
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Staged stub directory, valid until the bundle is dropped
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn metadata(&self) -> &StubMetadata {
        &self.metadata
    }
}

/// A stub name must be a single plain path component
fn check_name(name: &str) -> std::result::Result<(), String> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(part)), None) if part == name => Ok(()),
        _ => Err(format!("'{name}' is not a valid stub name")),
    }
}

/// Default source: local directories first, then the catalog
#[derive(Debug, Clone)]
pub struct StubLocator {
    catalog_root: PathBuf,
}

impl StubLocator {
    pub fn new(catalog_root: impl Into<PathBuf>) -> Self {
        Self {
            catalog_root: catalog_root.into(),
        }
    }
}

impl StubSource for StubLocator {
    fn ready(&self, identifier: &str) -> Result<StubBundle> {
        let local = Path::new(identifier);
        if local.is_dir() {
            let resolved = dunce::canonicalize(local)?;
            tracing::debug!(path = %resolved.display(), "resolving local stub");
            return StubBundle::stage(None, &resolved, resolved.display().to_string(), None);
        }

        let catalog = Catalog::open(&self.catalog_root)?;
        let entry = catalog
            .find(identifier)
            .ok_or_else(|| StubError::StubNotFound {
                name: identifier.to_string(),
            })?;
        let source = catalog.entry_path(entry);
        if !source.is_dir() {
            return Err(StubError::StubNotFound {
                name: identifier.to_string(),
            });
        }

        tracing::debug!(name = identifier, path = %source.display(), "resolving catalog stub");
        StubBundle::stage(
            Some(identifier),
            &source,
            source.display().to_string(),
            entry.hash.as_deref(),
        )
    }
}
