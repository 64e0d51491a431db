//! Local stub catalog (`catalog.yaml`)
//!
//! A catalog is a directory of stub packages plus an index:
//!
//! ```yaml
//! stubs:
//!   - name: micropython-esp32-stubs
//!     path: esp32/1.22.0
//!     hash: "blake3:..."
//! ```
//!
//! Paths are relative to the catalog root. Fetching from remote catalogs is
//! left to whatever mirrors them into this layout.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Result, StubError};

/// Catalog index file name
pub const CATALOG_FILE: &str = "catalog.yaml";

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub path: PathBuf,
    /// Expected BLAKE3 hash of the stub directory
    #[serde(default)]
    pub hash: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Catalog {
    #[serde(skip)]
    root: PathBuf,
    #[serde(default)]
    stubs: Vec<CatalogEntry>,
}

impl Catalog {
    /// Open the catalog at `root`; a directory without an index is an empty catalog
    pub fn open(root: &Path) -> Result<Self> {
        let index = root.join(CATALOG_FILE);
        if !index.is_file() {
            tracing::debug!(root = %root.display(), "no catalog index");
            return Ok(Self {
                root: root.to_path_buf(),
                stubs: Vec::new(),
            });
        }

        let content = std::fs::read_to_string(&index).map_err(|e| StubError::FileReadFailed {
            path: index.display().to_string(),
            reason: e.to_string(),
        })?;
        let mut catalog: Self =
            serde_yaml::from_str(&content).map_err(|e| StubError::ConfigParseFailed {
                path: index.display().to_string(),
                reason: e.to_string(),
            })?;
        catalog.root = root.to_path_buf();
        Ok(catalog)
    }

    pub fn find(&self, name: &str) -> Option<&CatalogEntry> {
        self.stubs.iter().find(|e| e.name == name)
    }

    /// Absolute location of an entry's stub directory
    pub fn entry_path(&self, entry: &CatalogEntry) -> PathBuf {
        self.root.join(&entry.path)
    }
}
