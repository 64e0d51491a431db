//! Project detection and manifest access
//!
//! A project is the nearest ancestor directory holding `mpstubs.yaml`:
//!
//! ```yaml
//! name: weather-station
//! manifest: mpstubs.yaml   # file holding the stub list (default)
//! anchor: stubs            # name the list is assigned to (default)
//! stubs: ["micropython-esp32-stubs"]
//! ```
//!
//! The manifest may be any text file (`pyproject.toml`, a Python module, JSON)
//! as long as it contains a list literal assigned to `anchor`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::changeset::ChangeSet;
use crate::editor::{self, ListArtifact};
use crate::error::{Result, StubError};

/// Project configuration file name
pub const PROJECT_FILE: &str = "mpstubs.yaml";

/// Default anchor of the stub list
pub const DEFAULT_ANCHOR: &str = "stubs";

/// `mpstubs.yaml`
///
/// The stub list itself is edited as text and never deserialized here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub manifest: Option<PathBuf>,

    #[serde(default)]
    pub anchor: Option<String>,
}

/// A project directory and its manifest location
#[derive(Debug, Clone)]
pub struct Project {
    pub root: PathBuf,
    pub config: ProjectConfig,
}

impl Project {
    /// Find the project root by walking up from `start`
    pub fn find_from(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .find(|dir| dir.join(PROJECT_FILE).is_file())
            .map(Path::to_path_buf)
    }

    /// Open the project rooted at `root`
    pub fn open(root: &Path) -> Result<Self> {
        let config_path = root.join(PROJECT_FILE);
        let content = fs::read_to_string(&config_path).map_err(|e| StubError::FileReadFailed {
            path: config_path.display().to_string(),
            reason: e.to_string(),
        })?;
        let config: ProjectConfig = serde_yaml::from_str::<Option<ProjectConfig>>(&content)
            .map_err(|e| StubError::ConfigParseFailed {
                path: config_path.display().to_string(),
                reason: e.to_string(),
            })?
            .unwrap_or_default();

        tracing::debug!(root = %root.display(), "opened project");
        Ok(Self {
            root: root.to_path_buf(),
            config,
        })
    }

    /// Open the project containing `start`, if there is one
    pub fn discover(start: &Path) -> Result<Option<Self>> {
        let start = dunce::canonicalize(start).unwrap_or_else(|_| start.to_path_buf());
        Self::find_from(&start).map(|root| Self::open(&root)).transpose()
    }

    pub fn name(&self) -> String {
        self.config.name.clone().unwrap_or_else(|| {
            self.root
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default()
        })
    }

    pub fn manifest(&self) -> Manifest {
        let relative = self
            .config
            .manifest
            .clone()
            .unwrap_or_else(|| PathBuf::from(PROJECT_FILE));
        Manifest {
            path: self.root.join(relative),
            anchor: self
                .config
                .anchor
                .clone()
                .unwrap_or_else(|| DEFAULT_ANCHOR.to_string()),
        }
    }
}

/// The artifact holding a project's stub list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub path: PathBuf,
    pub anchor: String,
}

impl Manifest {
    pub fn load(&self) -> Result<ListArtifact> {
        ListArtifact::load(&self.path, self.anchor.as_str())
    }

    /// Stub names currently listed
    pub fn entries(&self) -> Result<Vec<String>> {
        self.load()?.entries()
    }

    /// Compute the edited manifest without writing it
    ///
    /// Returns `None` when the change leaves the text as it is.
    pub fn plan(&self, change: &ChangeSet) -> Result<Option<ListArtifact>> {
        let current = self.load()?;
        let updated = editor::apply(&current, change)?;
        Ok((updated.text() != current.text()).then_some(updated))
    }
}
