//! Stub registry: the persistent record of installed stubs
//!
//! ## Registry Structure
//!
//! ```text
//! $MPSTUBS_HOME/
//! ├── registry.yaml        # StubRecord index
//! └── stubs/
//!     └── <stub-name>/     # installed stub files
//! ```
//!
//! The registry is global. Projects narrow it down to the names their
//! manifest lists; see [`StubRepository::list_by_firmware`].

mod record;

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::common::fs::{CopyOptions, copy_dir_recursive, write_atomic};
use crate::error::{Result, StubError};
use crate::source::StubBundle;

pub use record::StubRecord;
use record::RegistryIndex;

/// Index file name
pub const INDEX_FILE: &str = "registry.yaml";

/// Installed stubs subdirectory
pub const STUBS_DIR: &str = "stubs";

/// Records grouped by firmware family
pub type FirmwareGroups<'a> = BTreeMap<String, Vec<&'a StubRecord>>;

/// Access to installed stub records
///
/// Enumeration methods have default implementations on top of
/// [`StubRepository::records`].
pub trait StubRepository {
    /// All records, in install order
    fn records(&self) -> &[StubRecord];

    /// Copy a staged bundle into the registry and write its record
    ///
    /// An existing record with the same name is replaced.
    fn install(&mut self, bundle: &StubBundle) -> Result<StubRecord>;

    /// Delete a stub's files and record
    fn uninstall(&mut self, name: &str) -> Result<StubRecord>;

    /// Files and directories `install`/`uninstall` write for `name`
    fn footprint(&self, name: &str) -> Result<Footprint>;

    fn get(&self, name: &str) -> Option<&StubRecord> {
        self.records().iter().find(|r| r.name == name)
    }

    /// Records of one firmware family whose names appear in `names`
    fn list_by_firmware<'a>(
        &'a self,
        firmware: &'a str,
        names: &'a [String],
    ) -> Box<dyn Iterator<Item = &'a StubRecord> + 'a> {
        Box::new(
            self.records()
                .iter()
                .filter(move |r| r.firmware == firmware && names.contains(&r.name)),
        )
    }

    /// Every installed record grouped by family
    fn iter_by_firmware(&self) -> FirmwareGroups<'_> {
        let mut groups = FirmwareGroups::new();
        for record in self.records() {
            groups
                .entry(record.firmware.clone())
                .or_default()
                .push(record);
        }
        groups
    }

    /// Families of the installed records named in `names`
    fn families(&self, names: &[String]) -> BTreeSet<String> {
        self.records()
            .iter()
            .filter(|r| names.contains(&r.name))
            .map(|r| r.firmware.clone())
            .collect()
    }
}

/// Paths a registry mutation touches, for transaction backups
#[derive(Debug, Clone, Default)]
pub struct Footprint {
    pub files: Vec<PathBuf>,
    /// Install directory of the stub, for repositories that keep files
    pub dir: Option<PathBuf>,
}

/// File-backed registry
#[derive(Debug)]
pub struct Registry {
    root: PathBuf,
    index: RegistryIndex,
}

impl Registry {
    /// Open the registry rooted at `root`; a missing index is an empty registry
    pub fn open(root: &Path) -> Result<Self> {
        let index_path = root.join(INDEX_FILE);
        let index = if index_path.is_file() {
            let content =
                fs::read_to_string(&index_path).map_err(|e| StubError::FileReadFailed {
                    path: index_path.display().to_string(),
                    reason: e.to_string(),
                })?;
            serde_yaml::from_str(&content).map_err(|e| StubError::ConfigParseFailed {
                path: index_path.display().to_string(),
                reason: e.to_string(),
            })?
        } else {
            RegistryIndex::default()
        };

        tracing::debug!(root = %root.display(), stubs = index.stubs.len(), "opened registry");
        Ok(Self {
            root: root.to_path_buf(),
            index,
        })
    }

    pub fn index_path(&self) -> PathBuf {
        self.root.join(INDEX_FILE)
    }

    /// Directory holding the installed files of `name`
    ///
    /// Always a direct child of `stubs/`; names that would resolve anywhere
    /// else are rejected.
    pub fn install_dir(&self, name: &str) -> Result<PathBuf> {
        let safe: String = name
            .chars()
            .map(|c| if matches!(c, '/' | '\\' | ':') { '_' } else { c })
            .collect();
        let mut components = Path::new(&safe).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(part)), None) if part == safe.as_str() => {
                Ok(self.root.join(STUBS_DIR).join(part))
            }
            _ => Err(StubError::StubVerificationFailed {
                name: name.to_string(),
                reason: "name cannot be used as an install directory".to_string(),
            }),
        }
    }

    fn save(&self) -> Result<()> {
        let yaml = serde_yaml::to_string(&self.index)?;
        write_atomic(&self.index_path(), yaml.as_bytes())
    }

    fn upsert(&mut self, record: StubRecord) {
        match self.index.stubs.iter_mut().find(|r| r.name == record.name) {
            Some(existing) => *existing = record,
            None => self.index.stubs.push(record),
        }
    }
}

impl StubRepository for Registry {
    fn records(&self) -> &[StubRecord] {
        &self.index.stubs
    }

    fn install(&mut self, bundle: &StubBundle) -> Result<StubRecord> {
        let dest = self.install_dir(bundle.name())?;
        let incoming = dest.with_file_name(format!(
            ".incoming-{}",
            dest.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default()
        ));

        if incoming.exists() {
            fs::remove_dir_all(&incoming)?;
        }
        if let Err(e) = copy_dir_recursive(bundle.path(), &incoming, &CopyOptions::default()) {
            let _ = fs::remove_dir_all(&incoming);
            return Err(StubError::FileWriteFailed {
                path: dest.display().to_string(),
                reason: e.to_string(),
            });
        }
        if dest.exists() {
            fs::remove_dir_all(&dest)?;
        }
        fs::rename(&incoming, &dest)?;

        let record = StubRecord::from_bundle(bundle);
        self.upsert(record.clone());
        self.save()?;
        tracing::info!(name = %record.name, firmware = %record.firmware, "installed stub");
        Ok(record)
    }

    fn uninstall(&mut self, name: &str) -> Result<StubRecord> {
        let position = self
            .index
            .stubs
            .iter()
            .position(|r| r.name == name)
            .ok_or_else(|| StubError::StubNotInstalled {
                name: name.to_string(),
            })?;

        let dir = self.install_dir(name)?;
        if dir.exists() {
            fs::remove_dir_all(&dir)?;
        }
        let record = self.index.stubs.remove(position);
        self.save()?;
        tracing::info!(name, "uninstalled stub");
        Ok(record)
    }

    fn footprint(&self, name: &str) -> Result<Footprint> {
        Ok(Footprint {
            files: vec![self.index_path()],
            dir: Some(self.install_dir(name)?),
        })
    }
}
