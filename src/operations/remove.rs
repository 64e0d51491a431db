//! Remove operation
//!
//! The manifest is saved before the registry is touched, so a failed
//! uninstall restores the manifest from the transaction backup.

use crate::changeset::ChangeSet;
use crate::error::{Result, StubError};
use crate::project::{Manifest, Project};
use crate::registry::{StubRecord, StubRepository};
use crate::transaction::Transaction;

#[derive(Debug, Clone)]
pub struct RemoveOutcome {
    pub record: StubRecord,
    pub manifest_updated: bool,
}

pub struct RemoveOperation<'a> {
    registry: &'a mut dyn StubRepository,
    manifest: Option<Manifest>,
}

impl<'a> RemoveOperation<'a> {
    pub fn new(registry: &'a mut dyn StubRepository, project: Option<&Project>) -> Self {
        Self {
            registry,
            manifest: project.map(Project::manifest),
        }
    }

    pub fn execute(&mut self, name: &str) -> Result<RemoveOutcome> {
        if self.registry.get(name).is_none() {
            return Err(StubError::StubNotInstalled {
                name: name.to_string(),
            });
        }

        let planned = match &self.manifest {
            Some(manifest) => manifest
                .plan(&ChangeSet::removing([name]))?
                .map(|updated| (manifest, updated)),
            None => None,
        };

        let footprint = self.registry.footprint(name)?;
        let mut transaction = Transaction::new();
        for file in &footprint.files {
            transaction.backup_file(file)?;
        }
        if let Some(dir) = &footprint.dir {
            transaction.backup_dir(dir)?;
        }

        let manifest_updated = match planned {
            Some((manifest, updated)) => {
                transaction.backup_file(&manifest.path)?;
                updated.save(&manifest.path)?;
                true
            }
            None => false,
        };

        let record = self.registry.uninstall(name)?;
        transaction.commit();

        tracing::info!(name, manifest_updated, "stub removed");
        Ok(RemoveOutcome {
            record,
            manifest_updated,
        })
    }
}
