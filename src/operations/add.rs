//! Add operation
//!
//! Order of work:
//! 1. already-installed check (skipped with `force`)
//! 2. resolve and stage the bundle; failures stop here with nothing written
//! 3. plan the manifest edit in memory
//! 4. install and save the manifest inside a [`Transaction`]

use crate::changeset::ChangeSet;
use crate::editor::ListArtifact;
use crate::error::Result;
use crate::project::{Manifest, Project};
use crate::registry::{StubRecord, StubRepository};
use crate::source::{StubBundle, StubSource};
use crate::transaction::Transaction;

/// Options for add
#[derive(Debug, Clone, Copy, Default)]
pub struct AddOptions {
    /// Re-stage from source even when the stub is already installed
    pub force: bool,
}

/// What an add did
#[derive(Debug, Clone)]
pub struct AddOutcome {
    pub record: StubRecord,
    pub already_installed: bool,
    pub manifest_updated: bool,
}

pub struct AddOperation<'a> {
    registry: &'a mut dyn StubRepository,
    source: &'a dyn StubSource,
    manifest: Option<Manifest>,
}

impl<'a> AddOperation<'a> {
    pub fn new(
        registry: &'a mut dyn StubRepository,
        source: &'a dyn StubSource,
        project: Option<&Project>,
    ) -> Self {
        Self {
            registry,
            source,
            manifest: project.map(Project::manifest),
        }
    }

    /// Resolve `identifier` and register it
    pub fn execute(&mut self, identifier: &str, options: AddOptions) -> Result<AddOutcome> {
        if !options.force {
            if let Some(record) = self.registry.get(identifier).cloned() {
                tracing::debug!(name = identifier, "stub already installed");
                return self.sync_installed(record);
            }
        }

        let bundle = self.source.ready(identifier)?;
        self.register(&bundle, options)
    }

    /// Register an already staged bundle
    pub fn register(&mut self, bundle: &StubBundle, options: AddOptions) -> Result<AddOutcome> {
        if !options.force {
            if let Some(record) = self.registry.get(bundle.name()).cloned() {
                return self.sync_installed(record);
            }
        }

        let planned = self.plan(bundle.name())?;
        let footprint = self.registry.footprint(bundle.name())?;

        let mut transaction = Transaction::new();
        for file in &footprint.files {
            transaction.backup_file(file)?;
        }
        if let Some(dir) = &footprint.dir {
            transaction.backup_dir(dir)?;
        }
        if let (Some(manifest), Some(_)) = (&self.manifest, &planned) {
            transaction.backup_file(&manifest.path)?;
        }

        let record = self.registry.install(bundle)?;
        let manifest_updated = self.save_planned(planned)?;
        transaction.commit();

        tracing::info!(name = %record.name, manifest_updated, "stub added");
        Ok(AddOutcome {
            record,
            already_installed: false,
            manifest_updated,
        })
    }

    /// Keep the manifest in step with a stub that is already registered
    fn sync_installed(&self, record: StubRecord) -> Result<AddOutcome> {
        let planned = self.plan(&record.name)?;
        let manifest_updated = self.save_planned(planned)?;
        Ok(AddOutcome {
            record,
            already_installed: true,
            manifest_updated,
        })
    }

    fn plan(&self, name: &str) -> Result<Option<ListArtifact>> {
        match &self.manifest {
            Some(manifest) => manifest.plan(&ChangeSet::adding([name])),
            None => Ok(None),
        }
    }

    fn save_planned(&self, planned: Option<ListArtifact>) -> Result<bool> {
        match (&self.manifest, planned) {
            (Some(manifest), Some(updated)) => {
                updated.save(&manifest.path)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
