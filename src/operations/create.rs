//! Create operation: extract stubs from a connected device
//!
//! 1. stage the extraction script, editing its `modules` list when modules
//!    were requested
//! 2. connect, run the script, copy the generated stubs back, disconnect
//! 3. register the copy through [`AddOperation::register`]
//!
//! A failed connection is not an error of the operation; it comes back as
//! [`CreateOutcome::NotConnected`] so the command can report it and carry on.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::changeset::create_changeset;
use crate::device::{DeviceSession, Transport};
use crate::editor::{self, ListArtifact};
use crate::error::{Result, StubError};
use crate::operations::{AddOperation, AddOptions, AddOutcome};
use crate::progress::Spinner;
use crate::project::Project;
use crate::registry::StubRepository;
use crate::source::{StubBundle, StubMetadata, StubSource};

/// Directory the extraction script writes on the device
pub const DEVICE_STUBS_DIR: &str = "/stubs";

/// Anchor of the module list inside the extraction script
pub const MODULES_ANCHOR: &str = "modules";

#[derive(Debug, Clone)]
pub struct CreateOptions {
    pub port: String,
    pub script: PathBuf,
    /// `None` runs the script unchanged
    pub modules: Option<Vec<String>>,
}

#[derive(Debug)]
pub enum CreateOutcome {
    Created(AddOutcome),
    NotConnected(StubError),
}

pub struct CreateOperation<'a> {
    transport: &'a dyn Transport,
    registry: &'a mut dyn StubRepository,
    source: &'a dyn StubSource,
    project: Option<&'a Project>,
}

impl<'a> CreateOperation<'a> {
    pub fn new(
        transport: &'a dyn Transport,
        registry: &'a mut dyn StubRepository,
        source: &'a dyn StubSource,
        project: Option<&'a Project>,
    ) -> Self {
        Self {
            transport,
            registry,
            source,
            project,
        }
    }

    pub fn execute(&mut self, options: &CreateOptions) -> Result<CreateOutcome> {
        let workdir = tempfile::Builder::new().prefix("mpstubs-create-").tempdir()?;
        let script = stage_script(&options.script, options.modules.clone(), &workdir)?;

        let mut session = match DeviceSession::open(self.transport, &options.port) {
            Ok(session) => session,
            Err(e) if e.is_connection() => {
                tracing::warn!(port = %options.port, error = %e, "device not reachable");
                return Ok(CreateOutcome::NotConnected(e));
            }
            Err(e) => return Err(e),
        };

        let generated = {
            let spinner = Spinner::new(format!("Generating stubs on {}", options.port));
            session.run_script(&script)?;
            spinner.set_message("Copying stubs from device");
            session.copy_from(DEVICE_STUBS_DIR, &workdir.path().join("device"))?
        };
        tracing::debug!(state = ?session.state(), copied = %generated.display(), "stubs retrieved");
        session.disconnect()?;

        let metadata = StubMetadata::load(&generated).map_err(|e| {
            StubError::StubVerificationFailed {
                name: options.port.clone(),
                reason: e.to_string(),
            }
        })?;
        let name = device_stub_name(&metadata);
        let bundle = StubBundle::stage(
            Some(&name),
            &generated,
            format!("device:{}", options.port),
            None,
        )?;

        // A fresh extraction always replaces what was installed
        let outcome = AddOperation::new(&mut *self.registry, self.source, self.project)
            .register(&bundle, AddOptions { force: true })?;
        Ok(CreateOutcome::Created(outcome))
    }
}

/// Copy the script into `workdir`, applying the module list when given
fn stage_script(script: &Path, modules: Option<Vec<String>>, workdir: &TempDir) -> Result<PathBuf> {
    let Some(change) = create_changeset(modules) else {
        if !script.is_file() {
            return Err(StubError::FileReadFailed {
                path: script.display().to_string(),
                reason: "script not found".to_string(),
            });
        }
        return Ok(script.to_path_buf());
    };

    let artifact = ListArtifact::load(script, MODULES_ANCHOR)?;
    let edited = editor::apply(&artifact, &change)?;
    let file_name = script
        .file_name()
        .map_or_else(|| "createstubs.py".into(), ToOwned::to_owned);
    let staged = workdir.path().join(file_name);
    edited.save(&staged)?;
    tracing::debug!(script = %staged.display(), "staged extraction script");
    Ok(staged)
}

/// Registry name for a freshly extracted stub set
///
/// `modules.json` may carry an explicit name; otherwise it is derived from the
/// firmware, e.g. `micropython-esp32-1.22.0`.
pub fn device_stub_name(metadata: &StubMetadata) -> String {
    if let Some(name) = &metadata.name {
        return name.clone();
    }

    let firmware = &metadata.firmware;
    let mut parts = vec![firmware.name.as_str()];
    let family = metadata.family();
    if family != firmware.name {
        parts.push(family);
    }
    if let Some(version) = &firmware.version {
        parts.push(version);
    }
    parts.join("-")
}
