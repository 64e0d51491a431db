//! Command implementations for the mpstubs CLI
//!
//! Each handler receives an explicit [`CommandContext`] holding the project
//! and the collaborators it talks to, and writes user output to `out`.

pub mod add;
pub mod completions;
pub mod create;
pub mod list;
pub mod remove;

use std::path::PathBuf;

use crate::device::{MpremoteTransport, Transport};
use crate::error::{Result, StubError};
use crate::project::Project;
use crate::registry::{Registry, StubRepository};
use crate::settings::Settings;
use crate::source::{StubLocator, StubSource};

pub struct CommandContext {
    pub project: Option<Project>,
    pub registry: Box<dyn StubRepository>,
    pub source: Box<dyn StubSource>,
    pub transport: Box<dyn Transport>,
    pub settings: Settings,
}

impl CommandContext {
    /// Wire the production collaborators
    ///
    /// The project is looked up from `project_dir`, or the current directory
    /// when none is given.
    pub fn from_settings(settings: Settings, project_dir: Option<PathBuf>) -> Result<Self> {
        let start = match project_dir {
            Some(dir) => dir,
            None => std::env::current_dir().map_err(|e| StubError::IoError {
                message: format!("Failed to get current directory: {e}"),
            })?,
        };
        let project = Project::discover(&start)?;
        if let Some(project) = &project {
            tracing::debug!(project = %project.name(), root = %project.root.display(), "using project");
        }

        Ok(Self {
            project,
            registry: Box::new(Registry::open(&settings.home)?),
            source: Box::new(StubLocator::new(settings.catalog.clone())),
            transport: Box::new(MpremoteTransport::new(settings.mpremote.clone())),
            settings,
        })
    }
}
