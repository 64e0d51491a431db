//! List operation
//!
//! With a project, listing is scoped to the manifest's stub names and the
//! registry is queried once per firmware family they cover. Without one,
//! every installed stub is listed from a single global enumeration.

use crate::error::Result;
use crate::project::Project;
use crate::registry::{StubRecord, StubRepository};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListScope {
    Project(String),
    Global,
}

/// Installed stubs grouped by firmware family, families in sorted order
#[derive(Debug, Clone)]
pub struct ListReport {
    pub scope: ListScope,
    pub groups: Vec<(String, Vec<StubRecord>)>,
    /// Manifest names with no installed record
    pub missing: Vec<String>,
}

impl ListReport {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

pub struct ListOperation<'a> {
    registry: &'a dyn StubRepository,
    project: Option<&'a Project>,
}

impl<'a> ListOperation<'a> {
    pub fn new(registry: &'a dyn StubRepository, project: Option<&'a Project>) -> Self {
        Self { registry, project }
    }

    pub fn execute(&self) -> Result<ListReport> {
        match self.project {
            Some(project) => self.list_project(project),
            None => Ok(self.list_global()),
        }
    }

    fn list_project(&self, project: &Project) -> Result<ListReport> {
        let names = project.manifest().entries()?;

        let groups = self
            .registry
            .families(&names)
            .into_iter()
            .map(|family| {
                let records = self
                    .registry
                    .list_by_firmware(&family, &names)
                    .cloned()
                    .collect();
                (family, records)
            })
            .collect();

        let missing = names
            .iter()
            .filter(|name| self.registry.get(name).is_none())
            .cloned()
            .collect();

        Ok(ListReport {
            scope: ListScope::Project(project.name()),
            groups,
            missing,
        })
    }

    fn list_global(&self) -> ListReport {
        let groups = self
            .registry
            .iter_by_firmware()
            .into_iter()
            .map(|(family, records)| (family, records.into_iter().cloned().collect()))
            .collect();

        ListReport {
            scope: ListScope::Global,
            groups,
            missing: Vec::new(),
        }
    }
}
