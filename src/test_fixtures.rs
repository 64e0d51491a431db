//! Test fixtures: fakes for the collaborator traits plus on-disk helpers
//!
//! The fakes record how they were called so tests can assert on call counts
//! instead of setting up mock expectations.
//!
//! # Usage
//!
//! ```ignore
//! use crate::test_fixtures::{FakeRegistry, FakeSource, create_project};
//!
//! let temp = TempDir::new().unwrap();
//! let project = create_project(temp.path(), "stubs: []\n");
//! let source = FakeSource::new(temp.path()).with_stub("esp32-stubs", "esp32");
//! let mut registry = FakeRegistry::default();
//! ```

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::device::{Connection, Transport};
use crate::error::{Result, StubError};
use crate::project::{PROJECT_FILE, Project};
use crate::registry::{FirmwareGroups, Footprint, StubRecord, StubRepository};
use crate::source::metadata::METADATA_FILE;
use crate::source::{StubBundle, StubSource};

/// Write a minimal stub directory for firmware port `port`
///
/// # Panics
///
/// Panics if the directory cannot be written.
pub fn write_stub_dir(dir: &Path, port: &str) {
    std::fs::create_dir_all(dir).expect("Failed to create stub directory");
    std::fs::write(
        dir.join(METADATA_FILE),
        format!(r#"{{"firmware": {{"name": "micropython", "port": "{port}", "version": "1.22.0"}}}}"#),
    )
    .expect("Failed to write modules.json");
    std::fs::write(dir.join("machine.pyi"), "class Pin: ...\n").expect("Failed to write stub");
}

/// Write `mpstubs.yaml` into `dir` and open it as a project
///
/// # Panics
///
/// Panics if the file cannot be written or parsed.
#[must_use]
pub fn create_project(dir: &Path, config: &str) -> Project {
    std::fs::write(dir.join(PROJECT_FILE), config).expect("Failed to write project file");
    Project::open(dir).expect("Failed to open project")
}

/// Source serving stub directories created under a test root
pub struct FakeSource {
    root: PathBuf,
    stubs: HashMap<String, PathBuf>,
    ready_calls: Cell<usize>,
}

impl FakeSource {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.join("fake-source"),
            stubs: HashMap::new(),
            ready_calls: Cell::new(0),
        }
    }

    #[must_use]
    pub fn with_stub(mut self, name: &str, port: &str) -> Self {
        let dir = self.root.join(name);
        write_stub_dir(&dir, port);
        self.stubs.insert(name.to_string(), dir);
        self
    }

    pub fn ready_calls(&self) -> usize {
        self.ready_calls.get()
    }
}

impl StubSource for FakeSource {
    fn ready(&self, identifier: &str) -> Result<StubBundle> {
        self.ready_calls.set(self.ready_calls.get() + 1);
        let dir = self
            .stubs
            .get(identifier)
            .ok_or_else(|| StubError::StubNotFound {
                name: identifier.to_string(),
            })?;
        StubBundle::stage(Some(identifier), dir, format!("fake:{identifier}"), None)
    }
}

/// In-memory registry that counts enumeration calls
#[derive(Default)]
pub struct FakeRegistry {
    records: Vec<StubRecord>,
    fail_install: bool,
    fail_uninstall: bool,
    list_by_firmware_calls: Cell<usize>,
    iter_by_firmware_calls: Cell<usize>,
}

impl FakeRegistry {
    #[must_use]
    pub fn with_record(mut self, name: &str, firmware: &str) -> Self {
        self.records.push(StubRecord {
            name: name.to_string(),
            firmware: firmware.to_string(),
            firmware_version: None,
            source: format!("fake:{name}"),
            installed_at: chrono::Utc::now(),
        });
        self
    }

    #[must_use]
    pub fn failing_installs(mut self) -> Self {
        self.fail_install = true;
        self
    }

    #[must_use]
    pub fn failing_uninstalls(mut self) -> Self {
        self.fail_uninstall = true;
        self
    }

    pub fn list_by_firmware_calls(&self) -> usize {
        self.list_by_firmware_calls.get()
    }

    pub fn iter_by_firmware_calls(&self) -> usize {
        self.iter_by_firmware_calls.get()
    }
}

impl StubRepository for FakeRegistry {
    fn records(&self) -> &[StubRecord] {
        &self.records
    }

    fn install(&mut self, bundle: &StubBundle) -> Result<StubRecord> {
        if self.fail_install {
            return Err(StubError::FileWriteFailed {
                path: bundle.name().to_string(),
                reason: "install failure".to_string(),
            });
        }
        let record = StubRecord::from_bundle(bundle);
        self.records.retain(|r| r.name != record.name);
        self.records.push(record.clone());
        Ok(record)
    }

    fn uninstall(&mut self, name: &str) -> Result<StubRecord> {
        if self.fail_uninstall {
            return Err(StubError::IoError {
                message: "uninstall failure".to_string(),
            });
        }
        let position = self
            .records
            .iter()
            .position(|r| r.name == name)
            .ok_or_else(|| StubError::StubNotInstalled {
                name: name.to_string(),
            })?;
        Ok(self.records.remove(position))
    }

    fn footprint(&self, _name: &str) -> Result<Footprint> {
        Ok(Footprint::default())
    }

    fn list_by_firmware<'a>(
        &'a self,
        firmware: &'a str,
        names: &'a [String],
    ) -> Box<dyn Iterator<Item = &'a StubRecord> + 'a> {
        self.list_by_firmware_calls
            .set(self.list_by_firmware_calls.get() + 1);
        Box::new(
            self.records
                .iter()
                .filter(move |r| r.firmware == firmware && names.contains(&r.name)),
        )
    }

    fn iter_by_firmware(&self) -> FirmwareGroups<'_> {
        self.iter_by_firmware_calls
            .set(self.iter_by_firmware_calls.get() + 1);
        let mut groups = FirmwareGroups::new();
        for record in &self.records {
            groups
                .entry(record.firmware.clone())
                .or_default()
                .push(record);
        }
        groups
    }
}

/// Calls observed by a [`FakeTransport`]
#[derive(Debug, Clone, Default)]
pub struct DeviceLog {
    pub connects: usize,
    pub scripts: usize,
    /// Content of every script passed to `run_script`
    pub script_texts: Vec<String>,
    pub copies: usize,
    pub disconnects: usize,
}

/// Transport whose device writes an esp32 stub set on copy
#[derive(Default)]
pub struct FakeTransport {
    refuse: bool,
    script_error: Option<String>,
    fail_copies: bool,
    log: Rc<RefCell<DeviceLog>>,
}

impl FakeTransport {
    #[must_use]
    pub fn refusing_connections(mut self) -> Self {
        self.refuse = true;
        self
    }

    #[must_use]
    pub fn with_script_error(mut self, message: &str) -> Self {
        self.script_error = Some(message.to_string());
        self
    }

    #[must_use]
    pub fn failing_copies(mut self) -> Self {
        self.fail_copies = true;
        self
    }

    pub fn log(&self) -> DeviceLog {
        self.log.borrow().clone()
    }
}

impl Transport for FakeTransport {
    fn connect(&self, port: &str) -> Result<Box<dyn Connection>> {
        if self.refuse {
            return Err(StubError::Connection {
                port: port.to_string(),
                reason: "no such device".to_string(),
            });
        }
        self.log.borrow_mut().connects += 1;
        Ok(Box::new(FakeConnection {
            script_error: self.script_error.clone(),
            fail_copies: self.fail_copies,
            log: Rc::clone(&self.log),
        }))
    }
}

struct FakeConnection {
    script_error: Option<String>,
    fail_copies: bool,
    log: Rc<RefCell<DeviceLog>>,
}

impl Connection for FakeConnection {
    fn run_script(&mut self, script: &Path) -> Result<()> {
        {
            let mut log = self.log.borrow_mut();
            log.scripts += 1;
            log.script_texts
                .push(std::fs::read_to_string(script).unwrap_or_default());
        }
        match &self.script_error {
            Some(message) => Err(StubError::ScriptExecution {
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }

    fn copy_from(&mut self, remote: &str, local_dir: &Path) -> Result<PathBuf> {
        self.log.borrow_mut().copies += 1;
        if self.fail_copies {
            return Err(StubError::DeviceCopyFailed {
                remote: remote.to_string(),
                reason: "no such directory".to_string(),
            });
        }
        let name = remote.trim_matches('/');
        let dest = local_dir.join(name);
        write_stub_dir(&dest, "esp32");
        Ok(dest)
    }

    fn disconnect(&mut self) -> Result<()> {
        self.log.borrow_mut().disconnects += 1;
        Ok(())
    }
}
