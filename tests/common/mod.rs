//! Common test utilities for mpstubs integration tests

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// An isolated project, registry home and catalog
#[allow(dead_code)]
pub struct TestWorkspace {
    #[allow(dead_code)]
    pub temp: TempDir,
    /// Project root (commands run here)
    pub path: PathBuf,
    pub home: PathBuf,
    pub catalog: PathBuf,
    catalog_entries: RefCell<Vec<String>>,
}

#[allow(dead_code)]
impl TestWorkspace {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().join("project");
        let home = temp.path().join("home");
        let catalog = temp.path().join("catalog");
        std::fs::create_dir_all(&path).expect("Failed to create project directory");
        std::fs::create_dir_all(&catalog).expect("Failed to create catalog directory");
        Self {
            temp,
            path,
            home,
            catalog,
            catalog_entries: RefCell::new(Vec::new()),
        }
    }

    /// Write `mpstubs.yaml` at the project root
    pub fn init_project(&self, config: &str) {
        self.write_file("mpstubs.yaml", config);
    }

    /// Write a file in the project
    pub fn write_file(&self, path: &str, content: &str) {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    /// Read a file from the project
    pub fn read_file(&self, path: &str) -> String {
        std::fs::read_to_string(self.path.join(path)).expect("Failed to read file")
    }

    /// Add a stub to the catalog and rewrite its index
    pub fn add_catalog_stub(&self, name: &str, port: &str) {
        write_stub_dir(&self.catalog.join(name), port);

        let mut entries = self.catalog_entries.borrow_mut();
        entries.push(name.to_string());
        let index: String = entries
            .iter()
            .map(|n| format!("  - name: {n}\n    path: {n}\n"))
            .collect();
        std::fs::write(self.catalog.join("catalog.yaml"), format!("stubs:\n{index}"))
            .expect("Failed to write catalog index");
    }

    /// Create a stub directory inside the project
    pub fn create_local_stub(&self, dir: &str, port: &str) -> PathBuf {
        let path = self.path.join(dir);
        write_stub_dir(&path, port);
        path
    }

    /// Installed files of `name` in the registry home
    pub fn installed_dir(&self, name: &str) -> PathBuf {
        self.home.join("stubs").join(name)
    }

    /// `mpstubs` running in the project with isolated home and catalog
    #[allow(deprecated)]
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("mpstubs").expect("Failed to find mpstubs binary");
        cmd.current_dir(&self.path);
        // Ignore developer overrides
        cmd.env_remove("MPSTUBS_PROJECT");
        cmd.env_remove("MPSTUBS_CREATESTUBS");
        cmd.env_remove("RUST_LOG");
        cmd.env("MPSTUBS_HOME", &self.home);
        cmd.env("MPSTUBS_CATALOG", &self.catalog);
        cmd
    }
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

/// Write a minimal stub directory
pub fn write_stub_dir(dir: &Path, port: &str) {
    std::fs::create_dir_all(dir).expect("Failed to create stub directory");
    std::fs::write(
        dir.join("modules.json"),
        format!(r#"{{"firmware": {{"name": "micropython", "port": "{port}", "version": "1.22.0"}}}}"#),
    )
    .expect("Failed to write modules.json");
    std::fs::write(dir.join("machine.pyi"), "class Pin: ...\n").expect("Failed to write stub");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_creation() {
        let workspace = TestWorkspace::new();
        assert!(workspace.path.exists());
        assert!(workspace.catalog.exists());
    }

    #[test]
    fn test_catalog_index_lists_every_stub() {
        let workspace = TestWorkspace::new();
        workspace.add_catalog_stub("a", "esp32");
        workspace.add_catalog_stub("b", "rp2");

        let index = std::fs::read_to_string(workspace.catalog.join("catalog.yaml")).unwrap();
        assert!(index.contains("name: a"));
        assert!(index.contains("name: b"));
    }
}
