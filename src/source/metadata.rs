//! `modules.json` metadata shipped inside every stub directory

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StubError};

/// Metadata file name inside a stub directory
pub const METADATA_FILE: &str = "modules.json";

/// Firmware a stub set was generated from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirmwareInfo {
    /// Firmware name, e.g. `micropython`
    #[serde(alias = "family")]
    pub name: String,

    /// Board port, e.g. `esp32` or `rp2`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Parsed `modules.json`
///
/// Unknown keys (module lists, stubber info) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StubMetadata {
    /// Preferred stub name; the directory name is used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub firmware: FirmwareInfo,
}

impl StubMetadata {
    /// Firmware family used to group installed stubs
    pub fn family(&self) -> &str {
        self.firmware
            .port
            .as_deref()
            .unwrap_or(self.firmware.name.as_str())
    }

    /// Load metadata from a stub directory
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(METADATA_FILE);
        let content = std::fs::read_to_string(&path).map_err(|e| StubError::FileReadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&content).map_err(|e| StubError::ConfigParseFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }
}
