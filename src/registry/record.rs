//! Installed stub records and the on-disk index format

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::source::StubBundle;

/// Metadata kept for every installed stub
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StubRecord {
    pub name: String,

    /// Firmware family (board port or firmware name)
    pub firmware: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firmware_version: Option<String>,

    /// Where the stub was installed from
    pub source: String,

    pub installed_at: DateTime<Utc>,
}

impl StubRecord {
    pub fn from_bundle(bundle: &StubBundle) -> Self {
        let metadata = bundle.metadata();
        Self {
            name: bundle.name().to_string(),
            firmware: metadata.family().to_string(),
            firmware_version: metadata.firmware.version.clone(),
            source: bundle.origin().to_string(),
            installed_at: Utc::now(),
        }
    }
}

/// `registry.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct RegistryIndex {
    #[serde(default)]
    pub stubs: Vec<StubRecord>,
}
