//! Environment-driven settings
//!
//! | variable              | default                      |
//! |-----------------------|------------------------------|
//! | `MPSTUBS_HOME`        | `<data dir>/mpstubs`         |
//! | `MPSTUBS_CATALOG`     | `<home>/catalog`             |
//! | `MPSTUBS_MPREMOTE`    | `mpremote`                   |
//! | `MPSTUBS_CREATESTUBS` | `<home>/createstubs.py`      |
//!
//! `MPSTUBS_PROJECT` is read by clap as the default of `--project`.

use std::path::PathBuf;

use crate::device::mpremote::DEFAULT_PROGRAM;
use crate::error::{Result, StubError};

pub const HOME_ENV: &str = "MPSTUBS_HOME";
pub const CATALOG_ENV: &str = "MPSTUBS_CATALOG";
pub const MPREMOTE_ENV: &str = "MPSTUBS_MPREMOTE";
pub const CREATESTUBS_ENV: &str = "MPSTUBS_CREATESTUBS";

/// Default extraction script name inside the registry home
pub const CREATESTUBS_FILE: &str = "createstubs.py";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Registry home
    pub home: PathBuf,
    pub catalog: PathBuf,
    pub mpremote: PathBuf,
    pub createstubs: PathBuf,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::resolve(|key| std::env::var_os(key).filter(|v| !v.is_empty()).map(PathBuf::from))
    }

    fn resolve(lookup: impl Fn(&str) -> Option<PathBuf>) -> Result<Self> {
        let home = match lookup(HOME_ENV) {
            Some(home) => home,
            None => dirs::data_dir()
                .map(|dir| dir.join("mpstubs"))
                .ok_or(StubError::NoRegistryHome)?,
        };
        let catalog = lookup(CATALOG_ENV).unwrap_or_else(|| home.join("catalog"));
        let mpremote = lookup(MPREMOTE_ENV).unwrap_or_else(|| PathBuf::from(DEFAULT_PROGRAM));
        let createstubs = lookup(CREATESTUBS_ENV).unwrap_or_else(|| home.join(CREATESTUBS_FILE));

        Ok(Self {
            home,
            catalog,
            mpremote,
            createstubs,
        })
    }
}
