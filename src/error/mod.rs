//! Error types and handling for mpstubs
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! Errors are grouped by the pipeline stage that raises them:
//! - manifest editing (anchor lookup, malformed list, contradictory edits)
//! - stub resolution (not found, verification)
//! - registry and project configuration
//! - device sessions (connection, on-device script failures)
//! - file system

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for mpstubs operations
#[derive(Error, Diagnostic, Debug)]
pub enum StubError {
    // Manifest errors
    #[error("No list assigned to '{anchor}' found in {artifact}")]
    #[diagnostic(
        code(mpstubs::manifest::anchor_not_found),
        help("The manifest needs a list literal such as `{anchor} = []` or `\"{anchor}\": []`")
    )]
    AnchorNotFound { anchor: String, artifact: String },

    #[error("Malformed list in {artifact}: {reason}")]
    #[diagnostic(code(mpstubs::manifest::malformed))]
    MalformedArtifact { artifact: String, reason: String },

    #[error("Stub '{name}' is both added and removed in the same change")]
    #[diagnostic(code(mpstubs::manifest::contradictory_change))]
    ContradictoryChange { name: String },

    // Resolution errors
    #[error("Stub '{name}' not found")]
    #[diagnostic(
        code(mpstubs::source::not_found),
        help("Pass a path to a stub directory or a name listed in the catalog")
    )]
    StubNotFound { name: String },

    #[error("Stub '{name}' failed verification: {reason}")]
    #[diagnostic(code(mpstubs::source::verification_failed))]
    StubVerificationFailed { name: String, reason: String },

    // Registry errors
    #[error("Stub '{name}' is not installed")]
    #[diagnostic(
        code(mpstubs::registry::not_installed),
        help("Run 'mpstubs list' to see installed stubs")
    )]
    StubNotInstalled { name: String },

    // Configuration errors
    #[error("Failed to parse configuration file: {path}")]
    #[diagnostic(code(mpstubs::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    #[error("Could not determine data directory for the stub registry")]
    #[diagnostic(
        code(mpstubs::config::no_home),
        help("Set MPSTUBS_HOME to choose a registry location")
    )]
    NoRegistryHome,

    // Device errors
    #[error("Could not connect to device on {port}: {reason}")]
    #[diagnostic(
        code(mpstubs::device::connection),
        help("Check that the board is plugged in and no other program holds the port")
    )]
    Connection { port: String, reason: String },

    #[error("Stub extraction script failed on device: {message}")]
    #[diagnostic(code(mpstubs::device::script_failed))]
    ScriptExecution { message: String },

    #[error("Failed to copy '{remote}' from device: {reason}")]
    #[diagnostic(code(mpstubs::device::copy_failed))]
    DeviceCopyFailed { remote: String, reason: String },

    // File system errors
    #[error("Failed to read file: {path}")]
    #[diagnostic(code(mpstubs::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file: {path}")]
    #[diagnostic(code(mpstubs::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(mpstubs::fs::io_error))]
    IoError { message: String },
}

impl StubError {
    /// Whether the command layer recovers from this error instead of failing
    pub fn is_connection(&self) -> bool {
        matches!(self, StubError::Connection { .. })
    }
}

impl From<std::io::Error> for StubError {
    fn from(err: std::io::Error) -> Self {
        StubError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for StubError {
    fn from(err: serde_yaml::Error) -> Self {
        StubError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for StubError {
    fn from(err: serde_json::Error) -> Self {
        StubError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, StubError>;
