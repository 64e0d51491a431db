//! Device sessions
//!
//! A [`Transport`] opens a [`Connection`] to a board; [`DeviceSession`] wraps
//! the connection and tracks its state:
//!
//! ```text
//! Disconnected -> Connected -> ScriptRunning -> Connected -> Disconnected
//! ```
//!
//! Every session that reached `Connected` is disconnected exactly once, either
//! through [`DeviceSession::disconnect`] or when the session is dropped.

pub mod mpremote;

use std::path::{Path, PathBuf};

use crate::error::{Result, StubError};

pub use mpremote::MpremoteTransport;

/// Opens connections to devices
pub trait Transport {
    fn connect(&self, port: &str) -> Result<Box<dyn Connection>>;
}

/// An open link to one device
pub trait Connection {
    /// Execute a local script on the device
    fn run_script(&mut self, script: &Path) -> Result<()>;

    /// Copy a device directory into `local_dir`, returning the copied tree
    fn copy_from(&mut self, remote: &str, local_dir: &Path) -> Result<PathBuf>;

    fn disconnect(&mut self) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Connected,
    ScriptRunning,
}

pub struct DeviceSession {
    port: String,
    connection: Option<Box<dyn Connection>>,
    state: SessionState,
}

impl DeviceSession {
    pub fn open(transport: &dyn Transport, port: &str) -> Result<Self> {
        let connection = transport.connect(port)?;
        tracing::debug!(port, "device connected");
        Ok(Self {
            port: port.to_string(),
            connection: Some(connection),
            state: SessionState::Connected,
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn run_script(&mut self, script: &Path) -> Result<()> {
        self.state = SessionState::ScriptRunning;
        tracing::debug!(port = %self.port, script = %script.display(), "running script");
        let result = self.connection()?.run_script(script);
        self.state = SessionState::Connected;
        result
    }

    pub fn copy_from(&mut self, remote: &str, local_dir: &Path) -> Result<PathBuf> {
        self.connection()?.copy_from(remote, local_dir)
    }

    /// Close the session and report disconnect failures
    pub fn disconnect(mut self) -> Result<()> {
        self.close()
    }

    fn connection(&mut self) -> Result<&mut dyn Connection> {
        match self.connection.as_deref_mut() {
            Some(connection) => Ok(connection),
            None => Err(StubError::Connection {
                port: self.port.clone(),
                reason: "session already closed".to_string(),
            }),
        }
    }

    fn close(&mut self) -> Result<()> {
        match self.connection.take() {
            Some(mut connection) => {
                self.state = SessionState::Disconnected;
                tracing::debug!(port = %self.port, "disconnecting device");
                connection.disconnect()
            }
            None => Ok(()),
        }
    }
}

impl Drop for DeviceSession {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            tracing::warn!(port = %self.port, error = %e, "failed to disconnect device");
        }
    }
}
