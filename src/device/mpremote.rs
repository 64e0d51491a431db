//! Transport that drives MicroPython's `mpremote` tool
//!
//! Each call is one `mpremote connect <port> ...` invocation.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use super::{Connection, Transport};
use crate::error::{Result, StubError};

/// Default executable name
pub const DEFAULT_PROGRAM: &str = "mpremote";

#[derive(Debug, Clone)]
pub struct MpremoteTransport {
    program: PathBuf,
}

impl MpremoteTransport {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for MpremoteTransport {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

impl Transport for MpremoteTransport {
    fn connect(&self, port: &str) -> Result<Box<dyn Connection>> {
        let connection = MpremoteConnection {
            program: self.program.clone(),
            port: port.to_string(),
        };

        let connection_error = |reason: String| StubError::Connection {
            port: port.to_string(),
            reason,
        };
        let output = connection
            .invoke(["eval", "1"])
            .map_err(|e| connection_error(e.to_string()))?;
        if !output.status.success() {
            return Err(connection_error(failure_message(&output)));
        }

        Ok(Box::new(connection))
    }
}

#[derive(Debug)]
struct MpremoteConnection {
    program: PathBuf,
    port: String,
}

impl MpremoteConnection {
    fn invoke<I, S>(&self, args: I) -> std::io::Result<Output>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        tracing::trace!(program = %self.program.display(), port = %self.port, "invoking mpremote");
        Command::new(&self.program)
            .arg("connect")
            .arg(&self.port)
            .args(args)
            .output()
    }
}

impl Connection for MpremoteConnection {
    fn run_script(&mut self, script: &Path) -> Result<()> {
        let output = self
            .invoke([OsStr::new("run"), script.as_os_str()])
            .map_err(|e| StubError::ScriptExecution {
                message: e.to_string(),
            })?;
        if !output.status.success() {
            return Err(StubError::ScriptExecution {
                message: failure_message(&output),
            });
        }
        Ok(())
    }

    fn copy_from(&mut self, remote: &str, local_dir: &Path) -> Result<PathBuf> {
        let copy_error = |reason: String| StubError::DeviceCopyFailed {
            remote: remote.to_string(),
            reason,
        };

        std::fs::create_dir_all(local_dir)?;
        let source = format!(":{remote}");
        let output = self
            .invoke([
                OsStr::new("cp"),
                OsStr::new("-r"),
                OsStr::new(&source),
                local_dir.as_os_str(),
            ])
            .map_err(|e| copy_error(e.to_string()))?;
        if !output.status.success() {
            return Err(copy_error(failure_message(&output)));
        }

        // `cp -r :dir target/` lands the tree at `target/<dir name>`
        let name = remote.trim_end_matches('/').rsplit('/').next().unwrap_or(remote);
        Ok(local_dir.join(name))
    }

    fn disconnect(&mut self) -> Result<()> {
        let output = self
            .invoke(["soft-reset"])
            .map_err(|e| StubError::Connection {
                port: self.port.clone(),
                reason: e.to_string(),
            })?;
        if !output.status.success() {
            return Err(StubError::Connection {
                port: self.port.clone(),
                reason: failure_message(&output),
            });
        }
        Ok(())
    }
}

/// Last non-empty stderr line, which carries the device traceback's message
fn failure_message(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    stderr
        .lines()
        .chain(stdout.lines())
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map_or_else(|| format!("mpremote exited with {}", output.status), str::to_string)
}
