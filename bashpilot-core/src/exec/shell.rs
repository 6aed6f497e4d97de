//! Shell-backed terminal sink

use async_trait::async_trait;
use std::io::ErrorKind;
use tokio::process::Command;

use super::{ExecError, TerminalSink};

/// Runs each line through `sh -c` with inherited stdio, so output streams
/// straight to the user's terminal. A non-zero exit status is normal shell
/// behavior, not a sink failure; only host-level errors (spawn failure,
/// permission denial) surface as [`ExecError`].
pub struct ShellSink {
    shell: String,
}

impl ShellSink {
    pub fn new() -> Self {
        Self::with_shell("sh".to_string())
    }

    pub fn with_shell(shell: String) -> Self {
        Self { shell }
    }
}

impl Default for ShellSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TerminalSink for ShellSink {
    async fn run(&self, line: &str) -> Result<(), ExecError> {
        // Echo the line the way a terminal shows typed input; rejection
        // notices are comment lines and would otherwise be invisible.
        println!("{line}");

        let status = Command::new(&self.shell)
            .arg("-c")
            .arg(line)
            .status()
            .await
            .map_err(|err| match err.kind() {
                ErrorKind::PermissionDenied => ExecError::PermissionDenied(err.to_string()),
                _ => ExecError::Failed(err.to_string()),
            })?;

        tracing::debug!(%line, code = ?status.code(), "shell line completed");
        Ok(())
    }
}
