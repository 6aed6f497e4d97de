//! Execution dispatch
//!
//! Hands approved command lines to the terminal collaborator on their own
//! Tokio task so the coordinating loop never waits on a command. Failures
//! stay inside the task: they are converted into comment-line diagnostics
//! fed back through the same sink, never returned to the caller.

pub mod shell;

use std::sync::Arc;

use async_trait::async_trait;
use tokio::task::JoinHandle;

pub use shell::ShellSink;

/// Failure kinds the terminal collaborator can raise
#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
    #[error("Command failed: {0}")]
    Failed(String),
}

/// The live terminal surface: executes a line and streams its output
#[async_trait]
pub trait TerminalSink: Send + Sync {
    async fn run(&self, line: &str) -> Result<(), ExecError>;
}

/// Fire-and-forget dispatcher over a shared terminal sink
#[derive(Clone)]
pub struct CommandDispatcher {
    sink: Arc<dyn TerminalSink>,
}

impl CommandDispatcher {
    pub fn new(sink: Arc<dyn TerminalSink>) -> Self {
        Self { sink }
    }

    /// Run a command on its own task and return immediately. The handle can
    /// be awaited by callers that need completion (one-shot mode); the
    /// interactive loop ignores it. Two dispatches in quick succession have
    /// no ordering guarantee.
    pub fn dispatch(&self, command: String) -> JoinHandle<()> {
        let sink = Arc::clone(&self.sink);
        tokio::spawn(async move {
            if let Err(err) = sink.run(&command).await {
                let diagnostic = match err {
                    ExecError::PermissionDenied(detail) => {
                        format!("# Permission denied: {detail}")
                    }
                    ExecError::Failed(detail) => format!("# [ERROR] Command failed: {detail}"),
                };
                // Blank separator, comment marker, then the failure line. A
                // sink that is failing hard may drop these too; nothing else
                // can be done with them.
                for line in ["echo ''", "#", diagnostic.as_str()] {
                    if let Err(err) = sink.run(line).await {
                        tracing::warn!(%err, "terminal sink dropped a diagnostic line");
                    }
                }
            }
        })
    }

    /// Feed a pre-built rejection message through the sink. Used for blocked
    /// verdicts where no command runs at all.
    pub fn reject(&self, message: &str) -> JoinHandle<()> {
        self.dispatch(message.to_string())
    }
}
