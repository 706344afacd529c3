//! chronyc invocation — spawns the control utility with structured args and
//! captures its outcome as data.
//!
//! Arguments are passed to `tokio::process::Command` individually (never
//! through a shell), so a crafted server name cannot inject shell syntax.
//! A non-zero exit is not an error from the caller's perspective: it is
//! returned as a `CommandOutput` with `succeeded = false` so every handler
//! can surface it in-band. No timeout bounds the invocation; chronyc talks to
//! a local daemon socket and is expected to return promptly.

use std::process::Stdio;
use std::time::Instant;

use tokio::process::Command;

/// Captured outcome of a single chronyc invocation.
///
/// Consumed immediately by a parser or serialized verbatim; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Trimmed stdout, possibly partial when the process failed.
    pub stdout: String,
    /// Trimmed stderr. Non-empty whenever `succeeded` is false.
    pub stderr: String,
    /// False on non-zero exit or spawn failure.
    pub succeeded: bool,
}

impl CommandOutput {
    /// Error text for response bodies: `None` when the invocation succeeded.
    pub fn error(&self) -> Option<String> {
        if self.succeeded {
            None
        } else {
            Some(self.stderr.clone())
        }
    }
}

/// Runs the external control utility for the time daemon.
///
/// Holds only the executable name; each `run` spawns a fresh child process.
#[derive(Debug, Clone)]
pub struct ChronycRunner {
    command: String,
}

impl ChronycRunner {
    /// Create a runner for the given executable (name or absolute path).
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// The configured executable name.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Run the control utility with the given arguments and wait for it.
    ///
    /// Non-zero exit yields `succeeded = false` with whatever stdout was
    /// produced; a failure whose stderr is empty gets the generic `Error`
    /// marker so the error text is never blank on failure. A spawn failure
    /// (executable missing, permission denied) is reported the same way
    /// rather than propagated.
    pub async fn run(&self, args: &[&str]) -> CommandOutput {
        let start = Instant::now();

        let result = Command::new(&self.command)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await;

        let output = match result {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!(
                    command = %self.command,
                    args = ?args,
                    error = %e,
                    "failed to spawn control utility"
                );
                return CommandOutput {
                    stdout: String::new(),
                    stderr: format!("failed to spawn '{}': {}", self.command, e),
                    succeeded: false,
                };
            }
        };

        let elapsed = start.elapsed().as_millis();
        let exit_code = output.status.code().unwrap_or(-1);
        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

        tracing::info!(
            command = %self.command,
            args = ?args,
            exit_code = %exit_code,
            duration_ms = %elapsed,
            "control utility invocation"
        );

        if !stderr.is_empty() {
            tracing::debug!(command = %self.command, stderr = %stderr, "control utility stderr");
        }

        if output.status.success() {
            CommandOutput {
                stdout,
                stderr,
                succeeded: true,
            }
        } else {
            let stderr = if stderr.is_empty() {
                "Error".to_string()
            } else {
                stderr
            };
            CommandOutput {
                stdout,
                stderr,
                succeeded: false,
            }
        }
    }
}
