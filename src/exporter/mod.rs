//! External exporter invocation.
//!
//! The exporter is an opaque one-shot process (the Python extraction script
//! in production) that talks to Procore and rewrites the RFI snapshot. It is
//! run to completion per request, with no timeout and no retries.

use tokio::process::Command;

/// Result of one exporter run.
#[derive(Debug)]
pub enum RunOutcome {
    /// Exit status 0
    Success { stdout: String },
    /// Non-zero exit; stderr is surfaced to the browser so the UI can detect
    /// token-expiry phrasing
    Failed { stderr: String },
    /// The process could not be started at all
    SpawnError(String),
}

/// Runs the configured exporter command line through the shell.
pub struct Exporter {
    cmd: String,
}

impl Exporter {
    pub fn new(cmd: impl Into<String>) -> Self {
        Self { cmd: cmd.into() }
    }

    /// Run the exporter to completion and capture its output.
    pub async fn run(&self) -> RunOutcome {
        tracing::info!("Running exporter: {}", self.cmd);

        let output = match Command::new("sh").arg("-c").arg(&self.cmd).output().await {
            Ok(output) => output,
            Err(e) => {
                tracing::error!("Failed to spawn exporter: {}", e);
                return RunOutcome::SpawnError(e.to_string());
            }
        };

        if output.status.success() {
            tracing::info!("Exporter completed successfully");
            RunOutcome::Success {
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            }
        } else {
            let mut stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            if stderr.trim().is_empty() {
                // Some scripts report errors on stdout only
                stderr = String::from_utf8_lossy(&output.stdout).into_owned();
            }
            tracing::warn!("Exporter failed ({}): {}", output.status, stderr.trim());
            RunOutcome::Failed { stderr }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_successful_run_captures_stdout() {
        let exporter = Exporter::new("echo exported 42 rows");

        match exporter.run().await {
            RunOutcome::Success { stdout } => assert!(stdout.contains("exported 42 rows")),
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_failed_run_captures_stderr() {
        let exporter = Exporter::new("echo 'token has been revoked' >&2; exit 3");

        match exporter.run().await {
            RunOutcome::Failed { stderr } => assert!(stderr.contains("token has been revoked")),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_failed_run_falls_back_to_stdout() {
        let exporter = Exporter::new("echo 'wrote error to stdout'; exit 1");

        match exporter.run().await {
            RunOutcome::Failed { stderr } => assert!(stderr.contains("wrote error to stdout")),
            other => panic!("expected failure, got {other:?}"),
        }
    }
}
