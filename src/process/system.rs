//! [`CommandRunner`] backed by real processes.

use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tokio::time::timeout;

use super::{CommandRunner, RunFuture, ToolCommand, ToolOutput};
use crate::core::ReleaseError;

/// Runs commands as child processes with captured stdout and stderr.
///
/// Programs given by bare name are looked up on PATH first so a missing tool is
/// reported as [`ReleaseError::ToolNotFound`] rather than a spawn error. A command's
/// own deadline takes precedence over the runner default; with neither, the command
/// may run indefinitely.
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    default_timeout: Option<Duration>,
}

impl SystemRunner {
    /// Create a runner with an optional default deadline for every command.
    #[must_use]
    pub const fn new(default_timeout: Option<Duration>) -> Self {
        Self {
            default_timeout,
        }
    }

    async fn execute(&self, command: &ToolCommand) -> Result<ToolOutput, ReleaseError> {
        let start = Instant::now();
        let program = command.program();
        let label = command.get_context().map(|c| format!("({c}) ")).unwrap_or_default();

        let is_bare_name = !program.contains(std::path::MAIN_SEPARATOR) && !program.contains('/');
        if is_bare_name && which::which(program).is_err() {
            return Err(ReleaseError::ToolNotFound {
                tool: program.to_string(),
            });
        }

        let mut cmd = Command::new(program);
        cmd.args(command.get_args());
        if let Some(dir) = command.get_current_dir() {
            cmd.current_dir(dir);
        }
        for (key, value) in command.get_envs() {
            tracing::trace!(target: "process", "{}Setting env var: {}={}", label, key, value);
            cmd.env(key, value);
        }
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);

        tracing::debug!(target: "process", "{}Executing command: {}", label, command);

        let output_future = cmd.output();
        let output = match command.get_timeout().or(self.default_timeout) {
            Some(duration) => match timeout(duration, output_future).await {
                Ok(result) => result,
                Err(_) => {
                    tracing::warn!(
                        target: "process",
                        "{}Command timed out after {} seconds: {}",
                        label,
                        duration.as_secs(),
                        command
                    );
                    return Err(ReleaseError::ToolTimeout {
                        tool: program.to_string(),
                        secs: duration.as_secs(),
                    });
                }
            },
            None => output_future.await,
        }
        .map_err(|source| ReleaseError::ToolSpawn {
            tool: program.to_string(),
            source,
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            tracing::debug!(
                target: "process",
                "{}Command failed with exit code: {:?}",
                label,
                output.status.code()
            );
            if !stderr.is_empty() {
                tracing::debug!(target: "process", "{}Error: {}", label, stderr.trim());
            }
            return Err(ReleaseError::ToolFailure {
                tool: program.to_string(),
                args: command.args_display(),
                code: output.status.code().map_or_else(|| "signal".to_string(), |c| c.to_string()),
                stderr: if stderr.is_empty() {
                    stdout.trim().to_string()
                } else {
                    stderr.trim().to_string()
                },
            });
        }

        if !stdout.is_empty() {
            tracing::debug!(target: "process", "{}{}", label, stdout.trim());
        }
        if !stderr.is_empty() {
            tracing::debug!(target: "process", "{}{}", label, stderr.trim());
        }

        let elapsed = start.elapsed();
        if elapsed.as_secs() > 1 {
            tracing::info!(target: "process::perf", "{}{} took {:.2}s", label, program, elapsed.as_secs_f64());
        } else if elapsed.as_millis() > 100 {
            tracing::debug!(target: "process::perf", "{}{} took {}ms", label, program, elapsed.as_millis());
        }

        Ok(ToolOutput {
            stdout,
            stderr,
        })
    }
}

impl CommandRunner for SystemRunner {
    fn run<'a>(&'a self, command: &'a ToolCommand) -> RunFuture<'a> {
        Box::pin(self.execute(command))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_captures_stdout() {
        let runner = SystemRunner::new(None);
        let output = runner.run(&ToolCommand::new("sh").args(["-c", "printf hello"])).await.unwrap();
        assert_eq!(output.stdout, "hello");
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_tool_failure() {
        let runner = SystemRunner::new(None);
        let err = runner
            .run(&ToolCommand::new("sh").args(["-c", "echo broken >&2; exit 3"]))
            .await
            .unwrap_err();
        match err {
            ReleaseError::ToolFailure {
                tool,
                code,
                stderr,
                ..
            } => {
                assert_eq!(tool, "sh");
                assert_eq!(code, "3");
                assert_eq!(stderr, "broken");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_program_is_not_found() {
        let runner = SystemRunner::new(None);
        let err = runner.run(&ToolCommand::new("definitely-not-a-real-tool-xyz")).await.unwrap_err();
        assert!(matches!(err, ReleaseError::ToolNotFound { .. }));
    }

    #[tokio::test]
    async fn test_missing_path_is_spawn_error() {
        let runner = SystemRunner::new(None);
        let err = runner.run(&ToolCommand::new("/nonexistent/bin/istioctl")).await.unwrap_err();
        assert!(matches!(err, ReleaseError::ToolSpawn { .. }));
    }

    #[tokio::test]
    async fn test_timeout() {
        let runner = SystemRunner::new(Some(Duration::from_millis(100)));
        let err = runner.run(&ToolCommand::new("sh").args(["-c", "sleep 5"])).await.unwrap_err();
        assert!(matches!(err, ReleaseError::ToolTimeout { .. }));
    }

    #[tokio::test]
    async fn test_current_dir_and_env() {
        let temp = tempfile::TempDir::new().unwrap();
        let runner = SystemRunner::new(None);
        let output = runner
            .run(
                &ToolCommand::new("sh")
                    .args(["-c", "printf \"$GREETING\"; ls"])
                    .env("GREETING", "hi ")
                    .current_dir(temp.path()),
            )
            .await
            .unwrap();
        assert_eq!(output.stdout, "hi ");
    }
}
