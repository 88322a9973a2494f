//! Scripted [`CommandRunner`] for tests.

use std::path::Path;
use std::sync::{Mutex, PoisonError};

use crate::core::ReleaseError;
use crate::process::{CommandRunner, RunFuture, ToolCommand, ToolOutput};

/// Canned outcome for commands matching a program and first argument.
#[derive(Debug, Clone)]
struct Rule {
    program: String,
    first_arg: String,
    outcome: Result<String, String>,
}

impl Rule {
    fn matches(&self, command: &ToolCommand) -> bool {
        let program = Path::new(command.program())
            .file_name()
            .map_or_else(|| command.program().to_string(), |name| name.to_string_lossy().into_owned());
        program == self.program && command.get_args().first().is_some_and(|arg| *arg == self.first_arg)
    }
}

/// A runner that never spawns anything.
///
/// Commands are matched by program file name (so `/tmp/x/bin/istioctl` matches
/// `istioctl`) and first argument. The first matching rule decides the outcome;
/// an unmatched command succeeds with empty output. Every command is recorded.
///
/// ```rust
/// use release_validator::test_utils::FakeRunner;
///
/// let runner = FakeRunner::new()
///     .respond("helm", "show", "global:\n  tag: 1.24.0\n")
///     .fail("docker", "load", "no such image");
/// assert!(runner.calls().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct FakeRunner {
    rules: Vec<Rule>,
    calls: Mutex<Vec<ToolCommand>>,
}

impl FakeRunner {
    /// A runner with no rules.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `program first_arg ...` with `stdout`.
    #[must_use]
    pub fn respond(mut self, program: &str, first_arg: &str, stdout: &str) -> Self {
        self.rules.push(Rule {
            program: program.to_string(),
            first_arg: first_arg.to_string(),
            outcome: Ok(stdout.to_string()),
        });
        self
    }

    /// Fail `program first_arg ...` with exit code 1 and `stderr`.
    #[must_use]
    pub fn fail(mut self, program: &str, first_arg: &str, stderr: &str) -> Self {
        self.rules.push(Rule {
            program: program.to_string(),
            first_arg: first_arg.to_string(),
            outcome: Err(stderr.to_string()),
        });
        self
    }

    /// Commands run so far, in order.
    pub fn calls(&self) -> Vec<ToolCommand> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl CommandRunner for FakeRunner {
    fn run<'a>(&'a self, command: &'a ToolCommand) -> RunFuture<'a> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).push(command.clone());
        tracing::debug!(target: "process", "Fake run: {}", command);

        let outcome = self
            .rules
            .iter()
            .find(|rule| rule.matches(command))
            .map_or_else(|| Ok(String::new()), |rule| rule.outcome.clone());

        let result = match outcome {
            Ok(stdout) => Ok(ToolOutput::stdout(stdout)),
            Err(stderr) => Err(ReleaseError::ToolFailure {
                tool: command.program().to_string(),
                args: command.args_display(),
                code: "1".to_string(),
                stderr,
            }),
        };
        Box::pin(async move { result })
    }
}
