//! Builder for external tool invocations.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Description of one external command: program, arguments, working directory,
/// environment overrides and an optional deadline.
///
/// The builder only describes the command; a [`CommandRunner`](super::CommandRunner)
/// executes it.
///
/// # Examples
///
/// ```rust
/// use release_validator::process::ToolCommand;
///
/// let cmd = ToolCommand::new("tar")
///     .args(["xf", "istio-1.24.0-linux-amd64.tar.gz"])
///     .arg("-C")
///     .arg("/tmp/scratch")
///     .with_context("IstioctlArchive");
///
/// assert_eq!(cmd.program(), "tar");
/// assert_eq!(cmd.to_string(), "tar xf istio-1.24.0-linux-amd64.tar.gz -C /tmp/scratch");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    /// Program name (looked up on PATH) or path to an executable
    program: String,

    /// Arguments in order
    args: Vec<String>,

    /// Working directory (defaults to the current directory)
    current_dir: Option<PathBuf>,

    /// Environment overrides applied on top of the inherited environment
    env_vars: Vec<(String, String)>,

    /// Deadline for this command; `None` defers to the runner's default
    timeout_duration: Option<Duration>,

    /// Label included in log lines, usually the check name
    context: Option<String>,
}

impl ToolCommand {
    /// Create a command for `program` with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
            env_vars: Vec::new(),
            timeout_duration: None,
            context: None,
        }
    }

    /// Create a command for an executable at `path`.
    pub fn at_path(path: &Path) -> Self {
        Self::new(path.display().to_string())
    }

    /// Add one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Run in `dir` instead of the current directory.
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Set an environment variable for this command only.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.push((key.into(), value.into()));
        self
    }

    /// Set a deadline for this command.
    pub const fn with_timeout(mut self, duration: Option<Duration>) -> Self {
        self.timeout_duration = duration;
        self
    }

    /// Set a label included in log lines for this command.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Program name or path.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments in order.
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Working directory, if set.
    pub fn get_current_dir(&self) -> Option<&Path> {
        self.current_dir.as_deref()
    }

    /// Environment overrides.
    pub fn get_envs(&self) -> &[(String, String)] {
        &self.env_vars
    }

    /// Per-command deadline, if set.
    pub const fn get_timeout(&self) -> Option<Duration> {
        self.timeout_duration
    }

    /// Log label, if set.
    pub fn get_context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    /// Arguments joined with spaces, for messages.
    pub fn args_display(&self) -> String {
        self.args.join(" ")
    }
}

impl std::fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}
