//! External command execution.
//!
//! Every check that needs an external tool (the release CLI, `tar`, the container
//! runtime, the chart tool) goes through the [`CommandRunner`] capability instead of
//! spawning processes directly. Production code uses [`SystemRunner`]; tests swap in
//! a fake that returns canned output, so checks can be exercised without real
//! binaries or containers.
//!
//! # Examples
//!
//! ```rust,no_run
//! use release_validator::process::{CommandRunner, SystemRunner, ToolCommand};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let runner = SystemRunner::new(None);
//! let output = runner
//!     .run(&ToolCommand::new("helm").args(["show", "values", "cni-1.24.0.tgz"]))
//!     .await?;
//! println!("{}", output.stdout);
//! # Ok(())
//! # }
//! ```

mod command;
mod system;

pub use command::ToolCommand;
pub use system::SystemRunner;

use std::future::Future;
use std::pin::Pin;

use crate::core::ReleaseError;

/// Captured output of a successful command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// Standard output
    pub stdout: String,
    /// Standard error
    pub stderr: String,
}

impl ToolOutput {
    /// Output with the given stdout and empty stderr.
    pub fn stdout(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }
}

/// Future returned by [`CommandRunner::run`].
pub type RunFuture<'a> = Pin<Box<dyn Future<Output = Result<ToolOutput, ReleaseError>> + Send + 'a>>;

/// Capability to run an external command and capture its output.
///
/// Implementations must treat a non-zero exit as an error
/// ([`ReleaseError::ToolFailure`]) so callers only ever see output from commands
/// that succeeded.
pub trait CommandRunner: Send + Sync {
    /// Run `command` to completion.
    fn run<'a>(&'a self, command: &'a ToolCommand) -> RunFuture<'a>;
}
