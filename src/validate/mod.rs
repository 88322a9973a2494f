//! Check registry and runner.
//!
//! A validation run is a fixed set of named [`ReleaseCheck`]s executed one after
//! another against a single [`ReleaseInfo`]. Every check runs regardless of earlier
//! failures; the runner records each outcome and, if anything failed, attaches a
//! diagnostic report listing the release and archive trees.
//!
//! # Example
//!
//! ```rust,no_run
//! use release_validator::validate::{CheckRegistry, run_all};
//! # async fn example(release: &release_validator::release::ReleaseInfo) {
//! let registry = CheckRegistry::with_defaults();
//! let report = run_all(release, &registry).await;
//! for failure in &report.failures {
//!     eprintln!("{failure}");
//! }
//! # }
//! ```

pub mod checks;
mod report;

pub use report::build_report;

use serde::Serialize;
use std::future::Future;
use std::pin::Pin;
use std::time::Instant;

use crate::core::ReleaseError;
use crate::release::ReleaseInfo;

/// Future returned by [`ReleaseCheck::run`].
pub type CheckFuture<'a> = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'a>>;

/// One independent validation over a built release.
///
/// A check reads the release through [`ReleaseInfo`] and may invoke external tools
/// through its runner, but never changes shared state. Anything it extracts goes
/// under its own subdirectory of the scratch directory.
pub trait ReleaseCheck: Send + Sync {
    /// Stable identifier used in reports and with `--check`.
    fn name(&self) -> &'static str;

    /// Validate `release`, returning a descriptive error on failure.
    fn run<'a>(&'a self, release: &'a ReleaseInfo) -> CheckFuture<'a>;
}

/// Ordered collection of checks with unique names.
#[derive(Default)]
pub struct CheckRegistry {
    checks: Vec<Box<dyn ReleaseCheck>>,
}

impl CheckRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in check in registration order.
    #[must_use]
    pub fn with_defaults() -> Self {
        checks::all().into_iter().fold(Self::new(), |registry, check| registry.with_boxed(check))
    }

    /// Add a check. A check whose name is already registered is ignored.
    #[must_use]
    pub fn with(self, check: impl ReleaseCheck + 'static) -> Self {
        self.with_boxed(Box::new(check))
    }

    fn with_boxed(mut self, check: Box<dyn ReleaseCheck>) -> Self {
        if self.contains(check.name()) {
            tracing::warn!(target: "validate", "Check {} registered twice; keeping the first", check.name());
        } else {
            self.checks.push(check);
        }
        self
    }

    /// Whether a check with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.checks.iter().any(|check| check.name() == name)
    }

    /// Names of the registered checks, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.checks.iter().map(|check| check.name())
    }

    /// Number of registered checks.
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    /// Whether no checks are registered.
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Keep only the named checks, preserving registration order.
    ///
    /// An empty selection keeps everything.
    ///
    /// # Errors
    ///
    /// Returns [`ReleaseError::Config`] naming the first unknown check and listing the
    /// known ones.
    pub fn select<S: AsRef<str>>(self, names: &[S]) -> Result<Self, ReleaseError> {
        if names.is_empty() {
            return Ok(self);
        }

        if let Some(unknown) = names.iter().map(|name| name.as_ref()).find(|name| !self.contains(name)) {
            return Err(ReleaseError::Config {
                message: format!(
                    "unknown check '{}'; known checks: {}",
                    unknown,
                    self.names().collect::<Vec<_>>().join(", ")
                ),
            });
        }

        let checks = self
            .checks
            .into_iter()
            .filter(|check| names.iter().any(|name| name.as_ref() == check.name()))
            .collect();
        Ok(Self {
            checks,
        })
    }
}

/// Outcome of a validation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    /// Names of the checks that passed, in execution order
    pub succeeded: Vec<String>,
    /// One message per failed check, `check <name> failed: <error>`
    pub failures: Vec<String>,
    /// Diagnostic listing, present only when something failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<String>,
}

impl CheckReport {
    /// A run that could not start; `message` is its only failure.
    #[must_use]
    pub fn fatal(message: impl Into<String>) -> Self {
        Self {
            succeeded: Vec::new(),
            failures: vec![message.into()],
            report: None,
        }
    }

    /// Whether every check passed.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Run every check in `registry` against `release`.
///
/// Checks run sequentially in registration order and a failure never stops the run.
/// The diagnostic report is built only when at least one check failed.
pub async fn run_all(release: &ReleaseInfo, registry: &CheckRegistry) -> CheckReport {
    let mut report = CheckReport::default();

    for check in &registry.checks {
        let name = check.name();
        tracing::debug!(target: "validate", "Running check {}", name);
        let start = Instant::now();

        match check.run(release).await {
            Ok(()) => {
                tracing::debug!(target: "validate", "Check {} passed", name);
                report.succeeded.push(name.to_string());
            }
            Err(e) => {
                tracing::debug!(target: "validate", "Check {} failed: {:#}", name, e);
                report.failures.push(format!("check {name} failed: {e:#}"));
            }
        }

        tracing::debug!(
            target: "validate",
            "Check {} took {}ms",
            name,
            start.elapsed().as_millis()
        );
    }

    if !report.failures.is_empty() {
        report.report = Some(build_report(release));
    }

    report
}
