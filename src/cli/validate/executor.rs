//! Validation execution logic and output.

use anyhow::{Context, Result, anyhow};
use colored::Colorize;
use std::sync::Arc;

use crate::config::ValidatorConfig;
use crate::process::{CommandRunner, SystemRunner};
use crate::release::{LoadOptions, ReleaseInfo};
use crate::validate::{CheckRegistry, CheckReport, run_all};

use super::command::{OutputFormat, ValidateCommand};
use super::results::ValidationResults;

/// Failure recorded when no release directory is given.
pub const MISSING_RELEASE: &str = "--release must be passed";

impl ValidateCommand {
    /// Execute the validate command with real external tools.
    ///
    /// # Errors
    ///
    /// Returns an error if a `--check` name is unknown, the release cannot be loaded,
    /// the report file cannot be written, or any check failed.
    pub async fn execute(self, config: ValidatorConfig, quiet: bool) -> Result<()> {
        let timeout = self.timeout.map(std::time::Duration::from_secs).or_else(|| config.command_timeout());
        let runner = Arc::new(SystemRunner::new(timeout));
        self.execute_with_runner(config, runner, quiet).await
    }

    /// Execute the validate command with a specific runner.
    ///
    /// # Errors
    ///
    /// Same as [`execute`](Self::execute).
    pub async fn execute_with_runner(
        self,
        mut config: ValidatorConfig,
        runner: Arc<dyn CommandRunner>,
        quiet: bool,
    ) -> Result<()> {
        if let Some(secs) = self.timeout {
            config.command_timeout_secs = Some(secs);
        }

        let registry = CheckRegistry::with_defaults().select(&self.checks)?;

        let Some(release_dir) = self.release.as_deref() else {
            self.emit(&CheckReport::fatal(MISSING_RELEASE), quiet)?;
            return Err(anyhow!(MISSING_RELEASE));
        };

        let options = LoadOptions {
            archive_dir: self.archive_dir.clone(),
            keep_scratch: self.keep_scratch,
        };
        let info = match ReleaseInfo::load(release_dir, config, runner, options).await {
            Ok(info) => info,
            Err(e) => {
                self.emit(&CheckReport::fatal(e.to_string()), quiet)?;
                return Err(e.into());
            }
        };

        tracing::info!(
            target: "validate",
            "Validating release {} with {} checks",
            info.manifest().version,
            registry.len()
        );
        let report = run_all(&info, &registry).await;

        if self.keep_scratch {
            tracing::info!(target: "validate", "Kept scratch directory {}", info.scratch_dir().display());
        }
        drop(info);

        if let (Some(path), Some(text)) = (&self.report, &report.report) {
            tokio::fs::write(path, text)
                .await
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
        }

        self.emit(&report, quiet)?;

        if report.is_success() {
            Ok(())
        } else {
            Err(anyhow!(
                "validation failed: {} of {} checks failed",
                report.failures.len(),
                report.failures.len() + report.succeeded.len()
            ))
        }
    }

    fn emit(&self, report: &CheckReport, quiet: bool) -> Result<()> {
        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&ValidationResults::from(report))?);
            }
            OutputFormat::Text => {
                if !quiet {
                    for name in &report.succeeded {
                        println!("{} {}", "✓".green(), name);
                    }
                }
                for failure in &report.failures {
                    println!("{} {}", "✗".red(), failure);
                }
                if !quiet {
                    if let Some(text) = &report.report {
                        println!("\n{text}");
                    }
                    println!("{} passed, {} failed", report.succeeded.len(), report.failures.len());
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ReleaseError;
    use crate::test_utils::{FakeRunner, ReleaseFixture};

    fn command(release: Option<&std::path::Path>, archive: Option<&std::path::Path>, checks: &[&str]) -> ValidateCommand {
        ValidateCommand {
            release: release.map(std::path::Path::to_path_buf),
            archive_dir: archive.map(std::path::Path::to_path_buf),
            checks: checks.iter().map(|c| c.to_string()).collect(),
            format: OutputFormat::Json,
            report: None,
            keep_scratch: false,
            timeout: None,
        }
    }

    #[tokio::test]
    async fn test_missing_release_is_failure() {
        let err = command(None, None, &[])
            .execute_with_runner(ValidatorConfig::default(), Arc::new(FakeRunner::new()), true)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), MISSING_RELEASE);
    }

    #[tokio::test]
    async fn test_unknown_check_is_error() {
        let fixture = ReleaseFixture::new("1.24.0");
        let err = command(Some(fixture.release_dir()), None, &["Nope"])
            .execute_with_runner(ValidatorConfig::default(), Arc::new(FakeRunner::new()), true)
            .await
            .unwrap_err();
        assert!(matches!(err.downcast_ref::<ReleaseError>(), Some(ReleaseError::Config { .. })));
    }

    #[tokio::test]
    async fn test_filesystem_checks_pass_on_complete_release() {
        let fixture = ReleaseFixture::new("1.24.0");
        fixture.populate();
        let runner = Arc::new(FakeRunner::new());

        command(
            Some(fixture.release_dir()),
            Some(fixture.archive_dir()),
            &["TestDocker", "HelmVersionsIstio", "IstioctlProfiles", "Manifest", "Grafana", "Licenses", "CompletionFiles", "Debian", "Rpm"],
        )
        .execute_with_runner(ValidatorConfig::default(), runner.clone(), true)
        .await
        .unwrap();

        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_failure_writes_report_file() {
        let fixture = ReleaseFixture::new("1.24.0");
        let report_path = fixture.release_dir().join("report.txt");
        let mut cmd = command(Some(fixture.release_dir()), Some(fixture.archive_dir()), &["Rpm"]);
        cmd.report = Some(report_path.clone());

        let err = cmd
            .execute_with_runner(ValidatorConfig::default(), Arc::new(FakeRunner::new()), true)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "validation failed: 1 of 1 checks failed");
        let text = std::fs::read_to_string(report_path).unwrap();
        assert!(text.starts_with("Checks failed. Release info:"));
    }
}
