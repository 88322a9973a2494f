//! Version of the release CLI, bundled and standalone.

use anyhow::{Context, Result};

use super::check_client_version;
use super::tables::VERSION_ARGS;
use crate::constants::STANDALONE_DIR_PREFIX;
use crate::core::ReleaseError;
use crate::process::ToolCommand;
use crate::release::ReleaseInfo;
use crate::validate::{CheckFuture, ReleaseCheck};

/// The CLI inside the primary archive reports the manifest version.
pub struct IstioctlArchive;

impl ReleaseCheck for IstioctlArchive {
    fn name(&self) -> &'static str {
        "IstioctlArchive"
    }

    fn run<'a>(&'a self, release: &'a ReleaseInfo) -> CheckFuture<'a> {
        Box::pin(async move {
            let binary = release.archive_dir().join("bin").join(&release.config().cli_name);
            let command = ToolCommand::at_path(&binary).args(VERSION_ARGS.iter().copied()).with_context(self.name());

            let stdout = release.run_tool(command).await?;
            check_client_version(&stdout, &binary.display().to_string(), &release.manifest().version)
        })
    }
}

/// The standalone CLI archive unpacks to a binary reporting the manifest version.
pub struct IstioctlStandalone;

impl ReleaseCheck for IstioctlStandalone {
    fn name(&self) -> &'static str {
        "IstioctlStandalone"
    }

    fn run<'a>(&'a self, release: &'a ReleaseInfo) -> CheckFuture<'a> {
        Box::pin(check_standalone(self.name(), release))
    }
}

async fn check_standalone(name: &str, release: &ReleaseInfo) -> Result<()> {
    let config = release.config();
    let version = &release.manifest().version;

    let archive = release.release_dir().join(config.standalone_cli_archive_name(version));
    let target = release.scratch_dir().join(format!("{STANDALONE_DIR_PREFIX}{}", config.cli_name));
    tokio::fs::create_dir_all(&target).await.map_err(|e| ReleaseError::fs("creating", &target, e))?;

    let extract = ToolCommand::new(&config.tar)
        .arg("xvf")
        .arg(archive.display().to_string())
        .arg("-C")
        .arg(target.display().to_string())
        .with_context(name);
    release
        .run_tool(extract)
        .await
        .with_context(|| format!("failed to unpack {}", archive.display()))?;

    let binary = target.join(&config.cli_name);
    let command = ToolCommand::at_path(&binary).args(VERSION_ARGS.iter().copied()).with_context(name);
    let stdout = release.run_tool(command).await?;
    check_client_version(&stdout, &binary.display().to_string(), version)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{FakeRunner, ReleaseFixture, version_json};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_archive_cli_version_matches() {
        let fixture = ReleaseFixture::new("1.24.0");
        let runner = Arc::new(FakeRunner::new().respond("istioctl", "version", &version_json("1.24.0")));
        let info = fixture.info(runner.clone());

        IstioctlArchive.run(&info).await.unwrap();

        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].program(), fixture.archive_dir().join("bin/istioctl").display().to_string());
        assert_eq!(calls[0].get_args(), VERSION_ARGS);
        assert_eq!(calls[0].get_context(), Some("IstioctlArchive"));
    }

    #[tokio::test]
    async fn test_archive_cli_version_mismatch() {
        let fixture = ReleaseFixture::new("1.24.0");
        let runner = Arc::new(FakeRunner::new().respond("istioctl", "version", &version_json("1.24.0-dev")));
        let info = fixture.info(runner);

        let err = IstioctlArchive.run(&info).await.unwrap_err();
        assert!(err.to_string().contains("got 1.24.0-dev expected 1.24.0"));
    }

    #[tokio::test]
    async fn test_archive_cli_failure_propagates() {
        let fixture = ReleaseFixture::new("1.24.0");
        let runner = Arc::new(FakeRunner::new().fail("istioctl", "version", "exec format error"));
        let info = fixture.info(runner);

        let err = IstioctlArchive.run(&info).await.unwrap_err();
        assert!(matches!(err.downcast_ref::<ReleaseError>(), Some(ReleaseError::ToolFailure { .. })));
    }

    #[tokio::test]
    async fn test_standalone_extracts_to_own_directory() {
        let fixture = ReleaseFixture::new("1.24.0");
        let runner = Arc::new(FakeRunner::new().respond("istioctl", "version", &version_json("1.24.0")));
        let info = fixture.info(runner.clone());

        IstioctlStandalone.run(&info).await.unwrap();

        let target = info.scratch_dir().join("standalone-istioctl");
        assert!(target.is_dir());

        let calls = runner.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].program(), "tar");
        assert!(calls[0].get_args()[1].ends_with("istioctl-1.24.0-linux-amd64.tar.gz"));
        assert_eq!(calls[0].get_args()[3], target.display().to_string());
        assert_eq!(calls[1].program(), target.join("istioctl").display().to_string());
    }

    #[tokio::test]
    async fn test_standalone_extraction_failure() {
        let fixture = ReleaseFixture::new("1.24.0");
        let runner = Arc::new(FakeRunner::new().fail("tar", "xvf", "Cannot open: No such file or directory"));
        let info = fixture.info(runner.clone());

        let err = IstioctlStandalone.run(&info).await.unwrap_err();
        assert!(err.to_string().contains("failed to unpack"));
        assert_eq!(runner.calls().len(), 1);
    }
}
