//! Completeness of the published manifest.

use anyhow::bail;

use super::tables::REQUIRED_DEPENDENCIES;
use crate::release::ReleaseInfo;
use crate::validate::{CheckFuture, ReleaseCheck};

/// Required dependencies are pinned and no build-time directory leaks into the manifest.
pub struct ManifestCompleteness;

impl ReleaseCheck for ManifestCompleteness {
    fn name(&self) -> &'static str {
        "Manifest"
    }

    fn run<'a>(&'a self, release: &'a ReleaseInfo) -> CheckFuture<'a> {
        Box::pin(async move {
            let manifest = release.manifest();

            for repo in REQUIRED_DEPENDENCIES {
                let Some(dependency) = manifest.dependency(repo) else {
                    bail!("missing dependency: {repo}");
                };
                if dependency.sha.is_empty() {
                    bail!("got empty SHA for {repo}");
                }
            }

            if !manifest.directory.is_empty() {
                bail!("expected manifest directory to be hidden, got {}", manifest.directory);
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::{Dependency, Manifest};
    use crate::test_utils::{FakeRunner, ReleaseFixture};
    use std::sync::Arc;

    fn pinned() -> Manifest {
        let mut manifest = Manifest {
            version: "1.24.0".into(),
            docker: "docker.io/istio".into(),
            ..Default::default()
        };
        for repo in REQUIRED_DEPENDENCIES {
            manifest.dependencies.insert(
                repo.to_string(),
                Some(Dependency {
                    sha: format!("{repo}-sha"),
                    ..Default::default()
                }),
            );
        }
        manifest
    }

    async fn run(manifest: Manifest) -> anyhow::Result<()> {
        let fixture = ReleaseFixture::with_manifest(manifest);
        let info = fixture.info(Arc::new(FakeRunner::new()));
        ManifestCompleteness.run(&info).await
    }

    #[tokio::test]
    async fn test_complete_manifest() {
        run(pinned()).await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_dependency() {
        let mut manifest = pinned();
        manifest.dependencies.remove("client-go");
        assert_eq!(run(manifest).await.unwrap_err().to_string(), "missing dependency: client-go");
    }

    #[tokio::test]
    async fn test_dependency_without_body_is_missing() {
        let mut manifest = pinned();
        manifest.dependencies.insert("proxy".into(), None);
        assert_eq!(run(manifest).await.unwrap_err().to_string(), "missing dependency: proxy");
    }

    #[tokio::test]
    async fn test_empty_sha() {
        let mut manifest = pinned();
        manifest.dependencies.insert("api".into(), Some(Dependency::default()));
        assert_eq!(run(manifest).await.unwrap_err().to_string(), "got empty SHA for api");
    }

    #[tokio::test]
    async fn test_directory_must_be_hidden() {
        let mut manifest = pinned();
        manifest.directory = "/work/release".into();
        let err = run(manifest).await.unwrap_err();
        assert!(err.to_string().contains("/work/release"));
    }
}
