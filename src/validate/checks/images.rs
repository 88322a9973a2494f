//! Container image tarballs and the proxy image version.

use anyhow::{Context, Result, bail};

use super::tables::{DEFAULT_ARCH, EXPECTED_IMAGES, PROXY_IMAGE_NAME, PROXY_IMAGE_TARBALL, PROXY_VERSION_ARGS};
use super::{check_client_version, entry_names, join};
use crate::process::ToolCommand;
use crate::release::ReleaseInfo;
use crate::validate::{CheckFuture, ReleaseCheck};

/// Every expected image has a tarball under `docker/` for every declared architecture.
///
/// Tarballs for the default architecture are `<image>.tar.gz`; other architectures
/// add a suffix, `<image>-<arch>.tar.gz`.
pub struct DockerImages;

impl ReleaseCheck for DockerImages {
    fn name(&self) -> &'static str {
        "TestDocker"
    }

    fn run<'a>(&'a self, release: &'a ReleaseInfo) -> CheckFuture<'a> {
        Box::pin(check_images(release))
    }
}

/// Tarball name of `image` for `arch`.
fn tarball_name(image: &str, arch: &str) -> String {
    if arch == DEFAULT_ARCH {
        format!("{image}.tar.gz")
    } else {
        format!("{image}-{arch}.tar.gz")
    }
}

async fn check_images(release: &ReleaseInfo) -> Result<()> {
    let dir = release.release_dir().join("docker");
    let found = entry_names(&dir).await.context("failed to read docker dir")?;

    let missing: Vec<String> = release
        .manifest()
        .arches()
        .flat_map(|arch| EXPECTED_IMAGES.iter().map(move |image| tarball_name(image, arch)))
        .filter(|tarball| !found.contains(tarball))
        .collect();

    if !missing.is_empty() {
        bail!("expected docker images {}, but had [{}]", join(&missing), join(&found));
    }
    Ok(())
}

/// The proxy image loads into the container runtime and reports the manifest version.
pub struct ProxyVersion;

impl ReleaseCheck for ProxyVersion {
    fn name(&self) -> &'static str {
        "ProxyVersion"
    }

    fn run<'a>(&'a self, release: &'a ReleaseInfo) -> CheckFuture<'a> {
        Box::pin(check_proxy_version(self.name(), release))
    }
}

async fn check_proxy_version(name: &str, release: &ReleaseInfo) -> Result<()> {
    let runtime = &release.config().container_runtime;
    let tarball = release.release_dir().join(PROXY_IMAGE_TARBALL);

    let load = ToolCommand::new(runtime).arg("load").arg("-i").arg(tarball.display().to_string()).with_context(name);
    release
        .run_tool(load)
        .await
        .with_context(|| format!("failed to load {} as {} image", tarball.display(), runtime))?;

    let image = release.manifest().image_ref(PROXY_IMAGE_NAME);
    let run = ToolCommand::new(runtime)
        .args(["run", "--rm"])
        .arg(&image)
        .args(PROXY_VERSION_ARGS.iter().copied())
        .with_context(name);
    let stdout = release.run_tool(run).await?;

    check_client_version(&stdout, &image, &release.manifest().version)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::Manifest;
    use crate::test_utils::{FakeRunner, ReleaseFixture, version_json};
    use std::sync::Arc;

    fn fixture_with_arches(arches: &[&str]) -> ReleaseFixture {
        ReleaseFixture::with_manifest(Manifest {
            version: "1.24.0".into(),
            docker: "docker.io/istio".into(),
            architectures: arches.iter().map(|a| a.to_string()).collect(),
            ..Default::default()
        })
    }

    #[test]
    fn test_tarball_name() {
        assert_eq!(tarball_name("foo", "amd64"), "foo.tar.gz");
        assert_eq!(tarball_name("foo", "arm64"), "foo-arm64.tar.gz");
    }

    #[tokio::test]
    async fn test_missing_arch_tarball_fails() {
        let fixture = fixture_with_arches(&["linux/amd64", "linux/arm64"]);
        for image in EXPECTED_IMAGES {
            fixture.write_release(&format!("docker/{image}.tar.gz"), "");
        }
        let info = fixture.info(Arc::new(FakeRunner::new()));

        let err = DockerImages.run(&info).await.unwrap_err();
        let message = err.to_string();
        assert!(message.contains("pilot-distroless-arm64.tar.gz"));
        assert!(message.contains("proxyv2-debug-arm64.tar.gz"));
    }

    #[tokio::test]
    async fn test_all_arch_tarballs_present() {
        let fixture = fixture_with_arches(&["linux/amd64", "linux/arm64"]);
        for image in EXPECTED_IMAGES {
            fixture.write_release(&format!("docker/{image}.tar.gz"), "");
            fixture.write_release(&format!("docker/{image}-arm64.tar.gz"), "");
        }
        let info = fixture.info(Arc::new(FakeRunner::new()));

        DockerImages.run(&info).await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_docker_dir() {
        let fixture = fixture_with_arches(&["linux/amd64"]);
        let info = fixture.info(Arc::new(FakeRunner::new()));

        let err = DockerImages.run(&info).await.unwrap_err();
        assert!(err.to_string().contains("failed to read docker dir"));
    }

    #[tokio::test]
    async fn test_proxy_version_loads_then_runs() {
        let fixture = ReleaseFixture::new("1.24.0");
        let runner = Arc::new(FakeRunner::new().respond("docker", "run", &version_json("1.24.0")));
        let info = fixture.info(runner.clone());

        ProxyVersion.run(&info).await.unwrap();

        let calls = runner.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].get_args()[0], "load");
        assert!(calls[0].get_args()[2].ends_with("docker/proxyv2-debug.tar.gz"));
        assert_eq!(
            calls[1].get_args(),
            ["run", "--rm", "docker.io/istio/proxyv2:1.24.0", "version", "--short", "-ojson"]
        );
    }

    #[tokio::test]
    async fn test_proxy_load_failure_stops_check() {
        let fixture = ReleaseFixture::new("1.24.0");
        let runner = Arc::new(FakeRunner::new().fail("docker", "load", "open: no such file"));
        let info = fixture.info(runner.clone());

        let err = ProxyVersion.run(&info).await.unwrap_err();
        assert!(err.to_string().contains("failed to load"));
        assert_eq!(runner.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_proxy_version_mismatch() {
        let fixture = ReleaseFixture::new("1.24.0");
        let runner = Arc::new(FakeRunner::new().respond("docker", "run", &version_json("1.23.0")));
        let info = fixture.info(runner);

        let err = ProxyVersion.run(&info).await.unwrap_err();
        assert!(err.to_string().contains("got 1.23.0 expected 1.24.0"));
    }
}
