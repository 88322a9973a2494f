//! Release trees on disk for tests.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use crate::config::ValidatorConfig;
use crate::document::split_prefix;
use crate::manifest::{Dependency, MANIFEST_FILE, Manifest};
use crate::process::CommandRunner;
use crate::release::ReleaseInfo;
use crate::validate::checks::tables::{
    COMPLETION_FILES, DEBIAN_PACKAGE, DEFAULT_ARCH, EXPECTED_IMAGES, EXPECTED_LICENSES,
    INSTALL_PROFILES, PROFILE_PREFIX, REQUIRED_DEPENDENCIES, RPM_PACKAGE, SOURCE_TREE_VALUES,
};

/// Default hub written into fixture manifests.
pub const FIXTURE_HUB: &str = "docker.io/istio";

/// A release directory and an unpacked archive directory under one temp dir.
///
/// [`new`](Self::new) writes only `manifest.yaml`; [`populate`](Self::populate) adds
/// everything the filesystem-only checks look for, consistent with the manifest.
pub struct ReleaseFixture {
    _temp: TempDir,
    release: PathBuf,
    archive: PathBuf,
    manifest: Manifest,
}

impl ReleaseFixture {
    /// A fixture whose manifest has `version`, the default hub, `linux/amd64` and
    /// `linux/arm64`, every required dependency pinned and two dashboards.
    pub fn new(version: &str) -> Self {
        Self::with_manifest(sample_manifest(version))
    }

    /// A fixture with exactly this manifest.
    pub fn with_manifest(manifest: Manifest) -> Self {
        let temp = TempDir::new().expect("create fixture temp dir");
        let release = temp.path().join("release");
        let archive = temp.path().join("archive");
        std::fs::create_dir_all(&release).expect("create release dir");
        std::fs::create_dir_all(&archive).expect("create archive dir");

        let yaml = serde_yaml::to_string(&manifest).expect("serialize manifest");
        std::fs::write(release.join(MANIFEST_FILE), yaml).expect("write manifest");

        Self {
            _temp: temp,
            release,
            archive,
            manifest,
        }
    }

    /// The release directory.
    pub fn release_dir(&self) -> &Path {
        &self.release
    }

    /// The unpacked archive directory.
    pub fn archive_dir(&self) -> &Path {
        &self.archive
    }

    /// The manifest written to `manifest.yaml`.
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Write a file under the release directory, creating parents.
    pub fn write_release(&self, relative: &str, content: &str) -> PathBuf {
        write(&self.release, relative, content)
    }

    /// Write a file under the archive directory, creating parents.
    pub fn write_archive(&self, relative: &str, content: &str) -> PathBuf {
        write(&self.archive, relative, content)
    }

    /// Write every source-tree values file with the manifest's hub and tag.
    pub fn write_source_tree_values(&self) {
        for (prefix, files) in SOURCE_TREE_VALUES {
            for file in *files {
                self.write_archive(file, &values_yaml(prefix, &self.manifest.version, &self.manifest.docker));
            }
        }
    }

    /// Fill both trees with everything the manifest promises.
    ///
    /// Images, dashboards, licenses, packages, completion files, source-tree values
    /// and install profiles are all written; tarballs are empty files.
    pub fn populate(&self) -> &Self {
        for arch in self.manifest.arches() {
            for image in EXPECTED_IMAGES {
                let name = if arch == DEFAULT_ARCH {
                    format!("{image}.tar.gz")
                } else {
                    format!("{image}-{arch}.tar.gz")
                };
                self.write_release(&format!("docker/{name}"), "");
            }
        }
        for dashboard in self.manifest.grafana_dashboards.keys() {
            self.write_release(&format!("grafana/{dashboard}.json"), "{}");
        }
        for license in EXPECTED_LICENSES {
            self.write_release(&format!("licenses/{license}"), "");
        }
        self.write_release(DEBIAN_PACKAGE, "");
        self.write_release(RPM_PACKAGE, "");

        for file in COMPLETION_FILES {
            self.write_archive(&format!("tools/{file}"), "");
        }
        self.write_source_tree_values();
        for profile in INSTALL_PROFILES {
            self.write_archive(
                profile,
                &format!(
                    "apiVersion: install.istio.io/v1alpha1\nkind: IstioOperator\n{}",
                    values_yaml(PROFILE_PREFIX, &self.manifest.version, &self.manifest.docker)
                ),
            );
        }
        self
    }

    /// A [`ReleaseInfo`] over this fixture with default config and `runner`.
    pub fn info(&self, runner: Arc<dyn CommandRunner>) -> ReleaseInfo {
        ReleaseInfo::new(self.manifest.clone(), &self.release, &self.archive, ValidatorConfig::default(), runner)
            .expect("create release info")
    }
}

/// Manifest used by [`ReleaseFixture::new`].
pub fn sample_manifest(version: &str) -> Manifest {
    let mut manifest = Manifest {
        version: version.to_string(),
        docker: FIXTURE_HUB.to_string(),
        architectures: vec!["linux/amd64".to_string(), "linux/arm64".to_string()],
        ..Default::default()
    };
    for repo in REQUIRED_DEPENDENCIES {
        manifest.dependencies.insert(
            repo.to_string(),
            Some(Dependency {
                git: format!("https://github.com/istio/{repo}"),
                branch: "master".to_string(),
                sha: format!("{repo}0123456789abcdef"),
                localpath: String::new(),
            }),
        );
    }
    for (name, id) in [("istio-mesh-dashboard", 7639), ("pilot-dashboard", 7645)] {
        manifest.grafana_dashboards.insert(name.to_string(), serde_yaml::Value::Number(id.into()));
    }
    manifest
}

/// YAML with `tag` and `hub` nested under a dotted `prefix`.
///
/// The tag is quoted so versions such as `1.24` stay strings.
pub fn values_yaml(prefix: &str, tag: &str, hub: &str) -> String {
    let mut out = String::new();
    let segments = split_prefix(prefix);
    for (depth, segment) in segments.iter().enumerate() {
        out.push_str(&format!("{}{}:\n", "  ".repeat(depth), segment));
    }
    let pad = "  ".repeat(segments.len());
    out.push_str(&format!("{pad}tag: \"{tag}\"\n{pad}hub: {hub}\n"));
    out
}

/// JSON a release binary prints for `version --short -ojson`.
pub fn version_json(version: &str) -> String {
    format!(
        r#"{{"clientVersion":{{"version":"{version}","revision":"6a5ee2b0d01c3c5a8d2f3b4e1e1f8f8f1c2d3e4f","golang_version":"go1.23.2","status":"Clean","tag":"{version}"}}}}"#
    )
}

fn write(root: &Path, relative: &str, content: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create fixture parent dir");
    }
    std::fs::write(&path, content).expect("write fixture file");
    path
}
