//! Release manifest (`manifest.yaml`) model.
//!
//! The manifest is produced by the build and describes what the release is supposed
//! to contain: its version, the container registry images were pushed under, the
//! target platforms, the pinned source revisions of every dependency, and the
//! dashboards that ship with it. Validation treats it as ground truth and only reads
//! it.
//!
//! # Format
//!
//! ```yaml
//! version: 1.24.0
//! docker: docker.io/istio
//! directory: ""
//! architectures:
//!   - linux/amd64
//!   - linux/arm64
//! dependencies:
//!   istio:
//!     git: https://github.com/istio/istio
//!     branch: release-1.24
//!     sha: 2f1e0a8c
//! grafanaDashboards:
//!   istio-mesh-dashboard: 7639
//! ```
//!
//! Unknown keys are ignored and every collection defaults to empty, so a manifest
//! from a newer build still loads.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::core::ReleaseError;

/// Name of the manifest file at the root of a release directory.
pub const MANIFEST_FILE: &str = "manifest.yaml";

/// Read-only view of a release manifest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Manifest {
    /// Release version; images and charts are tagged with it
    pub version: String,

    /// Container registry (hub) images are published under
    pub docker: String,

    /// Build-time working directory. Must be empty in a published manifest.
    pub directory: String,

    /// Target platforms as `os/arch` strings
    pub architectures: Vec<String>,

    /// Source repositories the release was built from, by name. A key with no
    /// body deserializes to `None`.
    pub dependencies: BTreeMap<String, Option<Dependency>>,

    /// Dashboards shipped with the release, by name
    pub grafana_dashboards: BTreeMap<String, serde_yaml::Value>,
}

/// Pinned source of one dependency.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dependency {
    /// Repository URL
    pub git: String,
    /// Branch the revision was taken from
    pub branch: String,
    /// Exact source revision
    pub sha: String,
    /// Local checkout used instead of cloning, if any
    pub localpath: String,
}

impl Manifest {
    /// Load a manifest from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ReleaseError::ManifestError`] if the file cannot be read or is not a
    /// valid manifest document.
    pub fn load(path: &Path) -> Result<Self, ReleaseError> {
        let content = std::fs::read_to_string(path).map_err(|e| ReleaseError::ManifestError {
            file: path.display().to_string(),
            reason: e.to_string(),
        })?;

        Self::from_yaml(&content).map_err(|e| ReleaseError::ManifestError {
            file: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Parse a manifest from YAML text.
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        let manifest: Option<Self> = serde_yaml::from_str(content)?;
        Ok(manifest.unwrap_or_default())
    }

    /// Whether the version is a valid semantic version (e.g. `1.24.0`, `1.25.0-beta.1`).
    ///
    /// Development builds use versions such as `1.25-dev` or `dev-build`; checks that
    /// only make sense for real releases are skipped for those.
    #[must_use]
    pub fn is_semver(&self) -> bool {
        semver::Version::parse(&self.version).is_ok()
    }

    /// Look up a dependency by name; `None` if absent or declared without a body.
    #[must_use]
    pub fn dependency(&self, name: &str) -> Option<&Dependency> {
        self.dependencies.get(name).and_then(Option::as_ref)
    }

    /// Architecture component of each declared platform, in declaration order.
    ///
    /// `linux/arm64` yields `arm64`; an entry without an `os/` part is taken as a
    /// bare architecture.
    pub fn arches(&self) -> impl Iterator<Item = &str> {
        self.architectures
            .iter()
            .map(|platform| platform.split_once('/').map_or(platform.as_str(), |(_, arch)| arch))
    }

    /// Image reference `<hub>/<name>:<version>` for a component image.
    #[must_use]
    pub fn image_ref(&self, name: &str) -> String {
        format!("{}/{}:{}", self.docker, name, self.version)
    }
}
