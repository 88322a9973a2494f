//! Presence of dashboards, licenses, completions and OS packages.

use anyhow::{Context, Result, bail};
use std::collections::BTreeSet;

use super::tables::{
    COMPLETION_FILES, DASHBOARD_SUFFIX, DEBIAN_PACKAGE, EXPECTED_LICENSES, RPM_PACKAGE,
};
use super::{entry_names, join};
use crate::core::ReleaseError;
use crate::release::ReleaseInfo;
use crate::validate::{CheckFuture, ReleaseCheck};

/// Dashboards under `grafana/` are exactly the ones the manifest declares.
pub struct GrafanaDashboards;

impl ReleaseCheck for GrafanaDashboards {
    fn name(&self) -> &'static str {
        "Grafana"
    }

    fn run<'a>(&'a self, release: &'a ReleaseInfo) -> CheckFuture<'a> {
        Box::pin(check_dashboards(release))
    }
}

async fn check_dashboards(release: &ReleaseInfo) -> Result<()> {
    let created: BTreeSet<String> = entry_names(&release.release_dir().join("grafana"))
        .await?
        .into_iter()
        .map(|name| name.strip_suffix(DASHBOARD_SUFFIX).map_or_else(|| name.clone(), str::to_string))
        .collect();
    let declared: BTreeSet<String> = release.manifest().grafana_dashboards.keys().cloned().collect();

    if created != declared {
        bail!(
            "dashboards out of sync, release contains [{}], manifest contains [{}] (only in release: [{}]; only in manifest: [{}])",
            join(&created),
            join(&declared),
            join(created.difference(&declared)),
            join(declared.difference(&created))
        );
    }
    Ok(())
}

/// Every expected license archive is under `licenses/`; extras are allowed.
pub struct Licenses;

impl ReleaseCheck for Licenses {
    fn name(&self) -> &'static str {
        "Licenses"
    }

    fn run<'a>(&'a self, release: &'a ReleaseInfo) -> CheckFuture<'a> {
        Box::pin(async move {
            let found = entry_names(&release.release_dir().join("licenses")).await?;
            let missing: Vec<&str> =
                EXPECTED_LICENSES.iter().copied().filter(|license| !found.contains(*license)).collect();

            if !missing.is_empty() {
                bail!("failed to find licenses for: {}", join(missing));
            }
            Ok(())
        })
    }
}

/// Shell completion files are in the archive's `tools/` directory.
pub struct CompletionFiles;

impl ReleaseCheck for CompletionFiles {
    fn name(&self) -> &'static str {
        "CompletionFiles"
    }

    fn run<'a>(&'a self, release: &'a ReleaseInfo) -> CheckFuture<'a> {
        Box::pin(async move {
            for file in COMPLETION_FILES {
                let path = release.archive_dir().join("tools").join(file);
                if !path.exists() {
                    return Err(ReleaseError::MissingArtifact {
                        what: "completion file".to_string(),
                        path: path.display().to_string(),
                    }
                    .into());
                }
            }
            Ok(())
        })
    }
}

/// The Debian package is present.
pub struct DebianPackage;

impl ReleaseCheck for DebianPackage {
    fn name(&self) -> &'static str {
        "Debian"
    }

    fn run<'a>(&'a self, release: &'a ReleaseInfo) -> CheckFuture<'a> {
        Box::pin(async move { require_file(release, DEBIAN_PACKAGE, "debian package") })
    }
}

/// The RPM package is present.
pub struct RpmPackage;

impl ReleaseCheck for RpmPackage {
    fn name(&self) -> &'static str {
        "Rpm"
    }

    fn run<'a>(&'a self, release: &'a ReleaseInfo) -> CheckFuture<'a> {
        Box::pin(async move { require_file(release, RPM_PACKAGE, "rpm package") })
    }
}

/// A regular file must exist at `relative` under the release directory.
fn require_file(release: &ReleaseInfo, relative: &str, what: &str) -> Result<()> {
    let path = release.release_dir().join(relative);
    if path.is_file() {
        return Ok(());
    }
    Err(ReleaseError::MissingArtifact {
        what: what.to_string(),
        path: path.display().to_string(),
    })
    .context(format!("{what} not found"))
}
