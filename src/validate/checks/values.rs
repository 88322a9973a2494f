//! Hub and tag embedded in chart values and install profiles.

use anyhow::{Context, Result};

use super::tables::{HubTagLocation, INSTALL_PROFILES, PACKAGED_CHARTS, PROFILE_PREFIX, SOURCE_TREE_VALUES};
use crate::core::ReleaseError;
use crate::document::{hub_tag_paths, parse_values, resolve};
use crate::manifest::Manifest;
use crate::process::ToolCommand;
use crate::release::ReleaseInfo;
use crate::validate::{CheckFuture, ReleaseCheck};

/// Check that a values document carries the manifest's tag and hub under `prefix`.
///
/// `prefix` is dotted and may be empty. A path that resolves to nothing is reported
/// as a mismatch against the expected value.
///
/// # Errors
///
/// - [`ReleaseError::ParseError`] if `values` is not a YAML mapping
/// - [`ReleaseError::InvalidPath`] or [`ReleaseError::UnexpectedType`] if the
///   document shape does not allow the lookup
/// - [`ReleaseError::Assertion`] on a tag or hub mismatch
pub fn validate_hub_tag(
    values: &[u8],
    source_desc: &str,
    prefix: &str,
    manifest: &Manifest,
) -> Result<(), ReleaseError> {
    let document = parse_values(values, source_desc)?;
    let (tag_path, hub_path) = hub_tag_paths(prefix);

    let tag = resolve(&document, &tag_path)?;
    if tag != Some(manifest.version.as_str()) {
        return Err(ReleaseError::assertion("archive tag", &manifest.version, tag.unwrap_or("<none>")));
    }

    let hub = resolve(&document, &hub_path)?;
    if hub != Some(manifest.docker.as_str()) {
        return Err(ReleaseError::assertion("hub", &manifest.docker, hub.unwrap_or("<none>")));
    }

    Ok(())
}

/// Packaged charts carry the manifest hub and tag in their default values.
///
/// Skipped for versions that are not semantic versions.
pub struct HelmChartVersions;

impl ReleaseCheck for HelmChartVersions {
    fn name(&self) -> &'static str {
        "HelmChartVersions"
    }

    fn run<'a>(&'a self, release: &'a ReleaseInfo) -> CheckFuture<'a> {
        Box::pin(check_packaged_charts(self.name(), release))
    }
}

async fn check_packaged_charts(name: &str, release: &ReleaseInfo) -> Result<()> {
    let manifest = release.manifest();
    if !manifest.is_semver() {
        tracing::info!(target: "validate", "Skipping {}; {} is not a valid semver", name, manifest.version);
        return Ok(());
    }

    for (chart, location) in PACKAGED_CHARTS {
        let archive = release.release_dir().join("helm").join(format!("{chart}-{}.tgz", manifest.version));
        let command = ToolCommand::new(&release.config().chart_tool)
            .args(["show", "values"])
            .arg(archive.display().to_string())
            .with_context(name);
        let values = release.run_tool(command).await.with_context(|| format!("show values for chart {chart}"))?;

        if let HubTagLocation::At(prefix) = location {
            validate_hub_tag(values.as_bytes(), &archive.display().to_string(), prefix, manifest)
                .with_context(|| format!("chart {chart}"))?;
        }
    }
    Ok(())
}

/// Values files in the unpacked archive carry the manifest hub and tag.
pub struct HelmVersionsIstio;

impl ReleaseCheck for HelmVersionsIstio {
    fn name(&self) -> &'static str {
        "HelmVersionsIstio"
    }

    fn run<'a>(&'a self, release: &'a ReleaseInfo) -> CheckFuture<'a> {
        Box::pin(async move {
            for (prefix, files) in SOURCE_TREE_VALUES {
                for file in *files {
                    check_file(release, file, prefix).await?;
                }
            }
            Ok(())
        })
    }
}

/// The default install profile carries the manifest hub and tag under `spec`.
pub struct IstioctlProfiles;

impl ReleaseCheck for IstioctlProfiles {
    fn name(&self) -> &'static str {
        "IstioctlProfiles"
    }

    fn run<'a>(&'a self, release: &'a ReleaseInfo) -> CheckFuture<'a> {
        Box::pin(async move {
            for file in INSTALL_PROFILES {
                check_file(release, file, PROFILE_PREFIX).await?;
            }
            Ok(())
        })
    }
}

async fn check_file(release: &ReleaseInfo, file: &str, prefix: &str) -> Result<()> {
    let path = release.archive_dir().join(file);
    let bytes = tokio::fs::read(&path).await.map_err(|e| ReleaseError::fs("reading", &path, e))?;

    validate_hub_tag(&bytes, &path.display().to_string(), prefix, release.manifest())
        .with_context(|| format!("hub/tag in {file}"))
}
