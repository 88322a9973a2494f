//! Built-in release checks.
//!
//! Each check is a unit struct implementing [`ReleaseCheck`]. The expectations they
//! compare against live in [`tables`]; the helpers here are shared by checks that
//! parse version output or list release directories.

mod cli_version;
mod files;
mod images;
mod manifest;
pub mod tables;
mod values;

pub use cli_version::{IstioctlArchive, IstioctlStandalone};
pub use files::{CompletionFiles, DebianPackage, GrafanaDashboards, Licenses, RpmPackage};
pub use images::{DockerImages, ProxyVersion};
pub use manifest::ManifestCompleteness;
pub use values::{HelmChartVersions, HelmVersionsIstio, IstioctlProfiles, validate_hub_tag};

use anyhow::{Result, anyhow};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::Path;

use super::ReleaseCheck;
use crate::core::ReleaseError;

/// Every built-in check, in registration order.
pub fn all() -> Vec<Box<dyn ReleaseCheck>> {
    vec![
        Box::new(IstioctlArchive),
        Box::new(IstioctlStandalone),
        Box::new(DockerImages),
        Box::new(ProxyVersion),
        Box::new(HelmChartVersions),
        Box::new(HelmVersionsIstio),
        Box::new(IstioctlProfiles),
        Box::new(ManifestCompleteness),
        Box::new(GrafanaDashboards),
        Box::new(Licenses),
        Box::new(CompletionFiles),
        Box::new(DebianPackage),
        Box::new(RpmPackage),
    ]
}

/// JSON printed by `version --short -ojson`.
#[derive(Debug, Deserialize)]
struct VersionOutput {
    #[serde(rename = "clientVersion")]
    client_version: Option<BuildInfo>,
}

/// Build information of one binary.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BuildInfo {
    version: String,
    revision: String,
    status: String,
}

/// Check that `stdout` reports `expected` as the client version.
fn check_client_version(stdout: &str, source_desc: &str, expected: &str) -> Result<()> {
    let parsed: VersionOutput = serde_json::from_str(stdout).map_err(|source| ReleaseError::JsonError {
        source_desc: source_desc.to_string(),
        source,
    })?;

    let info = parsed
        .client_version
        .ok_or_else(|| anyhow!("no client version found in version information from {source_desc}"))?;
    tracing::debug!(
        target: "validate",
        "{} reports version {} (revision {}, status {})",
        source_desc,
        info.version,
        info.revision,
        info.status
    );

    if info.version != expected {
        return Err(ReleaseError::assertion("client version", expected, info.version).into());
    }
    Ok(())
}

/// Names of the entries directly inside `dir`.
async fn entry_names(dir: &Path) -> Result<BTreeSet<String>, ReleaseError> {
    let mut entries = tokio::fs::read_dir(dir).await.map_err(|e| ReleaseError::fs("reading directory", dir, e))?;

    let mut names = BTreeSet::new();
    while let Some(entry) =
        entries.next_entry().await.map_err(|e| ReleaseError::fs("reading directory", dir, e))?
    {
        names.insert(entry.file_name().to_string_lossy().into_owned());
    }
    Ok(names)
}

/// Comma-separated list for messages.
fn join<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items.into_iter().map(|s| s.as_ref().to_string()).collect::<Vec<_>>().join(", ")
}
