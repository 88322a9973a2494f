//! Validator configuration.
//!
//! The validator is configured by an optional TOML file naming the product being
//! released and the external tools it shells out to. Every field has a default, so
//! no file at all means "validate an Istio release with the standard tools found on
//! PATH".
//!
//! # File Format
//!
//! ```toml
//! product = "istio"
//! cli_name = "istioctl"
//!
//! tar = "tar"
//! container_runtime = "podman"
//! chart_tool = "/usr/local/bin/helm"
//!
//! # Deadline for every external command, in seconds (no deadline when omitted)
//! command_timeout_secs = 600
//!
//! # Parent directory for the per-run scratch directory
//! scratch_root = "/var/tmp"
//! ```
//!
//! The file is passed with `--config`, or through the `RELEASE_VALIDATOR_CONFIG`
//! environment variable.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;

use crate::constants::{DEFAULT_CLI_NAME, DEFAULT_PRODUCT};

/// Names and limits used when validating a release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Product name; prefixes the per-platform archive (`<product>-<version>-<os>-<arch>.tar.gz`)
    pub product: String,

    /// Name of the release CLI binary and of its standalone archive
    pub cli_name: String,

    /// Archive extraction tool
    pub tar: String,

    /// Container runtime used to load and run images
    pub container_runtime: String,

    /// Chart inspection tool
    pub chart_tool: String,

    /// Deadline for each external command; `None` waits indefinitely
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command_timeout_secs: Option<u64>,

    /// Parent of the scratch directory; the system temp dir when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scratch_root: Option<PathBuf>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            product: DEFAULT_PRODUCT.to_string(),
            cli_name: DEFAULT_CLI_NAME.to_string(),
            tar: "tar".to_string(),
            container_runtime: "docker".to_string(),
            chart_tool: "helm".to_string(),
            command_timeout_secs: None,
            scratch_root: None,
        }
    }
}

impl ValidatorConfig {
    /// Load configuration from `path` if given, otherwise return defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML for this schema.
    pub async fn load_with_optional(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path).await,
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read validator config from {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse validator config from {}", path.display()))
    }

    /// Deadline for external commands, if configured.
    #[must_use]
    pub fn command_timeout(&self) -> Option<Duration> {
        self.command_timeout_secs.map(Duration::from_secs)
    }

    /// Name of the primary per-platform archive for `version`.
    #[must_use]
    pub fn primary_archive_name(&self, version: &str) -> String {
        format!("{}-{}-linux-amd64.tar.gz", self.product, version)
    }

    /// Name of the standalone CLI archive for `version`.
    #[must_use]
    pub fn standalone_cli_archive_name(&self, version: &str) -> String {
        format!("{}-{}-linux-amd64.tar.gz", self.cli_name, version)
    }

    /// Top-level directory inside the primary archive.
    #[must_use]
    pub fn archive_root_dir(&self, version: &str) -> String {
        format!("{}-{}", self.product, version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_defaults_without_file() {
        let config = ValidatorConfig::load_with_optional(None).await.unwrap();
        assert_eq!(config, ValidatorConfig::default());
        assert_eq!(config.product, "istio");
        assert_eq!(config.cli_name, "istioctl");
        assert!(config.command_timeout().is_none());
    }

    #[tokio::test]
    async fn test_partial_file_keeps_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("validator.toml");
        std::fs::write(&path, "container_runtime = \"podman\"\ncommand_timeout_secs = 90\n").unwrap();

        let config = ValidatorConfig::load_with_optional(Some(&path)).await.unwrap();
        assert_eq!(config.container_runtime, "podman");
        assert_eq!(config.command_timeout(), Some(Duration::from_secs(90)));
        assert_eq!(config.chart_tool, "helm");
        assert_eq!(config.tar, "tar");
    }

    #[tokio::test]
    async fn test_invalid_file_is_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("validator.toml");
        std::fs::write(&path, "command_timeout_secs = \"soon\"\n").unwrap();

        let err = ValidatorConfig::load_from(&path).await.unwrap_err();
        assert!(err.to_string().contains("Failed to parse validator config"));
    }

    #[test]
    fn test_archive_names() {
        let config = ValidatorConfig::default();
        assert_eq!(config.primary_archive_name("1.24.0"), "istio-1.24.0-linux-amd64.tar.gz");
        assert_eq!(config.standalone_cli_archive_name("1.24.0"), "istioctl-1.24.0-linux-amd64.tar.gz");
        assert_eq!(config.archive_root_dir("1.24.0"), "istio-1.24.0");
    }
}
