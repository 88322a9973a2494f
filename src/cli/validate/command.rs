//! Command structure and output format definitions for validation.

use clap::Args;
use std::path::PathBuf;

/// Command to validate a built release.
///
/// # Examples
///
/// ```rust,ignore
/// use release_validator::cli::validate::{OutputFormat, ValidateCommand};
///
/// let cmd = ValidateCommand {
///     release: Some("out".into()),
///     archive_dir: None,
///     checks: vec!["Manifest".to_string()],
///     format: OutputFormat::Json,
///     report: None,
///     keep_scratch: false,
///     timeout: Some(600),
/// };
/// ```
#[derive(Args, Debug)]
pub struct ValidateCommand {
    /// Release directory produced by the build (contains manifest.yaml)
    #[arg(long, value_name = "DIR")]
    pub release: Option<PathBuf>,

    /// Already-unpacked primary archive; skips extracting it
    #[arg(long, value_name = "DIR")]
    pub archive_dir: Option<PathBuf>,

    /// Run only this check (repeatable); see `release-validator list`
    #[arg(long = "check", value_name = "NAME")]
    pub checks: Vec<String>,

    /// Output format: text or json
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Also write the diagnostic report to this file when a check fails
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Leave the scratch directory in place after the run
    #[arg(long)]
    pub keep_scratch: bool,

    /// Deadline in seconds for each external command (overrides the config file)
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

/// Output format options for validation results.
#[derive(Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output with colors
    Text,

    /// Structured JSON output for automation
    Json,
}
