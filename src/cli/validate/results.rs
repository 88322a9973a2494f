//! Validation results structure for JSON output.

use serde::Serialize;

use crate::validate::CheckReport;

/// Results of a validation run as printed with `--format json`.
///
/// ```json
/// {
///   "valid": true,
///   "succeeded": ["IstioctlArchive", "Manifest"],
///   "failures": [],
///   "report": null
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct ValidationResults<'a> {
    /// True when no check failed
    pub valid: bool,
    /// Names of the checks that passed
    pub succeeded: &'a [String],
    /// One message per failed check
    pub failures: &'a [String],
    /// Diagnostic report, only present when something failed
    pub report: Option<&'a str>,
}

impl<'a> From<&'a CheckReport> for ValidationResults<'a> {
    fn from(report: &'a CheckReport) -> Self {
        Self {
            valid: report.is_success(),
            succeeded: &report.succeeded,
            failures: &report.failures,
            report: report.report.as_deref(),
        }
    }
}
