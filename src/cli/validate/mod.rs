//! Validate a built release.
//!
//! The `validate` command loads the release manifest, unpacks the primary archive
//! into a scratch directory, runs every selected check and reports the outcome.
//!
//! # Examples
//!
//! Validate everything:
//! ```bash
//! release-validator validate --release out/
//! ```
//!
//! Only the filesystem checks, against an archive unpacked earlier:
//! ```bash
//! release-validator validate --release out/ --archive-dir /tmp/istio-1.24.0 \
//!     --check Grafana --check Licenses --check CompletionFiles
//! ```
//!
//! JSON output for automation:
//! ```bash
//! release-validator validate --release out/ --format json
//! ```
//!
//! # Output Formats
//!
//! ## Text Format (Default)
//! ```text
//! ✓ IstioctlArchive
//! ✗ check Grafana failed: dashboards out of sync, ...
//! 12 passed, 1 failed
//! ```
//!
//! ## JSON Format
//! ```json
//! {
//!   "valid": false,
//!   "succeeded": ["IstioctlArchive"],
//!   "failures": ["check Grafana failed: dashboards out of sync, ..."],
//!   "report": "Checks failed. Release info: ..."
//! }
//! ```
//!
//! The process exits non-zero whenever any check failed.

mod command;
mod executor;
mod results;

pub use command::{OutputFormat, ValidateCommand};
pub use results::ValidationResults;
