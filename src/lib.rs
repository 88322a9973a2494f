//! Release artifact validation.
//!
//! Validates the outputs of a release build (binaries, container images, Helm
//! charts, OS packages, completion files, dashboards and licenses) against the
//! release manifest. Every check runs against the same release, failures are
//! collected rather than stopping the run, and a failed run carries a diagnostic
//! listing of the release and archive trees.
//!
//! # Architecture Overview
//!
//! - [`manifest`] - Read-only model of `manifest.yaml`, the ground truth
//! - [`release`] - [`release::ReleaseInfo`], the per-run session: manifest, release
//!   directory, unpacked archive and scratch directory
//! - [`validate`] - [`validate::ReleaseCheck`] trait, registry, runner and the
//!   built-in checks
//! - [`document`] - Untyped YAML documents and path-addressed lookup
//! - [`process`] - External command execution behind the
//!   [`process::CommandRunner`] capability
//!
//! ## Supporting Modules
//! - [`config`] - Optional TOML configuration (product name, tool binaries, deadlines)
//! - [`core`] - Error taxonomy and user-facing error rendering
//! - [`cli`] - Command-line front end
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use release_validator::config::ValidatorConfig;
//! use release_validator::process::SystemRunner;
//! use release_validator::release::{LoadOptions, ReleaseInfo};
//! use release_validator::validate::{CheckRegistry, run_all};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let info = ReleaseInfo::load(
//!     Path::new("out"),
//!     ValidatorConfig::default(),
//!     Arc::new(SystemRunner::new(None)),
//!     LoadOptions::default(),
//! )
//! .await?;
//!
//! let report = run_all(&info, &CheckRegistry::with_defaults()).await;
//! for failure in &report.failures {
//!     eprintln!("{failure}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod document;
pub mod manifest;
pub mod process;
pub mod release;
pub mod validate;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
