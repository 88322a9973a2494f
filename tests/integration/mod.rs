//! Integration test suite for release-validator
//!
//! These tests drive the compiled binary end to end. They never need a container
//! runtime or chart tool: release trees are built with
//! [`release_validator::test_utils::ReleaseFixture`] and runs are restricted with
//! `--check` to checks that only read the filesystem.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **list**: `list` command output
//! - **validate**: `validate` exit status, text and JSON output, report file,
//!   archive extraction and configuration

mod list;
mod validate;

use assert_cmd::Command;

/// Command for the release-validator binary with logging kept quiet.
pub fn validator() -> Command {
    let mut cmd = Command::cargo_bin("release-validator").unwrap();
    cmd.env_remove("RUST_LOG").env_remove("RELEASE_VALIDATOR_CONFIG").env("NO_COLOR", "1");
    cmd
}
