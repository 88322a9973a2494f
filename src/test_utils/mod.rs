//! Test utilities for release validation.
//!
//! Compiled for unit tests and, through the `test-utils` feature, for the
//! integration tests under `tests/`:
//! - [`FakeRunner`] stands in for every external tool
//! - [`ReleaseFixture`] builds release and archive trees in a temporary directory
//! - [`init_test_logging`] wires `tracing` to the test writer once per process

pub mod fixtures;
pub mod runner;

pub use fixtures::{ReleaseFixture, values_yaml, version_json};
pub use runner::FakeRunner;

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has an effect. With `level` set, that level is used;
/// otherwise `RUST_LOG` is honored, and with neither nothing is logged.
///
/// ```bash
/// RUST_LOG=validate=debug,process=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}
