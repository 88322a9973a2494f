//! Command-line interface for the release validator.
//!
//! # Available Commands
//!
//! - `validate` - Run the release checks against a build output directory
//! - `list` - Print the names of the registered checks
//!
//! # Global Options
//!
//! - `--verbose` - Enable debug logging
//! - `--quiet` - Only print failures and warnings
//! - `--config` - Path to a validator config file (also `RELEASE_VALIDATOR_CONFIG`)
//!
//! # Example
//!
//! ```bash
//! release-validator --verbose validate --release out/ --timeout 600
//! release-validator list
//! ```

mod list;
pub mod validate;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::ValidatorConfig;
use crate::constants::CONFIG_ENV_VAR;

pub use list::ListCommand;

/// Top-level command-line interface.
#[derive(Parser, Debug)]
#[command(
    name = "release-validator",
    about = "Validate the artifacts of a built release",
    version,
    long_about = "Runs a fixed set of checks against a release directory and its primary archive: \
                  CLI and image versions, chart hub/tag values, manifest completeness, dashboards, \
                  licenses, completion files and OS packages."
)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose (debug) logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only print failures and warnings
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the validator config file
    #[arg(long, global = true, env = CONFIG_ENV_VAR, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run release checks
    Validate(validate::ValidateCommand),

    /// List the available checks
    List(ListCommand),
}

impl Cli {
    /// Execute the parsed command.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be loaded or the command fails.
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Validate(cmd) => {
                let config = ValidatorConfig::load_with_optional(self.config.as_deref()).await?;
                tracing::debug!(target: "release", "Using config: {:?}", config);
                cmd.execute(config, self.quiet).await
            }
            Commands::List(cmd) => cmd.execute(),
        }
    }

    /// Default log filter for the chosen verbosity, used when `RUST_LOG` is unset.
    #[must_use]
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        }
    }
}
