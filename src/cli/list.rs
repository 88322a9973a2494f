//! List the registered checks.

use anyhow::Result;
use clap::Args;

use crate::validate::CheckRegistry;

/// Print the name of every check, in the order they run.
///
/// The names are the ones accepted by `validate --check`.
#[derive(Args, Debug)]
pub struct ListCommand {
    /// Print the names as a JSON array
    #[arg(long)]
    pub json: bool,
}

impl ListCommand {
    /// Execute the list command.
    ///
    /// # Errors
    ///
    /// Returns an error only if JSON serialization fails.
    pub fn execute(self) -> Result<()> {
        let registry = CheckRegistry::with_defaults();
        if self.json {
            println!("{}", serde_json::to_string_pretty(&registry.names().collect::<Vec<_>>())?);
        } else {
            for name in registry.names() {
                println!("{name}");
            }
        }
        Ok(())
    }
}
