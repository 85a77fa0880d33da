//! Show-data-dir command implementation.

use clap::Args;

use crate::error::CliError;
use crate::utils::{resolve_data_dir, GlobalOptions};

/// Show the resolved data directory path.
#[derive(Args)]
pub struct ShowDataDirCommand {}

impl ShowDataDirCommand {
    /// Execute the show-data-dir command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let data_dir = resolve_data_dir(global)?;
        println!("{}", data_dir.display());
        Ok(())
    }
}
