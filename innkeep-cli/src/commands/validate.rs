//! Validate command implementation.
//!
//! This module implements the `validate` command, which checks a
//! configuration file for schema and value errors.

use std::path::PathBuf;

use clap::Args;

use innkeep::config::{validate, ConfigLoader};

use crate::error::CliError;
use crate::utils::{resolve_data_dir, GlobalOptions};

/// Validate a configuration file.
#[derive(Args)]
pub struct ValidateCommand {
    /// Configuration file (default: the data directory's config.yaml)
    #[arg(long, value_name = "FILE")]
    pub file: Option<PathBuf>,
}

impl ValidateCommand {
    /// Execute the validate command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let path = match self.file {
            Some(path) => path,
            None => resolve_data_dir(global)?.join("config.yaml"),
        };

        if !path.exists() {
            return Err(CliError::SemanticFailure(format!(
                "configuration file not found: {}",
                path.display()
            )));
        }

        let config = ConfigLoader::load_file(&path)
            .map_err(|e| CliError::Config(format!("{}: {e}", path.display())))?;
        validate(&config).map_err(|e| CliError::Config(e.to_string()))?;

        if !global.quiet {
            eprintln!("{} is valid", path.display());
        }
        Ok(())
    }
}
