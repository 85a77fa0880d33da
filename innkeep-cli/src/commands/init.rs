//! Init command implementation.
//!
//! This module implements the `init` command for explicitly initializing
//! the innkeep data directory and database.

use std::path::PathBuf;

use clap::Args;

use innkeep::database::{default_data_dir, Database, DatabaseConfig};

use crate::error::CliError;
use crate::utils::GlobalOptions;

/// Initialize the innkeep data directory and database.
#[derive(Args)]
pub struct InitCommand {
    /// Data directory to initialize
    #[arg(long, value_name = "PATH")]
    data_dir: Option<PathBuf>,

    /// Preview actions without executing
    #[arg(long)]
    dry_run: bool,
}

impl InitCommand {
    /// Execute the init command.
    ///
    /// Note: This command does NOT honor --disable-autoinit (would be
    /// paradoxical). The --data-dir flag here means where to create, not
    /// where to find.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        // Determine data directory to initialize
        // Priority: command flag > global flag > default
        let data_dir = self
            .data_dir
            .or_else(|| global.data_dir.clone())
            .or_else(|| default_data_dir().ok())
            .ok_or_else(|| {
                CliError::Config(
                    "Could not determine data directory (home directory not found)".to_string(),
                )
            })?;

        let db_path = data_dir.join("innkeep.db");

        if self.dry_run {
            println!("Dry-run mode: no changes will be made");
            println!("Would initialize innkeep in: {}", data_dir.display());
            if !data_dir.exists() {
                println!("  - Create data directory: {}", data_dir.display());
            }
            if !db_path.exists() {
                println!("  - Create database: {}", db_path.display());
            }
            return Ok(());
        }

        let mut db = Database::open(DatabaseConfig::new(&db_path))?;
        db.verify_integrity()?;

        if !global.quiet {
            eprintln!("Initialized innkeep in {}", data_dir.display());
        }
        println!("{}", db_path.display());
        Ok(())
    }
}
