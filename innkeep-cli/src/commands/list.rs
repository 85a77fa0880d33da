//! List command implementation.
//!
//! This module implements the `list` command for support tooling: all
//! bookings, optionally filtered by status.

use clap::Args;

use innkeep::output::format_snapshot_list;
use innkeep::{list_snapshots, BookingStatus};

use crate::error::CliError;
use crate::utils::{load_configuration, open_database, resolve_output_format, GlobalOptions};

/// List bookings.
#[derive(Args)]
pub struct ListCommand {
    /// Filter by status (pending_payment, confirmed, checked_in,
    /// checked_out, expired, cancelled)
    #[arg(long, value_name = "STATUS")]
    pub status: Option<String>,

    /// Output format (human, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<String>,
}

impl ListCommand {
    /// Execute the list command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let status = self
            .status
            .as_deref()
            .map(BookingStatus::parse)
            .transpose()
            .map_err(|e| CliError::InvalidArguments(e.to_string()))?;

        let config = load_configuration(global)?;
        let format = resolve_output_format(self.format.as_deref(), &config)?;
        let db = open_database(global, &config)?;

        let snapshots = list_snapshots(db.connection(), status)?;
        println!("{}", format_snapshot_list(&snapshots, format)?);
        Ok(())
    }
}
