//! Lookup command implementation.
//!
//! This module implements the `lookup` command, the guest-facing read path
//! serving confirmation and "find my booking" flows.

use clap::Args;

use innkeep::output::format_snapshot;
use innkeep::lookup_booking;

use crate::error::CliError;
use crate::utils::{
    load_configuration, open_database, parse_booking_number, resolve_output_format, GlobalOptions,
};

/// Look up a booking by its number.
#[derive(Args)]
pub struct LookupCommand {
    /// Booking number
    #[arg(value_name = "NUMBER")]
    pub booking: String,

    /// Output format (human, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<String>,
}

impl LookupCommand {
    /// Execute the lookup command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let number = parse_booking_number(&self.booking)?;

        let config = load_configuration(global)?;
        let format = resolve_output_format(self.format.as_deref(), &config)?;
        let db = open_database(global, &config)?;

        match lookup_booking(db.connection(), &number)? {
            Some(snapshot) => {
                println!("{}", format_snapshot(&snapshot, format)?);
                Ok(())
            }
            None => Err(CliError::SemanticFailure(format!(
                "booking {number} not found"
            ))),
        }
    }
}
