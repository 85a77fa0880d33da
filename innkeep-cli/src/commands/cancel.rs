//! Cancel command implementation.

use clap::Args;

use crate::error::CliError;
use crate::utils::{load_configuration, open_database, parse_booking_number, GlobalOptions};

/// Cancel a booking.
#[derive(Args)]
pub struct CancelCommand {
    /// Booking number
    #[arg(value_name = "NUMBER")]
    pub booking: String,
}

impl CancelCommand {
    /// Execute the cancel command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let number = parse_booking_number(&self.booking)?;

        let config = load_configuration(global)?;
        let mut db = open_database(global, &config)?;

        let booking = innkeep::cancel(&mut db, &number)?;
        if !global.quiet {
            eprintln!("Booking cancelled, room {} released", booking.room_id());
        }
        println!("{}", booking.status());
        Ok(())
    }
}
