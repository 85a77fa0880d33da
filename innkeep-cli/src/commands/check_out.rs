//! Check-out command implementation.

use clap::Args;

use crate::error::CliError;
use crate::utils::{load_configuration, open_database, parse_booking_number, GlobalOptions};

/// Check a guest out.
#[derive(Args)]
pub struct CheckOutCommand {
    /// Booking number
    #[arg(value_name = "NUMBER")]
    pub booking: String,
}

impl CheckOutCommand {
    /// Execute the check-out command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let number = parse_booking_number(&self.booking)?;

        let config = load_configuration(global)?;
        let mut db = open_database(global, &config)?;

        let booking = innkeep::check_out(&mut db, &number)?;
        if !global.quiet {
            eprintln!("Stay closed for room {}", booking.room_id());
        }
        println!("{}", booking.status());
        Ok(())
    }
}
