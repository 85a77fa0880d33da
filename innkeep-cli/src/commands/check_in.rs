//! Check-in command implementation.

use chrono::Utc;
use clap::Args;

use crate::error::CliError;
use crate::utils::{
    load_configuration, open_database, parse_booking_number, parse_date, GlobalOptions,
};

/// Check a guest in.
#[derive(Args)]
pub struct CheckInCommand {
    /// Booking number
    #[arg(value_name = "NUMBER")]
    pub booking: String,

    /// Check-in date override (YYYY-MM-DD, default: today)
    #[arg(long, value_name = "DATE")]
    pub date: Option<String>,
}

impl CheckInCommand {
    /// Execute the check-in command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let number = parse_booking_number(&self.booking)?;
        let today = match &self.date {
            Some(value) => parse_date(value, "--date")?,
            None => Utc::now().date_naive(),
        };

        let config = load_configuration(global)?;
        let mut db = open_database(global, &config)?;

        let booking = innkeep::check_in(&mut db, &number, today)?;
        if !global.quiet {
            eprintln!("Guest checked in to room {}", booking.room_id());
        }
        println!("{}", booking.status());
        Ok(())
    }
}
