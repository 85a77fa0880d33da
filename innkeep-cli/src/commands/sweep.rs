//! Sweep command implementation.
//!
//! This module implements the `sweep` command, the operational entry point
//! for the periodic expiry sweep. Schedulers run it on the configured
//! interval; it is safe to run concurrently with itself and with
//! confirmation attempts.

use chrono::Utc;
use clap::Args;

use innkeep::ExpirySweep;

use crate::error::CliError;
use crate::utils::{load_configuration, open_database, GlobalOptions};

/// Expire lapsed unpaid holds.
#[derive(Args)]
pub struct SweepCommand {
    /// Perform a dry run
    #[arg(long)]
    pub dry_run: bool,
}

impl SweepCommand {
    /// Execute the sweep command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let mut db = open_database(global, &config)?;

        if self.dry_run && !global.quiet {
            eprintln!("[DRY RUN] Scanning for lapsed unpaid holds...");
        }

        let result = ExpirySweep::run(&mut db, Utc::now(), self.dry_run)?;

        if global.quiet {
            if result.expired_count > 0 {
                println!("{}", result.expired_count);
            }
        } else {
            if self.dry_run {
                eprintln!("[DRY RUN] Would expire {} hold(s)", result.expired_count);
            } else {
                eprintln!("Expired {} hold(s)", result.expired_count);
            }
            for booking in &result.expired_bookings {
                eprintln!(
                    "  {} (room {}, {})",
                    booking.booking_number(),
                    booking.room_id(),
                    booking.stay()
                );
            }
        }
        Ok(())
    }
}
