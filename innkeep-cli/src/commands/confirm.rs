//! Confirm command implementation.
//!
//! This module implements the `confirm` command, which settles a booking
//! by verifying a provider reference against the provider's authoritative
//! record. The reference supplied on the command line is treated as
//! untrusted input, exactly like a return-URL parameter.

use chrono::Utc;
use clap::Args;

use innkeep::payment::PaymentGateway;
use innkeep::{confirm_payment, ConfirmOutcome, Database, ProviderKind};

use crate::error::CliError;
use crate::utils::{
    load_configuration, open_database, parse_booking_number, GlobalOptions,
};

/// Confirm payment for a booking.
#[derive(Args)]
pub struct ConfirmCommand {
    /// Booking number
    #[arg(long, value_name = "NUMBER")]
    pub booking: String,

    /// Provider-side session or charge reference
    #[arg(long, value_name = "REFERENCE")]
    pub reference: String,

    /// Provider to verify with (session, charge); defaults to the provider
    /// recorded at initiation
    #[arg(long, value_name = "PROVIDER")]
    pub provider: Option<String>,
}

impl ConfirmCommand {
    /// Execute the confirm command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let number = parse_booking_number(&self.booking)?;

        let config = load_configuration(global)?;
        let mut db = open_database(global, &config)?;

        // Resolve the provider: explicit flag, else the one recorded on the
        // booking at initiation
        let kind = match &self.provider {
            Some(name) => ProviderKind::parse(name)
                .map_err(|e| CliError::InvalidArguments(e.to_string()))?,
            None => Database::get_booking(db.connection(), &number)?
                .and_then(|b| b.provider().map(|r| r.provider))
                .ok_or_else(|| {
                    CliError::InvalidArguments(
                        "no provider recorded for this booking; pass --provider".to_string(),
                    )
                })?,
        };

        let providers = config
            .providers
            .clone()
            .ok_or_else(|| CliError::Config("no payment providers configured".to_string()))?;
        let gateway = PaymentGateway::from_config(&providers, kind)?;

        let outcome = confirm_payment(
            &mut db,
            gateway.client(),
            &number,
            &self.reference,
            Utc::now(),
        )?;

        match outcome {
            ConfirmOutcome::Confirmed(booking) => {
                if !global.quiet {
                    eprintln!("Payment verified, booking confirmed");
                }
                println!("{}", booking.status());
            }
            ConfirmOutcome::AlreadyConfirmed(booking) => {
                if !global.quiet {
                    eprintln!("Booking was already confirmed; verification re-checked");
                }
                println!("{}", booking.status());
            }
            ConfirmOutcome::Pending(booking) => {
                if !global.quiet {
                    eprintln!("Payment not completed yet, booking still awaiting payment");
                }
                println!("{}", booking.status());
            }
        }
        Ok(())
    }
}
