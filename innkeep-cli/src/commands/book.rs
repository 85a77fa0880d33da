//! Book command implementation.
//!
//! This module implements the `book` command: quote the stay, allocate a
//! room through the transactional claim path, and optionally initiate
//! payment with a configured provider.

use chrono::Utc;
use clap::Args;

use innkeep::allocation::{AllocationRequest, Allocator};
use innkeep::payment::PaymentGateway;
use innkeep::{
    initiate_payment, pricing, Database, GuestDetails, InitiateOutcome, ProviderKind,
};

use crate::error::CliError;
use crate::utils::{
    load_configuration, open_database, parse_stay, resolve_output_format, GlobalOptions,
};

/// Create a booking.
#[derive(Args)]
pub struct BookCommand {
    /// Room type name
    #[arg(long, value_name = "NAME")]
    pub room_type: String,

    /// Check-in date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub check_in: String,

    /// Check-out date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub check_out: String,

    /// Guest name
    #[arg(long, value_name = "NAME")]
    pub guest_name: String,

    /// Number of guests
    #[arg(long, value_name = "COUNT", default_value = "1")]
    pub guests: u32,

    /// Special requests
    #[arg(long, value_name = "TEXT")]
    pub requests: Option<String>,

    /// Promo code
    #[arg(long, value_name = "CODE")]
    pub promo: Option<String>,

    /// Initiate payment with this provider (session, charge)
    #[arg(long, value_name = "PROVIDER")]
    pub provider: Option<String>,

    /// Output format (human, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<String>,
}

impl BookCommand {
    /// Execute the book command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let stay = parse_stay(&self.check_in, &self.check_out)?;
        let guest = GuestDetails::new(self.guest_name.clone(), self.guests, self.requests.clone())
            .map_err(|e| CliError::InvalidArguments(e.to_string()))?;

        let config = load_configuration(global)?;
        let format = resolve_output_format(self.format.as_deref(), &config)?;
        let mut db = open_database(global, &config)?;

        let room_type = Database::get_room_type_by_name(db.connection(), &self.room_type)?
            .filter(|rt| rt.active)
            .ok_or_else(|| {
                CliError::SemanticFailure(format!("room type '{}' not found", self.room_type))
            })?;

        let promo = match &self.promo {
            Some(code) => Database::get_promo(db.connection(), code)?,
            None => None,
        };
        let quote = pricing::quote(&room_type, stay, promo.as_ref());

        // Allocate: the quoted total is frozen into the booking
        let allocator = Allocator::new(config.booking());
        let now = Utc::now();
        let booking = allocator.allocate(
            &mut db,
            &AllocationRequest {
                room_type_id: room_type.id,
                stay,
                guest,
                total_price: quote.total,
            },
            now,
        )?;

        // Optionally initiate payment
        let initiation = match &self.provider {
            Some(name) => {
                let kind = ProviderKind::parse(name)
                    .map_err(|e| CliError::InvalidArguments(e.to_string()))?;
                let providers = config.providers.clone().ok_or_else(|| {
                    CliError::Config("no payment providers configured".to_string())
                })?;
                let gateway = PaymentGateway::from_config(&providers, kind)?;
                Some(initiate_payment(
                    &mut db,
                    gateway.client(),
                    booking.booking_number(),
                    now,
                )?)
            }
            None => None,
        };

        if !global.quiet {
            eprintln!(
                "Booked room for {} night(s), hold expires {}",
                stay.nights(),
                booking.expires_at().format("%Y-%m-%d %H:%M:%S UTC")
            );
        }

        let snapshot = innkeep::lookup_booking(db.connection(), booking.booking_number())?
            .ok_or_else(|| {
                CliError::SemanticFailure("booking vanished after allocation".to_string())
            })?;
        println!("{}", innkeep::output::format_snapshot(&snapshot, format)?);

        match initiation {
            Some(InitiateOutcome::Redirect { redirect_url, .. }) => {
                println!("pay at: {redirect_url}");
            }
            Some(InitiateOutcome::ClientCharge {
                charge_id,
                client_token,
            }) => {
                println!("charge id: {charge_id}");
                println!("client token: {client_token}");
            }
            None => {}
        }
        Ok(())
    }
}
