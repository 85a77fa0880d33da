//! Quote command implementation.
//!
//! This module implements the `quote` command, which prices a prospective
//! stay without touching the allocator.

use clap::Args;

use innkeep::output::format_quote;
use innkeep::{pricing, Database};

use crate::error::CliError;
use crate::utils::{
    load_configuration, open_database, parse_stay, resolve_output_format, GlobalOptions,
};

/// Quote a stay.
#[derive(Args)]
pub struct QuoteCommand {
    /// Room type name
    #[arg(long, value_name = "NAME")]
    pub room_type: String,

    /// Check-in date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub check_in: String,

    /// Check-out date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub check_out: String,

    /// Promo code
    #[arg(long, value_name = "CODE")]
    pub promo: Option<String>,

    /// Output format (human, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<String>,
}

impl QuoteCommand {
    /// Execute the quote command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let stay = parse_stay(&self.check_in, &self.check_out)?;

        let config = load_configuration(global)?;
        let format = resolve_output_format(self.format.as_deref(), &config)?;
        let db = open_database(global, &config)?;

        let room_type = Database::get_room_type_by_name(db.connection(), &self.room_type)?
            .filter(|rt| rt.active)
            .ok_or_else(|| {
                CliError::SemanticFailure(format!("room type '{}' not found", self.room_type))
            })?;

        // An unknown promo code is not an error; the quote proceeds without
        // a discount
        let promo = match &self.promo {
            Some(code) => Database::get_promo(db.connection(), code)?,
            None => None,
        };

        let quote = pricing::quote(&room_type, stay, promo.as_ref());
        println!("{}", format_quote(&quote, format)?);
        Ok(())
    }
}
