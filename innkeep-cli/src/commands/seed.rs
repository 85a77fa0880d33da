//! Seed command implementation.
//!
//! This module implements the `seed` command, the data socket through
//! which the externally-owned catalog (room types, individual rooms,
//! promo codes) is loaded into the store the engine reads.

use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Args;
use serde::Deserialize;

use innkeep::{DiscountRule, IndividualRoom, PromoCode, RoomType};

use crate::error::CliError;
use crate::utils::{load_configuration, open_database, GlobalOptions};

/// Load room types, rooms, and promo codes from a catalog file.
#[derive(Args)]
pub struct SeedCommand {
    /// Catalog file (YAML)
    #[arg(long, value_name = "FILE")]
    pub file: PathBuf,
}

/// The catalog file schema.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SeedFile {
    #[serde(default)]
    room_types: Vec<SeedRoomType>,
    #[serde(default)]
    rooms: Vec<SeedRoom>,
    #[serde(default)]
    promo_codes: Vec<SeedPromo>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SeedRoomType {
    id: i64,
    name: String,
    nightly_rate: i64,
    monthly_rate: Option<i64>,
    max_guests: u32,
    #[serde(default = "default_active")]
    active: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SeedRoom {
    id: i64,
    room_type_id: i64,
    room_number: String,
    floor: i32,
    #[serde(default = "default_active")]
    active: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SeedPromo {
    code: String,
    rule: DiscountRule,
    valid_until: Option<NaiveDate>,
}

const fn default_active() -> bool {
    true
}

impl SeedCommand {
    /// Execute the seed command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let contents = fs::read_to_string(&self.file)?;
        let seed: SeedFile = serde_yaml::from_str(&contents)
            .map_err(|e| CliError::Config(format!("{}: {e}", self.file.display())))?;

        let config = load_configuration(global)?;
        let mut db = open_database(global, &config)?;

        for room_type in &seed.room_types {
            db.upsert_room_type(&RoomType {
                id: room_type.id,
                name: room_type.name.clone(),
                nightly_rate: room_type.nightly_rate,
                monthly_rate: room_type.monthly_rate,
                max_guests: room_type.max_guests,
                active: room_type.active,
            })?;
        }
        for room in &seed.rooms {
            db.upsert_room(&IndividualRoom {
                id: room.id,
                room_type_id: room.room_type_id,
                room_number: room.room_number.clone(),
                floor: room.floor,
                active: room.active,
            })?;
        }
        for promo in &seed.promo_codes {
            db.upsert_promo(&PromoCode {
                code: promo.code.clone(),
                rule: promo.rule,
                valid_until: promo.valid_until,
            })?;
        }

        if !global.quiet {
            eprintln!(
                "Seeded {} room type(s), {} room(s), {} promo code(s)",
                seed.room_types.len(),
                seed.rooms.len(),
                seed.promo_codes.len()
            );
        }
        Ok(())
    }
}
