//! Utility functions for CLI operations.
//!
//! This module provides common utility functions used across CLI commands,
//! including configuration loading, database management, date parsing, and
//! output format resolution.

use std::path::PathBuf;

use chrono::NaiveDate;

use innkeep::database::default_data_dir;
use innkeep::{
    BookingNumber, Config, ConfigBuilder, Database, DatabaseConfig, OutputFormat, StayDates,
};

use crate::error::CliError;

/// Global CLI options shared across all commands.
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    /// Enable verbose output.
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,

    /// Override the data directory location.
    pub data_dir: Option<PathBuf>,

    /// Override the default busy timeout (in seconds).
    pub busy_timeout: Option<u32>,

    /// Disable automatic database initialization.
    pub disable_autoinit: bool,
}

/// Resolves the data directory from global options.
pub fn resolve_data_dir(global: &GlobalOptions) -> Result<PathBuf, CliError> {
    if let Some(ref data_dir) = global.data_dir {
        return Ok(data_dir.clone());
    }
    default_data_dir().map_err(CliError::from)
}

/// Load configuration from the data directory and environment.
///
/// Precedence, lowest to highest: built-in defaults, the data directory's
/// `config.yaml`, `INNKEEP_*` environment variables.
pub fn load_configuration(global: &GlobalOptions) -> Result<Config, CliError> {
    let data_dir = resolve_data_dir(global)?;
    ConfigBuilder::new()
        .with_data_dir(Some(data_dir))
        .build()
        .map_err(|e| CliError::Config(e.to_string()))
}

/// Open the database with configuration.
///
/// # Errors
///
/// Returns `NoDataDirectory` if the database doesn't exist and auto-init is
/// disabled.
pub fn open_database(global: &GlobalOptions, config: &Config) -> Result<Database, CliError> {
    let db_path = resolve_data_dir(global)?.join("innkeep.db");

    if !db_path.exists() && global.disable_autoinit {
        return Err(CliError::NoDataDirectory);
    }

    let mut db_config = DatabaseConfig::new(db_path);

    // Set busy timeout if specified
    if let Some(timeout_seconds) = global.busy_timeout {
        db_config =
            db_config.with_busy_timeout(std::time::Duration::from_secs(timeout_seconds.into()));
    } else if let Some(timeout_seconds) = config.maximum_lock_wait_seconds {
        db_config = db_config.with_busy_timeout(std::time::Duration::from_secs(timeout_seconds));
    }

    Database::open(db_config).map_err(CliError::from)
}

/// Parses a date argument in `YYYY-MM-DD` form.
pub fn parse_date(value: &str, flag: &str) -> Result<NaiveDate, CliError> {
    value.parse::<NaiveDate>().map_err(|_| {
        CliError::InvalidArguments(format!("{flag} must be a date in YYYY-MM-DD form: {value}"))
    })
}

/// Builds a stay from check-in/check-out arguments.
pub fn parse_stay(check_in: &str, check_out: &str) -> Result<StayDates, CliError> {
    let check_in = parse_date(check_in, "--check-in")?;
    let check_out = parse_date(check_out, "--check-out")?;
    StayDates::new(check_in, check_out)
        .map_err(innkeep::Error::from)
        .map_err(CliError::from)
}

/// Parses a booking number argument.
pub fn parse_booking_number(value: &str) -> Result<BookingNumber, CliError> {
    BookingNumber::new(value.to_string())
        .map_err(|e| CliError::InvalidArguments(e.to_string()))
}

/// Resolves the output format: command flag, then config, then human.
pub fn resolve_output_format(
    flag: Option<&str>,
    config: &Config,
) -> Result<OutputFormat, CliError> {
    match flag {
        Some(value) => OutputFormat::parse(value).map_err(CliError::InvalidArguments),
        None => Ok(config.output_format.unwrap_or_default()),
    }
}
