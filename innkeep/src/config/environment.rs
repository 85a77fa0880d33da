//! Environment variable overrides for configuration.
//!
//! Recognized variables:
//! - `INNKEEP_HOLD_MINUTES` — unpaid hold duration
//! - `INNKEEP_HORIZON_DAYS` — booking horizon
//! - `INNKEEP_SWEEP_INTERVAL_MINUTES` — expiry sweep cadence
//! - `INNKEEP_MAX_LOCK_WAIT` — database lock wait (seconds)
//! - `INNKEEP_OUTPUT_FORMAT` — `human` or `json`

use std::env;

use crate::config::schema::{BookingConfig, Config, SweepConfig};
use crate::error::{Error, Result};
use crate::output::OutputFormat;

/// Applies environment variable overrides on top of a configuration.
///
/// Unset variables leave the configuration untouched; set variables that
/// fail to parse are an error rather than being silently ignored.
///
/// # Errors
///
/// Returns a validation error naming the offending variable when a set
/// variable has an unparseable value.
pub fn apply_env_overrides(mut config: Config) -> Result<Config> {
    if let Some(minutes) = parse_var::<i64>("INNKEEP_HOLD_MINUTES")? {
        let mut booking = config.booking.unwrap_or_default();
        booking.hold_minutes = minutes;
        config.booking = Some(booking);
    }

    if let Some(days) = parse_var::<i64>("INNKEEP_HORIZON_DAYS")? {
        let mut booking = config.booking.unwrap_or_else(BookingConfig::default);
        booking.horizon_days = days;
        config.booking = Some(booking);
    }

    if let Some(minutes) = parse_var::<u64>("INNKEEP_SWEEP_INTERVAL_MINUTES")? {
        let mut sweep = config.sweep.unwrap_or_else(SweepConfig::default);
        sweep.interval_minutes = minutes;
        config.sweep = Some(sweep);
    }

    if let Some(seconds) = parse_var::<u64>("INNKEEP_MAX_LOCK_WAIT")? {
        config.maximum_lock_wait_seconds = Some(seconds);
    }

    if let Ok(value) = env::var("INNKEEP_OUTPUT_FORMAT") {
        let format = OutputFormat::parse(&value).map_err(|message| Error::Validation {
            field: "INNKEEP_OUTPUT_FORMAT".into(),
            message,
        })?;
        config.output_format = Some(format);
    }

    Ok(config)
}

/// Reads and parses an environment variable, if set.
fn parse_var<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
    match env::var(name) {
        Ok(value) => value.parse::<T>().map(Some).map_err(|_| Error::Validation {
            field: name.to_string(),
            message: format!("cannot parse '{value}'"),
        }),
        Err(_) => Ok(None),
    }
}
