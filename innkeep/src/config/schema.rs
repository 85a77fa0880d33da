//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for innkeep,
//! including booking hold settings, the expiry sweep cadence, and payment
//! provider endpoints.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::output::OutputFormat;

/// Complete configuration structure.
///
/// This represents the full configuration schema for innkeep, loaded from
/// the data directory's `config.yaml` with environment-variable overrides.
///
/// # Examples
///
/// ```
/// use innkeep::config::{BookingConfig, Config};
///
/// let config = Config {
///     booking: Some(BookingConfig {
///         hold_minutes: 15,
///         horizon_days: 365,
///     }),
///     ..Default::default()
/// };
/// assert_eq!(config.booking().hold_minutes, 15);
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Booking hold and horizon settings.
    pub booking: Option<BookingConfig>,

    /// Expiry sweep settings.
    pub sweep: Option<SweepConfig>,

    /// Payment provider endpoints.
    pub providers: Option<ProvidersConfig>,

    /// Maximum time to wait for database lock acquisition (seconds).
    pub maximum_lock_wait_seconds: Option<u64>,

    /// Output format for list commands.
    pub output_format: Option<OutputFormat>,
}

impl Config {
    /// Returns the booking settings, falling back to defaults.
    #[must_use]
    pub fn booking(&self) -> BookingConfig {
        self.booking.clone().unwrap_or_default()
    }

    /// Returns the sweep settings, falling back to defaults.
    #[must_use]
    pub fn sweep(&self) -> SweepConfig {
        self.sweep.clone().unwrap_or_default()
    }
}

/// Booking hold and horizon configuration.
///
/// # Examples
///
/// ```
/// use innkeep::config::BookingConfig;
///
/// let config = BookingConfig::default();
/// assert_eq!(config.hold_minutes, 15);
/// assert_eq!(config.horizon_days, 365);
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct BookingConfig {
    /// How long an unpaid hold blocks the room, in minutes.
    #[serde(default = "default_hold_minutes")]
    pub hold_minutes: i64,

    /// How far ahead of the current date bookings are accepted, in days.
    #[serde(default = "default_horizon_days")]
    pub horizon_days: i64,
}

const fn default_hold_minutes() -> i64 {
    15
}

const fn default_horizon_days() -> i64 {
    365
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            hold_minutes: default_hold_minutes(),
            horizon_days: default_horizon_days(),
        }
    }
}

impl BookingConfig {
    /// Returns the hold duration as a chrono duration.
    #[must_use]
    pub fn hold_duration(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.hold_minutes)
    }
}

/// Expiry sweep configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SweepConfig {
    /// How often the periodic sweep runs, in minutes.
    #[serde(default = "default_sweep_interval")]
    pub interval_minutes: u64,
}

const fn default_sweep_interval() -> u64 {
    5
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            interval_minutes: default_sweep_interval(),
        }
    }
}

/// Payment provider endpoints, one per supported variant.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ProvidersConfig {
    /// The session-based (hosted page) provider.
    pub session: Option<ProviderSettings>,

    /// The charge-based (client widget) provider.
    pub charge: Option<ProviderSettings>,
}

/// Connection settings for one payment provider.
///
/// # Examples
///
/// ```
/// use innkeep::config::ProviderSettings;
///
/// let settings = ProviderSettings {
///     base_url: "https://pay.example".to_string(),
///     api_key: "sk_test_123".to_string(),
///     timeout_seconds: None,
/// };
/// assert_eq!(settings.timeout().as_secs(), 12);
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ProviderSettings {
    /// Base URL of the provider API.
    pub base_url: String,

    /// Secret API key sent as a bearer token.
    pub api_key: String,

    /// Request timeout in seconds. Defaults to 12.
    pub timeout_seconds: Option<u64>,
}

impl ProviderSettings {
    /// Returns the request timeout, defaulting to 12 seconds.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.unwrap_or(12))
    }
}
