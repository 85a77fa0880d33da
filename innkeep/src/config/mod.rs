//! Configuration for the innkeep engine.
//!
//! Configuration is resolved in three layers with increasing precedence:
//! built-in defaults, the data directory's `config.yaml`, and `INNKEEP_*`
//! environment variables.

mod environment;
mod loader;
mod schema;

use std::path::PathBuf;

use crate::error::{Error, Result};

pub use environment::apply_env_overrides;
pub use loader::ConfigLoader;
pub use schema::{BookingConfig, Config, ProviderSettings, ProvidersConfig, SweepConfig};

/// Builder that resolves the layered configuration.
///
/// # Examples
///
/// ```
/// use innkeep::ConfigBuilder;
///
/// let config = ConfigBuilder::new().build().unwrap();
/// assert_eq!(config.booking().hold_minutes, 15);
/// ```
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    data_dir: Option<PathBuf>,
    skip_env: bool,
}

impl ConfigBuilder {
    /// Creates a new builder with no data directory (defaults only, plus
    /// environment overrides).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the data directory to load `config.yaml` from.
    #[must_use]
    pub fn with_data_dir(mut self, data_dir: Option<PathBuf>) -> Self {
        self.data_dir = data_dir;
        self
    }

    /// Skips environment variable overrides (used by tests).
    #[must_use]
    pub const fn without_env(mut self) -> Self {
        self.skip_env = true;
        self
    }

    /// Resolves the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file cannot be parsed, an
    /// environment variable has an unparseable value, or the resolved
    /// configuration fails validation.
    pub fn build(self) -> Result<Config> {
        let mut config = match &self.data_dir {
            Some(dir) => ConfigLoader::load_from_data_dir(dir)?.unwrap_or_default(),
            None => Config::default(),
        };

        if !self.skip_env {
            config = apply_env_overrides(config)?;
        }

        validate(&config)?;
        Ok(config)
    }
}

/// Validates a resolved configuration.
///
/// # Errors
///
/// Returns a validation error for out-of-range settings.
pub fn validate(config: &Config) -> Result<()> {
    let booking = config.booking();
    if booking.hold_minutes < 1 {
        return Err(Error::Validation {
            field: "booking.hold_minutes".into(),
            message: "hold must be at least 1 minute".into(),
        });
    }
    if booking.horizon_days < 1 {
        return Err(Error::Validation {
            field: "booking.horizon_days".into(),
            message: "horizon must be at least 1 day".into(),
        });
    }
    if config.sweep().interval_minutes == 0 {
        return Err(Error::Validation {
            field: "sweep.interval_minutes".into(),
            message: "sweep interval must be at least 1 minute".into(),
        });
    }
    if let Some(providers) = &config.providers {
        for (name, settings) in [
            ("providers.session", providers.session.as_ref()),
            ("providers.charge", providers.charge.as_ref()),
        ] {
            if let Some(settings) = settings {
                if settings.base_url.trim().is_empty() {
                    return Err(Error::Validation {
                        field: format!("{name}.base_url"),
                        message: "base URL must be non-empty".into(),
                    });
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_builder_defaults() {
        let config = ConfigBuilder::new().without_env().build().unwrap();
        assert_eq!(config.booking().hold_minutes, 15);
        assert_eq!(config.booking().horizon_days, 365);
    }

    #[test]
    fn test_builder_loads_file() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("config.yaml"),
            "booking:\n  hold_minutes: 45\n",
        )
        .unwrap();

        let config = ConfigBuilder::new()
            .with_data_dir(Some(dir.path().to_path_buf()))
            .without_env()
            .build()
            .unwrap();
        assert_eq!(config.booking().hold_minutes, 45);
    }

    #[test]
    fn test_validate_rejects_zero_hold() {
        let config = Config {
            booking: Some(BookingConfig {
                hold_minutes: 0,
                horizon_days: 365,
            }),
            ..Default::default()
        };
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_validate_rejects_zero_horizon() {
        let config = Config {
            booking: Some(BookingConfig {
                hold_minutes: 15,
                horizon_days: 0,
            }),
            ..Default::default()
        };
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_validate_rejects_empty_provider_url() {
        let config = Config {
            providers: Some(ProvidersConfig {
                session: Some(ProviderSettings {
                    base_url: "  ".to_string(),
                    api_key: "sk".to_string(),
                    timeout_seconds: None,
                }),
                charge: None,
            }),
            ..Default::default()
        };
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_builder_rejects_invalid_file() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("config.yaml"),
            "booking:\n  hold_minutes: 0\n",
        )
        .unwrap();

        let result = ConfigBuilder::new()
            .with_data_dir(Some(dir.path().to_path_buf()))
            .without_env()
            .build();
        assert!(result.is_err());
    }
}
