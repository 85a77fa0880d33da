//! Configuration file discovery and loading.
//!
//! This module loads the innkeep configuration from the data directory's
//! `config.yaml`, if present.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::schema::Config;
use crate::error::Result;

/// Loads configuration files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads the configuration from a data directory.
    ///
    /// Returns the parsed configuration from `{data_dir}/config.yaml`, or
    /// `None` if no configuration file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use innkeep::config::ConfigLoader;
    /// use std::path::Path;
    ///
    /// let config = ConfigLoader::load_from_data_dir(Path::new("/tmp/innkeep")).unwrap();
    /// ```
    pub fn load_from_data_dir(data_dir: &Path) -> Result<Option<Config>> {
        let config_path = data_dir.join("config.yaml");
        if !config_path.exists() {
            return Ok(None);
        }
        Ok(Some(Self::load_file(&config_path)?))
    }

    /// Loads and parses a single configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid YAML for
    /// the configuration schema.
    pub fn load_file(path: &Path) -> Result<Config> {
        let contents = fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Returns the default user configuration path (`~/.innkeep/config.yaml`).
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn user_config_path() -> Result<PathBuf> {
        let data_dir = crate::database::default_data_dir()?;
        Ok(data_dir.join("config.yaml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_missing_file_is_none() {
        let dir = tempdir().unwrap();
        let config = ConfigLoader::load_from_data_dir(dir.path()).unwrap();
        assert!(config.is_none());
    }

    #[test]
    fn test_load_valid_file() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("config.yaml"),
            "booking:\n  hold_minutes: 10\n",
        )
        .unwrap();

        let config = ConfigLoader::load_from_data_dir(dir.path())
            .unwrap()
            .unwrap();
        assert_eq!(config.booking().hold_minutes, 10);
    }

    #[test]
    fn test_load_invalid_yaml_fails() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("config.yaml"), "booking: [not a map]").unwrap();

        let result = ConfigLoader::load_from_data_dir(dir.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_load_unknown_key_fails() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("config.yaml"), "unknown_key: true\n").unwrap();

        let result = ConfigLoader::load_from_data_dir(dir.path());
        assert!(result.is_err());
    }
}
