//! Output formatting for bookings, quotes, and snapshots.
//!
//! This module provides the output formats used by operational tooling:
//! a human-readable table form and machine-readable JSON.

mod formatters;

use serde::{Deserialize, Serialize};

pub use formatters::{format_quote, format_snapshot, format_snapshot_list};

/// Available output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Human-readable format.
    Human,
    /// JSON format.
    Json,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Human
    }
}

impl OutputFormat {
    /// Parses an output format from a string.
    ///
    /// # Errors
    ///
    /// Returns an error message if the string is not a known format.
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "human" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            _ => Err(format!("invalid output format: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(OutputFormat::parse("human").unwrap(), OutputFormat::Human);
        assert_eq!(OutputFormat::parse("JSON").unwrap(), OutputFormat::Json);
        assert!(OutputFormat::parse("csv").is_err());
    }

    #[test]
    fn test_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Human);
    }
}
