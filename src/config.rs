use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

/// Top-level Almanac configuration.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct AlmanacConfig {
    /// Calendar settings.
    #[serde(default)]
    pub calendar: CalendarToml,

    /// Search settings.
    #[serde(default)]
    pub search: SearchToml,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CalendarToml {
    #[serde(default = "default_identifier")]
    pub identifier: String,
    /// Process default zone when absent.
    #[serde(default)]
    pub time_zone: Option<String>,
    /// Process default locale when absent.
    #[serde(default)]
    pub locale: Option<String>,
    /// Locale's value when absent.
    #[serde(default)]
    pub first_weekday: Option<u8>,
    /// Locale's value when absent.
    #[serde(default)]
    pub minimum_days_in_first_week: Option<u8>,
}

impl Default for CalendarToml {
    fn default() -> Self {
        Self {
            identifier: default_identifier(),
            time_zone: None,
            locale: None,
            first_weekday: None,
            minimum_days_in_first_week: None,
        }
    }
}

fn default_identifier() -> String {
    "gregorian".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchToml {
    #[serde(default = "default_policy")]
    pub policy: String,
    #[serde(default = "default_direction")]
    pub direction: String,
}

impl Default for SearchToml {
    fn default() -> Self {
        Self {
            policy: default_policy(),
            direction: default_direction(),
        }
    }
}

fn default_policy() -> String {
    "nextTime".to_string()
}
fn default_direction() -> String {
    "forward".to_string()
}

/// Reads the configuration file, or the defaults if it does not exist.
pub fn load(path: &Path) -> Result<AlmanacConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "no config file, using defaults");
        return Ok(AlmanacConfig::default());
    }
    let toml_str = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;
    toml::from_str(&toml_str).context("failed to parse TOML config")
}
