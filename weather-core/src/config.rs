use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::{
    provider::open_meteo::{DEFAULT_FORECAST_URL, DEFAULT_GEOCODING_URL},
    units::TemperatureUnit,
};

pub const DEFAULT_FORECAST_DAYS: u8 = 5;
/// Open-Meteo serves at most 16 forecast days.
pub const MAX_FORECAST_DAYS: u8 = 16;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// unit = "fahrenheit"
/// forecast_days = 3
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Unit used for display unless overridden on the command line.
    pub unit: TemperatureUnit,

    pub forecast_days: u8,

    pub timeout_secs: u64,

    /// Override for the geocoding endpoint, e.g. a self-hosted mirror.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geocoding_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub forecast_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            unit: TemperatureUnit::default(),
            forecast_days: DEFAULT_FORECAST_DAYS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            geocoding_url: None,
            forecast_url: None,
        }
    }
}

impl Config {
    /// Forecast length limited to what the provider serves.
    pub fn forecast_days(&self) -> u8 {
        self.forecast_days.clamp(1, MAX_FORECAST_DAYS)
    }

    pub fn set_forecast_days(&mut self, days: u8) {
        self.forecast_days = days.clamp(1, MAX_FORECAST_DAYS);
    }

    /// Request timeout; zero would fail every request, so at least one second.
    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs.max(1)
    }

    pub fn geocoding_url(&self) -> &str {
        self.geocoding_url.as_deref().unwrap_or(DEFAULT_GEOCODING_URL)
    }

    pub fn forecast_url(&self) -> &str {
        self.forecast_url.as_deref().unwrap_or(DEFAULT_FORECAST_URL)
    }

    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("dev", "weather-task", "weather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    /// Path to the file backing recent searches.
    pub fn state_file_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.data_dir().join("state.json"))
    }
}
