use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::model::Coordinates;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings for callers that build their own session.
///
/// The forecast client never reads this; it only shapes the HTTP session a
/// caller hands to it.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Sent as `User-Agent`; api.weather.gov asks for contact info here.
    pub user_agent: Option<String>,

    pub timeout_secs: Option<u64>,

    /// Example TOML:
    /// [default_location]
    /// lat = 39.7456
    /// lon = -97.0892
    pub default_location: Option<Coordinates>,
}

impl Config {
    pub fn user_agent(&self) -> String {
        self.user_agent.clone().unwrap_or_else(default_user_agent)
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)
    }

    /// Return the stored location, or a hint on how to set one.
    pub fn default_location(&self) -> Result<Coordinates> {
        self.default_location.ok_or_else(|| {
            anyhow!(
                "No default location configured.\n\
                 Hint: pass `--lat <LAT> --lon <LON>` or run `forecast configure` first."
            )
        })
    }

    pub fn set_default_location(&mut self, location: Coordinates) {
        self.default_location = Some(location);
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "nws-forecast", "forecast-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

fn default_user_agent() -> String {
    format!(
        "forecast-cli/{} (+https://www.weather.gov/documentation/services-web-api)",
        env!("CARGO_PKG_VERSION")
    )
}
