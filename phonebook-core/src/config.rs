use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

pub const DEFAULT_SERVER_URL: &str = "http://localhost:3001";
pub const DEFAULT_COUNTRIES_URL: &str = "https://studies.cs.helsinki.fi/restcountries/api/all";
pub const DEFAULT_WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

pub const ENV_SERVER_URL: &str = "PHONEBOOK_SERVER_URL";
pub const ENV_COUNTRIES_URL: &str = "PHONEBOOK_COUNTRIES_URL";
pub const ENV_WEATHER_API_KEY: &str = "WEATHER_API_KEY";

/// Credentials for the weather provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherConfig {
    pub api_key: String,
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// server_url = "http://localhost:3001"
///
/// [weather]
/// api_key = "..."
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the contacts backend; `/persons` is appended.
    pub server_url: String,
    pub countries_url: String,
    pub weather_url: String,
    /// Absent means weather display is disabled.
    pub weather: Option<WeatherConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            countries_url: DEFAULT_COUNTRIES_URL.to_string(),
            weather_url: DEFAULT_WEATHER_URL.to_string(),
            weather: None,
        }
    }
}

impl Config {
    /// Load config from disk and apply environment overrides.
    ///
    /// A missing file yields the defaults.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        let mut cfg = Self::load_from(&path)?;
        cfg.apply_env(|key| std::env::var(key).ok());
        Ok(cfg)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "phonebook", "phonebook-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Override fields from environment-style lookups. Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get(ENV_SERVER_URL) {
            self.server_url = url;
        }
        if let Some(url) = get(ENV_COUNTRIES_URL) {
            self.countries_url = url;
        }
        if let Some(key) = get(ENV_WEATHER_API_KEY) {
            self.set_weather_api_key(key);
        }
    }

    pub fn set_weather_api_key(&mut self, api_key: String) {
        self.weather = Some(WeatherConfig { api_key });
    }

    /// Returns the weather API key, if a non-blank one is configured.
    pub fn weather_api_key(&self) -> Option<&str> {
        self.weather
            .as_ref()
            .map(|w| w.api_key.as_str())
            .filter(|k| !k.trim().is_empty())
    }

    pub fn persons_url(&self) -> String {
        format!("{}/persons", self.server_url.trim_end_matches('/'))
    }
}
