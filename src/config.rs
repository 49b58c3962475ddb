use std::{fmt, fs, path::Path, path::PathBuf};

use serde::Deserialize;

use crate::{FlowError, Result};

/// Environment variable overriding `weather.api_key`.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";
/// Environment variable overriding `weather.base_url`.
pub const BASE_URL_ENV: &str = "OPENWEATHER_BASE_URL";

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// path of a flow definition (json), the built-in weather flow is used when absent
    #[serde(default)]
    pub flow: Option<PathBuf>,
    /// weather provider config
    #[serde(default)]
    pub weather: WeatherConfig,
}

#[derive(Clone, Deserialize)]
pub struct WeatherConfig {
    /// provider api key, sent as `appid`
    #[serde(default)]
    pub api_key: String,
    /// provider endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
        }
    }
}

impl fmt::Debug for WeatherConfig {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("WeatherConfig").field("api_key", &"[REDACTED]").field("base_url", &self.base_url).finish()
    }
}

impl WeatherConfig {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }

    /// Build the weather config from the environment alone.
    pub fn from_env() -> Self {
        Self::default().with_env()
    }

    /// Override fields with `OPENWEATHER_API_KEY` / `OPENWEATHER_BASE_URL` when set.
    pub fn with_env(self) -> Self {
        self.with_overrides(std::env::var(API_KEY_ENV).ok(), std::env::var(BASE_URL_ENV).ok())
    }

    fn with_overrides(
        mut self,
        api_key: Option<String>,
        base_url: Option<String>,
    ) -> Self {
        if let Some(key) = api_key.filter(|k| !k.is_empty()) {
            self.api_key = key;
        }
        if let Some(url) = base_url.filter(|u| !u.is_empty()) {
            self.base_url = url;
        }
        self
    }
}

impl Config {
    pub fn create<T: AsRef<Path>>(path: T) -> Result<Self> {
        let data = fs::read_to_string(path.as_ref()).map_err(|e| FlowError::Config(format!("failed to load config file {:?}: {}", path.as_ref(), e)))?;

        Self::load_from_str(data.as_str())
    }

    pub fn load_from_str(toml_str: &str) -> Result<Self> {
        let config = toml::from_str::<Config>(toml_str)?;
        Ok(config)
    }

    /// Apply environment overrides on top of the loaded values.
    pub fn with_env(mut self) -> Self {
        self.weather = self.weather.with_env();
        self
    }
}
