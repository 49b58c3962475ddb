use serde::{Deserialize, Serialize};

/// Outcome of one weather lookup.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WeatherResult {
    Success {
        city: String,
        /// degrees Celsius
        temperature: f64,
        description: String,
        /// relative humidity in percent, 0-100
        humidity: u8,
    },
    Failure {
        reason: String,
    },
}

impl WeatherResult {
    pub fn failure(reason: impl Into<String>) -> Self {
        Self::Failure {
            reason: reason.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Subset of the provider's current weather payload.
#[derive(Deserialize, Debug)]
pub(super) struct CurrentWeather {
    pub name: String,
    pub main: MainReadings,
    pub weather: Vec<Condition>,
}

#[derive(Deserialize, Debug)]
pub(super) struct MainReadings {
    pub temp: f64,
    pub humidity: u8,
}

#[derive(Deserialize, Debug)]
pub(super) struct Condition {
    pub description: String,
}
