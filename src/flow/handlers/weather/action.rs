use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::{debug, error};

use crate::{
    FlowError, Result, WeatherConfig,
    common::{HttpClient, ReqwestClient, Vars},
    flow::Handler,
};

use super::models::*;

/// Name the lookup is registered under.
pub const WEATHER_HANDLER: &str = "get_weather";

const CITY_KEY: &str = "city";

/// Fetches current weather for a city from an OpenWeatherMap-compatible API.
///
/// Every call is a single fresh GET; there are no retries or caching. All
/// failures are folded into [`WeatherResult::Failure`].
#[derive(Clone)]
pub struct WeatherLookupAction {
    config: WeatherConfig,
    client: Arc<dyn HttpClient>,
}

impl WeatherLookupAction {
    pub fn new(config: WeatherConfig) -> Self {
        Self::with_client(config, Arc::new(ReqwestClient::new()))
    }

    pub fn with_client(
        config: WeatherConfig,
        client: Arc<dyn HttpClient>,
    ) -> Self {
        Self {
            config,
            client,
        }
    }

    /// Argument schema of the `get_weather` action.
    pub fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "city": {
                    "type": "string",
                    "description": "City name"
                }
            },
            "required": ["city"]
        })
    }

    pub async fn fetch(
        &self,
        city: &str,
    ) -> WeatherResult {
        debug!(city, "calling weather api");
        match self.request(city).await {
            Ok(result) => result,
            Err(err) => {
                error!(city, error = %err, "weather api error");
                WeatherResult::failure(err.to_string())
            }
        }
    }

    async fn request(
        &self,
        city: &str,
    ) -> Result<WeatherResult> {
        let query = [("q", city), ("appid", self.config.api_key.as_str()), ("units", "metric")];
        let res = self.client.get(&self.config.base_url, &query).await?;

        if res.status != 200 {
            return Err(FlowError::Http(format!("API returned status {}", res.status)));
        }
        debug!(city, response = %res.body_text(), "weather api response");

        let current = serde_json::from_slice::<CurrentWeather>(&res.body)?;
        let condition = current.weather.into_iter().next().ok_or_else(|| FlowError::Convert("response has no weather conditions".to_string()))?;
        if current.main.humidity > 100 {
            return Err(FlowError::Convert(format!("humidity {} out of range", current.main.humidity)));
        }

        Ok(WeatherResult::Success {
            city: current.name,
            temperature: current.main.temp,
            description: condition.description,
            humidity: current.main.humidity,
        })
    }
}

#[async_trait]
impl Handler for WeatherLookupAction {
    async fn call(
        &self,
        args: &Vars,
    ) -> Result<Value> {
        let city = args.get::<String>(CITY_KEY).ok_or_else(|| FlowError::Handler(format!("'{}' argument is required", CITY_KEY)))?;
        let result = self.fetch(&city).await;
        Ok(serde_json::to_value(result)?)
    }
}
