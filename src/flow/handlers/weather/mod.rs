mod action;
mod models;

pub use action::{WeatherLookupAction, WEATHER_HANDLER};
pub use models::WeatherResult;
