pub mod weather;

pub use weather::{WeatherLookupAction, WeatherResult};
