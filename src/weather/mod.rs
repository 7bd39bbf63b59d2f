//! Weather card data.
//!
//! The dashboard never talks to the upstream weather service directly. It
//! asks the proxy (`<api-url>?city=<name>`) and gets back the upstream JSON
//! body unchanged. This module models the subset of that body the card
//! shows and the errors a fetch can end in.

pub mod client;

pub use client::WeatherClient;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while fetching weather.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// The proxy answered with a non-2xx status
    #[error("HTTP {code}: {message}")]
    Status { code: u16, message: String },

    /// Network or other transport error
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The body was not the expected JSON
    #[error("Failed to parse weather response: {0}")]
    Malformed(String),
}

/// Anything that can produce a weather report for a city.
pub trait WeatherSource {
    fn fetch(&self, city: &str) -> Result<WeatherReport, WeatherError>;
}

/// What the weather card displays.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReport {
    pub city: String,
    /// Short condition, e.g. "Clouds"
    pub condition: String,
    pub description: String,
    /// Degrees Celsius
    pub temperature: f64,
    pub feels_like: f64,
    /// Percent
    pub humidity: f64,
    /// hPa
    pub pressure: f64,
    /// m/s
    pub wind_speed: f64,
}

#[derive(Debug, Deserialize)]
struct UpstreamBody {
    weather: Vec<UpstreamCondition>,
    main: UpstreamMain,
    wind: UpstreamWind,
    name: String,
}

#[derive(Debug, Deserialize)]
struct UpstreamCondition {
    main: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct UpstreamMain {
    temp: f64,
    feels_like: f64,
    humidity: f64,
    pressure: f64,
}

#[derive(Debug, Deserialize)]
struct UpstreamWind {
    speed: f64,
}

impl WeatherReport {
    /// Parse the JSON body returned by the proxy.
    pub fn from_json(body: &str) -> Result<Self, WeatherError> {
        let body: UpstreamBody =
            serde_json::from_str(body).map_err(|e| WeatherError::Malformed(e.to_string()))?;
        let condition = body
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| WeatherError::Malformed("empty weather list".to_string()))?;

        Ok(Self {
            city: body.name,
            condition: condition.main,
            description: condition.description,
            temperature: body.main.temp,
            feels_like: body.main.feels_like,
            humidity: body.main.humidity,
            pressure: body.main.pressure,
            wind_speed: body.wind.speed,
        })
    }
}

/// Pull a readable message out of an error body.
///
/// The proxy uses `{"error": ...}`; the upstream service uses
/// `{"message": ...}`. Anything else is returned as-is.
pub fn error_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: Option<String>,
        message: Option<String>,
    }

    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody { error: Some(e), .. }) => e,
        Ok(ErrorBody {
            message: Some(m), ..
        }) => m,
        _ => body.trim().to_string(),
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    /// A trimmed OpenWeatherMap current-weather body.
    pub const TAIPEI: &str = r#"{
        "weather": [{"id": 803, "main": "Clouds", "description": "多雲", "icon": "04d"}],
        "main": {"temp": 29.4, "feels_like": 33.1, "temp_min": 28.0, "temp_max": 30.2, "pressure": 1008, "humidity": 74},
        "wind": {"speed": 3.6, "deg": 200},
        "name": "Taipei",
        "cod": 200
    }"#;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_report() {
        let report = WeatherReport::from_json(fixtures::TAIPEI).unwrap();
        assert_eq!(report.city, "Taipei");
        assert_eq!(report.condition, "Clouds");
        assert_eq!(report.description, "多雲");
        assert_eq!(report.temperature, 29.4);
        assert_eq!(report.feels_like, 33.1);
        assert_eq!(report.humidity, 74.0);
        assert_eq!(report.pressure, 1008.0);
        assert_eq!(report.wind_speed, 3.6);
    }

    #[test]
    fn test_parse_rejects_missing_fields() {
        let err = WeatherReport::from_json(r#"{"name": "Nowhere"}"#).unwrap_err();
        assert!(matches!(err, WeatherError::Malformed(_)));
    }

    #[test]
    fn test_parse_rejects_empty_weather_list() {
        let body = r#"{"weather": [], "main": {"temp": 1, "feels_like": 1, "humidity": 1, "pressure": 1}, "wind": {"speed": 1}, "name": "X"}"#;
        assert!(matches!(
            WeatherReport::from_json(body),
            Err(WeatherError::Malformed(_))
        ));
    }

    #[test]
    fn test_parse_rejects_non_json() {
        assert!(WeatherReport::from_json("<html>502</html>").is_err());
    }

    #[test]
    fn test_error_message() {
        assert_eq!(error_message(r#"{"error": "City parameter is required"}"#), "City parameter is required");
        assert_eq!(error_message(r#"{"cod": "404", "message": "city not found"}"#), "city not found");
        assert_eq!(error_message("Bad Gateway\n"), "Bad Gateway");
    }
}
