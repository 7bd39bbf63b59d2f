//! Weather card view-controller.
//!
//! The card is not a store subscriber; it only reacts to explicit refreshes.
//! Fetch and configuration problems become card states instead of errors.

use serde::Serialize;

use crate::config::{HyggeConfig, resolver};
use crate::weather::{WeatherClient, WeatherReport, WeatherSource};

/// What the card currently shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum WeatherCardState {
    /// Nothing fetched yet
    Idle,
    Loaded { report: WeatherReport },
    /// The last fetch failed; the message is shown on the card
    Failed { message: String },
    /// The card cannot fetch at all until the config is fixed
    ConfigError { message: String },
}

pub struct WeatherCard {
    source: Option<Box<dyn WeatherSource>>,
    default_city: String,
    state: WeatherCardState,
}

impl WeatherCard {
    /// Build the card over any weather source.
    pub fn new(source: Box<dyn WeatherSource>, default_city: impl Into<String>) -> Self {
        Self {
            source: Some(source),
            default_city: default_city.into(),
            state: WeatherCardState::Idle,
        }
    }

    /// Build the card from config.kdl settings and the environment.
    ///
    /// A config without an api-url yields a card stuck in
    /// [`WeatherCardState::ConfigError`].
    pub fn from_config(config: &HyggeConfig, city: Option<&str>) -> Self {
        match resolver::resolve_weather(config, city) {
            Ok(resolved) => {
                tracing::debug!(
                    url = %resolved.api_url.value,
                    url_source = %resolved.api_url.source,
                    city = %resolved.city.value,
                    city_source = %resolved.city.source,
                    "weather card configured"
                );
                Self::new(
                    Box::new(WeatherClient::new(resolved.api_url.value)),
                    resolved.city.value,
                )
            }
            Err(crate::Error::Config(message)) => Self::misconfigured(message),
            Err(e) => Self::misconfigured(e.to_string()),
        }
    }

    /// A card that reports a configuration problem on every refresh.
    pub fn misconfigured(message: impl Into<String>) -> Self {
        let message = message.into();
        tracing::warn!(error = %message, "weather card is not configured");
        Self {
            source: None,
            default_city: resolver::DEFAULT_CITY.to_string(),
            state: WeatherCardState::ConfigError { message },
        }
    }

    pub fn state(&self) -> &WeatherCardState {
        &self.state
    }

    pub fn default_city(&self) -> &str {
        &self.default_city
    }

    /// Fetch the weather for `city` (or the default city) and update the card.
    pub fn refresh(&mut self, city: Option<&str>) -> &WeatherCardState {
        let Some(source) = &self.source else {
            return &self.state;
        };
        let city = city
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(self.default_city.as_str());

        self.state = match source.fetch(city) {
            Ok(report) => WeatherCardState::Loaded { report },
            Err(e) => {
                tracing::warn!(city = %city, error = %e, "weather refresh failed");
                WeatherCardState::Failed {
                    message: e.to_string(),
                }
            }
        };
        &self.state
    }
}
