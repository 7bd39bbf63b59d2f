//! Precedence resolution for weather and proxy settings.
//!
//! ## Weather card (highest to lowest)
//!
//! 1. CLI flags (`--city`)
//! 2. `HYGGE_WEATHER_URL` environment variable (api-url only)
//! 3. config.kdl
//! 4. Built-in defaults (default city only; the api-url has no default)
//!
//! ## Proxy
//!
//! 1. CLI flags (`--port`)
//! 2. Environment (`PORT`, `WEATHER_API_KEY`, `WEATHER_UPSTREAM_URL`)
//! 3. Built-in defaults

use crate::config::HyggeConfig;
use crate::{Error, Result};

/// Environment variable overriding the weather api-url.
pub const WEATHER_URL_ENV: &str = "HYGGE_WEATHER_URL";

/// Environment variable holding the upstream API key (proxy only).
pub const WEATHER_API_KEY_ENV: &str = "WEATHER_API_KEY";

/// Environment variable for the proxy listen port.
pub const PORT_ENV: &str = "PORT";

/// Environment variable overriding the upstream endpoint (proxy only).
pub const UPSTREAM_URL_ENV: &str = "WEATHER_UPSTREAM_URL";

/// City used when neither the CLI nor the config names one.
pub const DEFAULT_CITY: &str = "Taoyuan";

/// Default proxy port.
pub const DEFAULT_PORT: u16 = 3000;

/// OpenWeatherMap current-weather endpoint.
pub const DEFAULT_UPSTREAM_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Tracks where a resolved value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    /// Value from environment variable
    EnvVar(String),
    /// Value from config.kdl
    ConfigFile,
    /// Value from CLI flag
    CliFlag,
    /// Built-in default value
    Default,
}

impl std::fmt::Display for ValueSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueSource::EnvVar(name) => write!(f, "env:{}", name),
            ValueSource::ConfigFile => write!(f, "config"),
            ValueSource::CliFlag => write!(f, "cli"),
            ValueSource::Default => write!(f, "default"),
        }
    }
}

/// A resolved value with its source.
#[derive(Debug, Clone)]
pub struct Resolved<T> {
    pub value: T,
    pub source: ValueSource,
}

impl<T> Resolved<T> {
    pub fn new(value: T, source: ValueSource) -> Self {
        Self { value, source }
    }
}

/// Settings the weather card needs to fetch.
#[derive(Debug, Clone)]
pub struct ResolvedWeather {
    pub api_url: Resolved<String>,
    pub city: Resolved<String>,
}

/// Settings for `hygge serve`.
#[derive(Debug, Clone)]
pub struct ResolvedProxy {
    pub port: Resolved<u16>,
    /// Upstream API key; the proxy reports an error per request when absent
    pub api_key: Option<Resolved<String>>,
    pub upstream_url: Resolved<String>,
}

/// Look up a non-empty environment variable.
pub fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Resolve weather settings from the process environment.
pub fn resolve_weather(config: &HyggeConfig, city: Option<&str>) -> Result<ResolvedWeather> {
    resolve_weather_with(config, city, env_lookup)
}

/// Resolve weather settings with an explicit environment lookup.
///
/// Fails with [`Error::Config`] when no api-url is configured anywhere, so
/// that callers can show a configuration error instead of fetching an
/// invalid URL.
pub fn resolve_weather_with(
    config: &HyggeConfig,
    city: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ResolvedWeather> {
    config.validate().map_err(Error::Config)?;

    let api_url = if let Some(url) = env(WEATHER_URL_ENV) {
        Resolved::new(url, ValueSource::EnvVar(WEATHER_URL_ENV.to_string()))
    } else if let Some(url) = &config.weather.api_url {
        Resolved::new(url.clone(), ValueSource::ConfigFile)
    } else {
        return Err(Error::Config(format!(
            "weather api-url is not configured; set it in config.kdl or {}",
            WEATHER_URL_ENV
        )));
    };

    let city = match city.map(str::trim).filter(|c| !c.is_empty()) {
        Some(c) => Resolved::new(c.to_string(), ValueSource::CliFlag),
        None => match &config.weather.default_city {
            Some(c) => Resolved::new(c.clone(), ValueSource::ConfigFile),
            None => Resolved::new(DEFAULT_CITY.to_string(), ValueSource::Default),
        },
    };

    Ok(ResolvedWeather { api_url, city })
}

/// Resolve proxy settings from the process environment.
pub fn resolve_proxy(port: Option<u16>) -> Result<ResolvedProxy> {
    resolve_proxy_with(port, env_lookup)
}

/// Resolve proxy settings with an explicit environment lookup.
pub fn resolve_proxy_with(
    port: Option<u16>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ResolvedProxy> {
    let port = match port {
        Some(p) => Resolved::new(p, ValueSource::CliFlag),
        None => match env(PORT_ENV) {
            Some(raw) => {
                let p = raw.trim().parse::<u16>().map_err(|_| {
                    Error::Config(format!("{} must be a port number, got '{}'", PORT_ENV, raw))
                })?;
                Resolved::new(p, ValueSource::EnvVar(PORT_ENV.to_string()))
            }
            None => Resolved::new(DEFAULT_PORT, ValueSource::Default),
        },
    };

    let api_key = env(WEATHER_API_KEY_ENV)
        .map(|k| Resolved::new(k, ValueSource::EnvVar(WEATHER_API_KEY_ENV.to_string())));

    let upstream_url = match env(UPSTREAM_URL_ENV) {
        Some(url) => Resolved::new(url, ValueSource::EnvVar(UPSTREAM_URL_ENV.to_string())),
        None => Resolved::new(DEFAULT_UPSTREAM_URL.to_string(), ValueSource::Default),
    };

    Ok(ResolvedProxy {
        port,
        api_key,
        upstream_url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WeatherConfig;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    fn configured() -> HyggeConfig {
        HyggeConfig {
            weather: WeatherConfig {
                api_url: Some("https://proxy.example/api/weather".to_string()),
                default_city: Some("Hsinchu".to_string()),
            },
        }
    }

    #[test]
    fn test_missing_api_url_is_config_error() {
        let err = resolve_weather_with(&HyggeConfig::default(), None, env_of(&[])).unwrap_err();
        assert!(matches!(err, Error::Config(msg) if msg.contains("api-url")));
    }

    #[test]
    fn test_invalid_config_is_config_error() {
        let mut config = configured();
        config.weather.api_url = Some("proxy.example".to_string());
        assert!(matches!(
            resolve_weather_with(&config, None, env_of(&[])),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_config_values_used() {
        let resolved = resolve_weather_with(&configured(), None, env_of(&[])).unwrap();
        assert_eq!(resolved.api_url.value, "https://proxy.example/api/weather");
        assert_eq!(resolved.api_url.source, ValueSource::ConfigFile);
        assert_eq!(resolved.city.value, "Hsinchu");
        assert_eq!(resolved.city.source, ValueSource::ConfigFile);
    }

    #[test]
    fn test_env_url_and_cli_city_win() {
        let resolved = resolve_weather_with(
            &configured(),
            Some("Tainan"),
            env_of(&[(WEATHER_URL_ENV, "http://localhost:3000/api/weather")]),
        )
        .unwrap();
        assert_eq!(resolved.api_url.value, "http://localhost:3000/api/weather");
        assert_eq!(
            resolved.api_url.source,
            ValueSource::EnvVar(WEATHER_URL_ENV.to_string())
        );
        assert_eq!(resolved.city.value, "Tainan");
        assert_eq!(resolved.city.source, ValueSource::CliFlag);
    }

    #[test]
    fn test_default_city() {
        let mut config = configured();
        config.weather.default_city = None;
        let resolved = resolve_weather_with(&config, Some("  "), env_of(&[])).unwrap();
        assert_eq!(resolved.city.value, DEFAULT_CITY);
        assert_eq!(resolved.city.source, ValueSource::Default);
    }

    #[test]
    fn test_proxy_defaults() {
        let resolved = resolve_proxy_with(None, env_of(&[])).unwrap();
        assert_eq!(resolved.port.value, DEFAULT_PORT);
        assert!(resolved.api_key.is_none());
        assert_eq!(resolved.upstream_url.value, DEFAULT_UPSTREAM_URL);
    }

    #[test]
    fn test_proxy_env_and_flag() {
        let env = env_of(&[
            (PORT_ENV, "8080"),
            (WEATHER_API_KEY_ENV, "secret"),
            (UPSTREAM_URL_ENV, "http://127.0.0.1:9/owm"),
        ]);
        let resolved = resolve_proxy_with(None, &env).unwrap();
        assert_eq!(resolved.port.value, 8080);
        assert_eq!(resolved.api_key.unwrap().value, "secret");
        assert_eq!(resolved.upstream_url.value, "http://127.0.0.1:9/owm");

        let resolved = resolve_proxy_with(Some(9000), &env).unwrap();
        assert_eq!(resolved.port.value, 9000);
        assert_eq!(resolved.port.source, ValueSource::CliFlag);
    }

    #[test]
    fn test_proxy_bad_port() {
        assert!(resolve_proxy_with(None, env_of(&[(PORT_ENV, "http")])).is_err());
    }

    #[test]
    fn test_value_source_display() {
        assert_eq!(ValueSource::EnvVar("PORT".to_string()).to_string(), "env:PORT");
        assert_eq!(ValueSource::ConfigFile.to_string(), "config");
        assert_eq!(ValueSource::Default.to_string(), "default");
    }
}
