//! Configuration for Hygge.
//!
//! ## config.kdl - User preferences
//!
//! Located at `$HYGGE_CONFIG` or `~/.config/hygge/config.kdl`.
//!
//! Contains:
//! - `weather` block with `api-url` (the proxy endpoint) and `default-city`
//!
//! A missing file is the same as an empty one. The proxy's settings (port,
//! API key) come from the environment only, never from config.kdl, so the
//! key stays out of files that might be synced.
//!
//! Use the [`resolver`] module for precedence resolution.

pub mod resolver;
pub mod schema;

pub use resolver::{
    DEFAULT_CITY, Resolved, ResolvedProxy, ResolvedWeather, ValueSource, resolve_proxy,
    resolve_weather,
};
pub use schema::{HyggeConfig, WeatherConfig};

use std::path::{Path, PathBuf};

use kdl::KdlDocument;

use crate::{Error, Result};

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "HYGGE_CONFIG";

/// Locate config.kdl.
///
/// Precedence: explicit path > `HYGGE_CONFIG` > platform config dir.
pub fn config_path(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(CONFIG_ENV) {
        if !path.is_empty() {
            return Ok(PathBuf::from(path));
        }
    }

    let config_dir = dirs::config_dir()
        .ok_or_else(|| Error::Other("Could not determine config directory".to_string()))?;
    Ok(config_dir.join("hygge").join("config.kdl"))
}

/// Load config.kdl from `path`.
///
/// A missing file yields the default config. Syntax errors and invalid
/// values are reported as [`Error::Config`].
pub fn load_config(path: &Path) -> Result<HyggeConfig> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(HyggeConfig::default());
        }
        Err(e) => return Err(e.into()),
    };

    let doc: KdlDocument = content
        .parse()
        .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
    let config = HyggeConfig::from_kdl(&doc);
    config
        .validate()
        .map_err(|msg| Error::Config(format!("{}: {}", path.display(), msg)))?;
    Ok(config)
}
