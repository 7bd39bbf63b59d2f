//! KDL schema for config.kdl.
//!
//! ```kdl
//! weather {
//!     api-url "https://example.zeabur.app/api/weather"
//!     default-city "Taoyuan"
//! }
//! ```

use kdl::{KdlDocument, KdlEntry, KdlNode, KdlValue};
use serde::{Deserialize, Serialize};

/// Settings for the weather card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Proxy endpoint queried as `<api-url>?city=<name>`
    pub api_url: Option<String>,

    /// City shown when none is requested explicitly
    pub default_city: Option<String>,
}

/// Contents of config.kdl.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HyggeConfig {
    pub weather: WeatherConfig,
}

impl HyggeConfig {
    /// Create an empty config with no values set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the config values.
    ///
    /// Returns an error message if any value is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(url) = &self.weather.api_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(format!("weather api-url must be an http(s) URL, got '{}'", url));
            }
        }
        if let Some(city) = &self.weather.default_city {
            if city.trim().is_empty() {
                return Err("weather default-city must not be empty".to_string());
            }
        }
        Ok(())
    }

    /// Parse config from a KDL document. Unknown nodes are ignored.
    pub fn from_kdl(doc: &KdlDocument) -> Self {
        let mut config = Self::new();

        if let Some(children) = doc.get("weather").and_then(|n| n.children()) {
            config.weather.api_url = get_string_arg(children, "api-url");
            config.weather.default_city = get_string_arg(children, "default-city");
        }

        config
    }

    /// Convert config to a KDL document.
    pub fn to_kdl(&self) -> KdlDocument {
        let mut doc = KdlDocument::new();

        let mut weather = KdlDocument::new();
        if let Some(ref url) = self.weather.api_url {
            weather.nodes_mut().push(string_node("api-url", url));
        }
        if let Some(ref city) = self.weather.default_city {
            weather.nodes_mut().push(string_node("default-city", city));
        }

        if !weather.nodes().is_empty() {
            let mut node = KdlNode::new("weather");
            node.set_children(weather);
            doc.nodes_mut().push(node);
        }

        doc
    }
}

fn get_string_arg(doc: &KdlDocument, name: &str) -> Option<String> {
    doc.get(name)
        .and_then(|node| node.entries().first())
        .and_then(|entry| entry.value().as_string())
        .map(|s| s.to_string())
}

fn string_node(name: &str, value: &str) -> KdlNode {
    let mut node = KdlNode::new(name);
    node.push(KdlEntry::new(KdlValue::String(value.to_string())));
    node
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_kdl_empty() {
        let doc = KdlDocument::new();
        assert_eq!(HyggeConfig::from_kdl(&doc), HyggeConfig::default());
    }

    #[test]
    fn test_config_from_kdl_full() {
        let kdl = r#"
            weather {
                api-url "https://proxy.example/api/weather"
                default-city "Taipei"
            }
        "#;
        let doc: KdlDocument = kdl.parse().unwrap();
        let config = HyggeConfig::from_kdl(&doc);

        assert_eq!(
            config.weather.api_url.as_deref(),
            Some("https://proxy.example/api/weather")
        );
        assert_eq!(config.weather.default_city.as_deref(), Some("Taipei"));
    }

    #[test]
    fn test_config_ignores_wrong_types() {
        let doc: KdlDocument = "weather {\n    api-url 42\n}\n".parse().unwrap();
        let config = HyggeConfig::from_kdl(&doc);
        assert_eq!(config.weather.api_url, None);
    }

    #[test]
    fn test_config_to_kdl_roundtrip() {
        let config = HyggeConfig {
            weather: WeatherConfig {
                api_url: Some("http://localhost:3000/api/weather".to_string()),
                default_city: Some("Taoyuan".to_string()),
            },
        };
        let doc = config.to_kdl();
        assert_eq!(HyggeConfig::from_kdl(&doc), config);
    }

    #[test]
    fn test_empty_config_to_kdl_has_no_nodes() {
        assert!(HyggeConfig::default().to_kdl().nodes().is_empty());
    }

    #[test]
    fn test_validate() {
        let mut config = HyggeConfig::default();
        assert!(config.validate().is_ok());

        config.weather.api_url = Some("ftp://nope".to_string());
        assert!(config.validate().unwrap_err().contains("http(s)"));

        config.weather.api_url = Some("https://ok.example".to_string());
        config.weather.default_city = Some("  ".to_string());
        assert!(config.validate().is_err());
    }
}
