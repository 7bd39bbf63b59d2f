//! Blocking client for the weather proxy.

use std::time::Duration;

use super::{WeatherError, WeatherReport, WeatherSource, error_message};

/// User-Agent sent to the proxy
const USER_AGENT: &str = concat!("hygge/", env!("CARGO_PKG_VERSION"));

/// Upper bound for a single request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Fetches reports from `<base_url>?city=<name>`.
pub struct WeatherClient {
    base_url: String,
    agent: ureq::Agent,
}

impl WeatherClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build();
        Self {
            base_url: base_url.into(),
            agent,
        }
    }
}

impl WeatherSource for WeatherClient {
    fn fetch(&self, city: &str) -> Result<WeatherReport, WeatherError> {
        tracing::debug!(url = %self.base_url, city, "fetching weather");

        let response = self
            .agent
            .get(&self.base_url)
            .query("city", city)
            .set("Accept", "application/json")
            .call();

        match response {
            Ok(resp) => {
                let body = resp
                    .into_string()
                    .map_err(|e| WeatherError::Http(e.to_string()))?;
                WeatherReport::from_json(&body)
            }
            Err(ureq::Error::Status(code, resp)) => {
                let body = resp.into_string().unwrap_or_default();
                Err(WeatherError::Status {
                    code,
                    message: error_message(&body),
                })
            }
            Err(e) => Err(WeatherError::Http(e.to_string())),
        }
    }
}
