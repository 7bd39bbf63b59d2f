//! Router and handlers for the weather proxy

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;

use crate::config::ResolvedProxy;

/// Upper bound for one upstream request.
const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(10);

/// Units requested from the upstream service.
const UNITS: &str = "metric";

/// Language of the upstream condition descriptions.
const LANG: &str = "zh_tw";

/// Shared, read-only proxy state
#[derive(Clone)]
pub struct ProxyState {
    client: reqwest::Client,
    /// Upstream API key; requests fail with 500 when unset
    api_key: Option<Arc<str>>,
    upstream_url: Arc<str>,
}

impl ProxyState {
    pub fn new(api_key: Option<String>, upstream_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(UPSTREAM_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "falling back to default HTTP client");
                reqwest::Client::new()
            });
        Self {
            client,
            api_key: api_key.map(Arc::from),
            upstream_url: Arc::from(upstream_url.into()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct WeatherQuery {
    city: Option<String>,
}

/// Build the proxy router.
pub fn router(state: ProxyState) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/api/weather", get(get_weather))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the proxy and serve until Ctrl+C.
pub async fn start_server(settings: ResolvedProxy) -> Result<(), Box<dyn std::error::Error>> {
    if settings.api_key.is_none() {
        tracing::warn!("WEATHER_API_KEY is not set; weather requests will fail");
    }

    let state = ProxyState::new(
        settings.api_key.map(|k| k.value),
        settings.upstream_url.value,
    );
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port.value));
    println!("Weather proxy listening on http://{}", addr);
    println!("Press Ctrl+C to stop");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for Ctrl+C");
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "OK",
        "message": "Weather API Proxy is running"
    }))
}

async fn get_weather(State(state): State<ProxyState>, Query(query): Query<WeatherQuery>) -> Response {
    let Some(city) = query.city.filter(|c| !c.trim().is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "City parameter is required");
    };

    let Some(api_key) = state.api_key.as_deref() else {
        tracing::error!("weather request rejected: WEATHER_API_KEY is not set");
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Weather API key is not configured");
    };

    match forward(&state, api_key, &city).await {
        Ok((status, body)) => {
            if !status.is_success() {
                tracing::warn!(status = status.as_u16(), city = %city, "upstream returned an error");
            }
            (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, city = %city, "upstream request failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}

/// Forward one lookup upstream, returning its status and raw body.
async fn forward(
    state: &ProxyState,
    api_key: &str,
    city: &str,
) -> Result<(StatusCode, String), reqwest::Error> {
    let response = state
        .client
        .get(&*state.upstream_url)
        .query(&[
            ("q", city),
            ("appid", api_key),
            ("units", UNITS),
            ("lang", LANG),
        ])
        .send()
        .await?;

    let status = StatusCode::from_u16(response.status().as_u16())
        .unwrap_or(StatusCode::BAD_GATEWAY);
    let body = response.text().await?;
    Ok((status, body))
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}
