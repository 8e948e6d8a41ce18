//! Test doubles for the weather provider: a scripted in-process provider and
//! an HTTP server that answers like weatherstack does.

use super::{ForecastProvider, RawResponse};
use super::weatherstack::ProviderError;
use crate::config::Config;
use async_trait::async_trait;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Router,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub mod fixtures {
    use crate::forecast::types::AstroData;

    pub const FORECAST_VANCOUVER: &str = include_str!("../../fixtures/forecast_vancouver.json");
    pub const MISSING_ACCESS_KEY: &str = include_str!("../../fixtures/101_missing_access_key.json");
    pub const INVALID_ACCESS_KEY: &str = include_str!("../../fixtures/101_invalid_access_key.json");
    pub const MISSING_QUERY: &str = include_str!("../../fixtures/601_missing_query.json");
    pub const NO_RESULTS: &str = include_str!("../../fixtures/602_no_results.json");
    pub const USAGE_LIMIT_REACHED: &str = include_str!("../../fixtures/104_usage_limit_reached.json");

    pub fn vancouver_astro() -> AstroData {
        AstroData {
            sunrise: "05:07 AM".to_string(),
            sunset: "09:22 PM".to_string(),
            moonrise: "06:58 AM".to_string(),
            moonset: "11:52 PM".to_string(),
            moon_phase: "Waxing Crescent".to_string(),
            moon_illumination: 3,
        }
    }

    /// Minimal single-day forecast body.
    pub fn forecast_body(localtime: &str, timezone_id: &str, date: &str, moon_illumination: u8) -> String {
        serde_json::json!({
            "location": {
                "name": "Vancouver",
                "country": "Canada",
                "region": "British Columbia",
                "localtime": localtime,
                "timezone_id": timezone_id
            },
            "forecast": {
                date: {
                    "date": date,
                    "astro": {
                        "sunrise": "05:07 AM",
                        "sunset": "09:22 PM",
                        "moonrise": "06:58 AM",
                        "moonset": "11:52 PM",
                        "moon_phase": "Waxing Crescent",
                        "moon_illumination": moon_illumination
                    }
                }
            }
        })
        .to_string()
    }
}

/// Provider that replays scripted responses and records every call. Once the
/// script runs out the last response repeats.
pub struct StubProvider {
    responses: Vec<(u16, String)>,
    calls: AtomicUsize,
    locations: Mutex<Vec<String>>,
}

impl StubProvider {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self::sequence(vec![(status, body.into())])
    }

    pub fn sequence(responses: Vec<(u16, String)>) -> Self {
        assert!(!responses.is_empty(), "stub needs at least one response");
        Self {
            responses,
            calls: AtomicUsize::new(0),
            locations: Mutex::new(Vec::new()),
        }
    }

    pub fn vancouver() -> Self {
        Self::new(200, fixtures::FORECAST_VANCOUVER)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn locations(&self) -> Vec<String> {
        self.locations.lock().unwrap().clone()
    }
}

#[async_trait]
impl ForecastProvider for StubProvider {
    async fn fetch_forecast(&self, location: &str) -> Result<RawResponse, ProviderError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        self.locations.lock().unwrap().push(location.to_string());

        // Give concurrent callers a chance to interleave, like a real network hop
        tokio::task::yield_now().await;

        let (status, body) = &self.responses[call.min(self.responses.len() - 1)];
        Ok(RawResponse {
            status: *status,
            body: body.clone().into_bytes(),
        })
    }
}

pub fn test_config(base_url: &str, weather_key: &str) -> Config {
    Config {
        weather_key: weather_key.to_string(),
        weatherstack_base_url: base_url.to_string(),
        server_host: "127.0.0.1".to_string(),
        server_port: 0,
        cors_allowed_origin: "http://localhost:5173".to_string(),
        http_timeout_secs: 5,
    }
}

async fn mock_forecast(
    State(hits): State<Arc<AtomicUsize>>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, String) {
    hits.fetch_add(1, Ordering::SeqCst);

    let key = params.get("access_key").map(String::as_str).unwrap_or_default();
    let location = params.get("query").map(String::as_str).unwrap_or_default();

    let (status, body) = match (key, location) {
        ("", _) => (StatusCode::UNAUTHORIZED, fixtures::MISSING_ACCESS_KEY),
        ("invalid", _) => (StatusCode::UNAUTHORIZED, fixtures::INVALID_ACCESS_KEY),
        (_, "") => (StatusCode::UNAUTHORIZED, fixtures::MISSING_QUERY),
        (_, "602_no_results") => (StatusCode::BAD_REQUEST, fixtures::NO_RESULTS),
        (_, "104_usage_limit_reached") => (StatusCode::BAD_REQUEST, fixtures::USAGE_LIMIT_REACHED),
        _ => (StatusCode::OK, fixtures::FORECAST_VANCOUVER),
    };

    (status, body.to_string())
}

/// Start a weatherstack look-alike on an ephemeral port and return its base
/// URL. `hits` counts every request it receives.
pub async fn spawn_mock_weatherstack(hits: Arc<AtomicUsize>) -> String {
    let app = Router::new()
        .route("/forecast", get(mock_forecast))
        .with_state(hits);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}
