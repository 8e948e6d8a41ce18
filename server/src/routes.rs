use axum::{
    extract::{Query, State},
    http::{HeaderValue, Method, StatusCode},
    response::Json,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::{
    cache::{AstroCache, AstroError, CacheEntry},
    forecast::types::AstroData,
    utils::ErrorResponse,
};

// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub astro_cache: Arc<AstroCache>,
}

#[derive(Debug, Deserialize)]
pub struct AstroQuery {
    pub location: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AstroResponse {
    pub date: String,
    pub name: String,
    pub region: String,
    pub country: String,
    pub astro: AstroData,
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

impl From<CacheEntry> for AstroResponse {
    fn from(entry: CacheEntry) -> Self {
        let record = entry.record;
        Self {
            date: record.date,
            name: record.name,
            region: record.region,
            country: record.country,
            astro: record.astro,
            expires_at: entry.expires_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub version: String,
    pub cached_entries: usize,
}

type ErrorReply = (StatusCode, Json<ErrorResponse>);

fn missing_location() -> ErrorReply {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::new(
            "'location' query parameter is missing. Please provide a valid location.",
            "missing_location",
        )),
    )
}

// Route handlers
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        cached_entries: state.astro_cache.len().await,
    })
}

pub async fn get_astro(
    State(state): State<AppState>,
    Query(params): Query<AstroQuery>,
) -> Result<Json<AstroResponse>, ErrorReply> {
    let location = params.location.unwrap_or_default();

    if location.trim().is_empty() {
        tracing::error!("'location' query parameter is missing in the incoming request");
        return Err(missing_location());
    }

    match state.astro_cache.get_astro(&location).await {
        Ok(entry) => Ok(Json(entry.into())),
        Err(AstroError::MissingLocation) => Err(missing_location()),
        Err(e) => {
            tracing::error!("Error fetching astro data for location '{}': {}", location, e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(
                    &format!(
                        "failed to get astro data for location '{}'. Please try again later.",
                        location
                    ),
                    "astro_unavailable",
                )),
            ))
        }
    }
}

/// CORS policy allowing the configured frontend origin to issue GETs.
pub fn cors_layer(allowed_origin: &str) -> anyhow::Result<CorsLayer> {
    let origin = HeaderValue::from_str(allowed_origin)
        .map_err(|e| anyhow::anyhow!("invalid CORS origin '{}': {}", allowed_origin, e))?;

    Ok(CorsLayer::new()
        .allow_origin([origin])
        .allow_methods([Method::GET]))
}

// Create the router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/astro", get(get_astro))
        .with_state(state)
}
