use chrono::{DateTime, Utc};
use serde::Serialize;

/// Case-fold and trim a location so `Vancouver` and ` vancouver ` share an entry
pub fn normalize_location(location: &str) -> String {
    location.trim().to_lowercase()
}

/// Generate a cache key for astro data: normalized location plus the caller's
/// calendar day.
pub fn astro_cache_key(location: &str, now: DateTime<Utc>) -> String {
    format!("{}:{}", normalize_location(location), now.format("%Y-%m-%d"))
}

/// Error response helper
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    pub fn new(error: &str, code: &str) -> Self {
        Self {
            error: error.to_string(),
            code: code.to_string(),
            timestamp: Utc::now(),
        }
    }
}
