use crate::clock::Clock;
use crate::expiry::{compute_expiry, ExpiryError};
use crate::forecast::parser::{self, PayloadError, ProviderResponse};
use crate::forecast::types::{ApiError, AstroRecord};
use crate::forecast::weatherstack::ProviderError;
use crate::forecast::ForecastProvider;
use crate::utils::astro_cache_key;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Error, Debug)]
pub enum AstroError {
    #[error("location must not be blank")]
    MissingLocation,
    #[error("weather API unavailable: {0}")]
    Transport(#[from] ProviderError),
    #[error("API error occurred: {0}")]
    Upstream(ApiError),
    #[error(transparent)]
    Payload(#[from] PayloadError),
    #[error("failed to compute expiry time: {0}")]
    Expiry(#[from] ExpiryError),
}

/// Astro record plus the instant it stops being served.
///
/// `expires_at` is always the next local midnight at the queried location,
/// never the requester's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub record: AstroRecord,
    pub expires_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// In-memory astro cache in front of the forecast provider.
///
/// Entries are keyed by location and the caller's calendar day. Stale entries
/// are only replaced lazily, on the next request for the same key; nothing is
/// ever evicted.
pub struct AstroCache {
    provider: Arc<dyn ForecastProvider>,
    clock: Arc<dyn Clock>,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl AstroCache {
    pub fn new(provider: Arc<dyn ForecastProvider>, clock: Arc<dyn Clock>) -> Self {
        Self {
            provider,
            clock,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub async fn get_astro(&self, location: &str) -> Result<CacheEntry, AstroError> {
        if location.trim().is_empty() {
            return Err(AstroError::MissingLocation);
        }

        let now = self.clock.now();
        let key = astro_cache_key(location, now);

        if let Some(entry) = self.lookup(&key, now).await {
            tracing::debug!(%key, "value served from cache");
            return Ok(entry);
        }

        // The lock is not held across the provider call; concurrent misses
        // may both fetch and `store` settles who wins.
        let raw = self.provider.fetch_forecast(location).await?;

        let report = match parser::parse(raw.status, &raw.body)? {
            ProviderResponse::Forecast(report) => report,
            ProviderResponse::Failure(api_error) => {
                tracing::warn!(status = raw.status, %api_error, "weather API rejected request for '{}'", location);
                return Err(AstroError::Upstream(api_error));
            }
        };

        let expires_at = compute_expiry(&report.local_time, &report.timezone_id)?;
        let entry = CacheEntry {
            record: report.record,
            expires_at,
        };

        tracing::info!(%key, %expires_at, "value served from fresh API request");
        Ok(self.store(key, entry).await)
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    async fn lookup(&self, key: &str, now: DateTime<Utc>) -> Option<CacheEntry> {
        let entries = self.entries.read().await;
        let entry = entries.get(key)?;

        if entry.is_fresh(now) {
            Some(entry.clone())
        } else {
            tracing::info!(%key, %now, expires_at = %entry.expires_at, "cached value has expired");
            None
        }
    }

    /// Insert `entry` unless a concurrent request already stored one that is
    /// still fresh, in which case that one is kept and returned.
    async fn store(&self, key: String, entry: CacheEntry) -> CacheEntry {
        let mut entries = self.entries.write().await;
        let now = self.clock.now();

        if let Some(existing) = entries.get(&key) {
            if existing.is_fresh(now) {
                tracing::debug!(%key, "keeping entry stored by a concurrent request");
                return existing.clone();
            }
        }

        entries.insert(key, entry.clone());
        entry
    }
}
