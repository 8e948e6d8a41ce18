pub mod parser;
pub mod types;
pub mod weatherstack;

#[cfg(test)]
pub mod mock;

use async_trait::async_trait;
use weatherstack::ProviderError;

/// Status and body of a provider response, before any decoding.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Anything that can fetch a forecast report for a free-text location.
#[async_trait]
pub trait ForecastProvider: Send + Sync {
    async fn fetch_forecast(&self, location: &str) -> Result<RawResponse, ProviderError>;
}
