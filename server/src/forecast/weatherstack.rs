use super::{ForecastProvider, RawResponse};
use crate::config::Config;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    #[error("failed to read response body: {0}")]
    ReadBody(#[source] reqwest::Error),
}

pub struct WeatherstackClient {
    client: Client,
    base_url: String,
    access_key: String,
}

impl WeatherstackClient {
    pub fn new(config: &Config) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .user_agent(concat!("AstroCacheServer/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.weatherstack_base_url.trim_end_matches('/').to_string(),
            access_key: config.weather_key.clone(),
        })
    }
}

#[async_trait]
impl ForecastProvider for WeatherstackClient {
    async fn fetch_forecast(&self, location: &str) -> Result<RawResponse, ProviderError> {
        let url = format!("{}/forecast", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("access_key", self.access_key.as_str()), ("query", location)])
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(ProviderError::ReadBody)?
            .to_vec();

        tracing::debug!(status, bytes = body.len(), "weatherstack responded for '{}'", location);

        Ok(RawResponse { status, body })
    }
}
