use serde::{Deserialize, Serialize};
use std::env;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    pub weather_key: String,
    pub weatherstack_base_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub cors_allowed_origin: String,
    pub http_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from any variable source.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let or_default = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        Ok(Config {
            weather_key: lookup("WEATHER_KEY")
                .ok_or_else(|| anyhow::anyhow!("WEATHER_KEY not set"))?,
            weatherstack_base_url: or_default("WEATHERSTACK_BASE_URL", "http://api.weatherstack.com"),
            server_host: or_default("SERVER_HOST", "127.0.0.1"),
            server_port: or_default("SERVER_PORT", "8080")
                .parse()
                .map_err(|e| anyhow::anyhow!("SERVER_PORT is not a valid port: {}", e))?,
            cors_allowed_origin: or_default("CORS_ALLOWED_ORIGIN", "http://localhost:5173"),
            http_timeout_secs: or_default("HTTP_TIMEOUT_SECS", "30")
                .parse()
                .map_err(|e| anyhow::anyhow!("HTTP_TIMEOUT_SECS is not a number of seconds: {}", e))?,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
