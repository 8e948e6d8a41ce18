use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Astronomy block for one day, shared between the provider payload and our
/// own responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AstroData {
    pub sunrise: String,
    pub sunset: String,
    pub moonrise: String,
    pub moonset: String,
    pub moon_phase: String,
    pub moon_illumination: u8,
}

/// Astro data resolved for a location, as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AstroRecord {
    pub name: String,
    pub region: String,
    pub country: String,
    pub date: String,
    pub astro: AstroData,
}

// Provider payloads. Only fields we read are declared; coordinates, daily
// metrics and the like are skipped whatever their type.

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastPayload {
    pub location: LocationBlock,
    #[serde(default)]
    pub forecast: BTreeMap<String, ForecastDay>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocationBlock {
    pub name: String,
    pub country: String,
    pub region: String,
    pub localtime: String,
    pub timezone_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastDay {
    pub astro: AstroData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorPayload {
    pub error: ApiError,
}

/// Structured failure reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: i32,
    #[serde(rename = "type")]
    pub kind: String,
    pub info: String,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "code={}, type={}, info={}", self.code, self.kind, self.info)
    }
}
