use super::types::*;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PayloadError {
    #[error("failed to decode forecast response: {0}")]
    MalformedPayload(#[source] serde_json::Error),
    #[error("failed to decode error response: {0}")]
    MalformedErrorPayload(#[source] serde_json::Error),
    #[error("forecast response contained no forecast days")]
    MissingForecast,
}

/// Forecast decoded from a successful response, still waiting on an expiry.
#[derive(Debug, Clone)]
pub struct ForecastReport {
    pub record: AstroRecord,
    pub local_time: String,
    pub timezone_id: String,
}

#[derive(Debug, Clone)]
pub enum ProviderResponse {
    Forecast(ForecastReport),
    Failure(ApiError),
}

/// Decode a provider response according to its status code. One attempt, no
/// retries.
pub fn parse(status: u16, body: &[u8]) -> Result<ProviderResponse, PayloadError> {
    if status != 200 {
        let payload: ApiErrorPayload =
            serde_json::from_slice(body).map_err(PayloadError::MalformedErrorPayload)?;
        return Ok(ProviderResponse::Failure(payload.error));
    }

    let payload: ForecastPayload =
        serde_json::from_slice(body).map_err(PayloadError::MalformedPayload)?;
    Ok(ProviderResponse::Forecast(into_report(payload)?))
}

fn into_report(payload: ForecastPayload) -> Result<ForecastReport, PayloadError> {
    let ForecastPayload { location, forecast } = payload;

    // The provider sends a single day. Should it ever send more, take the
    // earliest date rather than whatever happened to be first on the wire.
    let (date, day) = forecast
        .into_iter()
        .next()
        .ok_or(PayloadError::MissingForecast)?;

    Ok(ForecastReport {
        record: AstroRecord {
            name: location.name,
            region: location.region,
            country: location.country,
            date,
            astro: day.astro,
        },
        local_time: location.localtime,
        timezone_id: location.timezone_id,
    })
}
