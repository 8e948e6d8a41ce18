use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use thiserror::Error;

/// Layout of the provider's `localtime` field, e.g. `2023-06-21 16:30`.
pub const LOCAL_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Error, Debug)]
pub enum ExpiryError {
    #[error("unknown time zone: {0}")]
    UnknownTimeZone(String),
    #[error("malformed local time '{value}': {source}")]
    MalformedLocalTime {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    #[error("no local midnight after {date} in {zone}")]
    NoLocalMidnight { date: NaiveDate, zone: String },
}

/// Instant of the next local midnight at a location, given the location's own
/// reported wall-clock time and IANA zone.
///
/// The result is independent of the server's zone. When midnight falls inside
/// a DST overlap the earlier instant wins; when it falls inside a gap the first
/// whole hour that exists that day is used instead.
pub fn compute_expiry(local_time: &str, timezone_id: &str) -> Result<DateTime<Utc>, ExpiryError> {
    let tz = parse_timezone(timezone_id)?;

    let parsed = NaiveDateTime::parse_from_str(local_time, LOCAL_TIME_FORMAT).map_err(|source| {
        ExpiryError::MalformedLocalTime {
            value: local_time.to_string(),
            source,
        }
    })?;

    let no_midnight = || ExpiryError::NoLocalMidnight {
        date: parsed.date(),
        zone: timezone_id.to_string(),
    };

    let next_midnight = parsed
        .date()
        .succ_opt()
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .ok_or_else(no_midnight)?;

    (0..24)
        .find_map(|hour| {
            tz.from_local_datetime(&(next_midnight + Duration::hours(hour)))
                .earliest()
        })
        .map(|expiry| expiry.with_timezone(&Utc))
        .ok_or_else(no_midnight)
}

fn parse_timezone(timezone_id: &str) -> Result<Tz, ExpiryError> {
    timezone_id
        .parse::<Tz>()
        .map_err(|_| ExpiryError::UnknownTimeZone(timezone_id.to_string()))
}
