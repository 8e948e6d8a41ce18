use chrono::{DateTime, Utc};

/// Source of the current instant.
///
/// Everything that decides "which day is it" or "has this entry expired"
/// goes through a `Clock` so tests can pin time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
pub use fixed::FixedClock;
