//! Time and timestamp helpers.

use chrono::{DateTime, TimeDelta, Utc};

/// UTC timestamp used for activation records, timer events, and "now".
pub type Timestamp = DateTime<Utc>;

/// Seconds in one hour, for converting durations to hours.
pub const SECONDS_PER_HOUR: f64 = 3600.0;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Length of `delta` in (fractional) seconds.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn as_seconds(delta: TimeDelta) -> f64 {
    delta.num_milliseconds() as f64 / 1000.0
}

/// Add up `values`, starting from `+0.0` so an empty input never yields `-0.0`.
#[must_use]
pub fn sum_positive_zero(values: impl IntoIterator<Item = f64>) -> f64 {
    values.into_iter().fold(0.0, |acc, value| acc + value)
}
