//! Common error types used across the workspace.
//!
//! Every fallible operation returns [`HomeError`]. Each variant wraps a typed
//! source error and converts via `#[from]`, so callers can match on the kind
//! and still reach the details.

/// Top-level error for all ledger, registry, and reporting operations.
#[derive(Debug, thiserror::Error)]
pub enum HomeError {
    /// A time string could not be parsed.
    #[error("invalid format")]
    InvalidFormat(#[from] ClockFormatError),

    /// An interval end does not come after its start.
    #[error("invalid range")]
    InvalidRange(#[from] RangeError),

    /// A name, power rating, or count failed validation.
    #[error("invalid value")]
    InvalidValue(#[from] ValidationError),

    /// A room or device lookup missed.
    #[error("not found")]
    NotFound(#[from] NotFoundError),
}

/// A `HH:MM` value that could not be turned into a point in time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClockFormatError {
    /// The text is not `HH:MM` with `0 <= HH <= 23` and `0 <= MM <= 59`.
    #[error("expected HH:MM, got {input:?}")]
    Unparseable { input: String },

    /// The wall-clock time is skipped on the local date (DST gap).
    #[error("{input} does not exist on {date} in local time")]
    Nonexistent { input: String, date: chrono::NaiveDate },
}

/// An interval whose end is not strictly after its start.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("off time {off} must be after on time {on}")]
pub struct RangeError {
    pub on: String,
    pub off: String,
}

/// Domain invariant violations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("power rating must be a positive number of watts, got {0}")]
    NonPositivePower(f64),

    #[error("count must be positive")]
    ZeroCount,

    #[error("rate per kWh must be a non-negative number, got {0}")]
    NegativeRate(f64),
}

/// A lookup by id that found nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}
