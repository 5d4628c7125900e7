//! Activation record: one logged on → off interval of a device.

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::time::{Timestamp, as_seconds};

/// End of an activation interval.
///
/// An explicit `Open` variant replaces any magic "off == on" or zero value,
/// so a genuine zero-length record never reads as "still on".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "at", rename_all = "lowercase")]
pub enum RecordEnd {
    /// The device is still running on this record.
    Open,
    /// The device stopped at the given instant.
    Closed(Timestamp),
}

/// One on → off interval in a device ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivationRecord {
    pub on_time: Timestamp,
    pub end: RecordEnd,
}

impl ActivationRecord {
    /// A record started at `on_time` and not yet closed.
    #[must_use]
    pub fn open(on_time: Timestamp) -> Self {
        Self {
            on_time,
            end: RecordEnd::Open,
        }
    }

    /// A record with both ends fixed.
    ///
    /// Callers are expected to pass `off_time >= on_time`; the schedule
    /// resolver guarantees it for scheduled windows.
    #[must_use]
    pub fn closed(on_time: Timestamp, off_time: Timestamp) -> Self {
        Self {
            on_time,
            end: RecordEnd::Closed(off_time),
        }
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self.end, RecordEnd::Open)
    }

    /// The fixed end, if any.
    #[must_use]
    pub fn off_time(&self) -> Option<Timestamp> {
        match self.end {
            RecordEnd::Open => None,
            RecordEnd::Closed(at) => Some(at),
        }
    }

    /// Fix the end of the record at `at`, never earlier than `on_time`.
    pub fn close(&mut self, at: Timestamp) {
        self.end = RecordEnd::Closed(at.max(self.on_time));
    }

    /// End used for accounting: the fixed end, or `now` while open.
    #[must_use]
    pub fn end_at(&self, now: Timestamp) -> Timestamp {
        self.off_time().unwrap_or(now)
    }

    /// Elapsed duration as of `now`, clamped at zero.
    #[must_use]
    pub fn duration_at(&self, now: Timestamp) -> TimeDelta {
        (self.end_at(now) - self.on_time).max(TimeDelta::zero())
    }

    /// Elapsed seconds as of `now`.
    #[must_use]
    pub fn seconds_at(&self, now: Timestamp) -> f64 {
        as_seconds(self.duration_at(now))
    }

    /// Whether `instant` falls inside `[on_time, end)`.
    #[must_use]
    pub fn covers(&self, instant: Timestamp) -> bool {
        match self.end {
            RecordEnd::Open => instant >= self.on_time,
            RecordEnd::Closed(off) => instant >= self.on_time && instant < off,
        }
    }
}
