//! Daily schedules: `HH:MM` on/off pairs resolved against "today".

use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ClockFormatError, HomeError, RangeError};
use crate::time::Timestamp;

/// Parse a strict `HH:MM` wall-clock value.
///
/// # Errors
///
/// Returns [`HomeError::InvalidFormat`] unless `input` is `HH:MM` with
/// `0 <= HH <= 23` and `0 <= MM <= 59`.
pub fn parse_clock(input: &str) -> Result<NaiveTime, HomeError> {
    let trimmed = input.trim();
    let unparseable = || ClockFormatError::Unparseable {
        input: input.to_string(),
    };
    let (hour, minute) = trimmed.split_once(':').ok_or_else(unparseable)?;
    let field = |text: &str| {
        if text.is_empty() || text.len() > 2 || !text.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        text.parse::<u32>().ok()
    };
    let (Some(hour), Some(minute)) = (field(hour), field(minute)) else {
        return Err(unparseable().into());
    };
    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(|| unparseable().into())
}

/// An on/off pair of wall-clock times, not yet tied to a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailySchedule {
    pub on: NaiveTime,
    pub off: NaiveTime,
}

impl DailySchedule {
    /// Parse both ends from `HH:MM` strings.
    ///
    /// # Errors
    ///
    /// Returns [`HomeError::InvalidFormat`] when either string is malformed.
    pub fn parse(on: &str, off: &str) -> Result<Self, HomeError> {
        Ok(Self {
            on: parse_clock(on)?,
            off: parse_clock(off)?,
        })
    }

    /// Pin both ends to the local date of `now` in `zone`.
    ///
    /// # Errors
    ///
    /// Returns [`HomeError::InvalidFormat`] if either time is skipped on
    /// that date, or [`HomeError::InvalidRange`] if the resolved off time
    /// is not strictly after the resolved on time.
    pub fn resolve<Tz: TimeZone>(
        &self,
        now: Timestamp,
        zone: &Tz,
    ) -> Result<ScheduledWindow, HomeError> {
        let date = now.with_timezone(zone).date_naive();
        let on = resolve_on_date(date, self.on, zone)?;
        let off = resolve_on_date(date, self.off, zone)?;
        if off <= on {
            return Err(RangeError {
                on: self.on.format("%H:%M").to_string(),
                off: self.off.format("%H:%M").to_string(),
            }
            .into());
        }
        Ok(ScheduledWindow { on, off })
    }
}

fn resolve_on_date<Tz: TimeZone>(
    date: NaiveDate,
    time: NaiveTime,
    zone: &Tz,
) -> Result<Timestamp, HomeError> {
    date.and_time(time)
        .and_local_timezone(zone.clone())
        .earliest()
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| {
            ClockFormatError::Nonexistent {
                input: time.format("%H:%M").to_string(),
                date,
            }
            .into()
        })
}

/// A schedule pinned to absolute instants, with `off > on`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledWindow {
    pub on: Timestamp,
    pub off: Timestamp,
}

impl ScheduledWindow {
    /// Whether `instant` falls inside `[on, off)`.
    #[must_use]
    pub fn contains(&self, instant: Timestamp) -> bool {
        instant >= self.on && instant < self.off
    }
}
