//! Device: a powered appliance in a room, with its activation ledger.
//!
//! The ledger is append-only and chronological by construction. Toggling
//! opens or closes records; scheduling appends a closed window and derives
//! the status from where "now" falls relative to it. Energy and active
//! time are always recomputed from the ledger, never cached.

use serde::{Deserialize, Serialize};

use crate::activation::ActivationRecord;
use crate::error::{HomeError, ValidationError};
use crate::id::DeviceId;
use crate::schedule::ScheduledWindow;
use crate::time::{SECONDS_PER_HOUR, Timestamp, sum_positive_zero};

/// On/off state of a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DeviceStatus {
    On,
    #[default]
    Off,
}

impl std::fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::On => f.write_str("ON"),
            Self::Off => f.write_str("OFF"),
        }
    }
}

/// A named appliance with a power rating and an activation ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    pub name: String,
    /// Rated power draw in watts.
    pub power_rating: f64,
    pub status: DeviceStatus,
    records: Vec<ActivationRecord>,
}

impl Device {
    /// Create a builder for constructing a [`Device`].
    #[must_use]
    pub fn builder() -> DeviceBuilder {
        DeviceBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`HomeError::InvalidValue`] when `name` is empty or the power
    /// rating is not a finite positive number.
    pub fn validate(&self) -> Result<(), HomeError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        if !self.power_rating.is_finite() || self.power_rating <= 0.0 {
            return Err(ValidationError::NonPositivePower(self.power_rating).into());
        }
        Ok(())
    }

    /// The ledger, oldest first.
    #[must_use]
    pub fn records(&self) -> &[ActivationRecord] {
        &self.records
    }

    /// Flip the device and log the transition at `now`.
    ///
    /// Switching on appends an open record. Switching off closes the open
    /// record and cuts short every scheduled window running at `now`, so no
    /// record covers `now` afterwards. Finished records are left alone.
    pub fn toggle(&mut self, now: Timestamp) -> DeviceStatus {
        match self.status {
            DeviceStatus::Off => {
                self.status = DeviceStatus::On;
                self.records.push(ActivationRecord::open(now));
            }
            DeviceStatus::On => {
                self.status = DeviceStatus::Off;
                for record in self
                    .records
                    .iter_mut()
                    .filter(|record| record.is_open() || record.covers(now))
                {
                    record.close(now);
                }
            }
        }
        self.status
    }

    /// Append a scheduled window and derive the status at `now`.
    ///
    /// Existing records are left untouched, even an open one. The status is
    /// ON when `now` falls inside `[on, off)` or a manual run is still open.
    pub fn schedule(&mut self, window: ScheduledWindow, now: Timestamp) -> DeviceStatus {
        self.records.push(ActivationRecord::closed(window.on, window.off));
        self.status = if window.contains(now) || self.has_open_record() {
            DeviceStatus::On
        } else {
            DeviceStatus::Off
        };
        self.status
    }

    /// Re-derive the status from the ledger at `at` and report whether it
    /// changed.
    ///
    /// The device is ON while an open record exists or any record covers
    /// `at`. A timer firing after a manual toggle therefore leaves the
    /// manual state alone.
    pub fn sync_status(&mut self, at: Timestamp) -> bool {
        let status = if self.records.iter().any(|record| record.covers(at)) {
            DeviceStatus::On
        } else {
            DeviceStatus::Off
        };
        let changed = status != self.status;
        self.status = status;
        changed
    }

    fn has_open_record(&self) -> bool {
        self.records.iter().any(ActivationRecord::is_open)
    }

    /// Whether `window` intersects any logged interval. An open record
    /// counts as running from its start onwards.
    #[must_use]
    pub fn overlaps(&self, window: &ScheduledWindow) -> bool {
        self.records.iter().any(|record| {
            let starts_in_time = record.on_time < window.off;
            match record.off_time() {
                None => starts_in_time,
                Some(off) => starts_in_time && window.on < off,
            }
        })
    }

    /// Energy consumed across the whole ledger, in kWh, as of `now`.
    #[must_use]
    pub fn energy_consumed(&self, now: Timestamp) -> f64 {
        let kilowatts = self.power_rating / 1000.0;
        sum_positive_zero(
            self.records
                .iter()
                .map(|record| kilowatts * record.seconds_at(now) / SECONDS_PER_HOUR),
        )
    }

    /// Summed on-time across the ledger, in seconds, as of `now`.
    #[must_use]
    pub fn total_active_time(&self, now: Timestamp) -> f64 {
        sum_positive_zero(self.records.iter().map(|record| record.seconds_at(now)))
    }
}

/// Step-by-step builder for [`Device`].
#[derive(Debug, Default)]
pub struct DeviceBuilder {
    name: Option<String>,
    power_rating: Option<f64>,
}

impl DeviceBuilder {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Rated power draw in watts.
    #[must_use]
    pub fn power_rating(mut self, watts: f64) -> Self {
        self.power_rating = Some(watts);
        self
    }

    /// Consume the builder, validate, and return an OFF [`Device`] with an
    /// empty ledger.
    ///
    /// # Errors
    ///
    /// Returns [`HomeError::InvalidValue`] if `name` is missing or empty, or
    /// the power rating is missing or not positive.
    pub fn build(self) -> Result<Device, HomeError> {
        let device = Device {
            id: DeviceId::new(),
            name: self.name.unwrap_or_default(),
            power_rating: self.power_rating.unwrap_or_default(),
            status: DeviceStatus::Off,
            records: Vec::new(),
        };
        device.validate()?;
        Ok(device)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::RecordEnd;
    use chrono::{TimeDelta, TimeZone, Utc};

    fn at(hour: u32, minute: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2024, 11, 12, hour, minute, 0).unwrap()
    }

    fn heater() -> Device {
        Device::builder()
            .name("Heater")
            .power_rating(1000.0)
            .build()
            .unwrap()
    }

    fn window(on: Timestamp, off: Timestamp) -> ScheduledWindow {
        ScheduledWindow { on, off }
    }

    #[test]
    fn should_start_off_with_empty_ledger() {
        let device = heater();
        assert_eq!(device.status, DeviceStatus::Off);
        assert!(device.records().is_empty());
    }

    #[test]
    fn should_reject_non_positive_power_rating() {
        for watts in [0.0, -60.0, f64::NAN, f64::INFINITY] {
            let result = Device::builder().name("Lamp").power_rating(watts).build();
            assert!(
                matches!(
                    result,
                    Err(HomeError::InvalidValue(ValidationError::NonPositivePower(_)))
                ),
                "{watts} should be rejected"
            );
        }
    }

    #[test]
    fn should_reject_missing_power_rating() {
        let result = Device::builder().name("Lamp").build();
        assert!(matches!(result, Err(HomeError::InvalidValue(_))));
    }

    #[test]
    fn should_reject_empty_name() {
        let result = Device::builder().name("  ").power_rating(60.0).build();
        assert!(matches!(
            result,
            Err(HomeError::InvalidValue(ValidationError::EmptyName))
        ));
    }

    #[test]
    fn should_be_on_after_odd_number_of_toggles() {
        let mut device = heater();
        for n in 1..=7_u32 {
            let status = device.toggle(at(8, n));
            assert_eq!(status == DeviceStatus::On, n % 2 == 1, "after {n} toggles");
        }
        assert_eq!(device.records().len(), 4);
    }

    #[test]
    fn should_open_record_when_switched_on() {
        let mut device = heater();
        device.toggle(at(8, 0));
        assert_eq!(device.records(), &[ActivationRecord::open(at(8, 0))]);
    }

    #[test]
    fn should_close_latest_record_when_switched_off() {
        let mut device = heater();
        device.toggle(at(8, 0));
        device.toggle(at(9, 0));
        let last = device.records().last().unwrap();
        assert_eq!(last.end, RecordEnd::Closed(at(9, 0)));
        assert!(last.off_time().unwrap() >= last.on_time);
    }

    #[test]
    fn should_only_flip_status_when_switching_off_empty_ledger() {
        let mut device = heater();
        device.status = DeviceStatus::On;
        assert_eq!(device.toggle(at(8, 0)), DeviceStatus::Off);
        assert!(device.records().is_empty());
    }

    #[test]
    fn should_close_open_record_not_latest_when_switched_off() {
        let mut device = heater();
        device.toggle(at(8, 0));
        device.schedule(window(at(6, 0), at(7, 0)), at(9, 0));
        assert_eq!(device.toggle(at(9, 30)), DeviceStatus::Off);
        assert_eq!(device.records()[0].off_time(), Some(at(9, 30)));
        assert_eq!(device.records()[1].off_time(), Some(at(7, 0)));
    }

    #[test]
    fn should_stop_open_record_and_covering_window_together() {
        let mut device = heater();
        device.toggle(at(8, 0));
        device.schedule(window(at(9, 0), at(11, 0)), at(9, 15));
        assert_eq!(device.toggle(at(9, 30)), DeviceStatus::Off);
        assert_eq!(device.records()[0].off_time(), Some(at(9, 30)));
        assert_eq!(device.records()[1].off_time(), Some(at(9, 30)));
        assert!(!device.sync_status(at(10, 0)));
    }

    #[test]
    fn should_cut_short_running_window_when_switched_off() {
        let mut device = heater();
        device.schedule(window(at(8, 0), at(10, 0)), at(9, 0));
        assert_eq!(device.toggle(at(9, 0)), DeviceStatus::Off);
        assert_eq!(
            device.records(),
            &[ActivationRecord::closed(at(8, 0), at(9, 0))]
        );
    }

    #[test]
    fn should_leave_finished_records_alone_when_switched_off() {
        let mut device = heater();
        device.toggle(at(8, 0));
        device.toggle(at(8, 10));
        device.status = DeviceStatus::On;
        assert_eq!(device.toggle(at(9, 0)), DeviceStatus::Off);
        assert_eq!(device.records()[0].off_time(), Some(at(8, 10)));
    }

    #[test]
    fn should_sync_status_with_ledger_at_instant() {
        let mut device = heater();
        device.schedule(window(at(10, 0), at(11, 0)), at(9, 0));
        assert!(device.sync_status(at(10, 0)));
        assert_eq!(device.status, DeviceStatus::On);
        assert!(!device.sync_status(at(10, 30)));
        assert!(device.sync_status(at(11, 0)));
        assert_eq!(device.status, DeviceStatus::Off);
    }

    #[test]
    fn should_keep_manual_run_on_when_syncing() {
        let mut device = heater();
        device.schedule(window(at(10, 0), at(11, 0)), at(9, 0));
        device.toggle(at(9, 30));
        assert!(!device.sync_status(at(10, 0)));
        assert!(!device.sync_status(at(11, 0)));
        assert_eq!(device.status, DeviceStatus::On);
    }

    #[test]
    fn should_report_zero_energy_without_records() {
        assert!(heater().energy_consumed(at(12, 0)).abs() < f64::EPSILON);
        assert!(heater().total_active_time(at(12, 0)).abs() < f64::EPSILON);
    }

    #[test]
    fn should_compute_one_kwh_for_one_hour_at_one_kilowatt() {
        let mut device = heater();
        device.toggle(at(8, 0));
        device.toggle(at(9, 0));
        assert!((device.energy_consumed(at(23, 0)) - 1.0).abs() < 1e-9);
        assert!((device.total_active_time(at(23, 0)) - 3600.0).abs() < 1e-9);
    }

    #[test]
    fn should_scale_energy_with_rating_and_duration() {
        let mut device = Device::builder()
            .name("Lamp")
            .power_rating(60.0)
            .build()
            .unwrap();
        device.schedule(window(at(6, 0), at(8, 30)), at(12, 0));
        assert!((device.energy_consumed(at(12, 0)) - 0.15).abs() < 1e-9);
    }

    #[test]
    fn should_charge_open_record_up_to_now() {
        let mut device = heater();
        device.toggle(at(8, 0));
        let early = device.energy_consumed(at(8, 30));
        let later = device.energy_consumed(at(9, 0));
        assert!((early - 0.5).abs() < 1e-9);
        assert!(later > early);
    }

    #[test]
    fn should_accept_zero_length_record() {
        let mut device = heater();
        device.toggle(at(8, 0));
        device.toggle(at(8, 0));
        assert!(device.energy_consumed(at(12, 0)).abs() < f64::EPSILON);
    }

    #[test]
    fn should_be_on_when_scheduled_window_covers_now() {
        let mut device = heater();
        let status = device.schedule(window(at(8, 0), at(10, 0)), at(9, 0));
        assert_eq!(status, DeviceStatus::On);
        assert_eq!(
            device.records(),
            &[ActivationRecord::closed(at(8, 0), at(10, 0))]
        );
    }

    #[test]
    fn should_be_off_when_scheduled_window_is_past_or_future() {
        let mut device = heater();
        assert_eq!(
            device.schedule(window(at(6, 0), at(7, 0)), at(9, 0)),
            DeviceStatus::Off
        );
        assert_eq!(
            device.schedule(window(at(20, 0), at(21, 0)), at(9, 0)),
            DeviceStatus::Off
        );
        assert_eq!(
            device.schedule(window(at(8, 0), at(9, 0)), at(9, 0)),
            DeviceStatus::Off
        );
    }

    #[test]
    fn should_append_schedule_without_closing_open_record() {
        let mut device = heater();
        device.toggle(at(8, 0));
        let status = device.schedule(window(at(6, 0), at(7, 0)), at(9, 0));
        assert_eq!(device.records().len(), 2);
        assert!(device.records()[0].is_open());
        assert_eq!(status, DeviceStatus::On);
    }

    #[test]
    fn should_recompute_status_from_scheduled_window_not_ledger_order() {
        let mut device = heater();
        device.schedule(window(at(10, 0), at(11, 0)), at(10, 30));
        let status = device.schedule(window(at(6, 0), at(7, 0)), at(10, 30));
        assert_eq!(status, DeviceStatus::Off);
    }

    #[test]
    fn should_detect_overlap_with_closed_and_open_records() {
        let mut device = heater();
        device.schedule(window(at(8, 0), at(9, 0)), at(12, 0));
        assert!(device.overlaps(&window(at(8, 30), at(9, 30))));
        assert!(!device.overlaps(&window(at(9, 0), at(10, 0))));

        device.toggle(at(13, 0));
        assert!(device.overlaps(&window(at(20, 0), at(21, 0))));
        assert!(!device.overlaps(&window(at(10, 0), at(11, 0))));
    }

    #[test]
    fn should_measure_active_time_in_seconds() {
        let mut device = heater();
        device.toggle(at(8, 0));
        device.toggle(at(8, 1));
        device.toggle(at(9, 0));
        let seconds = device.total_active_time(at(9, 0) + TimeDelta::seconds(30));
        assert!((seconds - 90.0).abs() < 1e-9);
    }
}
