//! Home service: use-cases for the rooms, devices, and their ledgers.
//!
//! This is the whole surface the console talks to: registry operations,
//! the two ledger mutations (toggle, schedule), read-only status, report
//! and trends, and the timer queue that replays scheduled windows as
//! status transitions.

use chrono::NaiveDateTime;
use smarthome_domain::device::{Device, DeviceStatus};
use smarthome_domain::error::HomeError;
use smarthome_domain::home::{Home, StatusEntry};
use smarthome_domain::id::{DeviceId, RoomId};
use smarthome_domain::report::EnergyReport;
use smarthome_domain::room::Room;
use smarthome_domain::schedule::DailySchedule;
use smarthome_domain::tariff::Tariff;
use smarthome_domain::time::Timestamp;
use smarthome_domain::timer::{TimerFiring, TimerQueue};
use smarthome_domain::trends::Trends;

use crate::ports::Clock;

/// Application service owning the session's home and timer queue.
pub struct HomeService<C> {
    home: Home,
    tariff: Tariff,
    timers: TimerQueue,
    clock: C,
}

impl<C: Clock> HomeService<C> {
    /// Create an empty home priced with `tariff`.
    pub fn new(clock: C, tariff: Tariff) -> Self {
        Self {
            home: Home::new(),
            tariff,
            timers: TimerQueue::new(),
            clock,
        }
    }

    pub fn home(&self) -> &Home {
        &self.home
    }

    /// Current instant according to the injected clock.
    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// Current wall-clock time in the clock's zone, for display.
    pub fn local_time(&self) -> NaiveDateTime {
        self.to_local(self.clock.now())
    }

    /// `at` as wall-clock time in the clock's zone.
    pub fn to_local(&self, at: Timestamp) -> NaiveDateTime {
        at.with_timezone(&self.clock.zone()).naive_local()
    }

    /// Create a room.
    ///
    /// # Errors
    ///
    /// Returns [`HomeError::InvalidValue`] if `name` is empty.
    #[tracing::instrument(skip(self, name), fields(room_name = %name.as_ref()))]
    pub fn add_room(&mut self, name: impl AsRef<str>) -> Result<RoomId, HomeError> {
        let room = Room::builder().name(name.as_ref()).build()?;
        let id = self.home.add_room(room)?;
        tracing::info!(room_id = %id, "room added");
        Ok(id)
    }

    /// Create several rooms at once, all or nothing.
    ///
    /// # Errors
    ///
    /// Returns [`HomeError::InvalidValue`] if `names` is empty or any name
    /// is blank.
    #[tracing::instrument(skip(self, names))]
    pub fn add_rooms<I, S>(&mut self, names: I) -> Result<Vec<RoomId>, HomeError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ids = self.home.add_rooms(names)?;
        tracing::info!(count = ids.len(), "rooms added");
        Ok(ids)
    }

    /// Create an OFF device with an empty ledger in `room_id`.
    ///
    /// # Errors
    ///
    /// Returns [`HomeError::InvalidValue`] if `name` is empty or
    /// `power_rating_watts <= 0`, or [`HomeError::NotFound`] for an unknown
    /// room.
    #[tracing::instrument(skip(self, name), fields(device_name = %name.as_ref()))]
    pub fn add_device(
        &mut self,
        room_id: RoomId,
        name: impl AsRef<str>,
        power_rating_watts: f64,
    ) -> Result<DeviceId, HomeError> {
        let device = Device::builder()
            .name(name.as_ref())
            .power_rating(power_rating_watts)
            .build()?;
        let id = self.home.add_device(room_id, device)?;
        tracing::info!(device_id = %id, "device added");
        Ok(id)
    }

    /// Switch a device on or off at `now` and return its new status.
    ///
    /// # Errors
    ///
    /// Returns [`HomeError::NotFound`] for an unknown device.
    #[tracing::instrument(skip(self))]
    pub fn toggle_device(
        &mut self,
        device_id: DeviceId,
        now: Timestamp,
    ) -> Result<DeviceStatus, HomeError> {
        let device = self.home.device_mut(device_id)?;
        let status = device.toggle(now);
        tracing::info!(device = %device.name, %status, "device toggled");
        Ok(status)
    }

    /// Log an `on`–`off` window for today and return the status at `now`.
    ///
    /// The window is appended even when it overlaps earlier records; the
    /// overlap is only logged. Instants still ahead of `now` are queued as
    /// timer events.
    ///
    /// # Errors
    ///
    /// Returns [`HomeError::InvalidFormat`] if either time is not `HH:MM`,
    /// [`HomeError::InvalidRange`] if `off` is not after `on`, or
    /// [`HomeError::NotFound`] for an unknown device.
    #[tracing::instrument(skip(self))]
    pub fn schedule_device(
        &mut self,
        device_id: DeviceId,
        on: &str,
        off: &str,
        now: Timestamp,
    ) -> Result<DeviceStatus, HomeError> {
        let window = DailySchedule::parse(on, off)?.resolve(now, &self.clock.zone())?;
        let device = self.home.device_mut(device_id)?;
        if device.overlaps(&window) {
            tracing::warn!(device = %device.name, "scheduled window overlaps existing records");
        }
        let status = device.schedule(window, now);
        tracing::info!(
            device = %device.name,
            %status,
            on = %window.on,
            off = %window.off,
            "device scheduled"
        );
        let queued = self.timers.schedule_window(device_id, window, now);
        tracing::debug!(queued, "timer events queued");
        Ok(status)
    }

    /// Status of every device, or of the devices in one room.
    ///
    /// # Errors
    ///
    /// Returns [`HomeError::NotFound`] when `room_id` is unknown.
    pub fn get_status(&self, room_id: Option<RoomId>) -> Result<Vec<StatusEntry>, HomeError> {
        self.home.status(room_id)
    }

    /// Per-room and total energy with cost, as of the clock's "now".
    #[tracing::instrument(skip(self))]
    pub fn get_report(&self) -> EnergyReport {
        EnergyReport::compute(self.home.rooms(), &self.tariff, self.clock.now())
    }

    /// Top room, top device, and longest-active device, as of the clock's "now".
    #[tracing::instrument(skip(self))]
    pub fn get_trends(&self) -> Trends {
        Trends::compute(self.home.rooms(), self.clock.now())
    }

    /// Fire every timer due at or before `now` and return the firings that
    /// changed a device.
    ///
    /// A firing re-derives the device status from its ledger at the event
    /// instant. The ledger already holds the scheduled window, and a manual
    /// toggle has already closed or cut it short, so the ledger is never
    /// touched here.
    pub fn process_due_timers(&mut self, now: Timestamp) -> Vec<TimerFiring> {
        let mut fired = Vec::new();
        for event in self.timers.drain_due(now) {
            match self.home.device_mut(event.device_id) {
                Ok(device) => {
                    if device.sync_status(event.at) {
                        tracing::info!(
                            device = %device.name,
                            status = %device.status,
                            at = %event.at,
                            "timer fired"
                        );
                        fired.push(TimerFiring {
                            event,
                            status: device.status,
                        });
                    } else {
                        tracing::debug!(
                            device = %device.name,
                            action = ?event.action,
                            at = %event.at,
                            "timer left status unchanged"
                        );
                    }
                }
                Err(err) => {
                    tracing::warn!(%err, device_id = %event.device_id, "timer for unknown device dropped");
                }
            }
        }
        fired
    }

    /// Number of timer events still waiting.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Earliest pending timer instant.
    pub fn next_timer(&self) -> Option<Timestamp> {
        self.timers.next_due()
    }
}
