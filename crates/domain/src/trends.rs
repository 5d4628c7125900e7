//! Trends: arg-max statistics over rooms and devices.
//!
//! Every trend keeps the first candidate with the strictly largest value,
//! so ties go to the earliest room or device in insertion order. A
//! candidate with zero consumption still wins when nothing beats it; a
//! trend is only empty when there is nothing to rank.

use serde::{Deserialize, Serialize};

use crate::device::Device;
use crate::id::{DeviceId, RoomId};
use crate::room::Room;
use crate::time::{SECONDS_PER_HOUR, Timestamp};

/// A device qualified by the room that owns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRef {
    pub room_id: RoomId,
    pub room: String,
    pub device_id: DeviceId,
    pub device: String,
}

impl DeviceRef {
    fn new(room: &Room, device: &Device) -> Self {
        Self {
            room_id: room.id,
            room: room.name.clone(),
            device_id: device.id,
            device: device.name.clone(),
        }
    }
}

impl std::fmt::Display for DeviceRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} in {}", self.device, self.room)
    }
}

/// Room with the highest summed device energy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopRoom {
    pub room_id: RoomId,
    pub room: String,
    pub energy_kwh: f64,
}

/// Device with the highest individual energy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopDevice {
    #[serde(flatten)]
    pub device: DeviceRef,
    pub energy_kwh: f64,
}

/// Device with the longest summed on-time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LongestActive {
    #[serde(flatten)]
    pub device: DeviceRef,
    pub active_hours: f64,
}

/// The three trend statistics; `None` means "no data".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trends {
    pub top_room: Option<TopRoom>,
    pub top_device: Option<TopDevice>,
    pub longest_active_device: Option<LongestActive>,
}

impl Trends {
    /// Rank every room and device as of `now`.
    #[must_use]
    pub fn compute(rooms: &[Room], now: Timestamp) -> Self {
        let top_room = arg_max(rooms.iter().map(|room| (room, room.energy_consumed(now)))).map(
            |(room, energy_kwh)| TopRoom {
                room_id: room.id,
                room: room.name.clone(),
                energy_kwh,
            },
        );

        let devices = || {
            rooms
                .iter()
                .flat_map(|room| room.devices.iter().map(move |device| (room, device)))
        };

        let top_device = arg_max(devices().map(|(room, device)| {
            ((room, device), device.energy_consumed(now))
        }))
        .map(|((room, device), energy_kwh)| TopDevice {
            device: DeviceRef::new(room, device),
            energy_kwh,
        });

        let longest_active_device = arg_max(devices().map(|(room, device)| {
            ((room, device), device.total_active_time(now))
        }))
        .map(|((room, device), seconds)| LongestActive {
            device: DeviceRef::new(room, device),
            active_hours: seconds / SECONDS_PER_HOUR,
        });

        Self {
            top_room,
            top_device,
            longest_active_device,
        }
    }
}

/// First candidate with the strictly largest value.
fn arg_max<T>(candidates: impl IntoIterator<Item = (T, f64)>) -> Option<(T, f64)> {
    candidates
        .into_iter()
        .fold(None, |best, (item, value)| match best {
            Some((_, top)) if value <= top => best,
            _ => Some((item, value)),
        })
}
