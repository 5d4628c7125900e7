//! Home: the session-wide aggregate owning every room.
//!
//! Rooms own their devices and devices own their ledgers, so every lookup
//! walks down from here. There are no back references.

use serde::{Deserialize, Serialize};

use crate::device::{Device, DeviceStatus};
use crate::error::{HomeError, NotFoundError, ValidationError};
use crate::id::{DeviceId, RoomId};
use crate::room::{Room, device_not_found};

/// One line of a status listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEntry {
    pub room_id: RoomId,
    pub room: String,
    pub device_id: DeviceId,
    pub device: String,
    pub status: DeviceStatus,
}

/// All rooms of the session, in insertion order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Home {
    rooms: Vec<Room>,
}

impl Home {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Append a validated room.
    ///
    /// # Errors
    ///
    /// Returns [`HomeError::InvalidValue`] if the room fails validation.
    pub fn add_room(&mut self, room: Room) -> Result<RoomId, HomeError> {
        room.validate()?;
        let id = room.id;
        self.rooms.push(room);
        Ok(id)
    }

    /// Create one room per name, all or nothing.
    ///
    /// # Errors
    ///
    /// Returns [`HomeError::InvalidValue`] when `names` is empty or any name
    /// is blank; no room is added in that case.
    pub fn add_rooms<I, S>(&mut self, names: I) -> Result<Vec<RoomId>, HomeError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let rooms = names
            .into_iter()
            .map(|name| Room::builder().name(name).build())
            .collect::<Result<Vec<_>, _>>()?;
        if rooms.is_empty() {
            return Err(ValidationError::ZeroCount.into());
        }
        let ids = rooms.iter().map(|r| r.id).collect();
        self.rooms.extend(rooms);
        Ok(ids)
    }

    /// Look up a room by id.
    ///
    /// # Errors
    ///
    /// Returns [`HomeError::NotFound`] when no room with `id` exists.
    pub fn room(&self, id: RoomId) -> Result<&Room, HomeError> {
        self.rooms
            .iter()
            .find(|r| r.id == id)
            .ok_or_else(|| room_not_found(id))
    }

    /// Mutable variant of [`room`](Self::room).
    ///
    /// # Errors
    ///
    /// Returns [`HomeError::NotFound`] when no room with `id` exists.
    pub fn room_mut(&mut self, id: RoomId) -> Result<&mut Room, HomeError> {
        self.rooms
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| room_not_found(id))
    }

    /// Validate `device` and append it to the room `room_id`.
    ///
    /// # Errors
    ///
    /// Returns [`HomeError::NotFound`] for an unknown room, or
    /// [`HomeError::InvalidValue`] if the device fails validation.
    pub fn add_device(&mut self, room_id: RoomId, device: Device) -> Result<DeviceId, HomeError> {
        device.validate()?;
        Ok(self.room_mut(room_id)?.add_device(device))
    }

    /// Find a device anywhere in the home, along with its room.
    ///
    /// # Errors
    ///
    /// Returns [`HomeError::NotFound`] when no room holds `id`.
    pub fn device(&self, id: DeviceId) -> Result<(&Room, &Device), HomeError> {
        self.rooms
            .iter()
            .find_map(|room| room.device(id).map(|device| (room, device)))
            .ok_or_else(|| device_not_found(id))
    }

    /// Mutable device lookup across all rooms.
    ///
    /// # Errors
    ///
    /// Returns [`HomeError::NotFound`] when no room holds `id`.
    pub fn device_mut(&mut self, id: DeviceId) -> Result<&mut Device, HomeError> {
        self.rooms
            .iter_mut()
            .find_map(|room| room.devices.iter_mut().find(|d| d.id == id))
            .ok_or_else(|| device_not_found(id))
    }

    /// Status of every device, room by room, or of a single room.
    ///
    /// # Errors
    ///
    /// Returns [`HomeError::NotFound`] when `room` names an unknown room.
    pub fn status(&self, room: Option<RoomId>) -> Result<Vec<StatusEntry>, HomeError> {
        let rooms = match room {
            Some(id) => std::slice::from_ref(self.room(id)?),
            None => self.rooms.as_slice(),
        };
        Ok(rooms
            .iter()
            .flat_map(|room| {
                room.devices.iter().map(move |device| StatusEntry {
                    room_id: room.id,
                    room: room.name.clone(),
                    device_id: device.id,
                    device: device.name.clone(),
                    status: device.status,
                })
            })
            .collect())
    }
}

fn room_not_found(id: RoomId) -> HomeError {
    NotFoundError {
        entity: "Room",
        id: id.to_string(),
    }
    .into()
}
