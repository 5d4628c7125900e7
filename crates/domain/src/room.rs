//! Room: a named container of devices.

use serde::{Deserialize, Serialize};

use crate::device::Device;
use crate::error::{HomeError, NotFoundError, ValidationError};
use crate::id::{DeviceId, RoomId};
use crate::time::{Timestamp, sum_positive_zero};

/// A room owning an ordered list of devices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    pub devices: Vec<Device>,
}

impl Room {
    /// Create a builder for constructing a [`Room`].
    #[must_use]
    pub fn builder() -> RoomBuilder {
        RoomBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`HomeError::InvalidValue`] when `name` is empty.
    pub fn validate(&self) -> Result<(), HomeError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        Ok(())
    }

    /// Append a device, keeping insertion order.
    pub fn add_device(&mut self, device: Device) -> DeviceId {
        let id = device.id;
        self.devices.push(device);
        id
    }

    #[must_use]
    pub fn device(&self, id: DeviceId) -> Option<&Device> {
        self.devices.iter().find(|d| d.id == id)
    }

    /// Mutable lookup, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`HomeError::NotFound`] when no device with `id` lives here.
    pub fn device_mut(&mut self, id: DeviceId) -> Result<&mut Device, HomeError> {
        self.devices
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| device_not_found(id))
    }

    /// Summed energy of every device in the room, in kWh, as of `now`.
    #[must_use]
    pub fn energy_consumed(&self, now: Timestamp) -> f64 {
        sum_positive_zero(self.devices.iter().map(|d| d.energy_consumed(now)))
    }
}

pub(crate) fn device_not_found(id: DeviceId) -> HomeError {
    NotFoundError {
        entity: "Device",
        id: id.to_string(),
    }
    .into()
}

/// Step-by-step builder for [`Room`].
#[derive(Debug, Default)]
pub struct RoomBuilder {
    name: Option<String>,
}

impl RoomBuilder {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Consume the builder, validate, and return an empty [`Room`].
    ///
    /// # Errors
    ///
    /// Returns [`HomeError::InvalidValue`] if `name` is missing or empty.
    pub fn build(self) -> Result<Room, HomeError> {
        let room = Room {
            id: RoomId::new(),
            name: self.name.unwrap_or_default(),
            devices: Vec::new(),
        };
        room.validate()?;
        Ok(room)
    }
}
