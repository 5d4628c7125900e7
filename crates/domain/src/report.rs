//! Energy report: per-room and total consumption, priced by a [`Tariff`].

use serde::{Deserialize, Serialize};

use crate::id::RoomId;
use crate::room::Room;
use crate::tariff::Tariff;
use crate::time::{Timestamp, sum_positive_zero};

/// Energy consumed by one room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomEnergy {
    pub room_id: RoomId,
    pub room: String,
    pub energy_kwh: f64,
}

/// Consumption snapshot of the whole home as of `generated_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyReport {
    /// One entry per room, in room insertion order.
    pub rooms: Vec<RoomEnergy>,
    pub total_energy_kwh: f64,
    pub total_cost: f64,
    pub currency: String,
    pub generated_at: Timestamp,
}

impl EnergyReport {
    /// Walk every room and device and price the total.
    ///
    /// Open records are charged up to `now`, so two reports taken at
    /// different instants differ while any device is running.
    #[must_use]
    pub fn compute(rooms: &[Room], tariff: &Tariff, now: Timestamp) -> Self {
        let rooms: Vec<RoomEnergy> = rooms
            .iter()
            .map(|room| RoomEnergy {
                room_id: room.id,
                room: room.name.clone(),
                energy_kwh: room.energy_consumed(now),
            })
            .collect();
        let total_energy_kwh = sum_positive_zero(rooms.iter().map(|r| r.energy_kwh));
        Self {
            rooms,
            total_energy_kwh,
            total_cost: tariff.cost(total_energy_kwh),
            currency: tariff.currency.clone(),
            generated_at: now,
        }
    }
}
