//! # smarthome-domain
//!
//! Pure domain model for the smarthome simulator.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Rooms** (named containers of devices)
//! - Define **Devices** (power rating, on/off status, activation ledger)
//! - Define **Activation records** (one on → off interval, possibly still open)
//! - Resolve daily `HH:MM` schedules and queue their timer events
//! - Compute energy, cost, and trend statistics from the ledgers
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, the console, or IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod activation;
pub mod device;
pub mod home;
pub mod report;
pub mod room;
pub mod schedule;
pub mod tariff;
pub mod timer;
pub mod trends;
