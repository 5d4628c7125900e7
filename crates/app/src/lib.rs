//! # smarthome-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** the outside world implements:
//!   - `Clock`: where "now" and the local timezone come from
//! - Define **driving/inbound ports** as use-case structs:
//!   - `HomeService`: rooms, devices, toggle, schedule, status, report,
//!     trends, and timer processing
//! - Orchestrate domain objects without knowing how the console reads input
//!   or renders output
//!
//! ## Dependency rule
//! Depends on `smarthome-domain` only (plus `chrono` for the clock port).
//! Never imports the binary crate. The console depends on *this* crate.

pub mod ports;
pub mod services;
