//! Port definitions: traits that the outside world implements.
//!
//! Ports are the boundaries between the application core and its
//! environment. They are defined here (in `app`) so that use-cases and the
//! composition root can both depend on them.

pub mod clock;

pub use clock::{Clock, ManualClock, SystemClock};
