//! Clock port: the source of "now" and of the local timezone.

use std::cell::Cell;
use std::rc::Rc;

use chrono::{Local, TimeDelta, TimeZone, Utc};
use smarthome_domain::time::{self, Timestamp};

/// Supplies the current instant and the zone `HH:MM` schedules resolve in.
pub trait Clock {
    /// Zone used to pin daily schedules to "today".
    type Zone: TimeZone;

    fn now(&self) -> Timestamp;

    fn zone(&self) -> Self::Zone;
}

/// Wall clock in the process-local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    type Zone = Local;

    fn now(&self) -> Timestamp {
        time::now()
    }

    fn zone(&self) -> Local {
        Local
    }
}

/// Hand-driven clock in UTC. Clones share the same instant, so a caller
/// can keep a handle and move time forward under a service that owns
/// another clone.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<Timestamp>>,
}

impl ManualClock {
    #[must_use]
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
        }
    }

    pub fn set(&self, at: Timestamp) {
        self.now.set(at);
    }

    pub fn advance(&self, by: TimeDelta) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    type Zone = Utc;

    fn now(&self) -> Timestamp {
        self.now.get()
    }

    fn zone(&self) -> Utc {
        Utc
    }
}
