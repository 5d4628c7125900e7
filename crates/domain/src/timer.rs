//! Timer queue: future activate/deactivate events for scheduled windows.
//!
//! Scheduling never blocks. Each window becomes two events that the caller
//! drains once their instant has passed, so any number of devices can have
//! pending windows at the same time.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};

use crate::device::DeviceStatus;
use crate::id::DeviceId;
use crate::schedule::ScheduledWindow;
use crate::time::Timestamp;

/// What a timer does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerAction {
    Activate,
    Deactivate,
}

/// A status transition due at `at` for `device_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerEvent {
    pub at: Timestamp,
    pub device_id: DeviceId,
    pub action: TimerAction,
}

/// A fired event that moved its device to `status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerFiring {
    pub event: TimerEvent,
    pub status: DeviceStatus,
}

#[derive(Debug, PartialEq, Eq)]
struct Entry {
    event: TimerEvent,
    seq: u64,
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.event
            .at
            .cmp(&other.event.at)
            .then(self.seq.cmp(&other.seq))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Min-ordered queue of pending timer events. Events due at the same
/// instant fire in submission order.
#[derive(Debug, Default)]
pub struct TimerQueue {
    heap: BinaryHeap<Reverse<Entry>>,
    next_seq: u64,
}

impl TimerQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: TimerEvent) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(Entry { event, seq }));
    }

    /// Queue the activate/deactivate pair for `window`, skipping instants
    /// that are not after `now`. Returns how many events were queued.
    pub fn schedule_window(
        &mut self,
        device_id: DeviceId,
        window: ScheduledWindow,
        now: Timestamp,
    ) -> usize {
        let mut queued = 0;
        for (at, action) in [
            (window.on, TimerAction::Activate),
            (window.off, TimerAction::Deactivate),
        ] {
            if at > now {
                self.push(TimerEvent {
                    at,
                    device_id,
                    action,
                });
                queued += 1;
            }
        }
        queued
    }

    /// Remove and return every event due at or before `now`, earliest first.
    pub fn drain_due(&mut self, now: Timestamp) -> Vec<TimerEvent> {
        let mut due = Vec::new();
        while let Some(Reverse(entry)) = self.heap.peek() {
            if entry.event.at > now {
                break;
            }
            if let Some(Reverse(entry)) = self.heap.pop() {
                due.push(entry.event);
            }
        }
        due
    }

    /// Earliest pending instant, if any.
    #[must_use]
    pub fn next_due(&self) -> Option<Timestamp> {
        self.heap.peek().map(|Reverse(entry)| entry.event.at)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn at(hour: u32, minute: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2024, 11, 12, hour, minute, 0).unwrap()
    }

    fn window(on: Timestamp, off: Timestamp) -> ScheduledWindow {
        ScheduledWindow { on, off }
    }

    #[test]
    fn should_queue_both_ends_of_future_window() {
        let mut queue = TimerQueue::new();
        let queued = queue.schedule_window(DeviceId::new(), window(at(10, 0), at(11, 0)), at(9, 0));
        assert_eq!(queued, 2);
        assert_eq!(queue.next_due(), Some(at(10, 0)));
    }

    #[test]
    fn should_skip_instants_already_passed() {
        let mut queue = TimerQueue::new();
        let queued = queue.schedule_window(DeviceId::new(), window(at(8, 0), at(11, 0)), at(9, 0));
        assert_eq!(queued, 1);
        assert_eq!(queue.next_due(), Some(at(11, 0)));

        let queued = queue.schedule_window(DeviceId::new(), window(at(6, 0), at(7, 0)), at(9, 0));
        assert_eq!(queued, 0);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn should_drain_only_due_events_in_time_order() {
        let mut queue = TimerQueue::new();
        let lamp = DeviceId::new();
        let fan = DeviceId::new();
        queue.schedule_window(lamp, window(at(10, 0), at(12, 0)), at(9, 0));
        queue.schedule_window(fan, window(at(9, 30), at(10, 30)), at(9, 0));

        let due = queue.drain_due(at(10, 30));
        let order: Vec<_> = due.iter().map(|e| (e.device_id, e.action)).collect();
        assert_eq!(
            order,
            [
                (fan, TimerAction::Activate),
                (lamp, TimerAction::Activate),
                (fan, TimerAction::Deactivate),
            ]
        );
        assert_eq!(queue.len(), 1);
        assert!(queue.drain_due(at(11, 0)).is_empty());
    }

    #[test]
    fn should_fire_simultaneous_events_in_submission_order() {
        let mut queue = TimerQueue::new();
        let first = DeviceId::new();
        let second = DeviceId::new();
        queue.schedule_window(first, window(at(10, 0), at(11, 0)), at(9, 0));
        queue.schedule_window(second, window(at(10, 0), at(11, 0)), at(9, 0));

        let due = queue.drain_due(at(10, 0));
        assert_eq!(due[0].device_id, first);
        assert_eq!(due[1].device_id, second);
    }

    #[test]
    fn should_start_empty() {
        let queue = TimerQueue::new();
        assert!(queue.is_empty());
        assert_eq!(queue.next_due(), None);
    }
}
