//! Event scheduler
//!
//! A sorted queue of future timeline events. Events fire when the clock
//! reaches their due time, in (due, seq) order, so two events scheduled for
//! the same instant fire in the order they were scheduled. The scheduler
//! never looks at wall time; it only compares against the simulation clock
//! it is handed.

pub mod event;

use crate::core::types::{EventId, SimSeconds};
use event::{EventKind, ScheduledEvent};

pub struct EventScheduler {
    /// Pending events kept sorted by (due, seq) ascending
    queue: Vec<ScheduledEvent>,
    next_seq: u64,
    /// Highest time ever passed to `tick`
    high_water: SimSeconds,
}

impl EventScheduler {
    pub fn new() -> Self {
        Self {
            queue: Vec::new(),
            next_seq: 0,
            high_water: 0.0,
        }
    }

    /// Queue an event; returns its id for later cancellation.
    ///
    /// Scheduling into the past is accepted: the event fires on the next
    /// tick, which keeps interactively injected "now" events simple.
    pub fn schedule(&mut self, due: SimSeconds, kind: EventKind) -> EventId {
        let event = ScheduledEvent {
            id: EventId::new(),
            due,
            seq: self.next_seq,
            kind,
        };
        self.next_seq += 1;
        let id = event.id;

        let at = self
            .queue
            .partition_point(|e| (e.due, e.seq) <= (event.due, event.seq));
        self.queue.insert(at, event);
        id
    }

    /// Remove a not-yet-fired event. Returns false if the id is unknown
    /// (already fired, cancelled, or never scheduled).
    pub fn cancel(&mut self, id: EventId) -> bool {
        let before = self.queue.len();
        self.queue.retain(|e| e.id != id);
        self.queue.len() != before
    }

    /// Drain every event due at or before `now`, in firing order.
    ///
    /// Time must not run backwards between ticks; a rewound clock would
    /// silently skip events, so it is rejected loudly instead.
    pub fn tick(&mut self, now: SimSeconds) -> Result<Vec<ScheduledEvent>, String> {
        if now < self.high_water {
            return Err(format!(
                "scheduler ticked backwards: {:.3}s after {:.3}s",
                now, self.high_water
            ));
        }
        self.high_water = now;

        let split = self.queue.partition_point(|e| e.due <= now);
        Ok(self.queue.drain(..split).collect())
    }

    pub fn pending(&self) -> &[ScheduledEvent] {
        &self.queue
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl Default for EventScheduler {
    fn default() -> Self {
        Self::new()
    }
}
