//! Audit trail of degraded-mode events
//!
//! Clamps and coverage gaps are not errors: the step completes with the
//! truncated value or the inert condition, and the incident is recorded
//! here and surfaced through the tracing subscriber. Instructors reviewing
//! a session read this log to see where a scenario pushed past the model.

use crate::condition::kind::ConditionKind;
use crate::compositor::CompositeClamp;
use crate::core::types::SimSeconds;
use crate::physiology::state::Clamped;
use tracing::warn;

#[derive(Debug, Clone)]
pub enum AuditEvent {
    /// A state mutation was truncated to the quantity's declared range
    StateClamped(Clamped),
    /// A composed parameter was truncated to its physiologic range
    CompositeClamped(CompositeClamp),
    /// A tracked condition kind has no owning effect module
    UncoveredCondition { kind: ConditionKind },
}

#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub time: SimSeconds,
    pub event: AuditEvent,
}

/// Bounded in-memory audit log; oldest entries fall off first
pub struct AuditLog {
    entries: Vec<AuditEntry>,
    capacity: usize,
}

impl AuditLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity,
        }
    }

    pub fn record(&mut self, time: SimSeconds, event: AuditEvent) {
        match &event {
            AuditEvent::StateClamped(clamp) => warn!(
                time,
                quantity = ?clamp.quantity,
                requested = clamp.requested,
                actual = clamp.actual,
                reason = %clamp.reason,
                "state mutation clamped"
            ),
            AuditEvent::CompositeClamped(clamp) => warn!(
                time,
                param = clamp.param,
                requested = clamp.requested,
                actual = clamp.actual,
                "composed parameter clamped"
            ),
            AuditEvent::UncoveredCondition { kind } => warn!(
                time,
                kind = kind.label(),
                "condition has no owning effect module"
            ),
        }

        if self.entries.len() == self.capacity {
            self.entries.remove(0);
        }
        self.entries.push(AuditEntry { time, event });
    }

    pub fn entries(&self) -> &[AuditEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
