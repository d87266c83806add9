//! Scheduled timeline events

use crate::condition::kind::ConditionKind;
use crate::core::types::{EventId, SimSeconds};
use crate::physiology::quantity::Quantity;
use serde::{Deserialize, Serialize};

/// What a timeline event does when it fires
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum EventKind {
    /// Spawn a condition instance at the due time
    Spawn {
        kind: ConditionKind,
        severity: f64,
        /// Seconds until auto-resolution; `None` uses the kind's default
        /// (which may be indefinite)
        #[serde(default, skip_serializing_if = "Option::is_none")]
        duration: Option<SimSeconds>,
    },
    /// Begin resolving every live instance of the kind
    Resolve { kind: ConditionKind },
    /// Script a quantity directly, bypassing condition dynamics
    SetQuantity { quantity: Quantity, value: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledEvent {
    pub id: EventId,
    /// Simulation time at which the event fires
    pub due: SimSeconds,
    /// Insertion sequence number; breaks ties among same-time events so
    /// firing order matches scheduling order
    pub seq: u64,
    pub kind: EventKind,
}
