//! Scenario definitions
//!
//! A scenario is a named, seeded description of a casualty: initial state
//! overrides plus a timeline of spawn/resolve/script events. Scenarios are
//! TOML files authored by instructors; validation names the offending field
//! so a bad file fails loudly at load, never mid-session.

use crate::core::error::{Result, SimError};
use crate::core::types::SimSeconds;
use crate::physiology::quantity::Quantity;
use crate::scheduler::event::EventKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// One timeline entry: an action and when it fires
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    /// Seconds from scenario start
    pub time: SimSeconds,
    #[serde(flatten)]
    pub action: EventKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    /// Seed for the rhythm-risk generator; same seed, same session
    #[serde(default)]
    pub seed: u64,
    /// Initial quantity overrides applied before the first step
    #[serde(default)]
    pub initial: BTreeMap<Quantity, f64>,
    #[serde(default)]
    pub events: Vec<TimelineEvent>,
}

impl Scenario {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let scenario: Scenario = toml::from_str(text)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Check every field that could corrupt a session
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(SimError::scenario("name", "must not be empty"));
        }

        for (&quantity, &value) in &self.initial {
            let def = quantity.def();
            if !value.is_finite() {
                return Err(SimError::scenario(
                    format!("initial.{:?}", quantity),
                    "must be finite",
                ));
            }
            if value < def.min || value > def.max {
                return Err(SimError::scenario(
                    format!("initial.{:?}", quantity),
                    format!(
                        "{} outside valid range [{}, {}] {}",
                        value, def.min, def.max, def.unit
                    ),
                ));
            }
        }

        for (i, event) in self.events.iter().enumerate() {
            let field = |name: &str| format!("events[{}].{}", i, name);

            if !event.time.is_finite() || event.time < 0.0 {
                return Err(SimError::scenario(field("time"), "must be >= 0"));
            }

            match &event.action {
                EventKind::Spawn {
                    kind,
                    severity,
                    duration,
                } => {
                    kind.validate_severity(*severity)
                        .map_err(|reason| SimError::scenario(field("severity"), reason))?;
                    if let Some(duration) = duration {
                        if !duration.is_finite() || *duration <= 0.0 {
                            return Err(SimError::scenario(
                                field("duration"),
                                "must be positive",
                            ));
                        }
                    }
                }
                EventKind::Resolve { .. } => {}
                EventKind::SetQuantity { quantity, value } => {
                    let def = quantity.def();
                    if !value.is_finite() || *value < def.min || *value > def.max {
                        return Err(SimError::scenario(
                            field("value"),
                            format!(
                                "{} outside valid range [{}, {}] {}",
                                value, def.min, def.max, def.unit
                            ),
                        ));
                    }
                }
            }
        }

        Ok(())
    }
}
