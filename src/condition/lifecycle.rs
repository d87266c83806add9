//! Condition lifecycle state machine
//!
//! Pending -> Onset -> Active -> Resolving -> Resolved, driven purely by
//! time. The weight curve is evaluated analytically from elapsed time, so
//! a condition's influence is identical regardless of step size.

use crate::condition::kind::{ConditionKind, DecayCurve, TimingProfile};
use crate::core::types::{ConditionId, SimSeconds};
use serde::Serialize;

/// Lifecycle phase of a condition instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    Pending,
    Onset,
    Active,
    Resolving,
    Resolved,
}

impl Phase {
    /// Phases only ever move forward; regression is an engine bug
    pub fn rank(self) -> u8 {
        match self {
            Phase::Pending => 0,
            Phase::Onset => 1,
            Phase::Active => 2,
            Phase::Resolving => 3,
            Phase::Resolved => 4,
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Pending => "Pending",
            Phase::Onset => "Onset",
            Phase::Active => "Active",
            Phase::Resolving => "Resolving",
            Phase::Resolved => "Resolved",
        };
        write!(f, "{}", name)
    }
}

/// An active injury, stressor, or intervention instance
#[derive(Debug, Clone, Serialize)]
pub struct Condition {
    pub id: ConditionId,
    pub kind: ConditionKind,
    pub severity: f64,
    pub onset_at: SimSeconds,
    /// When resolution begins; None until a resolution event fires or a
    /// declared duration expires
    pub resolve_at: Option<SimSeconds>,
    pub phase: Phase,
    #[serde(skip)]
    timing: TimingProfile,
}

impl Condition {
    pub fn new(kind: ConditionKind, severity: f64, onset_at: SimSeconds) -> Self {
        Self {
            id: ConditionId::new(),
            kind,
            severity,
            onset_at,
            resolve_at: kind.default_duration().map(|d| onset_at + d),
            phase: Phase::Pending,
            timing: kind.timing(),
        }
    }

    /// Override the kind's timing table (used for scenario tuning and tests)
    pub fn with_timing(mut self, timing: TimingProfile) -> Self {
        self.timing = timing;
        self
    }

    /// Preset the resolution time, e.g. from a scenario-declared duration
    pub fn with_resolution(mut self, at: SimSeconds) -> Self {
        self.resolve_at = Some(at);
        self
    }

    pub fn timing(&self) -> &TimingProfile {
        &self.timing
    }

    /// Begin resolving now, unless resolution is already underway sooner
    pub fn resolve(&mut self, now: SimSeconds) {
        match self.resolve_at {
            Some(at) if at <= now => {}
            _ => self.resolve_at = Some(now),
        }
    }

    /// Time-varying influence multiplier in [0, 1] (times stacking cap)
    ///
    /// Linear ramp over the onset time-constant, constant at full weight
    /// while active, analytic decay once resolution begins. The ramp is
    /// frozen at the resolution instant so a condition resolved mid-onset
    /// decays from wherever it got to.
    pub fn weight(&self, now: SimSeconds) -> f64 {
        if now < self.onset_at {
            return 0.0;
        }

        let ramp_until = match self.resolve_at {
            Some(at) => now.min(at),
            None => now,
        };
        let ramp = if self.timing.onset_tc <= 0.0 {
            1.0
        } else {
            ((ramp_until - self.onset_at) / self.timing.onset_tc).clamp(0.0, 1.0)
        };

        let decay = match self.resolve_at {
            Some(at) if now > at => match self.timing.decay {
                DecayCurve::Exponential { half_life } => 0.5_f64.powf((now - at) / half_life),
                DecayCurve::Linear { duration } => (1.0 - (now - at) / duration).max(0.0),
            },
            _ => 1.0,
        };

        ramp * decay
    }

    /// Phase this condition should be in at `now`
    pub fn phase_for(&self, now: SimSeconds, epsilon: f64) -> Phase {
        if now < self.onset_at {
            return Phase::Pending;
        }
        if let Some(at) = self.resolve_at {
            if now >= at {
                return if self.weight(now) <= epsilon {
                    Phase::Resolved
                } else {
                    Phase::Resolving
                };
            }
        }
        let ramp_done = self.timing.onset_tc <= 0.0
            || now - self.onset_at >= self.timing.onset_tc;
        if ramp_done {
            Phase::Active
        } else {
            Phase::Onset
        }
    }

    /// Advance the stored phase to match `now`
    ///
    /// Returns the transition if one occurred, or an error message if the
    /// computed phase would regress.
    pub fn advance(&mut self, now: SimSeconds, epsilon: f64) -> Result<Option<(Phase, Phase)>, String> {
        let next = self.phase_for(now, epsilon);
        if next.rank() < self.phase.rank() {
            return Err(format!(
                "{} phase regressed {} -> {} at t={:.1}s",
                self.kind.label(),
                self.phase,
                next,
                now
            ));
        }
        if next == self.phase {
            return Ok(None);
        }
        let prev = self.phase;
        self.phase = next;
        Ok(Some((prev, next)))
    }
}
