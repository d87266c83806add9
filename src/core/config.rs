//! Engine configuration with documented constants
//!
//! All tunable numbers for the step loop and the compositor are collected
//! here with explanations of their purpose and how they interact.

use crate::effects::contribution::VoteClass;

/// Configuration for the simulation engine
///
/// These values have been tuned so that onset/decay curves stay numerically
/// stable and composed targets stay inside physiologic bounds.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    // === STEP LOOP ===
    /// Maximum simulated seconds a single step may advance
    ///
    /// Larger external frame intervals are subdivided into substeps of at
    /// most this size. Onset ramps and drift rates assume steps no coarser
    /// than this; 0.1 s keeps every curve well-resolved.
    pub max_step_dt: f64,

    /// Weight below which a resolving condition counts as resolved
    ///
    /// At 0.01 of peak, an exponentially decaying condition is removed
    /// after roughly seven half-lives. Lowering this keeps near-dead
    /// conditions in the registry longer without visible effect.
    pub resolve_epsilon: f64,

    // === RATE CLAMPS ===
    /// Lowest heart-rate target the compositor will emit (bpm)
    pub hr_floor: f64,

    /// Highest heart-rate target the compositor will emit (bpm)
    ///
    /// 250 bpm is the upper bound of what a perfusing human rhythm can
    /// reach; anything faster is expressed as an arrhythmia mode instead.
    pub hr_ceiling: f64,

    // === AMPLITUDE CLAMPS ===
    /// Lowest composite wave-amplitude scale factor
    pub amplitude_floor: f64,

    /// Highest composite wave-amplitude scale factor
    pub amplitude_ceiling: f64,

    // === MORPHOLOGY PRECEDENCE ===
    /// Tie-break order for conflicting categorical votes, highest first
    ///
    /// When two morphology tags tie on total vote weight, the tag carried
    /// by the class earlier in this list wins. Shipped order:
    /// life-threatening arrhythmia > electrolyte-driven morphology >
    /// ischemic morphology > structural/injury morphology > baseline.
    /// Clinical literature gives no single canonical ordering, so this is
    /// data rather than code; callers may reorder it.
    pub precedence: [VoteClass; 5],
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_step_dt: 0.1,
            resolve_epsilon: 0.01,
            hr_floor: 20.0,
            hr_ceiling: 250.0,
            amplitude_floor: 0.05,
            amplitude_ceiling: 5.0,
            precedence: [
                VoteClass::LifeThreat,
                VoteClass::Electrolyte,
                VoteClass::Ischemic,
                VoteClass::Structural,
                VoteClass::Baseline,
            ],
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<(), String> {
        if !(self.max_step_dt > 0.0 && self.max_step_dt <= 0.5) {
            return Err(format!(
                "max_step_dt ({}) must be in (0, 0.5] seconds",
                self.max_step_dt
            ));
        }

        if !(self.resolve_epsilon > 0.0 && self.resolve_epsilon < 0.1) {
            return Err(format!(
                "resolve_epsilon ({}) must be in (0, 0.1)",
                self.resolve_epsilon
            ));
        }

        if self.hr_floor >= self.hr_ceiling {
            return Err(format!(
                "hr_floor ({}) must be < hr_ceiling ({})",
                self.hr_floor, self.hr_ceiling
            ));
        }

        if self.amplitude_floor >= self.amplitude_ceiling || self.amplitude_floor <= 0.0 {
            return Err(format!(
                "amplitude clamp [{}, {}] is not a positive range",
                self.amplitude_floor, self.amplitude_ceiling
            ));
        }

        // Every vote class must appear exactly once
        for class in VoteClass::ALL {
            let count = self.precedence.iter().filter(|c| **c == class).count();
            if count != 1 {
                return Err(format!(
                    "precedence must list {:?} exactly once (found {})",
                    class, count
                ));
            }
        }

        Ok(())
    }

    /// Precedence rank of a vote class: 0 is highest priority
    pub fn precedence_rank(&self, class: VoteClass) -> usize {
        self.precedence
            .iter()
            .position(|c| *c == class)
            .unwrap_or(self.precedence.len())
    }
}
