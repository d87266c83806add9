//! Physiological state store
//!
//! Holds the current value of every tracked quantity and owns all mutation:
//! callers apply deltas or sets which are clamped to the declared range, and
//! the store runs the passive continuous processes (hemorrhage integration,
//! drug elimination, condition-directed drift) once per step, before any
//! effect rule is evaluated.

use crate::condition::registry::ConditionRegistry;
use crate::core::types::SimSeconds;
use crate::physiology::quantity::Quantity;
use serde::Serialize;

/// How a quantity is mutated
#[derive(Debug, Clone, Copy)]
pub enum Mutation {
    Add(f64),
    Set(f64),
}

/// Record of a mutation that had to be truncated to the valid range
///
/// Clamping never discards the mutation; the truncated value is applied and
/// this marker is handed back so the caller can log an audit event.
#[derive(Debug, Clone, Serialize)]
pub struct Clamped {
    pub quantity: Quantity,
    pub requested: f64,
    pub actual: f64,
    pub reason: String,
}

/// The continuous physiological state vector
#[derive(Debug, Clone, Serialize)]
pub struct StateStore {
    values: Vec<f64>,
}

/// Quantities that drift toward a condition-directed target, with the
/// bounded rate (units per second) at which they move. The same rate pulls
/// the value back toward baseline once no condition drives it.
const DRIFT_RATES: [(Quantity, f64); 5] = [
    (Quantity::ArterialO2, 0.5),
    (Quantity::SerumPotassium, 0.01),
    (Quantity::CoreTempC, 0.01),
    (Quantity::StressIndex, 0.01),
    (Quantity::Icp, 0.05),
];

impl StateStore {
    /// A store with every quantity at its healthy baseline
    pub fn at_baseline() -> Self {
        let values = Quantity::ALL.iter().map(|q| q.def().baseline).collect();
        Self { values }
    }

    pub fn get(&self, quantity: Quantity) -> f64 {
        self.values[quantity.index()]
    }

    /// Fraction of blood volume lost, 0.0 (none) to 1.0 (exsanguinated)
    pub fn blood_loss_fraction(&self) -> f64 {
        (1.0 - self.get(Quantity::BloodVolumePct) / 100.0).clamp(0.0, 1.0)
    }

    /// Apply a mutation, clamped to the quantity's declared range
    ///
    /// Returns `Some(Clamped)` when the requested value left the range and
    /// was truncated.
    pub fn apply(&mut self, quantity: Quantity, mutation: Mutation, reason: &str) -> Option<Clamped> {
        let def = quantity.def();
        let requested = match mutation {
            Mutation::Add(delta) => self.values[quantity.index()] + delta,
            Mutation::Set(value) => value,
        };
        let actual = requested.clamp(def.min, def.max);
        self.values[quantity.index()] = actual;

        if (actual - requested).abs() > f64::EPSILON {
            Some(Clamped {
                quantity,
                requested,
                actual,
                reason: reason.to_string(),
            })
        } else {
            None
        }
    }

    /// Run the passive continuous processes for one step of `dt` seconds
    ///
    /// Order: hemorrhage integration, then drug elimination, then drift.
    /// Runs before rule evaluation each step so modules see settled values.
    pub fn passive_update(
        &mut self,
        conditions: &ConditionRegistry,
        now: SimSeconds,
        dt: f64,
    ) -> Vec<Clamped> {
        let mut clamps = Vec::new();

        self.integrate_hemorrhage(conditions, now, dt, &mut clamps);
        self.eliminate_drugs(dt, &mut clamps);
        self.drift_toward_targets(conditions, now, dt, &mut clamps);

        clamps
    }

    /// Ongoing hemorrhage decrements blood volume; severity is percent
    /// points of total volume lost per minute at full lifecycle weight.
    fn integrate_hemorrhage(
        &mut self,
        conditions: &ConditionRegistry,
        now: SimSeconds,
        dt: f64,
        clamps: &mut Vec<Clamped>,
    ) {
        let pct_per_min: f64 = conditions
            .iter()
            .filter(|c| c.kind == crate::condition::kind::ConditionKind::Hemorrhage)
            .map(|c| c.severity * c.weight(now))
            .sum();

        if pct_per_min > 0.0 {
            let delta = -pct_per_min * dt / 60.0;
            clamps.extend(self.apply(Quantity::BloodVolumePct, Mutation::Add(delta), "hemorrhage"));
        }
    }

    /// Drug effect-site levels decay exponentially toward zero
    fn eliminate_drugs(&mut self, dt: f64, clamps: &mut Vec<Clamped>) {
        for q in Quantity::ALL {
            if let Some(half_life) = q.elimination_half_life() {
                let level = self.get(q);
                if level > 0.0 {
                    let decayed = level * 0.5_f64.powf(dt / half_life);
                    clamps.extend(self.apply(q, Mutation::Set(decayed), "elimination"));
                }
            }
        }
    }

    /// Respiratory/metabolic quantities drift at a bounded rate toward the
    /// target declared by the strongest driving condition, and back toward
    /// baseline once nothing drives them.
    fn drift_toward_targets(
        &mut self,
        conditions: &ConditionRegistry,
        now: SimSeconds,
        dt: f64,
        clamps: &mut Vec<Clamped>,
    ) {
        for (quantity, rate) in DRIFT_RATES {
            let baseline = quantity.def().baseline;

            // Strongest driver wins; its weight pulls the effective target
            // out from baseline, so a resolving condition releases its grip
            // gradually rather than snapping back.
            let mut target = baseline;
            let mut best_weight = 0.0;
            for cond in conditions.iter() {
                if let Some(drift) = cond.kind.drift(cond.severity) {
                    if drift.quantity == quantity {
                        let weight = cond.weight(now);
                        if weight > best_weight {
                            best_weight = weight;
                            target = baseline + weight * (drift.target - baseline);
                        }
                    }
                }
            }

            let current = self.get(quantity);
            let gap = target - current;
            if gap.abs() < 1e-12 {
                continue;
            }
            let step = gap.clamp(-rate * dt, rate * dt);
            clamps.extend(self.apply(quantity, Mutation::Add(step), "drift"));
        }
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::at_baseline()
    }
}
