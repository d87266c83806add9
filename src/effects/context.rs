//! Read-only view handed to every effect module
//!
//! Modules are pure functions of this context; they hold no memory of
//! their own, so every contribution is reproducible from the snapshot.

use crate::condition::kind::ConditionKind;
use crate::condition::registry::ConditionRegistry;
use crate::core::types::SimSeconds;
use crate::physiology::quantity::Quantity;
use crate::physiology::state::StateStore;

pub struct EffectContext<'a> {
    pub state: &'a StateStore,
    pub conditions: &'a ConditionRegistry,
    pub now: SimSeconds,
}

impl<'a> EffectContext<'a> {
    pub fn value(&self, quantity: Quantity) -> f64 {
        self.state.get(quantity)
    }

    /// Summed lifecycle weight of a kind, capped at its stacking maximum
    pub fn kind_weight(&self, kind: ConditionKind) -> f64 {
        self.conditions.summed_weight(kind, self.now)
    }

    /// Lifecycle weight for modules that can also fire on state alone
    ///
    /// When an owning condition exists its weight scales the effect; when
    /// the trigger value was scripted directly (no condition tracked) the
    /// effect applies at full weight.
    pub fn kind_weight_or_full(&self, kind: ConditionKind) -> f64 {
        if self.conditions.has_kind(kind) {
            self.kind_weight(kind)
        } else {
            1.0
        }
    }

    /// Largest severity among live instances of a kind
    pub fn max_severity(&self, kind: ConditionKind) -> f64 {
        self.conditions
            .iter()
            .filter(|c| c.kind == kind)
            .map(|c| c.severity)
            .fold(0.0, f64::max)
    }
}
