//! Registry of live condition instances
//!
//! Conditions enter when the scheduler fires a spawn event, advance their
//! lifecycle once per step, and leave once their residual weight decays
//! below the removal epsilon. Multiple instances of one kind coexist; their
//! weights sum, capped at the kind's declared maximum.

use crate::condition::kind::ConditionKind;
use crate::condition::lifecycle::{Condition, Phase};
use crate::core::types::{ConditionId, SimSeconds};

#[derive(Debug, Clone)]
pub struct ConditionRegistry {
    conditions: Vec<Condition>,
    epsilon: f64,
}

impl ConditionRegistry {
    pub fn new(epsilon: f64) -> Self {
        Self {
            conditions: Vec::new(),
            epsilon,
        }
    }

    pub fn spawn(&mut self, condition: Condition) -> ConditionId {
        let id = condition.id;
        self.conditions.push(condition);
        id
    }

    /// Begin resolving every instance of `kind` that is not already on its
    /// way out. Returns how many were marked.
    pub fn resolve_kind(&mut self, kind: ConditionKind, now: SimSeconds) -> usize {
        let mut marked = 0;
        for cond in self.conditions.iter_mut().filter(|c| c.kind == kind) {
            match cond.resolve_at {
                Some(at) if at <= now => {}
                _ => {
                    cond.resolve(now);
                    marked += 1;
                }
            }
        }
        marked
    }

    /// Advance every condition's phase to `now`, collect human-readable
    /// annotations for transitions, and drop resolved instances.
    pub fn advance(&mut self, now: SimSeconds) -> Result<Vec<String>, String> {
        let mut annotations = Vec::new();
        for cond in self.conditions.iter_mut() {
            if let Some((_, next)) = cond.advance(now, self.epsilon)? {
                let note = match next {
                    Phase::Resolved => {
                        format!("{} resolved at t={:.1}s", cond.kind.label(), now)
                    }
                    _ => format!(
                        "{} entered {} phase at t={:.1}s",
                        cond.kind.label(),
                        next,
                        now
                    ),
                };
                annotations.push(note);
            }
        }
        self.conditions.retain(|c| c.phase != Phase::Resolved);
        Ok(annotations)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Condition> {
        self.conditions.iter()
    }

    pub fn get(&self, id: ConditionId) -> Option<&Condition> {
        self.conditions.iter().find(|c| c.id == id)
    }

    /// Summed lifecycle weight of all instances of `kind`, capped at the
    /// kind's stacking maximum
    pub fn summed_weight(&self, kind: ConditionKind, now: SimSeconds) -> f64 {
        let cap = kind.timing().stack_cap;
        let sum: f64 = self
            .conditions
            .iter()
            .filter(|c| c.kind == kind)
            .map(|c| c.weight(now))
            .sum();
        sum.min(cap)
    }

    /// Whether any instance of `kind` is contributing weight, or tracked at all
    pub fn has_kind(&self, kind: ConditionKind) -> bool {
        self.conditions.iter().any(|c| c.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Distinct kinds currently tracked, in insertion order
    pub fn kinds(&self) -> Vec<ConditionKind> {
        let mut kinds = Vec::new();
        for cond in &self.conditions {
            if !kinds.contains(&cond.kind) {
                kinds.push(cond.kind);
            }
        }
        kinds
    }
}
