//! Effect rule engine
//!
//! One module per physiological/pathological/pharmacological mechanism.
//! Each declares a trigger predicate over state and active conditions, maps
//! its input to a raw magnitude through piecewise-linear clinical
//! breakpoints, scales by the owning condition's lifecycle weight, and
//! clamps its own output. The registry is a fixed table; evaluation order
//! is the table order and never affects composed results.

pub mod blast;
pub mod cardiac;
pub mod context;
pub mod contribution;
pub mod drugs;
pub mod electrolytes;
pub mod hemorrhage;
pub mod pneumothorax;
pub mod respiratory;
pub mod stress;
pub mod tbi;
pub mod thermal;

pub use context::EffectContext;
pub use contribution::EffectContribution;

use crate::condition::kind::ConditionKind;
use crate::condition::registry::ConditionRegistry;

/// A single effect mechanism
pub trait EffectModule {
    fn name(&self) -> &'static str;

    /// Condition kinds whose effects this module is responsible for.
    /// Purely state-triggered mechanisms may still list the kinds that
    /// drive their trigger value.
    fn covers(&self) -> &'static [ConditionKind] {
        &[]
    }

    /// Whether this module fires for the given context
    fn triggered(&self, ctx: &EffectContext<'_>) -> bool;

    /// Push this module's contributions for the current step
    fn contribute(&self, ctx: &EffectContext<'_>, out: &mut Vec<EffectContribution>);
}

/// The standard mechanism table
pub fn standard_modules() -> Vec<Box<dyn EffectModule>> {
    vec![
        Box::new(hemorrhage::HemorrhagicShock),
        Box::new(pneumothorax::TensionPneumo),
        Box::new(cardiac::BluntCardiac),
        Box::new(tbi::RaisedIcp),
        Box::new(blast::BlastEmbolism),
        Box::new(electrolytes::Hyperkalemia),
        Box::new(electrolytes::Hypocalcemia),
        Box::new(electrolytes::Hypomagnesemia),
        Box::new(thermal::Hypothermia),
        Box::new(respiratory::AcidBase),
        Box::new(respiratory::Hypoxia),
        Box::new(respiratory::Hypercapnia),
        Box::new(stress::StressHormones),
        Box::new(drugs::DrugEffect::ketamine()),
        Box::new(drugs::DrugEffect::morphine()),
        Box::new(drugs::DrugEffect::atropine()),
        Box::new(drugs::DrugEffect::epinephrine()),
    ]
}

/// Evaluate every triggered module against the context
pub fn evaluate_all(
    modules: &[Box<dyn EffectModule>],
    ctx: &EffectContext<'_>,
    out: &mut Vec<EffectContribution>,
) {
    for module in modules {
        if module.triggered(ctx) {
            module.contribute(ctx, out);
        }
    }
}

/// Condition kinds present in the registry that no module covers
///
/// Such conditions stay tracked for display but contribute no effect; the
/// engine records a warning for each so they are never silently dropped.
pub fn uncovered_kinds(
    modules: &[Box<dyn EffectModule>],
    registry: &ConditionRegistry,
) -> Vec<ConditionKind> {
    registry
        .kinds()
        .into_iter()
        .filter(|kind| !modules.iter().any(|m| m.covers().contains(kind)))
        .collect()
}

/// Piecewise-linear interpolation over breakpoints sorted by x
///
/// Inputs outside the table are held at the boundary value, so clinical
/// tables stay bounded at the extremes.
pub fn piecewise(points: &[(f64, f64)], x: f64) -> f64 {
    debug_assert!(points.windows(2).all(|w| w[0].0 < w[1].0));

    let first = points[0];
    if x <= first.0 {
        return first.1;
    }
    let last = points[points.len() - 1];
    if x >= last.0 {
        return last.1;
    }
    for pair in points.windows(2) {
        let (x0, y0) = pair[0];
        let (x1, y1) = pair[1];
        if x <= x1 {
            let t = (x - x0) / (x1 - x0);
            return y0 + t * (y1 - y0);
        }
    }
    last.1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_piecewise_interpolates_between_breakpoints() {
        let table = [(0.0, 0.0), (10.0, 100.0)];
        assert_eq!(piecewise(&table, 5.0), 50.0);
        assert_eq!(piecewise(&table, 0.0), 0.0);
        assert_eq!(piecewise(&table, 10.0), 100.0);
    }

    #[test]
    fn test_piecewise_holds_at_boundaries() {
        let table = [(1.0, 5.0), (2.0, 7.0)];
        assert_eq!(piecewise(&table, 0.0), 5.0);
        assert_eq!(piecewise(&table, 3.0), 7.0);
    }

    #[test]
    fn test_piecewise_handles_descending_values() {
        let table = [(5.5, 0.0), (6.5, -10.0), (7.5, -20.0)];
        assert_eq!(piecewise(&table, 7.0), -15.0);
    }

    #[test]
    fn test_uncovered_kinds_reported_not_dropped() {
        use crate::condition::lifecycle::Condition;

        let mut registry = ConditionRegistry::new(0.01);
        registry.spawn(Condition::new(ConditionKind::CrushInjury, 0.5, 0.0));
        registry.spawn(Condition::new(ConditionKind::Hemorrhage, 5.0, 0.0));

        // A table owning only hemorrhage leaves crush injury uncovered
        let partial: Vec<Box<dyn EffectModule>> =
            vec![Box::new(hemorrhage::HemorrhagicShock)];
        assert_eq!(
            uncovered_kinds(&partial, &registry),
            vec![ConditionKind::CrushInjury]
        );

        // The condition itself stays tracked either way
        assert!(registry.has_kind(ConditionKind::CrushInjury));

        // The full table leaves nothing uncovered
        assert!(uncovered_kinds(&standard_modules(), &registry).is_empty());
    }

    #[test]
    fn test_standard_table_covers_every_kind() {
        let modules = standard_modules();
        for kind in ConditionKind::ALL {
            assert!(
                modules.iter().any(|m| m.covers().contains(&kind)),
                "{:?} has no owning module",
                kind
            );
        }
    }
}
