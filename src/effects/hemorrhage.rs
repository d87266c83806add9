//! Hemorrhagic shock
//!
//! Maps blood-volume-loss fraction to heart-rate and ST-segment targets
//! through the ATLS shock-class breakpoints (15% / 30% / 40% loss). The
//! tables are monotone in loss fraction, so deeper shock never reads as
//! milder.

use crate::condition::kind::ConditionKind;
use crate::effects::context::EffectContext;
use crate::effects::contribution::{
    ArrhythmiaMode, EffectContribution, MorphologyVote, NumericParam, StShape, TWaveShape,
    VoteClass,
};
use crate::effects::{piecewise, EffectModule};

/// Loss fraction below which the module stays quiet (compensated Class I)
const TRIGGER_LOSS: f64 = 0.05;

const HR_DELTA: [(f64, f64); 5] = [
    (0.05, 0.0),
    (0.15, 10.0),
    (0.30, 45.0),
    (0.40, 65.0),
    (0.55, 75.0),
];

const ST_DEPRESSION_MV: [(f64, f64); 5] = [
    (0.05, 0.0),
    (0.15, 0.05),
    (0.30, 0.10),
    (0.40, 0.20),
    (0.55, 0.25),
];

pub struct HemorrhagicShock;

impl EffectModule for HemorrhagicShock {
    fn name(&self) -> &'static str {
        "hemorrhagic_shock"
    }

    fn covers(&self) -> &'static [ConditionKind] {
        &[ConditionKind::Hemorrhage]
    }

    fn triggered(&self, ctx: &EffectContext<'_>) -> bool {
        ctx.state.blood_loss_fraction() > TRIGGER_LOSS
    }

    fn contribute(&self, ctx: &EffectContext<'_>, out: &mut Vec<EffectContribution>) {
        let loss = ctx.state.blood_loss_fraction();
        let weight = ctx.kind_weight_or_full(ConditionKind::Hemorrhage);
        if weight <= 0.0 {
            return;
        }

        let hr = piecewise(&HR_DELTA, loss) * weight;
        let st = -piecewise(&ST_DEPRESSION_MV, loss) * weight;

        out.push(EffectContribution::additive(NumericParam::HeartRate, hr));
        out.push(EffectContribution::additive(NumericParam::StDeviation, st));

        if st <= -0.04 {
            out.push(EffectContribution::vote(
                MorphologyVote::StSegment(StShape::HorizontalDepression),
                0.6 * weight,
                VoteClass::Ischemic,
            ));
        }
        if loss >= 0.30 {
            out.push(EffectContribution::vote(
                MorphologyVote::TWave(TWaveShape::Nonspecific),
                0.4 * weight,
                VoteClass::Ischemic,
            ));
        }
        if hr >= 25.0 {
            out.push(EffectContribution::vote(
                MorphologyVote::Rhythm(ArrhythmiaMode::SinusTachycardia),
                0.6 * weight,
                VoteClass::Ischemic,
            ));
        }
        // Exsanguination: perfusion collapses toward pulseless arrest
        if loss >= 0.50 {
            out.push(EffectContribution::risk(
                ArrhythmiaMode::Asystole,
                0.002 * weight,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::registry::ConditionRegistry;
    use crate::physiology::quantity::Quantity;
    use crate::physiology::state::{Mutation, StateStore};

    fn context_with_volume(store: &mut StateStore, pct: f64) {
        store.apply(Quantity::BloodVolumePct, Mutation::Set(pct), "test");
    }

    fn eval(store: &StateStore, registry: &ConditionRegistry) -> Vec<EffectContribution> {
        let ctx = EffectContext {
            state: store,
            conditions: registry,
            now: 0.0,
        };
        let mut out = Vec::new();
        if HemorrhagicShock.triggered(&ctx) {
            HemorrhagicShock.contribute(&ctx, &mut out);
        }
        out
    }

    fn hr_delta(out: &[EffectContribution]) -> f64 {
        out.iter()
            .filter_map(|c| match c {
                EffectContribution::Additive {
                    param: NumericParam::HeartRate,
                    delta,
                } => Some(*delta),
                _ => None,
            })
            .sum()
    }

    #[test]
    fn test_quiet_at_normal_volume() {
        let store = StateStore::at_baseline();
        let registry = ConditionRegistry::new(0.01);
        assert!(eval(&store, &registry).is_empty());
    }

    #[test]
    fn test_class_three_loss_targets() {
        let mut store = StateStore::at_baseline();
        context_with_volume(&mut store, 70.0);
        let registry = ConditionRegistry::new(0.01);
        let out = eval(&store, &registry);
        assert!((hr_delta(&out) - 45.0).abs() < 1e-9);
        assert!(out.iter().any(|c| matches!(
            c,
            EffectContribution::Vote {
                vote: MorphologyVote::TWave(TWaveShape::Nonspecific),
                ..
            }
        )));
    }

    #[test]
    fn test_hr_monotone_across_shock_classes() {
        let registry = ConditionRegistry::new(0.01);
        let mut previous = 0.0;
        for pct in [95.0, 85.0, 70.0, 60.0, 50.0] {
            let mut store = StateStore::at_baseline();
            context_with_volume(&mut store, pct);
            let delta = hr_delta(&eval(&store, &registry));
            assert!(delta >= previous, "HR delta fell at volume {}", pct);
            previous = delta;
        }
    }
}
