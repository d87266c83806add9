//! Circulating stress hormones
//!
//! Catecholamine drive from pain and fear: sinus tachycardia proportional
//! to the stress index, with nonspecific T-wave changes at high levels.

use crate::condition::kind::ConditionKind;
use crate::effects::context::EffectContext;
use crate::effects::contribution::{
    ArrhythmiaMode, EffectContribution, MorphologyVote, NumericParam, TWaveShape, VoteClass,
};
use crate::effects::EffectModule;
use crate::physiology::quantity::Quantity;

pub struct StressHormones;

impl EffectModule for StressHormones {
    fn name(&self) -> &'static str {
        "stress_hormones"
    }

    fn covers(&self) -> &'static [ConditionKind] {
        &[ConditionKind::StressResponse]
    }

    fn triggered(&self, ctx: &EffectContext<'_>) -> bool {
        ctx.value(Quantity::StressIndex) > 0.1
    }

    fn contribute(&self, ctx: &EffectContext<'_>, out: &mut Vec<EffectContribution>) {
        let stress = ctx.value(Quantity::StressIndex).clamp(0.0, 1.0);

        out.push(EffectContribution::additive(
            NumericParam::HeartRate,
            30.0 * stress,
        ));
        if stress > 0.5 {
            out.push(EffectContribution::vote(
                MorphologyVote::TWave(TWaveShape::Nonspecific),
                0.2 * stress,
                VoteClass::Baseline,
            ));
            out.push(EffectContribution::vote(
                MorphologyVote::Rhythm(ArrhythmiaMode::SinusTachycardia),
                0.4 * stress,
                VoteClass::Baseline,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::registry::ConditionRegistry;
    use crate::physiology::state::{Mutation, StateStore};

    #[test]
    fn test_stress_scales_heart_rate_linearly() {
        let mut store = StateStore::at_baseline();
        store.apply(Quantity::StressIndex, Mutation::Set(0.6), "test");
        let registry = ConditionRegistry::new(0.01);
        let ctx = EffectContext {
            state: &store,
            conditions: &registry,
            now: 0.0,
        };
        let mut out = Vec::new();
        assert!(StressHormones.triggered(&ctx));
        StressHormones.contribute(&ctx, &mut out);

        let hr: f64 = out
            .iter()
            .filter_map(|c| match c {
                EffectContribution::Additive {
                    param: NumericParam::HeartRate,
                    delta,
                } => Some(*delta),
                _ => None,
            })
            .sum();
        assert!((hr - 18.0).abs() < 1e-9);
    }
}
