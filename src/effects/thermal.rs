//! Hypothermia
//!
//! Below 35 C: progressive bradycardia, Osborn (J) waves, and uniform
//! interval prolongation; below 28 C ventricular fibrillation becomes a
//! real hazard. Triggered off core temperature, so exposure conditions and
//! scripted temperature drops read identically.

use crate::condition::kind::ConditionKind;
use crate::effects::context::EffectContext;
use crate::effects::contribution::{
    ArrhythmiaMode, EffectContribution, MorphologyVote, NumericParam, VoteClass,
};
use crate::effects::{piecewise, EffectModule};
use crate::physiology::quantity::Quantity;

/// Core temperature below which effects appear (degrees C)
const TRIGGER_TEMP: f64 = 35.0;

const HR_DELTA: [(f64, f64); 5] = [
    (20.0, -48.0),
    (28.0, -40.0),
    (32.0, -30.0),
    (34.0, -20.0),
    (35.0, 0.0),
];
const PR_DELTA: [(f64, f64); 3] = [(28.0, 120.0), (32.0, 80.0), (35.0, 0.0)];
const QRS_DELTA: [(f64, f64); 3] = [(28.0, 40.0), (32.0, 20.0), (35.0, 0.0)];
const QT_DELTA: [(f64, f64); 3] = [(28.0, 110.0), (32.0, 60.0), (35.0, 0.0)];
const OSBORN_WEIGHT: [(f64, f64); 3] = [(28.0, 1.0), (32.0, 0.8), (35.0, 0.0)];
const VF_HAZARD: [(f64, f64); 3] = [(20.0, 0.005), (28.0, 0.002), (32.0, 0.0)];

pub struct Hypothermia;

impl EffectModule for Hypothermia {
    fn name(&self) -> &'static str {
        "hypothermia"
    }

    fn covers(&self) -> &'static [ConditionKind] {
        &[ConditionKind::HypothermiaExposure]
    }

    fn triggered(&self, ctx: &EffectContext<'_>) -> bool {
        ctx.value(Quantity::CoreTempC) < TRIGGER_TEMP
    }

    fn contribute(&self, ctx: &EffectContext<'_>, out: &mut Vec<EffectContribution>) {
        let temp = ctx.value(Quantity::CoreTempC);

        out.push(EffectContribution::additive(
            NumericParam::HeartRate,
            piecewise(&HR_DELTA, temp),
        ));
        out.push(EffectContribution::additive(
            NumericParam::PrInterval,
            piecewise(&PR_DELTA, temp),
        ));
        out.push(EffectContribution::additive(
            NumericParam::QrsDuration,
            piecewise(&QRS_DELTA, temp),
        ));
        out.push(EffectContribution::additive(
            NumericParam::QtInterval,
            piecewise(&QT_DELTA, temp),
        ));

        let osborn = piecewise(&OSBORN_WEIGHT, temp);
        if osborn > 0.0 {
            out.push(EffectContribution::vote(
                MorphologyVote::OsbornWave,
                osborn,
                VoteClass::Structural,
            ));
        }
        if temp < 32.0 {
            out.push(EffectContribution::vote(
                MorphologyVote::Rhythm(ArrhythmiaMode::SinusBradycardia),
                0.5,
                VoteClass::Structural,
            ));
        }
        let vf = piecewise(&VF_HAZARD, temp);
        if vf > 0.0 {
            out.push(EffectContribution::risk(
                ArrhythmiaMode::VentricularFibrillation,
                vf,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::registry::ConditionRegistry;
    use crate::physiology::state::{Mutation, StateStore};

    fn eval_at(temp: f64) -> Vec<EffectContribution> {
        let mut store = StateStore::at_baseline();
        store.apply(Quantity::CoreTempC, Mutation::Set(temp), "test");
        let registry = ConditionRegistry::new(0.01);
        let ctx = EffectContext {
            state: &store,
            conditions: &registry,
            now: 0.0,
        };
        let mut out = Vec::new();
        if Hypothermia.triggered(&ctx) {
            Hypothermia.contribute(&ctx, &mut out);
        }
        out
    }

    #[test]
    fn test_quiet_at_normothermia() {
        assert!(eval_at(37.0).is_empty());
    }

    #[test]
    fn test_osborn_waves_appear_when_cold() {
        let out = eval_at(31.0);
        let weight = out
            .iter()
            .find_map(|c| match c {
                EffectContribution::Vote {
                    vote: MorphologyVote::OsbornWave,
                    weight,
                    ..
                } => Some(*weight),
                _ => None,
            })
            .expect("Osborn vote expected");
        assert!(weight > 0.8);
    }

    #[test]
    fn test_bradycardia_deepens_with_cold() {
        let hr = |out: &[EffectContribution]| -> f64 {
            out.iter()
                .filter_map(|c| match c {
                    EffectContribution::Additive {
                        param: NumericParam::HeartRate,
                        delta,
                    } => Some(*delta),
                    _ => None,
                })
                .sum()
        };
        let mild = hr(&eval_at(34.0));
        let moderate = hr(&eval_at(31.0));
        let severe = hr(&eval_at(27.0));
        assert!(mild > moderate && moderate > severe);
    }

    #[test]
    fn test_vf_hazard_only_below_32() {
        assert!(!eval_at(33.0)
            .iter()
            .any(|c| matches!(c, EffectContribution::Risk { .. })));
        assert!(eval_at(27.0)
            .iter()
            .any(|c| matches!(c, EffectContribution::Risk { .. })));
    }
}
