//! Blast injury with coronary air embolism
//!
//! Primary blast injury produces tachycardia; at severity 0.5 and above a
//! coronary air-gas embolism is suspected and an infarct-like ST elevation
//! pattern appears, with a small ventricular fibrillation hazard.

use crate::condition::kind::ConditionKind;
use crate::effects::context::EffectContext;
use crate::effects::contribution::{
    ArrhythmiaMode, EffectContribution, MorphologyVote, NumericParam, StShape, VoteClass,
};
use crate::effects::EffectModule;

/// Severity at or above which coronary air embolism is suspected
const EMBOLISM_SEVERITY: f64 = 0.5;

pub struct BlastEmbolism;

impl EffectModule for BlastEmbolism {
    fn name(&self) -> &'static str {
        "blast_embolism"
    }

    fn covers(&self) -> &'static [ConditionKind] {
        &[ConditionKind::BlastInjury]
    }

    fn triggered(&self, ctx: &EffectContext<'_>) -> bool {
        ctx.kind_weight(ConditionKind::BlastInjury) > 0.0
    }

    fn contribute(&self, ctx: &EffectContext<'_>, out: &mut Vec<EffectContribution>) {
        let weight = ctx.kind_weight(ConditionKind::BlastInjury);
        let severity = ctx.max_severity(ConditionKind::BlastInjury).clamp(0.0, 1.0);

        out.push(EffectContribution::additive(
            NumericParam::HeartRate,
            30.0 * weight,
        ));

        if severity >= EMBOLISM_SEVERITY {
            out.push(EffectContribution::additive(
                NumericParam::StDeviation,
                0.2 * weight,
            ));
            out.push(EffectContribution::vote(
                MorphologyVote::StSegment(StShape::ConvexElevation),
                0.8 * weight,
                VoteClass::Ischemic,
            ));
            out.push(EffectContribution::risk(
                ArrhythmiaMode::VentricularFibrillation,
                0.001 * severity * weight,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::kind::{DecayCurve, TimingProfile};
    use crate::condition::lifecycle::Condition;
    use crate::condition::registry::ConditionRegistry;
    use crate::physiology::state::StateStore;

    fn instant() -> TimingProfile {
        TimingProfile {
            onset_tc: 0.0,
            decay: DecayCurve::Exponential { half_life: 900.0 },
            stack_cap: 1.0,
        }
    }

    #[test]
    fn test_low_severity_blast_has_no_st_elevation() {
        let store = StateStore::at_baseline();
        let mut registry = ConditionRegistry::new(0.01);
        registry.spawn(Condition::new(ConditionKind::BlastInjury, 0.3, 0.0).with_timing(instant()));
        let ctx = EffectContext {
            state: &store,
            conditions: &registry,
            now: 1.0,
        };
        let mut out = Vec::new();
        BlastEmbolism.contribute(&ctx, &mut out);
        assert!(!out.iter().any(|c| matches!(
            c,
            EffectContribution::Additive {
                param: NumericParam::StDeviation,
                ..
            }
        )));
    }

    #[test]
    fn test_suspected_embolism_produces_injury_pattern() {
        let store = StateStore::at_baseline();
        let mut registry = ConditionRegistry::new(0.01);
        registry.spawn(Condition::new(ConditionKind::BlastInjury, 0.8, 0.0).with_timing(instant()));
        let ctx = EffectContext {
            state: &store,
            conditions: &registry,
            now: 1.0,
        };
        let mut out = Vec::new();
        BlastEmbolism.contribute(&ctx, &mut out);
        assert!(out.iter().any(|c| matches!(
            c,
            EffectContribution::Vote {
                vote: MorphologyVote::StSegment(StShape::ConvexElevation),
                ..
            }
        )));
        assert!(out.iter().any(|c| matches!(
            c,
            EffectContribution::Risk {
                rhythm: ArrhythmiaMode::VentricularFibrillation,
                ..
            }
        )));
    }
}
