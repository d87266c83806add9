//! Blunt cardiac injury
//!
//! Myocardial contusion: injury-pattern ST elevation, sinus tachycardia,
//! T-wave inversion over the contused wall, and an ectopy hazard that can
//! degenerate into atrial fibrillation or ventricular tachycardia.

use crate::condition::kind::ConditionKind;
use crate::effects::context::EffectContext;
use crate::effects::contribution::{
    ArrhythmiaMode, EffectContribution, MorphologyVote, NumericParam, StShape, TWaveShape,
    VoteClass,
};
use crate::effects::EffectModule;

pub struct BluntCardiac;

impl EffectModule for BluntCardiac {
    fn name(&self) -> &'static str {
        "blunt_cardiac_injury"
    }

    fn covers(&self) -> &'static [ConditionKind] {
        &[ConditionKind::BluntCardiacInjury]
    }

    fn triggered(&self, ctx: &EffectContext<'_>) -> bool {
        ctx.kind_weight(ConditionKind::BluntCardiacInjury) > 0.0
    }

    fn contribute(&self, ctx: &EffectContext<'_>, out: &mut Vec<EffectContribution>) {
        let weight = ctx.kind_weight(ConditionKind::BluntCardiacInjury);
        let severity = ctx
            .max_severity(ConditionKind::BluntCardiacInjury)
            .clamp(0.0, 1.0);
        let magnitude = severity * weight;

        out.push(EffectContribution::additive(
            NumericParam::HeartRate,
            15.0 * magnitude,
        ));
        out.push(EffectContribution::additive(
            NumericParam::StDeviation,
            0.15 * magnitude,
        ));
        out.push(EffectContribution::vote(
            MorphologyVote::StSegment(StShape::ConvexElevation),
            0.5 * magnitude,
            VoteClass::Structural,
        ));
        out.push(EffectContribution::vote(
            MorphologyVote::TWave(TWaveShape::Inverted),
            0.3 * magnitude,
            VoteClass::Structural,
        ));
        out.push(EffectContribution::risk(
            ArrhythmiaMode::AtrialFibrillation,
            0.001 * magnitude,
        ));
        out.push(EffectContribution::risk(
            ArrhythmiaMode::VentricularTachycardia,
            0.0005 * magnitude,
        ));
    }
}
