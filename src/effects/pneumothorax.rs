//! Tension pneumothorax
//!
//! Obstructive shock: compensatory tachycardia, low-voltage QRS from the
//! air buffer between heart and electrodes, and rightward axis shift from
//! mediastinal displacement. Hypoxia itself is handled by the respiratory
//! module off the PaO2 the pneumothorax drives down.

use crate::condition::kind::ConditionKind;
use crate::effects::context::EffectContext;
use crate::effects::contribution::{
    EffectContribution, MorphologyVote, NumericParam, QrsShape, ScaleParam, VoteClass,
};
use crate::effects::EffectModule;

pub struct TensionPneumo;

impl EffectModule for TensionPneumo {
    fn name(&self) -> &'static str {
        "tension_pneumothorax"
    }

    fn covers(&self) -> &'static [ConditionKind] {
        &[ConditionKind::TensionPneumothorax]
    }

    fn triggered(&self, ctx: &EffectContext<'_>) -> bool {
        ctx.kind_weight(ConditionKind::TensionPneumothorax) > 0.0
    }

    fn contribute(&self, ctx: &EffectContext<'_>, out: &mut Vec<EffectContribution>) {
        let weight = ctx.kind_weight(ConditionKind::TensionPneumothorax);
        let extent = ctx
            .max_severity(ConditionKind::TensionPneumothorax)
            .clamp(0.0, 1.0);

        out.push(EffectContribution::additive(
            NumericParam::HeartRate,
            50.0 * extent * weight,
        ));
        out.push(EffectContribution::scale(
            ScaleParam::QrsAmplitude,
            1.0 - 0.5 * extent * weight,
        ));
        out.push(EffectContribution::additive(
            NumericParam::Axis,
            30.0 * extent * weight,
        ));
        out.push(EffectContribution::vote(
            MorphologyVote::Qrs(QrsShape::LowVoltage),
            0.8 * extent * weight,
            VoteClass::Structural,
        ));
    }
}
