//! Respiratory and acid-base disturbances
//!
//! Hypoxia, hypercapnia, and pH derangements trigger off the blood-gas
//! values regardless of which condition produced them; the pneumothorax
//! drift, scripted gas values, and future airway conditions all funnel
//! through the same rules.

use crate::condition::kind::ConditionKind;
use crate::effects::context::EffectContext;
use crate::effects::contribution::{
    ArrhythmiaMode, EffectContribution, MorphologyVote, NumericParam, TWaveShape, VoteClass,
};
use crate::effects::{piecewise, EffectModule};
use crate::physiology::quantity::Quantity;

// === Hypoxia: compensation below PaO2 60 mmHg ===

const O2_HR_DELTA: [(f64, f64); 2] = [(40.0, 35.0), (60.0, 0.0)];
const O2_ST_MV: [(f64, f64); 2] = [(40.0, -0.10), (60.0, 0.0)];
const O2_VF_HAZARD: [(f64, f64); 3] = [(30.0, 0.002), (40.0, 0.0005), (60.0, 0.0)];

pub struct Hypoxia;

impl EffectModule for Hypoxia {
    fn name(&self) -> &'static str {
        "hypoxia"
    }

    fn covers(&self) -> &'static [ConditionKind] {
        &[ConditionKind::TensionPneumothorax]
    }

    fn triggered(&self, ctx: &EffectContext<'_>) -> bool {
        ctx.value(Quantity::ArterialO2) < 60.0
    }

    fn contribute(&self, ctx: &EffectContext<'_>, out: &mut Vec<EffectContribution>) {
        let o2 = ctx.value(Quantity::ArterialO2);

        out.push(EffectContribution::additive(
            NumericParam::HeartRate,
            piecewise(&O2_HR_DELTA, o2),
        ));
        out.push(EffectContribution::additive(
            NumericParam::StDeviation,
            piecewise(&O2_ST_MV, o2),
        ));
        if o2 < 45.0 {
            out.push(EffectContribution::vote(
                MorphologyVote::TWave(TWaveShape::Inverted),
                0.3,
                VoteClass::Ischemic,
            ));
        }
        let vf = piecewise(&O2_VF_HAZARD, o2);
        if vf > 0.0 {
            out.push(EffectContribution::risk(
                ArrhythmiaMode::VentricularFibrillation,
                vf,
            ));
        }
    }
}

// === Hypercapnia: sympathetic drive above PaCO2 50 mmHg ===

const CO2_HR_DELTA: [(f64, f64); 2] = [(50.0, 0.0), (80.0, 15.0)];

pub struct Hypercapnia;

impl EffectModule for Hypercapnia {
    fn name(&self) -> &'static str {
        "hypercapnia"
    }

    fn triggered(&self, ctx: &EffectContext<'_>) -> bool {
        ctx.value(Quantity::ArterialCo2) > 50.0
    }

    fn contribute(&self, ctx: &EffectContext<'_>, out: &mut Vec<EffectContribution>) {
        let co2 = ctx.value(Quantity::ArterialCo2);
        out.push(EffectContribution::additive(
            NumericParam::HeartRate,
            piecewise(&CO2_HR_DELTA, co2),
        ));
    }
}

// === Acid-base: normal pH window 7.35 - 7.45 ===

const ACIDOSIS_HR_DELTA: [(f64, f64); 2] = [(6.9, 20.0), (7.3, 0.0)];
const ACIDOSIS_VF_HAZARD: [(f64, f64); 2] = [(6.8, 0.002), (7.0, 0.0)];
const ALKALOSIS_QT_DELTA: [(f64, f64); 2] = [(7.5, 0.0), (7.8, 30.0)];

pub struct AcidBase;

impl EffectModule for AcidBase {
    fn name(&self) -> &'static str {
        "acid_base"
    }

    fn triggered(&self, ctx: &EffectContext<'_>) -> bool {
        let ph = ctx.value(Quantity::ArterialPh);
        ph < 7.30 || ph > 7.50
    }

    fn contribute(&self, ctx: &EffectContext<'_>, out: &mut Vec<EffectContribution>) {
        let ph = ctx.value(Quantity::ArterialPh);

        if ph < 7.30 {
            out.push(EffectContribution::additive(
                NumericParam::HeartRate,
                piecewise(&ACIDOSIS_HR_DELTA, ph),
            ));
            let vf = piecewise(&ACIDOSIS_VF_HAZARD, ph);
            if vf > 0.0 {
                out.push(EffectContribution::risk(
                    ArrhythmiaMode::VentricularFibrillation,
                    vf,
                ));
            }
        } else {
            out.push(EffectContribution::additive(
                NumericParam::QtInterval,
                piecewise(&ALKALOSIS_QT_DELTA, ph),
            ));
            if ph > 7.55 {
                out.push(EffectContribution::vote(
                    MorphologyVote::TWave(TWaveShape::Flattened),
                    0.3,
                    VoteClass::Electrolyte,
                ));
            }
        }
    }
}
