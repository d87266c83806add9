//! Electrolyte derangements
//!
//! Each module triggers off the serum value itself, so the picture is the
//! same whether the derangement was scripted directly or driven up by a
//! tracked condition (crush injury for potassium). Breakpoints follow the
//! usual clinical staging rather than a single on/off threshold.

use crate::condition::kind::ConditionKind;
use crate::effects::context::EffectContext;
use crate::effects::contribution::{
    ArrhythmiaMode, EffectContribution, MorphologyVote, NumericParam, PShape, QrsShape,
    ScaleParam, TWaveShape, VoteClass,
};
use crate::effects::{piecewise, EffectModule};
use crate::physiology::quantity::Quantity;

// === Hyperkalemia staging (mEq/L): 5.5 mild, 6.5 moderate, 7.5 severe ===

const K_T_AMPLITUDE: [(f64, f64); 4] =
    [(5.5, 1.0), (6.5, 1.5), (7.5, 2.0), (9.0, 2.5)];
const K_PR_DELTA: [(f64, f64); 4] = [(5.5, 0.0), (6.5, 80.0), (7.5, 140.0), (9.0, 160.0)];
const K_QRS_DELTA: [(f64, f64); 4] = [(5.5, 0.0), (6.5, 20.0), (7.5, 60.0), (9.0, 100.0)];
const K_HR_DELTA: [(f64, f64); 4] = [(5.5, 0.0), (6.5, -10.0), (7.5, -20.0), (9.0, -30.0)];
const K_T_PEAK_WEIGHT: [(f64, f64); 3] = [(5.5, 0.0), (6.0, 0.6), (7.5, 1.0)];
const K_VF_HAZARD: [(f64, f64); 3] = [(7.5, 0.0), (8.5, 0.002), (10.0, 0.01)];

pub struct Hyperkalemia;

impl EffectModule for Hyperkalemia {
    fn name(&self) -> &'static str {
        "hyperkalemia"
    }

    fn covers(&self) -> &'static [ConditionKind] {
        &[ConditionKind::CrushInjury]
    }

    fn triggered(&self, ctx: &EffectContext<'_>) -> bool {
        ctx.value(Quantity::SerumPotassium) > 5.5
    }

    fn contribute(&self, ctx: &EffectContext<'_>, out: &mut Vec<EffectContribution>) {
        let k = ctx.value(Quantity::SerumPotassium);

        out.push(EffectContribution::scale(
            ScaleParam::TAmplitude,
            piecewise(&K_T_AMPLITUDE, k),
        ));
        out.push(EffectContribution::additive(
            NumericParam::PrInterval,
            piecewise(&K_PR_DELTA, k),
        ));
        out.push(EffectContribution::additive(
            NumericParam::QrsDuration,
            piecewise(&K_QRS_DELTA, k),
        ));
        out.push(EffectContribution::additive(
            NumericParam::HeartRate,
            piecewise(&K_HR_DELTA, k),
        ));
        out.push(EffectContribution::vote(
            MorphologyVote::TWave(TWaveShape::Peaked),
            piecewise(&K_T_PEAK_WEIGHT, k),
            VoteClass::Electrolyte,
        ));

        if k > 6.5 {
            out.push(EffectContribution::vote(
                MorphologyVote::Qrs(QrsShape::Widened),
                0.7,
                VoteClass::Electrolyte,
            ));
        }
        if k > 7.0 {
            out.push(EffectContribution::vote(
                MorphologyVote::PWave(PShape::Flattened),
                0.6,
                VoteClass::Electrolyte,
            ));
        }
        if k > 8.5 {
            out.push(EffectContribution::vote(
                MorphologyVote::PWave(PShape::Absent),
                1.0,
                VoteClass::LifeThreat,
            ));
            out.push(EffectContribution::vote(
                MorphologyVote::Rhythm(ArrhythmiaMode::SineWave),
                1.0,
                VoteClass::LifeThreat,
            ));
        }
        let vf = piecewise(&K_VF_HAZARD, k);
        if vf > 0.0 {
            out.push(EffectContribution::risk(
                ArrhythmiaMode::VentricularFibrillation,
                vf,
            ));
        }
    }
}

// === Hypocalcemia (mg/dL): QT prolongation below 8.5, severe below 7.0 ===

const CA_QT_DELTA: [(f64, f64); 3] = [(4.0, 110.0), (7.0, 80.0), (8.5, 0.0)];

pub struct Hypocalcemia;

impl EffectModule for Hypocalcemia {
    fn name(&self) -> &'static str {
        "hypocalcemia"
    }

    fn triggered(&self, ctx: &EffectContext<'_>) -> bool {
        ctx.value(Quantity::SerumCalcium) < 8.5
    }

    fn contribute(&self, ctx: &EffectContext<'_>, out: &mut Vec<EffectContribution>) {
        let ca = ctx.value(Quantity::SerumCalcium);
        let qt = piecewise(&CA_QT_DELTA, ca);

        out.push(EffectContribution::additive(NumericParam::QtInterval, qt));
        out.push(EffectContribution::vote(
            MorphologyVote::TWave(TWaveShape::Flattened),
            0.3,
            VoteClass::Electrolyte,
        ));
        // Marked QT prolongation carries a torsades hazard
        if qt > 60.0 {
            out.push(EffectContribution::risk(
                ArrhythmiaMode::TorsadesDePointes,
                0.0003,
            ));
        }
    }
}

// === Hypomagnesemia (mg/dL): torsades substrate below 1.5 ===

const MG_QT_DELTA: [(f64, f64); 3] = [(0.5, 70.0), (1.0, 40.0), (1.5, 0.0)];
const MG_TORSADES_HAZARD: [(f64, f64); 3] = [(0.5, 0.004), (1.0, 0.001), (1.5, 0.0)];

pub struct Hypomagnesemia;

impl EffectModule for Hypomagnesemia {
    fn name(&self) -> &'static str {
        "hypomagnesemia"
    }

    fn triggered(&self, ctx: &EffectContext<'_>) -> bool {
        ctx.value(Quantity::SerumMagnesium) < 1.5
    }

    fn contribute(&self, ctx: &EffectContext<'_>, out: &mut Vec<EffectContribution>) {
        let mg = ctx.value(Quantity::SerumMagnesium);

        out.push(EffectContribution::additive(
            NumericParam::QtInterval,
            piecewise(&MG_QT_DELTA, mg),
        ));
        out.push(EffectContribution::vote(
            MorphologyVote::TWave(TWaveShape::Flattened),
            0.4,
            VoteClass::Electrolyte,
        ));
        if mg < 1.0 {
            out.push(EffectContribution::vote(
                MorphologyVote::UWave,
                0.6,
                VoteClass::Electrolyte,
            ));
        }
        let hazard = piecewise(&MG_TORSADES_HAZARD, mg);
        if hazard > 0.0 {
            out.push(EffectContribution::risk(
                ArrhythmiaMode::TorsadesDePointes,
                hazard,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::registry::ConditionRegistry;
    use crate::physiology::state::{Mutation, StateStore};

    fn ctx_with<'a>(
        store: &'a StateStore,
        registry: &'a ConditionRegistry,
    ) -> EffectContext<'a> {
        EffectContext {
            state: store,
            conditions: registry,
            now: 0.0,
        }
    }

    #[test]
    fn test_normal_potassium_is_quiet() {
        let store = StateStore::at_baseline();
        let registry = ConditionRegistry::new(0.01);
        assert!(!Hyperkalemia.triggered(&ctx_with(&store, &registry)));
    }

    #[test]
    fn test_severe_hyperkalemia_staging() {
        let mut store = StateStore::at_baseline();
        store.apply(Quantity::SerumPotassium, Mutation::Set(7.5), "test");
        let registry = ConditionRegistry::new(0.01);
        let ctx = ctx_with(&store, &registry);

        let mut out = Vec::new();
        Hyperkalemia.contribute(&ctx, &mut out);

        let pr: f64 = out
            .iter()
            .filter_map(|c| match c {
                EffectContribution::Additive {
                    param: NumericParam::PrInterval,
                    delta,
                } => Some(*delta),
                _ => None,
            })
            .sum();
        assert!((pr - 140.0).abs() < 1e-9);

        let peak_weight = out
            .iter()
            .find_map(|c| match c {
                EffectContribution::Vote {
                    vote: MorphologyVote::TWave(TWaveShape::Peaked),
                    weight,
                    ..
                } => Some(*weight),
                _ => None,
            })
            .unwrap();
        assert!((peak_weight - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_extreme_hyperkalemia_goes_sine_wave() {
        let mut store = StateStore::at_baseline();
        store.apply(Quantity::SerumPotassium, Mutation::Set(9.0), "test");
        let registry = ConditionRegistry::new(0.01);
        let mut out = Vec::new();
        Hyperkalemia.contribute(&ctx_with(&store, &registry), &mut out);
        assert!(out.iter().any(|c| matches!(
            c,
            EffectContribution::Vote {
                vote: MorphologyVote::Rhythm(ArrhythmiaMode::SineWave),
                class: VoteClass::LifeThreat,
                ..
            }
        )));
    }

    #[test]
    fn test_hypocalcemia_prolongs_qt_gradually() {
        let registry = ConditionRegistry::new(0.01);
        let mut qts = Vec::new();
        for ca in [8.0, 7.0, 6.0] {
            let mut store = StateStore::at_baseline();
            store.apply(Quantity::SerumCalcium, Mutation::Set(ca), "test");
            let mut out = Vec::new();
            Hypocalcemia.contribute(&ctx_with(&store, &registry), &mut out);
            let qt: f64 = out
                .iter()
                .filter_map(|c| match c {
                    EffectContribution::Additive {
                        param: NumericParam::QtInterval,
                        delta,
                    } => Some(*delta),
                    _ => None,
                })
                .sum();
            qts.push(qt);
        }
        assert!(qts[0] < qts[1] && qts[1] < qts[2]);
    }

    #[test]
    fn test_hypomagnesemia_torsades_hazard() {
        let mut store = StateStore::at_baseline();
        store.apply(Quantity::SerumMagnesium, Mutation::Set(0.8), "test");
        let registry = ConditionRegistry::new(0.01);
        let mut out = Vec::new();
        Hypomagnesemia.contribute(&ctx_with(&store, &registry), &mut out);
        assert!(out.iter().any(|c| matches!(
            c,
            EffectContribution::Risk {
                rhythm: ArrhythmiaMode::TorsadesDePointes,
                ..
            }
        )));
    }
}
