//! Raised intracranial pressure
//!
//! Cushing response above 20 mmHg: reflex bradycardia, deep wide
//! "cerebral" T-waves with amplified T amplitude, and QT prolongation.
//! Triggered off the ICP value itself, so a scripted ICP rise behaves the
//! same as one driven by a tracked brain injury.

use crate::condition::kind::ConditionKind;
use crate::effects::context::EffectContext;
use crate::effects::contribution::{
    EffectContribution, MorphologyVote, NumericParam, ScaleParam, TWaveShape, VoteClass,
};
use crate::effects::{piecewise, EffectModule};
use crate::physiology::quantity::Quantity;

/// ICP above which the Cushing response appears (mmHg)
const ICP_THRESHOLD: f64 = 20.0;

const HR_DELTA: [(f64, f64); 3] = [(20.0, 0.0), (30.0, -25.0), (50.0, -45.0)];
const QT_DELTA: [(f64, f64); 3] = [(20.0, 0.0), (30.0, 60.0), (50.0, 90.0)];

pub struct RaisedIcp;

impl EffectModule for RaisedIcp {
    fn name(&self) -> &'static str {
        "raised_icp"
    }

    fn covers(&self) -> &'static [ConditionKind] {
        &[ConditionKind::TraumaticBrainInjury]
    }

    fn triggered(&self, ctx: &EffectContext<'_>) -> bool {
        ctx.value(Quantity::Icp) > ICP_THRESHOLD
    }

    fn contribute(&self, ctx: &EffectContext<'_>, out: &mut Vec<EffectContribution>) {
        let icp = ctx.value(Quantity::Icp);
        let weight = ctx.kind_weight_or_full(ConditionKind::TraumaticBrainInjury);
        if weight <= 0.0 {
            return;
        }

        out.push(EffectContribution::additive(
            NumericParam::HeartRate,
            piecewise(&HR_DELTA, icp) * weight,
        ));
        out.push(EffectContribution::additive(
            NumericParam::QtInterval,
            piecewise(&QT_DELTA, icp) * weight,
        ));
        out.push(EffectContribution::scale(
            ScaleParam::TAmplitude,
            1.0 + 1.0 * weight,
        ));
        out.push(EffectContribution::vote(
            MorphologyVote::TWave(TWaveShape::Cerebral),
            0.9 * weight,
            VoteClass::Structural,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::registry::ConditionRegistry;
    use crate::physiology::state::{Mutation, StateStore};

    #[test]
    fn test_quiet_below_icp_threshold() {
        let store = StateStore::at_baseline();
        let registry = ConditionRegistry::new(0.01);
        let ctx = EffectContext {
            state: &store,
            conditions: &registry,
            now: 0.0,
        };
        assert!(!RaisedIcp.triggered(&ctx));
    }

    #[test]
    fn test_cushing_bradycardia_at_icp_30() {
        let mut store = StateStore::at_baseline();
        store.apply(Quantity::Icp, Mutation::Set(30.0), "test");
        let registry = ConditionRegistry::new(0.01);
        let ctx = EffectContext {
            state: &store,
            conditions: &registry,
            now: 0.0,
        };
        let mut out = Vec::new();
        assert!(RaisedIcp.triggered(&ctx));
        RaisedIcp.contribute(&ctx, &mut out);

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
        assert!((hr + 25.0).abs() < 1e-9);
        assert!(out.iter().any(|c| matches!(
            c,
            EffectContribution::Vote {
                vote: MorphologyVote::TWave(TWaveShape::Cerebral),
                ..
            }
        )));
    }
}
