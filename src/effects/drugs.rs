//! Drug effects
//!
//! One module instance per modeled drug, built from a shared chronotropic
//! template. Magnitude is the dose normalized against the drug's reference
//! dose, scaled per instance by the dose condition's lifecycle weight
//! (which carries the onset ramp and wear-off), then capped at the kind's
//! stacking maximum so repeat doses saturate rather than run away.

use crate::condition::kind::ConditionKind;
use crate::effects::context::EffectContext;
use crate::effects::contribution::{
    ArrhythmiaMode, EffectContribution, MorphologyVote, NumericParam, VoteClass,
};
use crate::effects::EffectModule;

pub struct DrugEffect {
    name: &'static str,
    kind: ConditionKind,
    /// Heart-rate delta (bpm) at one reference dose, fully active
    hr_per_ref_dose: f64,
    /// Rhythm vote cast once the effect is mostly in, if any
    rhythm: Option<ArrhythmiaMode>,
    /// Ectopy hazard per second at one reference dose, fully active
    ectopy_hazard: f64,
}

impl DrugEffect {
    pub fn ketamine() -> Self {
        Self {
            name: "ketamine",
            kind: ConditionKind::KetamineDose,
            hr_per_ref_dose: 20.0,
            rhythm: None,
            ectopy_hazard: 0.0,
        }
    }

    pub fn morphine() -> Self {
        Self {
            name: "morphine",
            kind: ConditionKind::MorphineDose,
            hr_per_ref_dose: -15.0,
            rhythm: Some(ArrhythmiaMode::SinusBradycardia),
            ectopy_hazard: 0.0,
        }
    }

    pub fn atropine() -> Self {
        Self {
            name: "atropine",
            kind: ConditionKind::AtropineDose,
            hr_per_ref_dose: 30.0,
            rhythm: None,
            ectopy_hazard: 0.0,
        }
    }

    pub fn epinephrine() -> Self {
        Self {
            name: "epinephrine",
            kind: ConditionKind::EpinephrineDose,
            hr_per_ref_dose: 40.0,
            rhythm: Some(ArrhythmiaMode::SinusTachycardia),
            ectopy_hazard: 0.0005,
        }
    }

    /// Dose-normalized effect magnitude summed over live instances,
    /// capped at the kind's stacking maximum
    fn magnitude(&self, ctx: &EffectContext<'_>) -> f64 {
        let reference = self.kind.reference_dose().unwrap_or(1.0);
        let cap = self.kind.timing().stack_cap;
        let sum: f64 = ctx
            .conditions
            .iter()
            .filter(|c| c.kind == self.kind)
            .map(|c| (c.severity / reference).min(cap) * c.weight(ctx.now))
            .sum();
        sum.min(cap)
    }
}

impl EffectModule for DrugEffect {
    fn name(&self) -> &'static str {
        self.name
    }

    fn covers(&self) -> &'static [ConditionKind] {
        match self.kind {
            ConditionKind::KetamineDose => &[ConditionKind::KetamineDose],
            ConditionKind::MorphineDose => &[ConditionKind::MorphineDose],
            ConditionKind::AtropineDose => &[ConditionKind::AtropineDose],
            ConditionKind::EpinephrineDose => &[ConditionKind::EpinephrineDose],
            _ => &[],
        }
    }

    fn triggered(&self, ctx: &EffectContext<'_>) -> bool {
        ctx.kind_weight(self.kind) > 0.0
    }

    fn contribute(&self, ctx: &EffectContext<'_>, out: &mut Vec<EffectContribution>) {
        let magnitude = self.magnitude(ctx);
        if magnitude <= 0.0 {
            return;
        }

        out.push(EffectContribution::additive(
            NumericParam::HeartRate,
            self.hr_per_ref_dose * magnitude,
        ));

        if let Some(rhythm) = self.rhythm {
            if magnitude > 0.8 {
                out.push(EffectContribution::vote(
                    MorphologyVote::Rhythm(rhythm),
                    0.4 * magnitude,
                    VoteClass::Baseline,
                ));
            }
        }
        if self.ectopy_hazard > 0.0 {
            out.push(EffectContribution::risk(
                ArrhythmiaMode::VentricularTachycardia,
                self.ectopy_hazard * magnitude,
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

    fn instant(cap: f64) -> TimingProfile {
        TimingProfile {
            onset_tc: 0.0,
            decay: DecayCurve::Exponential { half_life: 600.0 },
            stack_cap: cap,
        }
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
    fn test_reference_dose_full_effect() {
        let store = StateStore::at_baseline();
        let mut registry = ConditionRegistry::new(0.01);
        registry.spawn(
            Condition::new(ConditionKind::KetamineDose, 100.0, 0.0).with_timing(instant(1.5)),
        );
        let ctx = EffectContext {
            state: &store,
            conditions: &registry,
            now: 1.0,
        };
        let mut out = Vec::new();
        DrugEffect::ketamine().contribute(&ctx, &mut out);
        assert!((hr_delta(&out) - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_stacked_doses_saturate_at_cap() {
        let store = StateStore::at_baseline();
        let mut registry = ConditionRegistry::new(0.01);
        for _ in 0..3 {
            registry.spawn(
                Condition::new(ConditionKind::KetamineDose, 100.0, 0.0).with_timing(instant(1.5)),
            );
        }
        let ctx = EffectContext {
            state: &store,
            conditions: &registry,
            now: 1.0,
        };
        let mut out = Vec::new();
        DrugEffect::ketamine().contribute(&ctx, &mut out);
        // Three full doses, cap 1.5x: +30 not +60
        assert!((hr_delta(&out) - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_morphine_slows_the_rate() {
        let store = StateStore::at_baseline();
        let mut registry = ConditionRegistry::new(0.01);
        registry.spawn(
            Condition::new(ConditionKind::MorphineDose, 10.0, 0.0).with_timing(instant(1.5)),
        );
        let ctx = EffectContext {
            state: &store,
            conditions: &registry,
            now: 1.0,
        };
        let mut out = Vec::new();
        DrugEffect::morphine().contribute(&ctx, &mut out);
        assert!((hr_delta(&out) + 15.0).abs() < 1e-9);
    }
}
