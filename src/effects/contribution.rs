//! Effect contributions and the vocabulary they are expressed in
//!
//! A contribution is one rule's partial update to the target parameter
//! vector: an additive delta, a multiplicative amplitude scale, a weighted
//! categorical vote, or a rhythm-change hazard. Contributions are ephemeral,
//! recomputed every step, and each constructor clamps its payload to the
//! declared safe sub-range so a runaway rule cannot corrupt the composite.

use serde::{Deserialize, Serialize};

/// Numeric parameters combined additively
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NumericParam {
    /// Signed heart-rate delta (bpm)
    HeartRate,
    /// Signed ST deviation (mV, positive = elevation)
    StDeviation,
    /// PR interval delta (ms)
    PrInterval,
    /// QRS duration delta (ms)
    QrsDuration,
    /// QT interval delta (ms)
    QtInterval,
    /// Electrical axis delta (degrees)
    Axis,
}

/// Wave amplitudes combined multiplicatively
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ScaleParam {
    PAmplitude,
    QrsAmplitude,
    TAmplitude,
}

/// Precedence class of a categorical vote, used only to break weight ties
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoteClass {
    Baseline,
    /// Structural or direct-injury morphology (contusion, cerebral T-waves)
    Structural,
    /// Ischemia-driven morphology (shock ST changes, infarct patterns)
    Ischemic,
    /// Electrolyte-driven morphology (peaked T, widened QRS)
    Electrolyte,
    /// Life-threatening arrhythmia patterns
    LifeThreat,
}

impl VoteClass {
    pub const ALL: [VoteClass; 5] = [
        VoteClass::Baseline,
        VoteClass::Structural,
        VoteClass::Ischemic,
        VoteClass::Electrolyte,
        VoteClass::LifeThreat,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TWaveShape {
    Normal,
    Peaked,
    Cerebral,
    Flattened,
    Inverted,
    Nonspecific,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QrsShape {
    Normal,
    Widened,
    LowVoltage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PShape {
    Normal,
    Flattened,
    Absent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StShape {
    Isoelectric,
    HorizontalDepression,
    DownslopingDepression,
    ConvexElevation,
}

/// Rhythm tag consumed by waveform synthesis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrhythmiaMode {
    NormalSinus,
    SinusTachycardia,
    SinusBradycardia,
    AtrialFibrillation,
    VentricularTachycardia,
    TorsadesDePointes,
    VentricularFibrillation,
    SineWave,
    Asystole,
}

impl ArrhythmiaMode {
    /// Fixed iteration order for deterministic risk sampling
    pub const ALL: [ArrhythmiaMode; 9] = [
        ArrhythmiaMode::NormalSinus,
        ArrhythmiaMode::SinusTachycardia,
        ArrhythmiaMode::SinusBradycardia,
        ArrhythmiaMode::AtrialFibrillation,
        ArrhythmiaMode::VentricularTachycardia,
        ArrhythmiaMode::TorsadesDePointes,
        ArrhythmiaMode::VentricularFibrillation,
        ArrhythmiaMode::SineWave,
        ArrhythmiaMode::Asystole,
    ];

    /// Terminal rhythms have no meaningful numeric heart rate; the
    /// compositor overrides the rate entirely when one is in force.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ArrhythmiaMode::VentricularFibrillation | ArrhythmiaMode::Asystole
        )
    }
}

/// One categorical vote target
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum MorphologyVote {
    TWave(TWaveShape),
    Qrs(QrsShape),
    PWave(PShape),
    StSegment(StShape),
    Rhythm(ArrhythmiaMode),
    OsbornWave,
    UWave,
}

/// One rule's partial update to the target vector
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum EffectContribution {
    Additive {
        param: NumericParam,
        delta: f64,
    },
    Scale {
        param: ScaleParam,
        factor: f64,
    },
    Vote {
        vote: MorphologyVote,
        weight: f64,
        class: VoteClass,
    },
    /// Per-second hazard of the rhythm taking over
    Risk {
        rhythm: ArrhythmiaMode,
        hazard: f64,
    },
}

/// Widest delta any single module may contribute per parameter
fn module_limit(param: NumericParam) -> f64 {
    match param {
        NumericParam::HeartRate => 120.0,
        NumericParam::StDeviation => 0.5,
        NumericParam::PrInterval => 250.0,
        NumericParam::QrsDuration => 150.0,
        NumericParam::QtInterval => 250.0,
        NumericParam::Axis => 120.0,
    }
}

impl EffectContribution {
    pub fn additive(param: NumericParam, delta: f64) -> Self {
        let limit = module_limit(param);
        Self::Additive {
            param,
            delta: delta.clamp(-limit, limit),
        }
    }

    pub fn scale(param: ScaleParam, factor: f64) -> Self {
        Self::Scale {
            param,
            factor: factor.clamp(0.2, 3.0),
        }
    }

    pub fn vote(vote: MorphologyVote, weight: f64, class: VoteClass) -> Self {
        Self::Vote {
            vote,
            weight: weight.clamp(0.0, 2.0),
            class,
        }
    }

    pub fn risk(rhythm: ArrhythmiaMode, hazard: f64) -> Self {
        Self::Risk {
            rhythm,
            hazard: hazard.clamp(0.0, 0.5),
        }
    }
}
