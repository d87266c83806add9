//! The closed set of tracked physiological quantities
//!
//! Every scalar the engine tracks is named here, with its unit, clamp
//! range, and healthy baseline. Effect modules read these values but never
//! write them; all mutation goes through the state store.

use serde::{Deserialize, Serialize};

/// A named scalar in the physiological state vector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quantity {
    /// Intrinsic sinus rate before any condition effect (bpm)
    HeartRateBaseline,
    /// Systolic blood pressure (mmHg)
    SystolicBp,
    /// Diastolic blood pressure (mmHg)
    DiastolicBp,
    /// Circulating blood volume as percent of normal
    BloodVolumePct,
    /// Serum potassium (mEq/L)
    SerumPotassium,
    /// Serum calcium (mg/dL)
    SerumCalcium,
    /// Serum magnesium (mg/dL)
    SerumMagnesium,
    /// Core body temperature (degrees C)
    CoreTempC,
    /// Arterial oxygen tension PaO2 (mmHg)
    ArterialO2,
    /// Arterial carbon dioxide tension PaCO2 (mmHg)
    ArterialCo2,
    /// Arterial pH
    ArterialPh,
    /// Intracranial pressure (mmHg)
    Icp,
    /// Circulating stress-hormone index, 0 calm to 1 maximal
    StressIndex,
    /// Ketamine effect-site level (mg)
    KetaminePlasma,
    /// Morphine effect-site level (mg)
    MorphinePlasma,
    /// Atropine effect-site level (mg)
    AtropinePlasma,
    /// Epinephrine effect-site level (mg)
    EpinephrinePlasma,
}

/// Declared unit, clamp range, and healthy baseline for one quantity
#[derive(Debug, Clone, Copy)]
pub struct QuantityDef {
    pub unit: &'static str,
    pub min: f64,
    pub max: f64,
    pub baseline: f64,
}

impl Quantity {
    pub const COUNT: usize = 17;

    pub const ALL: [Quantity; Self::COUNT] = [
        Quantity::HeartRateBaseline,
        Quantity::SystolicBp,
        Quantity::DiastolicBp,
        Quantity::BloodVolumePct,
        Quantity::SerumPotassium,
        Quantity::SerumCalcium,
        Quantity::SerumMagnesium,
        Quantity::CoreTempC,
        Quantity::ArterialO2,
        Quantity::ArterialCo2,
        Quantity::ArterialPh,
        Quantity::Icp,
        Quantity::StressIndex,
        Quantity::KetaminePlasma,
        Quantity::MorphinePlasma,
        Quantity::AtropinePlasma,
        Quantity::EpinephrinePlasma,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn def(self) -> QuantityDef {
        match self {
            Quantity::HeartRateBaseline => QuantityDef {
                unit: "bpm",
                min: 20.0,
                max: 250.0,
                baseline: 80.0,
            },
            Quantity::SystolicBp => QuantityDef {
                unit: "mmHg",
                min: 0.0,
                max: 300.0,
                baseline: 120.0,
            },
            Quantity::DiastolicBp => QuantityDef {
                unit: "mmHg",
                min: 0.0,
                max: 200.0,
                baseline: 80.0,
            },
            Quantity::BloodVolumePct => QuantityDef {
                unit: "%",
                min: 0.0,
                max: 100.0,
                baseline: 100.0,
            },
            Quantity::SerumPotassium => QuantityDef {
                unit: "mEq/L",
                min: 1.5,
                max: 10.0,
                baseline: 4.0,
            },
            Quantity::SerumCalcium => QuantityDef {
                unit: "mg/dL",
                min: 4.0,
                max: 14.0,
                baseline: 9.5,
            },
            Quantity::SerumMagnesium => QuantityDef {
                unit: "mg/dL",
                min: 0.5,
                max: 5.0,
                baseline: 2.0,
            },
            Quantity::CoreTempC => QuantityDef {
                unit: "degC",
                min: 18.0,
                max: 43.0,
                baseline: 37.0,
            },
            Quantity::ArterialO2 => QuantityDef {
                unit: "mmHg",
                min: 20.0,
                max: 600.0,
                baseline: 95.0,
            },
            Quantity::ArterialCo2 => QuantityDef {
                unit: "mmHg",
                min: 10.0,
                max: 130.0,
                baseline: 40.0,
            },
            Quantity::ArterialPh => QuantityDef {
                unit: "pH",
                min: 6.6,
                max: 7.9,
                baseline: 7.40,
            },
            Quantity::Icp => QuantityDef {
                unit: "mmHg",
                min: 0.0,
                max: 80.0,
                baseline: 10.0,
            },
            Quantity::StressIndex => QuantityDef {
                unit: "index",
                min: 0.0,
                max: 1.0,
                baseline: 0.0,
            },
            Quantity::KetaminePlasma => QuantityDef {
                unit: "mg",
                min: 0.0,
                max: 1000.0,
                baseline: 0.0,
            },
            Quantity::MorphinePlasma => QuantityDef {
                unit: "mg",
                min: 0.0,
                max: 200.0,
                baseline: 0.0,
            },
            Quantity::AtropinePlasma => QuantityDef {
                unit: "mg",
                min: 0.0,
                max: 20.0,
                baseline: 0.0,
            },
            Quantity::EpinephrinePlasma => QuantityDef {
                unit: "mg",
                min: 0.0,
                max: 20.0,
                baseline: 0.0,
            },
        }
    }

    /// Elimination half-life in seconds, for drug effect-site levels only
    pub fn elimination_half_life(self) -> Option<f64> {
        match self {
            Quantity::KetaminePlasma => Some(600.0),
            Quantity::MorphinePlasma => Some(7200.0),
            Quantity::AtropinePlasma => Some(9000.0),
            Quantity::EpinephrinePlasma => Some(180.0),
            _ => None,
        }
    }
}
