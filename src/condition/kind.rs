//! The closed set of condition kinds and their per-kind tables
//!
//! A condition is an injury, systemic stressor, or intervention instance.
//! Each kind declares its onset/decay timing, how stacked instances cap,
//! what quantity it passively drives, and what a valid severity means.

use crate::physiology::quantity::Quantity;
use serde::{Deserialize, Serialize};

/// Kind of injury, stressor, or intervention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionKind {
    /// Severity: percent points of blood volume lost per minute at full weight
    Hemorrhage,
    /// Severity: extent 0..1; drives PaO2 down while active
    TensionPneumothorax,
    /// Severity: extent 0..1 (myocardial contusion)
    BluntCardiacInjury,
    /// Severity: target intracranial pressure in mmHg
    TraumaticBrainInjury,
    /// Severity: extent 0..1; at 0.5 and above coronary air embolism is suspected
    BlastInjury,
    /// Severity: extent 0..1; drives serum potassium up while active
    CrushInjury,
    /// Severity: target core temperature in degrees C
    HypothermiaExposure,
    /// Severity: target stress-hormone index 0..1
    StressResponse,
    /// Severity: dose in mg
    KetamineDose,
    /// Severity: dose in mg
    MorphineDose,
    /// Severity: dose in mg
    AtropineDose,
    /// Severity: dose in mg
    EpinephrineDose,
}

/// How a resolving condition's weight decays from peak
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DecayCurve {
    /// Weight halves every `half_life` seconds after resolution begins
    Exponential { half_life: f64 },
    /// Weight falls linearly to zero over `duration` seconds
    Linear { duration: f64 },
}

/// Onset/decay timing and stacking behavior for a condition kind
#[derive(Debug, Clone, Copy)]
pub struct TimingProfile {
    /// Seconds from onset until the effect curve reaches full weight
    pub onset_tc: f64,
    pub decay: DecayCurve,
    /// Cap on the summed weight of coexisting instances of this kind
    pub stack_cap: f64,
}

/// Passive drift a condition exerts on one state quantity
#[derive(Debug, Clone, Copy)]
pub struct DriftSpec {
    pub quantity: Quantity,
    /// Value the quantity is dragged toward at full lifecycle weight
    pub target: f64,
}

impl ConditionKind {
    pub const ALL: [ConditionKind; 12] = [
        ConditionKind::Hemorrhage,
        ConditionKind::TensionPneumothorax,
        ConditionKind::BluntCardiacInjury,
        ConditionKind::TraumaticBrainInjury,
        ConditionKind::BlastInjury,
        ConditionKind::CrushInjury,
        ConditionKind::HypothermiaExposure,
        ConditionKind::StressResponse,
        ConditionKind::KetamineDose,
        ConditionKind::MorphineDose,
        ConditionKind::AtropineDose,
        ConditionKind::EpinephrineDose,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ConditionKind::Hemorrhage => "Hemorrhage",
            ConditionKind::TensionPneumothorax => "Tension pneumothorax",
            ConditionKind::BluntCardiacInjury => "Blunt cardiac injury",
            ConditionKind::TraumaticBrainInjury => "Traumatic brain injury",
            ConditionKind::BlastInjury => "Blast injury",
            ConditionKind::CrushInjury => "Crush injury",
            ConditionKind::HypothermiaExposure => "Hypothermia exposure",
            ConditionKind::StressResponse => "Stress response",
            ConditionKind::KetamineDose => "Ketamine",
            ConditionKind::MorphineDose => "Morphine",
            ConditionKind::AtropineDose => "Atropine",
            ConditionKind::EpinephrineDose => "Epinephrine",
        }
    }

    pub fn timing(self) -> TimingProfile {
        match self {
            ConditionKind::Hemorrhage => TimingProfile {
                onset_tc: 15.0,
                decay: DecayCurve::Exponential { half_life: 90.0 },
                stack_cap: 1.0,
            },
            ConditionKind::TensionPneumothorax => TimingProfile {
                onset_tc: 60.0,
                decay: DecayCurve::Exponential { half_life: 45.0 },
                stack_cap: 1.0,
            },
            ConditionKind::BluntCardiacInjury => TimingProfile {
                onset_tc: 120.0,
                decay: DecayCurve::Exponential { half_life: 3600.0 },
                stack_cap: 1.0,
            },
            ConditionKind::TraumaticBrainInjury => TimingProfile {
                onset_tc: 300.0,
                decay: DecayCurve::Exponential { half_life: 1800.0 },
                stack_cap: 1.0,
            },
            ConditionKind::BlastInjury => TimingProfile {
                onset_tc: 30.0,
                decay: DecayCurve::Exponential { half_life: 900.0 },
                stack_cap: 1.0,
            },
            ConditionKind::CrushInjury => TimingProfile {
                onset_tc: 60.0,
                decay: DecayCurve::Exponential { half_life: 600.0 },
                stack_cap: 1.0,
            },
            ConditionKind::HypothermiaExposure => TimingProfile {
                onset_tc: 120.0,
                decay: DecayCurve::Linear { duration: 600.0 },
                stack_cap: 1.0,
            },
            ConditionKind::StressResponse => TimingProfile {
                onset_tc: 10.0,
                decay: DecayCurve::Exponential { half_life: 120.0 },
                stack_cap: 1.0,
            },
            ConditionKind::KetamineDose => TimingProfile {
                onset_tc: 45.0,
                decay: DecayCurve::Exponential { half_life: 600.0 },
                stack_cap: 1.5,
            },
            ConditionKind::MorphineDose => TimingProfile {
                onset_tc: 300.0,
                decay: DecayCurve::Exponential { half_life: 7200.0 },
                stack_cap: 1.5,
            },
            ConditionKind::AtropineDose => TimingProfile {
                onset_tc: 60.0,
                decay: DecayCurve::Exponential { half_life: 9000.0 },
                stack_cap: 1.5,
            },
            ConditionKind::EpinephrineDose => TimingProfile {
                onset_tc: 15.0,
                decay: DecayCurve::Exponential { half_life: 180.0 },
                stack_cap: 2.0,
            },
        }
    }

    /// Passive drift this kind exerts on a state quantity, if any
    pub fn drift(self, severity: f64) -> Option<DriftSpec> {
        match self {
            ConditionKind::TensionPneumothorax => Some(DriftSpec {
                quantity: Quantity::ArterialO2,
                target: 95.0 - 55.0 * severity.clamp(0.0, 1.0),
            }),
            ConditionKind::CrushInjury => Some(DriftSpec {
                quantity: Quantity::SerumPotassium,
                target: 4.0 + 4.5 * severity.clamp(0.0, 1.0),
            }),
            ConditionKind::HypothermiaExposure => Some(DriftSpec {
                quantity: Quantity::CoreTempC,
                target: severity,
            }),
            ConditionKind::StressResponse => Some(DriftSpec {
                quantity: Quantity::StressIndex,
                target: severity.clamp(0.0, 1.0),
            }),
            ConditionKind::TraumaticBrainInjury => Some(DriftSpec {
                quantity: Quantity::Icp,
                target: severity,
            }),
            _ => None,
        }
    }

    /// Plasma-level quantity bolused when a dose of this kind is spawned
    pub fn dose_quantity(self) -> Option<Quantity> {
        match self {
            ConditionKind::KetamineDose => Some(Quantity::KetaminePlasma),
            ConditionKind::MorphineDose => Some(Quantity::MorphinePlasma),
            ConditionKind::AtropineDose => Some(Quantity::AtropinePlasma),
            ConditionKind::EpinephrineDose => Some(Quantity::EpinephrinePlasma),
            _ => None,
        }
    }

    /// Typical single dose in mg, used to normalize drug effect magnitude
    pub fn reference_dose(self) -> Option<f64> {
        match self {
            ConditionKind::KetamineDose => Some(100.0),
            ConditionKind::MorphineDose => Some(10.0),
            ConditionKind::AtropineDose => Some(1.0),
            ConditionKind::EpinephrineDose => Some(1.0),
            _ => None,
        }
    }

    /// Duration after which the condition resolves on its own, if any
    ///
    /// Drug doses wear off; injuries persist until an explicit resolution
    /// event (hemorrhage control, decompression, rewarming) fires.
    pub fn default_duration(self) -> Option<f64> {
        match self {
            ConditionKind::KetamineDose => Some(600.0),
            ConditionKind::MorphineDose => Some(1800.0),
            ConditionKind::AtropineDose => Some(1800.0),
            ConditionKind::EpinephrineDose => Some(120.0),
            _ => None,
        }
    }

    /// Check a scenario-declared severity against this kind's valid range
    pub fn validate_severity(self, severity: f64) -> Result<(), String> {
        if severity < 0.0 {
            return Err(format!("negative severity {} for {}", severity, self.label()));
        }
        let range = match self {
            ConditionKind::Hemorrhage => (0.0, 30.0),
            ConditionKind::TensionPneumothorax
            | ConditionKind::BluntCardiacInjury
            | ConditionKind::BlastInjury
            | ConditionKind::CrushInjury
            | ConditionKind::StressResponse => (0.0, 1.0),
            ConditionKind::TraumaticBrainInjury => (0.0, 80.0),
            ConditionKind::HypothermiaExposure => (18.0, 37.0),
            ConditionKind::KetamineDose => (0.0, 500.0),
            ConditionKind::MorphineDose => (0.0, 50.0),
            ConditionKind::AtropineDose => (0.0, 5.0),
            ConditionKind::EpinephrineDose => (0.0, 5.0),
        };
        if severity < range.0 || severity > range.1 {
            return Err(format!(
                "severity {} for {} outside valid range [{}, {}]",
                severity,
                self.label(),
                range.0,
                range.1
            ));
        }
        Ok(())
    }
}
