//! The aggregated per-step EKG parameter target
//!
//! This is the sole artifact handed to the external waveform, artifact,
//! and plotting collaborators each step. It is a plain value: emit it,
//! clone it across a thread boundary if needed, never mutate it in place.

use crate::core::types::SimSeconds;
use crate::effects::contribution::{ArrhythmiaMode, PShape, QrsShape, StShape, TWaveShape};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EkgParameterTarget {
    pub time: SimSeconds,
    pub heart_rate_bpm: f64,

    pub p_amplitude_factor: f64,
    pub p_morphology: PShape,
    pub qrs_amplitude_factor: f64,
    pub qrs_morphology: QrsShape,
    pub t_amplitude_factor: f64,
    pub t_morphology: TWaveShape,
    pub u_wave_present: bool,
    pub osborn_wave_present: bool,

    pub pr_interval_ms: f64,
    pub qrs_duration_ms: f64,
    pub qt_interval_ms: f64,
    /// Bazett rate-corrected QT
    pub qtc_ms: f64,

    /// Signed deviation: positive elevation, negative depression (mV)
    pub st_deviation_mv: f64,
    pub st_shape: StShape,

    pub axis_degrees: f64,
    pub rhythm: ArrhythmiaMode,
}

/// Interval baselines the additive deltas build on (ms / degrees)
pub const BASELINE_PR_MS: f64 = 160.0;
pub const BASELINE_QRS_MS: f64 = 100.0;
pub const BASELINE_QT_MS: f64 = 440.0;
pub const BASELINE_AXIS_DEG: f64 = 60.0;

impl EkgParameterTarget {
    /// A healthy sinus target at the given intrinsic rate
    pub fn baseline(time: SimSeconds, heart_rate_bpm: f64) -> Self {
        Self {
            time,
            heart_rate_bpm,
            p_amplitude_factor: 1.0,
            p_morphology: PShape::Normal,
            qrs_amplitude_factor: 1.0,
            qrs_morphology: QrsShape::Normal,
            t_amplitude_factor: 1.0,
            t_morphology: TWaveShape::Normal,
            u_wave_present: false,
            osborn_wave_present: false,
            pr_interval_ms: BASELINE_PR_MS,
            qrs_duration_ms: BASELINE_QRS_MS,
            qt_interval_ms: BASELINE_QT_MS,
            qtc_ms: bazett(BASELINE_QT_MS, heart_rate_bpm),
            st_deviation_mv: 0.0,
            st_shape: StShape::Isoelectric,
            axis_degrees: BASELINE_AXIS_DEG,
            rhythm: ArrhythmiaMode::NormalSinus,
        }
    }
}

/// Bazett correction: QTc = QT / sqrt(RR seconds)
pub fn bazett(qt_ms: f64, heart_rate_bpm: f64) -> f64 {
    if heart_rate_bpm <= 0.0 {
        return qt_ms;
    }
    let rr_sec = 60.0 / heart_rate_bpm;
    qt_ms / rr_sec.sqrt()
}
