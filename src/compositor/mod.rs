//! Composition of effect contributions into one parameter target
//!
//! Every step the engine hands this module the full contribution list from
//! every triggered effect rule. Numeric deltas sum onto baselines, amplitude
//! scales multiply, categorical votes are tallied by weight with the
//! configured class precedence breaking ties, and rhythm hazards combine by
//! survival product. The output is a single [`EkgParameterTarget`] plus the
//! combined hazards (the engine owns the dice) and a record of any final
//! clamps that fired.

pub mod target;

use crate::core::config::EngineConfig;
use crate::core::types::SimSeconds;
use crate::effects::contribution::{
    ArrhythmiaMode, EffectContribution, MorphologyVote, NumericParam, PShape, QrsShape, ScaleParam,
    StShape, TWaveShape,
};
use target::{bazett, EkgParameterTarget, BASELINE_AXIS_DEG, BASELINE_PR_MS, BASELINE_QRS_MS,
    BASELINE_QT_MS};

/// Final physiologic ranges for the composed intervals (ms) and ST (mV)
const QT_RANGE: (f64, f64) = (280.0, 650.0);
const PR_RANGE: (f64, f64) = (80.0, 400.0);
const QRS_RANGE: (f64, f64) = (60.0, 200.0);
const ST_RANGE: (f64, f64) = (-0.5, 0.5);
const AXIS_RANGE: (f64, f64) = (-90.0, 180.0);

/// Minimum total weight before a flag vote (Osborn, U wave) shows
const FLAG_THRESHOLD: f64 = 0.5;

/// A final-stage clamp that fired while composing
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeClamp {
    pub param: &'static str,
    pub requested: f64,
    pub actual: f64,
}

/// Result of one composition pass
#[derive(Debug, Clone)]
pub struct Composition {
    pub target: EkgParameterTarget,
    /// Combined per-second hazard for each rhythm that received any risk
    pub rhythm_hazards: Vec<(ArrhythmiaMode, f64)>,
    pub clamps: Vec<CompositeClamp>,
}

/// Weighted tally for one categorical slot
struct Ballot<T: Copy + PartialEq> {
    // (tag, total weight, best precedence rank seen for the tag)
    entries: Vec<(T, f64, usize)>,
}

impl<T: Copy + PartialEq> Ballot<T> {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    fn cast(&mut self, tag: T, weight: f64, rank: usize) {
        match self.entries.iter_mut().find(|(t, _, _)| *t == tag) {
            Some((_, total, best_rank)) => {
                *total += weight;
                *best_rank = (*best_rank).min(rank);
            }
            None => self.entries.push((tag, weight, rank)),
        }
    }

    /// Heaviest tag wins; weight ties go to the better precedence rank,
    /// remaining ties to the tag cast first. Deterministic for any input
    /// order that is itself deterministic.
    fn winner(&self) -> Option<T> {
        let mut best: Option<(T, f64, usize)> = None;
        for &(tag, weight, rank) in &self.entries {
            let replace = match best {
                None => true,
                Some((_, bw, br)) => {
                    weight > bw + 1e-9 || ((weight - bw).abs() <= 1e-9 && rank < br)
                }
            };
            if replace {
                best = Some((tag, weight, rank));
            }
        }
        best.map(|(tag, _, _)| tag)
    }
}

pub struct Compositor {
    config: EngineConfig,
}

impl Compositor {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Fold all contributions for this step into one target.
    ///
    /// `baseline_hr` is the casualty's intrinsic rate; `latched` is a
    /// terminal-or-sustained rhythm the engine has already committed to,
    /// which outranks every vote.
    pub fn compose(
        &self,
        now: SimSeconds,
        baseline_hr: f64,
        contributions: &[EffectContribution],
        latched: Option<ArrhythmiaMode>,
    ) -> Composition {
        let mut hr_delta = 0.0;
        let mut st_delta = 0.0;
        let mut pr_delta = 0.0;
        let mut qrs_delta = 0.0;
        let mut qt_delta = 0.0;
        let mut axis_delta = 0.0;

        let mut p_scale = 1.0;
        let mut qrs_scale = 1.0;
        let mut t_scale = 1.0;

        let mut t_votes: Ballot<TWaveShape> = Ballot::new();
        let mut qrs_votes: Ballot<QrsShape> = Ballot::new();
        let mut p_votes: Ballot<PShape> = Ballot::new();
        let mut st_votes: Ballot<StShape> = Ballot::new();
        let mut rhythm_votes: Ballot<ArrhythmiaMode> = Ballot::new();
        let mut osborn_weight = 0.0;
        let mut u_wave_weight = 0.0;

        let mut hazards: Vec<(ArrhythmiaMode, f64)> = Vec::new();

        for contribution in contributions {
            match *contribution {
                EffectContribution::Additive { param, delta } => match param {
                    NumericParam::HeartRate => hr_delta += delta,
                    NumericParam::StDeviation => st_delta += delta,
                    NumericParam::PrInterval => pr_delta += delta,
                    NumericParam::QrsDuration => qrs_delta += delta,
                    NumericParam::QtInterval => qt_delta += delta,
                    NumericParam::Axis => axis_delta += delta,
                },
                EffectContribution::Scale { param, factor } => match param {
                    ScaleParam::PAmplitude => p_scale *= factor,
                    ScaleParam::QrsAmplitude => qrs_scale *= factor,
                    ScaleParam::TAmplitude => t_scale *= factor,
                },
                EffectContribution::Vote {
                    vote,
                    weight,
                    class,
                } => {
                    let rank = self.config.precedence_rank(class);
                    match vote {
                        MorphologyVote::TWave(shape) => t_votes.cast(shape, weight, rank),
                        MorphologyVote::Qrs(shape) => qrs_votes.cast(shape, weight, rank),
                        MorphologyVote::PWave(shape) => p_votes.cast(shape, weight, rank),
                        MorphologyVote::StSegment(shape) => st_votes.cast(shape, weight, rank),
                        MorphologyVote::Rhythm(mode) => rhythm_votes.cast(mode, weight, rank),
                        MorphologyVote::OsbornWave => osborn_weight += weight,
                        MorphologyVote::UWave => u_wave_weight += weight,
                    }
                }
                EffectContribution::Risk { rhythm, hazard } => {
                    match hazards.iter_mut().find(|(r, _)| *r == rhythm) {
                        // Survival product: independent sources of the
                        // same rhythm combine as 1 - prod(1 - h)
                        Some((_, combined)) => {
                            *combined = 1.0 - (1.0 - *combined) * (1.0 - hazard)
                        }
                        None => hazards.push((rhythm, hazard)),
                    }
                }
            }
        }

        let mut clamps = Vec::new();
        let mut clamp = |param: &'static str, value: f64, lo: f64, hi: f64| -> f64 {
            let actual = value.clamp(lo, hi);
            if actual != value {
                clamps.push(CompositeClamp {
                    param,
                    requested: value,
                    actual,
                });
            }
            actual
        };

        let heart_rate = clamp(
            "heart_rate",
            baseline_hr + hr_delta,
            self.config.hr_floor,
            self.config.hr_ceiling,
        );
        let st_deviation = clamp("st_deviation", st_delta, ST_RANGE.0, ST_RANGE.1);
        let pr_interval = clamp(
            "pr_interval",
            BASELINE_PR_MS + pr_delta,
            PR_RANGE.0,
            PR_RANGE.1,
        );
        let qrs_duration = clamp(
            "qrs_duration",
            BASELINE_QRS_MS + qrs_delta,
            QRS_RANGE.0,
            QRS_RANGE.1,
        );
        let qt_interval = clamp(
            "qt_interval",
            BASELINE_QT_MS + qt_delta,
            QT_RANGE.0,
            QT_RANGE.1,
        );
        let axis = clamp(
            "axis",
            BASELINE_AXIS_DEG + axis_delta,
            AXIS_RANGE.0,
            AXIS_RANGE.1,
        );

        let amp_lo = self.config.amplitude_floor;
        let amp_hi = self.config.amplitude_ceiling;
        let p_amplitude = clamp("p_amplitude", p_scale, amp_lo, amp_hi);
        let qrs_amplitude = clamp("qrs_amplitude", qrs_scale, amp_lo, amp_hi);
        let t_amplitude = clamp("t_amplitude", t_scale, amp_lo, amp_hi);

        // Latched rhythm outranks votes; votes outrank the rate-derived
        // default.
        let rhythm = latched
            .or_else(|| rhythm_votes.winner())
            .unwrap_or_else(|| default_rhythm(heart_rate));

        let heart_rate = if rhythm.is_terminal() {
            0.0
        } else {
            heart_rate
        };

        let st_shape = st_votes.winner().unwrap_or_else(|| {
            if st_deviation > 0.05 {
                StShape::ConvexElevation
            } else if st_deviation < -0.05 {
                StShape::HorizontalDepression
            } else {
                StShape::Isoelectric
            }
        });

        let target = EkgParameterTarget {
            time: now,
            heart_rate_bpm: heart_rate,
            p_amplitude_factor: p_amplitude,
            p_morphology: p_votes.winner().unwrap_or(PShape::Normal),
            qrs_amplitude_factor: qrs_amplitude,
            qrs_morphology: qrs_votes.winner().unwrap_or(QrsShape::Normal),
            t_amplitude_factor: t_amplitude,
            t_morphology: t_votes.winner().unwrap_or(TWaveShape::Normal),
            u_wave_present: u_wave_weight >= FLAG_THRESHOLD,
            osborn_wave_present: osborn_weight >= FLAG_THRESHOLD,
            pr_interval_ms: pr_interval,
            qrs_duration_ms: qrs_duration,
            qt_interval_ms: qt_interval,
            qtc_ms: bazett(qt_interval, heart_rate),
            st_deviation_mv: st_deviation,
            st_shape,
            axis_degrees: axis,
            rhythm,
        };

        Composition {
            target,
            rhythm_hazards: hazards,
            clamps,
        }
    }
}

/// Rate-derived rhythm when nothing votes and nothing is latched
fn default_rhythm(heart_rate: f64) -> ArrhythmiaMode {
    if heart_rate < 50.0 {
        ArrhythmiaMode::SinusBradycardia
    } else if heart_rate > 100.0 {
        ArrhythmiaMode::SinusTachycardia
    } else {
        ArrhythmiaMode::NormalSinus
    }
}
