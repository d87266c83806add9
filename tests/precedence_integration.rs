//! Multi-condition composition and morphology precedence
//!
//! Scripted state pushes several effect mechanisms at once; the composed
//! target must sum numeric deltas and settle conflicting morphology votes
//! deterministically.

use corpsman::core::config::EngineConfig;
use corpsman::effects::contribution::{ArrhythmiaMode, QrsShape, TWaveShape, VoteClass};
use corpsman::engine::Engine;
use corpsman::physiology::quantity::Quantity;

#[test]
fn test_shock_plus_hyperkalemia_compose() {
    let mut engine = Engine::new(EngineConfig::default(), 5).unwrap();
    // Class III loss scripted directly, plus moderate-severe hyperkalemia
    engine.set_quantity(Quantity::BloodVolumePct, 70.0);
    engine.set_quantity(Quantity::SerumPotassium, 7.5);

    let output = engine.step_frame(0.1).unwrap();
    let t = &output.target;

    // Shock contributes +45 bpm, hyperkalemia -20 bpm: net 105
    assert!((t.heart_rate_bpm - 105.0).abs() < 1.5, "HR {}", t.heart_rate_bpm);

    // Both mechanisms vote on the T wave; the electrolyte-class peaked
    // T outranks the ischemic nonspecific change
    assert_eq!(t.t_morphology, TWaveShape::Peaked);

    // Hyperkalemia at 7.5 widens the QRS
    assert_eq!(t.qrs_morphology, QrsShape::Widened);
    assert!(t.qrs_duration_ms > 100.0);

    // Ischemic ST depression from shock survives alongside
    assert!(t.st_deviation_mv < -0.05);

    assert_eq!(t.rhythm, ArrhythmiaMode::SinusTachycardia);
}

#[test]
fn test_reordered_precedence_flips_equal_votes() {
    // With ischemia promoted above electrolytes, an equal-weight T-wave
    // conflict resolves the other way
    let mut config = EngineConfig::default();
    config.precedence = [
        VoteClass::LifeThreat,
        VoteClass::Ischemic,
        VoteClass::Electrolyte,
        VoteClass::Structural,
        VoteClass::Baseline,
    ];
    assert!(config.validate().is_ok());

    use corpsman::compositor::Compositor;
    use corpsman::effects::contribution::{EffectContribution, MorphologyVote};

    let contributions = [
        EffectContribution::vote(
            MorphologyVote::TWave(TWaveShape::Peaked),
            0.5,
            VoteClass::Electrolyte,
        ),
        EffectContribution::vote(
            MorphologyVote::TWave(TWaveShape::Inverted),
            0.5,
            VoteClass::Ischemic,
        ),
    ];

    let flipped = Compositor::new(config)
        .compose(0.0, 80.0, &contributions, None)
        .target;
    assert_eq!(flipped.t_morphology, TWaveShape::Inverted);

    let shipped = Compositor::new(EngineConfig::default())
        .compose(0.0, 80.0, &contributions, None)
        .target;
    assert_eq!(shipped.t_morphology, TWaveShape::Peaked);
}

#[test]
fn test_severe_hyperkalemia_sine_wave_outranks_everything() {
    let mut engine = Engine::new(EngineConfig::default(), 5).unwrap();
    engine.set_quantity(Quantity::BloodVolumePct, 70.0);
    engine.set_quantity(Quantity::SerumPotassium, 9.0);

    let output = engine.step_frame(0.1).unwrap();
    // Pre-terminal sine-wave pattern carries a life-threat class vote
    assert_eq!(output.target.rhythm, ArrhythmiaMode::SineWave);
}

#[test]
fn test_hypothermia_osborn_and_bradycardia() {
    let mut engine = Engine::new(EngineConfig::default(), 5).unwrap();
    engine.set_quantity(Quantity::CoreTempC, 30.0);

    let output = engine.step_frame(0.1).unwrap();
    let t = &output.target;
    assert!(t.osborn_wave_present);
    assert!(t.heart_rate_bpm < 55.0, "HR {}", t.heart_rate_bpm);
    assert_eq!(t.rhythm, ArrhythmiaMode::SinusBradycardia);
    // Uniform interval prolongation
    assert!(t.pr_interval_ms > 160.0);
    assert!(t.qt_interval_ms > 440.0);
}
