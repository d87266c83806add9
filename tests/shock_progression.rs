//! Hemorrhagic shock progression
//!
//! An uncontrolled Class III hemorrhage trajectory: blood volume falls as
//! the condition integrates, and the chart walks through the ATLS shock
//! classes. After hemorrhage control the rate effect decays even though
//! the lost volume stays lost.

use corpsman::condition::kind::ConditionKind;
use corpsman::core::config::EngineConfig;
use corpsman::effects::contribution::{ArrhythmiaMode, StShape};
use corpsman::engine::Engine;
use corpsman::physiology::quantity::Quantity;

#[test]
fn test_class_three_trajectory() {
    let mut engine = Engine::new(EngineConfig::default(), 11).unwrap();
    // 6.5 percent points of volume per minute at full weight
    engine
        .inject(ConditionKind::Hemorrhage, 6.5, None)
        .unwrap();

    // Class I territory after one minute (~6% loss): mild response
    let mut output = engine.step_frame(1.0).unwrap();
    for _ in 0..59 {
        output = engine.step_frame(1.0).unwrap();
    }
    assert!(output.target.heart_rate_bpm < 100.0);

    // Five minutes in: ~32% loss, Class III
    for _ in 0..240 {
        output = engine.step_frame(1.0).unwrap();
    }
    let volume = engine.state().get(Quantity::BloodVolumePct);
    assert!((66.0..71.0).contains(&volume), "volume {}", volume);

    let t = &output.target;
    assert!(
        (120.0..140.0).contains(&t.heart_rate_bpm),
        "HR {}",
        t.heart_rate_bpm
    );
    assert!(t.st_deviation_mv < -0.10, "ST {}", t.st_deviation_mv);
    assert_eq!(t.st_shape, StShape::HorizontalDepression);
    assert_eq!(t.rhythm, ArrhythmiaMode::SinusTachycardia);
}

#[test]
fn test_hemorrhage_control_decays_the_response() {
    let mut engine = Engine::new(EngineConfig::default(), 11).unwrap();
    engine
        .inject(ConditionKind::Hemorrhage, 6.5, None)
        .unwrap();
    engine.step_frame(300.0).unwrap();

    let peak_hr = engine.step_frame(1.0).unwrap().target.heart_rate_bpm;
    let volume_at_control = engine.state().get(Quantity::BloodVolumePct);

    // Tourniquet on: the condition starts decaying (90 s half-life)
    engine.resolve(ConditionKind::Hemorrhage);
    let mut output = engine.step_frame(1.0).unwrap();
    for _ in 0..299 {
        output = engine.step_frame(1.0).unwrap();
    }

    // Rate effect has mostly worn off with the lifecycle weight
    assert!(output.target.heart_rate_bpm < peak_hr - 30.0);
    assert!(output.target.heart_rate_bpm < 105.0);

    // The lost volume does not come back, and a little more bled out
    // during the decaying tail
    let volume_after = engine.state().get(Quantity::BloodVolumePct);
    assert!(volume_after < volume_at_control);
    assert!(volume_after > 50.0, "volume {}", volume_after);
}

#[test]
fn test_loss_fraction_monotone_while_uncontrolled() {
    let mut engine = Engine::new(EngineConfig::default(), 11).unwrap();
    engine
        .inject(ConditionKind::Hemorrhage, 4.0, None)
        .unwrap();

    let mut previous = engine.state().blood_loss_fraction();
    for _ in 0..120 {
        engine.step_frame(1.0).unwrap();
        let loss = engine.state().blood_loss_fraction();
        assert!(loss >= previous);
        previous = loss;
    }
    assert!(previous > 0.05);
}
