//! The simulation engine
//!
//! Owns the clock, the state store, the condition registry, the scheduler,
//! the effect table, and the compositor, and runs them in a fixed order
//! every step. External frame intervals are subdivided so no internal step
//! exceeds the configured maximum, which keeps onset ramps and drift
//! integration step-size independent in practice.
//!
//! The only randomness in the whole system is the rhythm-risk draw, fed by
//! a counter-based generator seeded from the scenario. Two runs of the same
//! scenario with the same step sizes produce identical output.

pub mod audit;

use crate::compositor::target::{bazett, EkgParameterTarget};
use crate::compositor::Compositor;
use crate::condition::kind::ConditionKind;
use crate::condition::lifecycle::Condition;
use crate::condition::registry::ConditionRegistry;
use crate::core::config::EngineConfig;
use crate::core::error::{Result, SimError};
use crate::core::types::{ConditionId, EventId, SimSeconds};
use crate::effects::context::EffectContext;
use crate::effects::contribution::ArrhythmiaMode;
use crate::effects::{evaluate_all, standard_modules, uncovered_kinds, EffectModule};
use crate::physiology::quantity::Quantity;
use crate::physiology::state::{Mutation, StateStore};
use crate::scenario::Scenario;
use crate::scheduler::event::{EventKind, ScheduledEvent};
use crate::scheduler::EventScheduler;
use audit::{AuditEvent, AuditLog};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::info;

/// Entries the audit log retains before discarding the oldest
const AUDIT_CAPACITY: usize = 4096;

/// What one external frame produced
#[derive(Debug, Clone)]
pub struct StepOutput {
    /// Target composed at the end of the frame's last substep
    pub target: EkgParameterTarget,
    /// Human-readable annotations accumulated across the frame's substeps
    pub annotations: Vec<String>,
}

pub struct Engine {
    config: EngineConfig,
    modules: Vec<Box<dyn EffectModule>>,
    compositor: Compositor,
    state: StateStore,
    conditions: ConditionRegistry,
    scheduler: EventScheduler,
    audit: AuditLog,
    rng: ChaCha8Rng,
    now: SimSeconds,
    /// Rhythm committed by a risk draw; terminal modes are absorbing
    latched: Option<ArrhythmiaMode>,
    /// Kinds already flagged as uncovered, to warn once per appearance
    warned_uncovered: Vec<ConditionKind>,
}

impl Engine {
    pub fn new(config: EngineConfig, seed: u64) -> Result<Self> {
        config.validate().map_err(SimError::InvariantViolation)?;
        Ok(Self {
            compositor: Compositor::new(config.clone()),
            conditions: ConditionRegistry::new(config.resolve_epsilon),
            config,
            modules: standard_modules(),
            state: StateStore::at_baseline(),
            scheduler: EventScheduler::new(),
            audit: AuditLog::new(AUDIT_CAPACITY),
            rng: ChaCha8Rng::seed_from_u64(seed),
            now: 0.0,
            latched: None,
            warned_uncovered: Vec::new(),
        })
    }

    /// Build an engine preloaded with a scenario's initial values and
    /// timeline
    pub fn from_scenario(scenario: &Scenario, config: EngineConfig) -> Result<Self> {
        scenario.validate()?;
        let mut engine = Self::new(config, scenario.seed)?;
        for (&quantity, &value) in &scenario.initial {
            engine.set_quantity(quantity, value);
        }
        for event in &scenario.events {
            engine.scheduler.schedule(event.time, event.action.clone());
        }
        info!(
            scenario = %scenario.name,
            seed = scenario.seed,
            events = engine.scheduler.len(),
            "scenario loaded"
        );
        Ok(engine)
    }

    pub fn now(&self) -> SimSeconds {
        self.now
    }

    pub fn state(&self) -> &StateStore {
        &self.state
    }

    pub fn conditions(&self) -> &ConditionRegistry {
        &self.conditions
    }

    pub fn audit(&self) -> &AuditLog {
        &self.audit
    }

    pub fn pending_events(&self) -> &[ScheduledEvent] {
        self.scheduler.pending()
    }

    pub fn latched_rhythm(&self) -> Option<ArrhythmiaMode> {
        self.latched
    }

    /// Spawn a condition at the current time
    pub fn inject(
        &mut self,
        kind: ConditionKind,
        severity: f64,
        duration: Option<SimSeconds>,
    ) -> Result<ConditionId> {
        kind.validate_severity(severity)
            .map_err(|reason| SimError::scenario("severity", reason))?;

        let mut condition = Condition::new(kind, severity, self.now);
        if let Some(duration) = duration {
            condition = condition.with_resolution(self.now + duration);
        }

        // Drug doses bolus their plasma quantity on arrival
        if let Some(quantity) = kind.dose_quantity() {
            if let Some(clamp) = self.state.apply(quantity, Mutation::Add(severity), "bolus") {
                self.audit.record(self.now, AuditEvent::StateClamped(clamp));
            }
        }

        info!(
            time = self.now,
            kind = kind.label(),
            severity,
            "condition spawned"
        );
        Ok(self.conditions.spawn(condition))
    }

    /// Begin resolving every active instance of a kind (hemorrhage control,
    /// needle decompression, rewarming). Returns how many were marked.
    pub fn resolve(&mut self, kind: ConditionKind) -> usize {
        let marked = self.conditions.resolve_kind(kind, self.now);
        if marked > 0 {
            info!(time = self.now, kind = kind.label(), marked, "resolution started");
        }
        marked
    }

    /// Script a quantity directly, bypassing condition dynamics
    pub fn set_quantity(&mut self, quantity: Quantity, value: f64) {
        if let Some(clamp) = self.state.apply(quantity, Mutation::Set(value), "scripted") {
            self.audit.record(self.now, AuditEvent::StateClamped(clamp));
        }
    }

    /// Queue a timeline event at an absolute simulation time
    pub fn schedule(&mut self, due: SimSeconds, kind: EventKind) -> EventId {
        self.scheduler.schedule(due, kind)
    }

    pub fn cancel(&mut self, id: EventId) -> bool {
        self.scheduler.cancel(id)
    }

    /// Advance one external frame of `dt` seconds, subdividing internally
    /// so no substep exceeds the configured maximum.
    pub fn step_frame(&mut self, dt: f64) -> Result<StepOutput> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(SimError::InvariantViolation(format!(
                "frame dt must be positive and finite, got {}",
                dt
            )));
        }

        let mut annotations = Vec::new();
        let mut last_target = None;
        let mut remaining = dt;
        while remaining > 1e-12 {
            let sub = remaining.min(self.config.max_step_dt);
            let output = self.substep(sub)?;
            annotations.extend(output.annotations);
            last_target = Some(output.target);
            remaining -= sub;
        }

        let target = last_target.ok_or_else(|| {
            SimError::InvariantViolation("frame produced no substeps".to_string())
        })?;
        Ok(StepOutput {
            target,
            annotations,
        })
    }

    /// One internal step: clock, events, passive state, lifecycle, rules,
    /// composition, risk draw. Always in that order.
    fn substep(&mut self, dt: f64) -> Result<StepOutput> {
        self.now += dt;
        let mut annotations = Vec::new();

        let fired = self
            .scheduler
            .tick(self.now)
            .map_err(SimError::InvariantViolation)?;
        for event in fired {
            self.fire(event)?;
        }

        let clamps = self.state.passive_update(&self.conditions, self.now, dt);
        for clamp in clamps {
            self.audit.record(self.now, AuditEvent::StateClamped(clamp));
        }

        annotations.extend(
            self.conditions
                .advance(self.now)
                .map_err(SimError::InvariantViolation)?,
        );

        let mut contributions = Vec::new();
        let ctx = EffectContext {
            state: &self.state,
            conditions: &self.conditions,
            now: self.now,
        };
        evaluate_all(&self.modules, &ctx, &mut contributions);

        // Warn once per appearance of a kind no module owns
        self.warned_uncovered
            .retain(|kind| self.conditions.has_kind(*kind));
        for kind in uncovered_kinds(&self.modules, &self.conditions) {
            if !self.warned_uncovered.contains(&kind) {
                self.audit
                    .record(self.now, AuditEvent::UncoveredCondition { kind });
                self.warned_uncovered.push(kind);
            }
        }

        let baseline_hr = self.state.get(Quantity::HeartRateBaseline);
        let mut composition =
            self.compositor
                .compose(self.now, baseline_hr, &contributions, self.latched);
        for clamp in composition.clamps.drain(..) {
            self.audit
                .record(self.now, AuditEvent::CompositeClamped(clamp));
        }

        self.draw_rhythm_risks(&composition.rhythm_hazards, dt, &mut composition.target);

        Ok(StepOutput {
            target: composition.target,
            annotations,
        })
    }

    fn fire(&mut self, event: ScheduledEvent) -> Result<()> {
        match event.kind {
            EventKind::Spawn {
                kind,
                severity,
                duration,
            } => {
                self.inject(kind, severity, duration)?;
            }
            EventKind::Resolve { kind } => {
                self.resolve(kind);
            }
            EventKind::SetQuantity { quantity, value } => {
                self.set_quantity(quantity, value);
            }
        }
        Ok(())
    }

    /// Sample the combined per-second hazards for this substep and update
    /// the rhythm latch. A terminal latch is absorbing; a non-terminal
    /// latch releases once nothing sustains its hazard.
    fn draw_rhythm_risks(
        &mut self,
        hazards: &[(ArrhythmiaMode, f64)],
        dt: f64,
        target: &mut EkgParameterTarget,
    ) {
        if let Some(mode) = self.latched {
            if mode.is_terminal() {
                return;
            }
            if !hazards.iter().any(|(r, _)| *r == mode) {
                self.latched = None;
            }
        }

        for &(rhythm, hazard) in hazards {
            let p_step = 1.0 - (1.0 - hazard).powf(dt);
            if self.rng.gen::<f64>() < p_step {
                info!(time = self.now, rhythm = ?rhythm, "rhythm latched");
                self.latched = Some(rhythm);
                target.rhythm = rhythm;
                if rhythm.is_terminal() {
                    target.heart_rate_bpm = 0.0;
                    target.qtc_ms = target.qt_interval_ms;
                } else {
                    target.qtc_ms = bazett(target.qt_interval_ms, target.heart_rate_bpm);
                }
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> Engine {
        Engine::new(EngineConfig::default(), 7).unwrap()
    }

    #[test]
    fn test_quiet_engine_emits_baseline_target() {
        let mut engine = engine();
        let output = engine.step_frame(1.0).unwrap();
        assert_eq!(output.target.heart_rate_bpm, 80.0);
        assert_eq!(output.target.rhythm, ArrhythmiaMode::NormalSinus);
        assert!(output.annotations.is_empty());
    }

    #[test]
    fn test_frame_subdivision_advances_clock_exactly() {
        let mut engine = engine();
        engine.step_frame(1.0).unwrap();
        assert!((engine.now() - 1.0).abs() < 1e-9);
        engine.step_frame(0.25).unwrap();
        assert!((engine.now() - 1.25).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_frame_dt_rejected() {
        let mut engine = engine();
        assert!(engine.step_frame(0.0).is_err());
        assert!(engine.step_frame(-1.0).is_err());
        assert!(engine.step_frame(f64::NAN).is_err());
    }

    #[test]
    fn test_inject_validates_severity() {
        let mut engine = engine();
        assert!(engine
            .inject(ConditionKind::TensionPneumothorax, 3.0, None)
            .is_err());
        assert!(engine
            .inject(ConditionKind::TensionPneumothorax, 0.8, None)
            .is_ok());
    }

    #[test]
    fn test_drug_injection_boluses_plasma() {
        let mut engine = engine();
        engine
            .inject(ConditionKind::KetamineDose, 100.0, None)
            .unwrap();
        assert_eq!(engine.state().get(Quantity::KetaminePlasma), 100.0);
    }

    #[test]
    fn test_scheduled_spawn_fires_and_annotates() {
        let mut engine = engine();
        engine.schedule(
            0.5,
            EventKind::Spawn {
                kind: ConditionKind::Hemorrhage,
                severity: 5.0,
                duration: None,
            },
        );
        let output = engine.step_frame(1.0).unwrap();
        assert!(engine.conditions().has_kind(ConditionKind::Hemorrhage));
        assert!(output
            .annotations
            .iter()
            .any(|a| a.contains("Hemorrhage entered Onset")));
    }

    #[test]
    fn test_cancelled_event_never_fires() {
        let mut engine = engine();
        let id = engine.schedule(
            0.5,
            EventKind::Spawn {
                kind: ConditionKind::Hemorrhage,
                severity: 5.0,
                duration: None,
            },
        );
        assert!(engine.cancel(id));
        engine.step_frame(1.0).unwrap();
        assert!(engine.conditions().is_empty());
    }

    #[test]
    fn test_same_seed_same_trajectory() {
        let run = |seed: u64| -> Vec<f64> {
            let mut engine = Engine::new(EngineConfig::default(), seed).unwrap();
            engine
                .inject(ConditionKind::Hemorrhage, 10.0, None)
                .unwrap();
            (0..300)
                .map(|_| engine.step_frame(1.0).unwrap().target.heart_rate_bpm)
                .collect()
        };
        assert_eq!(run(42), run(42));
    }

    #[test]
    fn test_terminal_latch_is_absorbing() {
        let mut engine = engine();
        engine.latched = Some(ArrhythmiaMode::VentricularFibrillation);
        let output = engine.step_frame(1.0).unwrap();
        assert_eq!(output.target.rhythm, ArrhythmiaMode::VentricularFibrillation);
        assert_eq!(output.target.heart_rate_bpm, 0.0);
        // Stays latched with no hazard sources at all
        let output = engine.step_frame(10.0).unwrap();
        assert_eq!(output.target.rhythm, ArrhythmiaMode::VentricularFibrillation);
    }

    #[test]
    fn test_nonterminal_latch_releases_without_hazard() {
        let mut engine = engine();
        engine.latched = Some(ArrhythmiaMode::VentricularTachycardia);
        // Nothing sustains a VT hazard, so the latch clears
        let output = engine.step_frame(1.0).unwrap();
        assert_eq!(output.target.rhythm, ArrhythmiaMode::NormalSinus);
        assert_eq!(engine.latched_rhythm(), None);
    }

    #[test]
    fn test_uncovered_condition_audited_once_per_appearance() {
        let mut engine = engine();
        // With no modules loaded, every tracked kind is uncovered
        engine.modules = Vec::new();
        engine.inject(ConditionKind::Hemorrhage, 5.0, None).unwrap();

        engine.step_frame(1.0).unwrap();
        engine.step_frame(1.0).unwrap();

        let uncovered: Vec<_> = engine
            .audit()
            .entries()
            .iter()
            .filter(|e| {
                matches!(
                    e.event,
                    AuditEvent::UncoveredCondition {
                        kind: ConditionKind::Hemorrhage
                    }
                )
            })
            .collect();
        assert_eq!(uncovered.len(), 1, "warning repeated across substeps");
        // The condition is still tracked, just inert
        assert!(engine.conditions().has_kind(ConditionKind::Hemorrhage));
    }

    #[test]
    fn test_scripted_quantity_drives_effects() {
        let mut engine = engine();
        engine.set_quantity(Quantity::SerumPotassium, 6.8);
        let output = engine.step_frame(0.1).unwrap();
        // Hyperkalemia at full weight: peaked T waves, slowed rate
        assert!(output.target.heart_rate_bpm < 80.0);
    }
}
