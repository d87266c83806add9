//! Corpsman - Entry Point
//!
//! Interactive console for driving a casualty session: load a scenario (or
//! start from a healthy baseline), step the clock, inject and resolve
//! conditions, script quantities, and inspect the composed EKG target.

use clap::Parser;
use corpsman::condition::kind::ConditionKind;
use corpsman::core::config::EngineConfig;
use corpsman::core::error::Result;
use corpsman::engine::{Engine, StepOutput};
use corpsman::physiology::quantity::Quantity;
use corpsman::scenario::Scenario;

use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "corpsman", about = "Physiology-driven EKG parameter engine")]
struct Cli {
    /// Scenario TOML to load; starts from a healthy baseline if omitted
    #[arg(short, long)]
    scenario: Option<PathBuf>,

    /// Override the scenario's rhythm-risk seed
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "corpsman=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = EngineConfig::default();

    let mut engine = match &cli.scenario {
        Some(path) => {
            let mut scenario = Scenario::load(path)?;
            if let Some(seed) = cli.seed {
                scenario.seed = seed;
            }
            println!("Loaded scenario: {}", scenario.name);
            Engine::from_scenario(&scenario, config)?
        }
        None => Engine::new(config, cli.seed.unwrap_or(0))?,
    };

    println!("\n=== CORPSMAN ===");
    println!("Casualty physiology console");
    println!();
    println!("Commands:");
    println!("  step / t                     - Advance one second");
    println!("  run <n>                      - Advance n seconds");
    println!("  status / s                   - Show state, conditions, target");
    println!("  apply <kind> <severity>      - Spawn a condition now");
    println!("  resolve <kind>               - Begin resolving a condition");
    println!("  set <quantity> <value>       - Script a quantity directly");
    println!("  json                         - Print the current target as JSON");
    println!("  audit                        - Show recent audit entries");
    println!("  quit / q                     - Exit");
    println!();

    let mut last_output: Option<StepOutput> = None;

    loop {
        print!("[t={:.1}s] > ", engine.now());
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let input = input.trim();

        if input.is_empty() {
            continue;
        }
        if input == "quit" || input == "q" {
            break;
        }

        if input == "step" || input == "t" {
            last_output = Some(step(&mut engine, 1.0)?);
            continue;
        }

        if let Some(rest) = input.strip_prefix("run ") {
            match rest.trim().parse::<f64>() {
                Ok(seconds) if seconds > 0.0 => {
                    last_output = Some(step(&mut engine, seconds)?);
                }
                _ => println!("Usage: run <seconds>"),
            }
            continue;
        }

        if input == "status" || input == "s" {
            display_status(&engine, last_output.as_ref());
            continue;
        }

        if let Some(rest) = input.strip_prefix("apply ") {
            let mut parts = rest.split_whitespace();
            match (
                parts.next().and_then(parse_kind),
                parts.next().and_then(|s| s.parse::<f64>().ok()),
            ) {
                (Some(kind), Some(severity)) => match engine.inject(kind, severity, None) {
                    Ok(_) => println!("Applied {} at severity {}", kind.label(), severity),
                    Err(e) => println!("Rejected: {}", e),
                },
                _ => println!("Usage: apply <kind> <severity>"),
            }
            continue;
        }

        if let Some(rest) = input.strip_prefix("resolve ") {
            match parse_kind(rest.trim()) {
                Some(kind) => {
                    let marked = engine.resolve(kind);
                    println!("Resolving {} instance(s) of {}", marked, kind.label());
                }
                None => println!("Unknown condition kind: {}", rest.trim()),
            }
            continue;
        }

        if let Some(rest) = input.strip_prefix("set ") {
            let mut parts = rest.split_whitespace();
            match (
                parts.next().and_then(parse_quantity),
                parts.next().and_then(|s| s.parse::<f64>().ok()),
            ) {
                (Some(quantity), Some(value)) => {
                    engine.set_quantity(quantity, value);
                    println!(
                        "{:?} = {} {}",
                        quantity,
                        engine.state().get(quantity),
                        quantity.def().unit
                    );
                }
                _ => println!("Usage: set <quantity> <value>"),
            }
            continue;
        }

        if input == "json" {
            match &last_output {
                Some(output) => println!("{}", serde_json::to_string_pretty(&output.target)?),
                None => println!("Step first."),
            }
            continue;
        }

        if input == "audit" {
            let entries = engine.audit().entries();
            if entries.is_empty() {
                println!("Audit log is empty.");
            }
            for entry in entries.iter().rev().take(20) {
                println!("  t={:.1}s {:?}", entry.time, entry.event);
            }
            continue;
        }

        println!("Unknown command: {}", input);
    }

    println!("Session ended at t={:.1}s.", engine.now());
    Ok(())
}

fn step(engine: &mut Engine, seconds: f64) -> Result<StepOutput> {
    let output = engine.step_frame(seconds)?;
    for note in &output.annotations {
        println!("  * {}", note);
    }
    let t = &output.target;
    println!(
        "  t={:.1}s  HR {:.0} bpm  {:?}  ST {:+.2} mV  QTc {:.0} ms",
        t.time, t.heart_rate_bpm, t.rhythm, t.st_deviation_mv, t.qtc_ms
    );
    Ok(output)
}

fn display_status(engine: &Engine, last_output: Option<&StepOutput>) {
    println!("--- State (t={:.1}s) ---", engine.now());
    for quantity in Quantity::ALL {
        let value = engine.state().get(quantity);
        let def = quantity.def();
        if (value - def.baseline).abs() > 1e-9 {
            println!("  {:?}: {:.2} {} (baseline {})", quantity, value, def.unit, def.baseline);
        }
    }

    println!("--- Conditions ({}) ---", engine.conditions().len());
    for cond in engine.conditions().iter() {
        println!(
            "  {} severity {:.2} phase {} weight {:.2}",
            cond.kind.label(),
            cond.severity,
            cond.phase,
            cond.weight(engine.now())
        );
    }

    println!("--- Pending events ({}) ---", engine.pending_events().len());
    for event in engine.pending_events().iter().take(10) {
        println!("  t={:.1}s {:?}", event.due, event.kind);
    }

    if let Some(output) = last_output {
        let t = &output.target;
        println!("--- Last target ---");
        println!(
            "  HR {:.0} bpm  rhythm {:?}  P {:?} x{:.2}  QRS {:?} x{:.2}  T {:?} x{:.2}",
            t.heart_rate_bpm,
            t.rhythm,
            t.p_morphology,
            t.p_amplitude_factor,
            t.qrs_morphology,
            t.qrs_amplitude_factor,
            t.t_morphology,
            t.t_amplitude_factor
        );
        println!(
            "  PR {:.0} ms  QRS {:.0} ms  QT {:.0} ms  QTc {:.0} ms  ST {:+.2} mV {:?}  axis {:.0}",
            t.pr_interval_ms,
            t.qrs_duration_ms,
            t.qt_interval_ms,
            t.qtc_ms,
            t.st_deviation_mv,
            t.st_shape,
            t.axis_degrees
        );
        if t.osborn_wave_present {
            println!("  Osborn waves present");
        }
        if t.u_wave_present {
            println!("  U waves present");
        }
    }
}

fn parse_kind(text: &str) -> Option<ConditionKind> {
    serde_json::from_value(serde_json::Value::String(text.to_string())).ok()
}

fn parse_quantity(text: &str) -> Option<Quantity> {
    serde_json::from_value(serde_json::Value::String(text.to_string())).ok()
}
