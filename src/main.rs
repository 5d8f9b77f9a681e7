use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use elevator_sim::simulation::{random_calls, ElevatorSim, ScheduledCall, SimConfig};

#[derive(Parser)]
#[command(name = "elevator_sim")]
#[command(about = "Single-car elevator simulation, run headless")]
struct Cli {
    /// Number of floors in the building
    #[arg(long, default_value = "4")]
    floors: usize,

    /// Time a door stays open at a stop
    #[arg(long, default_value = "2.0")]
    dwell: f32,

    /// Top car speed in floors per time unit
    #[arg(long, default_value = "1.0")]
    speed: f32,

    /// Time delta per tick
    #[arg(long, default_value = "0.05")]
    delta: f32,

    /// Give up if the building is still busy at this time
    #[arg(long, default_value = "300")]
    max_time: f32,

    /// Button press such as `i3` or `e1:up@0.5`; repeat for more
    #[arg(long = "call", value_name = "CALL")]
    calls: Vec<ScheduledCall>,

    /// Add this many random presses
    #[arg(long)]
    random_calls: Option<usize>,

    /// Seed for the random presses
    #[arg(long)]
    seed: Option<u64>,

    /// Print the shaft every N time units, 0 to only print the final state
    #[arg(long, default_value = "1.0")]
    report_every: f32,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    run_headless(&cli)
}

/// Calls to use when none were given: a trip up with a call on the way
fn demo_calls() -> Vec<ScheduledCall> {
    ["i3", "e1:up@0.3", "e0:up@8"]
        .iter()
        .filter_map(|text| text.parse().ok())
        .collect()
}

/// Run the simulation in headless mode (no graphics)
fn run_headless(cli: &Cli) -> Result<()> {
    let defaults = SimConfig::default();
    let config = SimConfig {
        num_floors: cli.floors,
        dwell: cli.dwell,
        car_speed: cli.speed * defaults.floor_height,
        ..defaults
    };
    let mut sim = ElevatorSim::new(config).context("invalid simulation settings")?;

    let mut calls = cli.calls.clone();
    if let Some(count) = cli.random_calls {
        let horizon = cli.max_time / 4.0;
        calls.extend(random_calls(count, cli.floors, horizon, cli.seed));
    }
    if calls.is_empty() {
        calls = demo_calls();
    }
    calls.retain(|call| match sim.check_button(call.floor, call.button) {
        Ok(()) => true,
        Err(e) => {
            warn!("Ignoring call {:?}: {}", call, e);
            false
        }
    });

    info!(
        "Running elevator simulation: {} floors, {} calls, delta {}",
        cli.floors,
        calls.len(),
        cli.delta
    );

    let report_every = cli.report_every;
    let mut next_report = report_every;
    sim.run_script_with(&calls, cli.delta, cli.max_time, |sim| {
        if report_every > 0.0 && sim.time >= next_report {
            println!("--- t={:.1} ---", sim.time);
            sim.print_summary();
            sim.draw_shaft();
            next_report += report_every;
        }
    })?;

    println!("=== Final State ===");
    sim.print_summary();
    sim.draw_shaft();

    sim.stats().log_summary(sim.time);
    let served: Vec<String> = sim.served_floors().iter().map(|f| f.to_string()).collect();
    info!("Served floors: {}", served.join(", "));
    Ok(())
}
