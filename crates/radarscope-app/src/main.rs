//! radarscope: headless air-traffic tick driver.
//!
//! Reads control commands as JSON lines on stdin and writes one snapshot
//! JSON line per tick on stdout. Logs go to stderr.

use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use radarscope_app::config::AppConfig;
use radarscope_app::state::AppState;
use radarscope_core::commands::ControlCommand;
use radarscope_sim::SimulationEngine;

#[derive(Parser, Debug)]
#[command(name = "radarscope", version, about = "Headless air-traffic simulation")]
struct Args {
    /// Scenario JSON file. Defaults to the built-in demo airspace.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the scenario seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Override the tick interval in milliseconds.
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Stop after this many ticks.
    #[arg(long)]
    max_ticks: Option<u64>,

    /// Suppress snapshot output.
    #[arg(long)]
    no_snapshots: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("loading scenario {}", path.display()))?,
        None => AppConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(interval_ms) = args.interval_ms {
        config.tick_interval_ms = interval_ms;
    }
    if args.max_ticks.is_some() {
        config.max_ticks = args.max_ticks;
    }
    if args.no_snapshots {
        config.emit_snapshots = false;
    }
    config.validate()?;

    let airports = config.airport_table().context("loading airport table")?;
    let mut engine = SimulationEngine::new(config.sim_config(), airports);
    engine.queue_commands(config.initial_commands());
    info!(
        seed = config.seed,
        interval_ms = config.tick_interval_ms,
        aircraft = config.aircraft.len(),
        "starting simulation"
    );

    let state = Arc::new(AppState::new());
    let handle = state.start(engine, config.loop_settings(), io::stdout())?;

    // The reader is detached; the process exits when the tick thread does.
    let reader_state = Arc::clone(&state);
    std::thread::Builder::new()
        .name("radarscope-stdin".into())
        .spawn(move || read_commands(&reader_state))?;

    handle
        .join()
        .map_err(|_| anyhow!("tick thread panicked"))?;

    if let Some(last) = state.latest_snapshot()? {
        info!(
            ticks = last.time.tick,
            sim_secs = last.time.elapsed_secs,
            aircraft = last.aircraft.len(),
            "simulation finished"
        );
    }
    Ok(())
}

fn read_commands(state: &AppState) {
    for line in io::stdin().lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                warn!(error = %err, "stdin read failed");
                break;
            }
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<ControlCommand>(line) {
            Ok(command) => {
                if let Err(err) = state.send_command(command) {
                    warn!(error = %err, "command not delivered");
                    return;
                }
            }
            Err(err) => warn!(error = %err, "ignoring malformed command"),
        }
    }
}
