//! Tick thread: runs the simulation engine at a fixed wall-clock interval.
//!
//! The engine moves into the thread. Commands arrive over `mpsc`. Each tick
//! advances simulated time by the interval scaled by the engine's time
//! scale, stores the snapshot for polling, and optionally writes it as one
//! JSON line.

use std::io::{self, Write};
use std::sync::mpsc;
use std::sync::Mutex;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::{error, info, warn};

use radarscope_core::state::TrafficSnapshot;
use radarscope_sim::SimulationEngine;

use crate::state::{LoopCommand, SharedSnapshot};

/// How the tick thread paces and reports.
#[derive(Debug, Clone, Copy)]
pub struct LoopSettings {
    /// Wall-clock time between ticks.
    pub tick_interval: Duration,
    /// Stop after this many ticks.
    pub max_ticks: Option<u64>,
    /// Write every snapshot to the output as a JSON line.
    pub emit_snapshots: bool,
}

/// Spawn the tick thread.
///
/// Returns the command sender and the thread handle. The thread exits on
/// `Shutdown`, when the sender is dropped, after `max_ticks`, or when a
/// tick fails.
pub fn spawn_game_loop<W>(
    engine: SimulationEngine,
    settings: LoopSettings,
    latest_snapshot: SharedSnapshot,
    mut out: W,
) -> io::Result<(mpsc::Sender<LoopCommand>, JoinHandle<()>)>
where
    W: Write + Send + 'static,
{
    let (cmd_tx, cmd_rx) = mpsc::channel::<LoopCommand>();

    let handle = std::thread::Builder::new()
        .name("radarscope-tick".into())
        .spawn(move || {
            let ticks = run_game_loop(engine, settings, &cmd_rx, &latest_snapshot, &mut out);
            info!(ticks, "tick thread stopped");
        })?;

    Ok((cmd_tx, handle))
}

/// The loop itself. Returns the number of ticks run.
fn run_game_loop<W: Write>(
    mut engine: SimulationEngine,
    settings: LoopSettings,
    cmd_rx: &mpsc::Receiver<LoopCommand>,
    latest_snapshot: &Mutex<Option<TrafficSnapshot>>,
    out: &mut W,
) -> u64 {
    let mut ticks = 0;
    let mut next_tick_time = Instant::now();

    loop {
        loop {
            match cmd_rx.try_recv() {
                Ok(LoopCommand::Control(cmd)) => engine.queue_command(cmd),
                Ok(LoopCommand::Shutdown) => return ticks,
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => return ticks,
            }
        }

        // Apply first so a time-scale change takes effect on this tick.
        engine.apply_commands();
        let elapsed_secs = settings.tick_interval.as_secs_f64() * engine.time_scale();
        let snapshot = match engine.tick(elapsed_secs) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                error!(error = %err, "tick failed, stopping");
                return ticks;
            }
        };
        ticks += 1;

        if settings.emit_snapshots {
            if let Err(err) = write_snapshot(out, &snapshot) {
                warn!(error = %err, "failed to write snapshot");
            }
        }

        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot);
        }

        if settings.max_ticks.is_some_and(|max| ticks >= max) {
            return ticks;
        }

        next_tick_time += settings.tick_interval;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > settings.tick_interval * 2 {
            // Too far behind; reset instead of bursting.
            warn!(behind_ms = (now - next_tick_time).as_millis() as u64, "tick overrun");
            next_tick_time = now;
        }
    }
}

fn write_snapshot<W: Write>(out: &mut W, snapshot: &TrafficSnapshot) -> io::Result<()> {
    serde_json::to_writer(&mut *out, snapshot)?;
    out.write_all(b"\n")?;
    out.flush()
}
