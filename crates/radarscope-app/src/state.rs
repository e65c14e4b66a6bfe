//! Application state shared between the command reader and the tick thread.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use thiserror::Error;

use radarscope_core::commands::ControlCommand;
use radarscope_core::state::TrafficSnapshot;
use radarscope_sim::SimulationEngine;

use crate::game_loop::{self, LoopSettings};

/// Commands sent to the tick thread.
#[derive(Debug)]
pub enum LoopCommand {
    /// A control command to forward to the simulation engine.
    Control(ControlCommand),
    /// Stop the tick thread after the current tick.
    Shutdown,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("simulation already running")]
    AlreadyRunning,

    #[error("simulation not started")]
    NotStarted,

    #[error("tick thread has stopped")]
    LoopStopped,

    #[error("shared state lock poisoned")]
    Poisoned,

    #[error("failed to spawn tick thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Latest snapshot, written by the tick thread after every tick.
pub type SharedSnapshot = Arc<Mutex<Option<TrafficSnapshot>>>;

pub struct AppState {
    /// `None` until `start` is called.
    command_tx: Mutex<Option<mpsc::Sender<LoopCommand>>>,
    latest_snapshot: SharedSnapshot,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            command_tx: Mutex::new(None),
            latest_snapshot: Arc::new(Mutex::new(None)),
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the tick thread. Snapshot JSON lines go to `out` when enabled.
    pub fn start<W>(
        &self,
        engine: SimulationEngine,
        settings: LoopSettings,
        out: W,
    ) -> Result<JoinHandle<()>, AppError>
    where
        W: std::io::Write + Send + 'static,
    {
        let mut tx_lock = self.command_tx.lock().map_err(|_| AppError::Poisoned)?;
        if tx_lock.is_some() {
            return Err(AppError::AlreadyRunning);
        }

        let (cmd_tx, handle) =
            game_loop::spawn_game_loop(engine, settings, self.latest_snapshot.clone(), out)?;
        *tx_lock = Some(cmd_tx);
        Ok(handle)
    }

    pub fn is_running(&self) -> bool {
        self.command_tx
            .lock()
            .map(|lock| lock.is_some())
            .unwrap_or(false)
    }

    /// Forward a control command to the tick thread.
    pub fn send_command(&self, command: ControlCommand) -> Result<(), AppError> {
        self.send(LoopCommand::Control(command))
    }

    /// Ask the tick thread to stop.
    pub fn shutdown(&self) -> Result<(), AppError> {
        self.send(LoopCommand::Shutdown)
    }

    /// Most recent snapshot, if any tick has completed.
    pub fn latest_snapshot(&self) -> Result<Option<TrafficSnapshot>, AppError> {
        let lock = self.latest_snapshot.lock().map_err(|_| AppError::Poisoned)?;
        Ok(lock.clone())
    }

    fn send(&self, command: LoopCommand) -> Result<(), AppError> {
        let tx_lock = self.command_tx.lock().map_err(|_| AppError::Poisoned)?;
        match tx_lock.as_ref() {
            Some(tx) => tx.send(command).map_err(|_| AppError::LoopStopped),
            None => Err(AppError::NotStarted),
        }
    }
}
