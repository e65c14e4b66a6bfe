//! Scenario configuration loaded from JSON.
//!
//! Every field has a default, so `{}` is a valid scenario: the demo
//! airspace with two aircraft.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use radarscope_core::airports::{demo_airports, Airport, AirportTable, ReferenceDataError};
use radarscope_core::commands::{AircraftSpawn, ControlCommand, FlightPlanFiling};
use radarscope_core::constants::{
    CRUISE_SPEED_KT, DEFAULT_FUEL_BURN_GPH, DEFAULT_FUEL_GAL, DEFAULT_TICK_INTERVAL_MS,
    MAX_TIME_SCALE,
};
use radarscope_sim::SimConfig;

use crate::game_loop::LoopSettings;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid scenario JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    ReferenceData(#[from] ReferenceDataError),

    #[error("invalid {field}: {value}")]
    Invalid { field: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Master simulation seed.
    pub seed: u64,
    /// Wall-clock milliseconds between ticks.
    pub tick_interval_ms: u64,
    /// Initial time scale.
    pub time_scale: f64,
    pub max_ticks: Option<u64>,
    /// Print every snapshot as a JSON line on stdout.
    pub emit_snapshots: bool,
    pub start_epoch_ms: u64,
    pub airports: Vec<Airport>,
    /// Aircraft active from the first tick.
    pub aircraft: Vec<AircraftSpawn>,
    /// Plans filed at the first tick, left in Planning.
    pub flight_plans: Vec<FlightPlanFiling>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            time_scale: 1.0,
            max_ticks: None,
            emit_snapshots: true,
            start_epoch_ms: 0,
            airports: demo_airports(),
            aircraft: demo_aircraft(),
            flight_plans: Vec::new(),
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "tick_interval_ms",
                value: self.tick_interval_ms.to_string(),
            });
        }
        if !(self.time_scale.is_finite() && (0.0..=MAX_TIME_SCALE).contains(&self.time_scale)) {
            return Err(ConfigError::Invalid {
                field: "time_scale",
                value: self.time_scale.to_string(),
            });
        }
        Ok(())
    }

    pub fn airport_table(&self) -> Result<AirportTable, ConfigError> {
        Ok(AirportTable::new(self.airports.clone())?)
    }

    pub fn sim_config(&self) -> SimConfig {
        SimConfig {
            seed: self.seed,
            start_epoch_ms: self.start_epoch_ms,
        }
    }

    pub fn loop_settings(&self) -> LoopSettings {
        LoopSettings {
            tick_interval: Duration::from_millis(self.tick_interval_ms),
            max_ticks: self.max_ticks,
            emit_snapshots: self.emit_snapshots,
        }
    }

    /// Commands that set up the scenario before the first tick.
    pub fn initial_commands(&self) -> Vec<ControlCommand> {
        let mut commands = Vec::new();
        if self.time_scale != 1.0 {
            commands.push(ControlCommand::SetTimeScale {
                scale: self.time_scale,
            });
        }
        commands.extend(
            self.aircraft
                .iter()
                .cloned()
                .map(|spawn| ControlCommand::SpawnAircraft { spawn }),
        );
        commands.extend(
            self.flight_plans
                .iter()
                .cloned()
                .map(|filing| ControlCommand::FileFlightPlan { filing }),
        );
        commands
    }
}

fn demo_aircraft() -> Vec<AircraftSpawn> {
    vec![
        AircraftSpawn {
            callsign: "N172SP".into(),
            aircraft_type: "C172".into(),
            squawk: "1200".into(),
            lon: -122.30,
            lat: 37.35,
            altitude_ft: 3500.0,
            heading_deg: 45.0,
            ground_speed_kt: CRUISE_SPEED_KT,
            fuel_gal: DEFAULT_FUEL_GAL,
            fuel_burn_gph: DEFAULT_FUEL_BURN_GPH,
        },
        AircraftSpawn {
            callsign: "N28PA".into(),
            aircraft_type: "PA28".into(),
            squawk: "4512".into(),
            lon: -121.95,
            lat: 37.70,
            altitude_ft: 4500.0,
            heading_deg: 225.0,
            ground_speed_kt: CRUISE_SPEED_KT,
            fuel_gal: DEFAULT_FUEL_GAL,
            fuel_burn_gph: DEFAULT_FUEL_BURN_GPH,
        },
    ]
}
