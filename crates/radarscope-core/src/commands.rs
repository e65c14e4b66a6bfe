//! Control commands sent from the outer layers to the simulation.
//!
//! Commands are queued and processed at the next tick boundary.

use serde::{Deserialize, Serialize};

/// Parameters for activating a new aircraft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AircraftSpawn {
    pub callsign: String,
    #[serde(default)]
    pub aircraft_type: String,
    #[serde(default)]
    pub squawk: String,
    pub lon: f64,
    pub lat: f64,
    pub altitude_ft: f64,
    pub heading_deg: f64,
    pub ground_speed_kt: f64,
    #[serde(default = "default_fuel")]
    pub fuel_gal: f64,
    #[serde(default = "default_burn")]
    pub fuel_burn_gph: f64,
}

fn default_fuel() -> f64 {
    crate::constants::DEFAULT_FUEL_GAL
}

fn default_burn() -> f64 {
    crate::constants::DEFAULT_FUEL_BURN_GPH
}

/// A flight plan as filed by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightPlanFiling {
    pub callsign: String,
    #[serde(default)]
    pub aircraft_type: String,
    #[serde(default)]
    pub squawk: String,
    /// Departure airport id.
    pub departure: String,
    /// Destination airport id.
    pub destination: String,
    pub cruise_altitude_ft: f64,
    pub cruise_speed_kt: f64,
}

/// All possible control actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ControlCommand {
    // --- Traffic ---
    /// Activate a new simulated aircraft.
    SpawnAircraft { spawn: AircraftSpawn },
    /// Deactivate an aircraft.
    RemoveAircraft { aircraft_id: u32 },

    // --- Forced maneuvers ---
    /// Turn onto the reciprocal heading.
    ForceTurn { aircraft_id: u32 },
    /// Plan an approach to an airport and land.
    ForceLanding { aircraft_id: u32 },
    /// Turn toward an arbitrary point.
    ForceFlyTo { aircraft_id: u32, lat: f64, lon: f64 },
    /// Climb 1000 ft.
    ForceClimb { aircraft_id: u32 },
    /// Descend 1000 ft.
    ForceDescent { aircraft_id: u32 },

    // --- Flight plans ---
    /// File a new flight plan in the Planning stage.
    FileFlightPlan { filing: FlightPlanFiling },
    /// Move a flight plan to its next stage.
    AdvanceFlightPlan { plan_id: u32 },
    /// Close a flight plan, deactivating its aircraft.
    CloseFlightPlan { plan_id: u32 },

    // --- Simulation control ---
    /// Pause the simulation.
    Pause,
    /// Resume the simulation.
    Resume,
    /// Set time scale (1.0 = normal, 0.0 = frozen).
    SetTimeScale { scale: f64 },
}
