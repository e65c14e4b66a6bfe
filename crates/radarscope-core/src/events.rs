//! Events emitted by the simulation for display and logging consumers.

use serde::{Deserialize, Serialize};

use crate::enums::{FlightPlanStage, FlightState};

/// Something noteworthy that happened during a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimEvent {
    /// Aircraft entered the simulation.
    AircraftActivated { aircraft_id: u32, callsign: String },
    /// Aircraft left the simulation.
    AircraftRemoved { aircraft_id: u32 },
    /// Maneuver state changed.
    StateChanged {
        aircraft_id: u32,
        from: FlightState,
        to: FlightState,
    },
    /// Aircraft reached field elevation and is climbing back out.
    Landed {
        aircraft_id: u32,
        airport_id: String,
        runway_id: String,
    },
    /// Flight plan moved to a new stage.
    FlightPlanAdvanced {
        plan_id: u32,
        stage: FlightPlanStage,
    },
    /// A queued command could not be applied.
    CommandRejected { reason: String },
}
