//! Per-aircraft data records.
//!
//! These are plain data structs. Maneuver logic lives in the behavior crate
//! and position integration in the sim crate.

use serde::{Deserialize, Serialize};

use crate::types::TimedPosition;

/// Textual identity of a flight. Carried through the simulation unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Engine-assigned aircraft id.
    pub id: u32,
    pub callsign: String,
    pub aircraft_type: String,
    pub squawk: String,
}

/// Kinematic state of one aircraft, replaced wholesale every tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AircraftKinematics {
    /// Current position and time of last update.
    pub position: TimedPosition,
    /// Prior positions, most recent first. Trail rendering only.
    pub position_history: Vec<TimedPosition>,
    /// Feet above mean sea level.
    pub altitude_ft: f64,
    /// Degrees true, [0, 360).
    pub heading_deg: f64,
    /// Knots.
    pub ground_speed_kt: f64,
    /// Remaining fuel (US gallons).
    pub fuel_gal: f64,
    /// Linear burn rate (US gallons per hour).
    pub fuel_burn_gph: f64,
}
