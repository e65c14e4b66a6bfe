//! Traffic snapshot: the complete visible state handed to consumers each tick.

use serde::{Deserialize, Serialize};

use crate::enums::{FlightPlanStage, FlightState};
use crate::events::SimEvent;
use crate::types::{SimTime, TimedPosition};

/// Complete traffic picture after a tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrafficSnapshot {
    pub time: SimTime,
    pub paused: bool,
    pub time_scale: f64,
    /// Active aircraft, ordered by id.
    pub aircraft: Vec<AircraftView>,
    /// Filed flight plans, ordered by id.
    pub flight_plans: Vec<FlightPlanView>,
    /// Events raised since the previous snapshot.
    pub events: Vec<SimEvent>,
}

/// One aircraft as drawn on the scope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AircraftView {
    pub aircraft_id: u32,
    pub callsign: String,
    pub aircraft_type: String,
    pub squawk: String,
    pub position: TimedPosition,
    /// Trail positions, most recent first.
    pub history: Vec<TimedPosition>,
    pub altitude_ft: f64,
    pub heading_deg: f64,
    pub ground_speed_kt: f64,
    pub fuel_gal: f64,
    pub state: FlightState,
    pub target_heading_deg: Option<f64>,
    pub target_altitude_ft: Option<f64>,
    /// Airport and runway of the planned approach, if any.
    pub approach: Option<(String, String)>,
}

/// Flight plan status for display.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlightPlanView {
    pub plan_id: u32,
    pub callsign: String,
    pub departure: String,
    pub destination: String,
    pub stage: FlightPlanStage,
    /// Aircraft flying this plan, once activated.
    pub aircraft_id: Option<u32>,
}
