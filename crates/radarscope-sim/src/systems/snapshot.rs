//! Snapshot system: reads the world and builds a `TrafficSnapshot`.
//!
//! Read-only; never modifies the world.

use hecs::World;

use radarscope_core::components::Identity;
use radarscope_core::events::SimEvent;
use radarscope_core::state::{AircraftView, FlightPlanView, TrafficSnapshot};
use radarscope_core::types::SimTime;

use crate::aircraft::Aircraft;

/// Build a complete snapshot. Aircraft are ordered by id.
pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    paused: bool,
    time_scale: f64,
    flight_plans: Vec<FlightPlanView>,
    events: Vec<SimEvent>,
) -> TrafficSnapshot {
    TrafficSnapshot {
        time: *time,
        paused,
        time_scale,
        aircraft: build_aircraft(world),
        flight_plans,
        events,
    }
}

fn build_aircraft(world: &World) -> Vec<AircraftView> {
    let mut views: Vec<AircraftView> = world
        .query::<(&Identity, &Aircraft)>()
        .iter()
        .map(|(_, (identity, aircraft))| aircraft_view(identity, aircraft))
        .collect();
    views.sort_by_key(|view| view.aircraft_id);
    views
}

pub fn aircraft_view(identity: &Identity, aircraft: &Aircraft) -> AircraftView {
    let k = &aircraft.kinematics;
    let behavior = &aircraft.behavior;
    AircraftView {
        aircraft_id: identity.id,
        callsign: identity.callsign.clone(),
        aircraft_type: identity.aircraft_type.clone(),
        squawk: identity.squawk.clone(),
        position: k.position,
        history: k.position_history.clone(),
        altitude_ft: k.altitude_ft,
        heading_deg: k.heading_deg,
        ground_speed_kt: k.ground_speed_kt,
        fuel_gal: k.fuel_gal,
        state: behavior.state(),
        target_heading_deg: behavior.target_heading(),
        target_altitude_ft: behavior.target_altitude(),
        approach: behavior
            .approach_plan()
            .map(|plan| (plan.airport_id.clone(), plan.runway.id.clone())),
    }
}
