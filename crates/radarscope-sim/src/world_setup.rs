//! Entity spawn factories for the simulation world.

use hecs::{Entity, World};

use radarscope_core::commands::AircraftSpawn;
use radarscope_core::components::Identity;

use crate::aircraft::Aircraft;
use crate::errors::Result;

/// Validate `spawn` and insert an aircraft entity with its identity.
pub fn spawn_aircraft(
    world: &mut World,
    id: u32,
    spawn: &AircraftSpawn,
    seed: u64,
    now_secs: f64,
    timestamp_ms: u64,
) -> Result<Entity> {
    let aircraft = Aircraft::from_spawn(spawn, seed, now_secs, timestamp_ms)?;
    let identity = Identity {
        id,
        callsign: spawn.callsign.clone(),
        aircraft_type: spawn.aircraft_type.clone(),
        squawk: spawn.squawk.clone(),
    };
    Ok(world.spawn((identity, aircraft)))
}
