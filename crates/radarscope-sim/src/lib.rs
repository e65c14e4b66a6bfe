//! Simulation engine for radarscope.
//!
//! Owns the hecs ECS world of active aircraft, advances each one per tick
//! through the kinematic integrator, runs the flight-plan pipeline, and
//! produces `TrafficSnapshot`s for consumers.

pub mod aircraft;
pub mod engine;
pub mod errors;
pub mod flight_plan;
pub mod integrator;
pub mod systems;
pub mod world_setup;

pub use aircraft::Aircraft;
pub use engine::{SimConfig, SimulationEngine};
pub use errors::{Result, SimError};
pub use radarscope_core as core;

#[cfg(test)]
mod tests;
