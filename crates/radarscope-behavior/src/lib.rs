//! Aircraft behavior for radarscope.
//!
//! Implements the per-aircraft maneuver state machine: random cruise
//! turns, climbs and descents, approach sequencing, and forced maneuvers.
//! Operates on plain data with an owned, seeded RNG; no ECS dependency.

use thiserror::Error;

pub mod approach;
pub mod fsm;
pub mod transitions;

pub use approach::{ApproachFix, ApproachPlan, RunwayDescriptor};
pub use fsm::{BehaviorState, BehaviorUpdate, Maneuver, StepContext, TurnExit};
pub use radarscope_core as core;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BehaviorError {
    #[error("invalid coordinate {lat}, {lon}")]
    InvalidCoordinate { lat: f64, lon: f64 },

    #[error("no approach available: {0}")]
    NoApproach(String),
}
