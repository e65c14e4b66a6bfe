//! Enumeration types used throughout the simulation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Maneuver state of an aircraft as seen from outside the behavior machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlightState {
    /// Straight and level at cruise speed.
    #[default]
    Cruise,
    /// Turning toward a target heading at the standard rate.
    Turning,
    /// Climbing toward a target altitude.
    Climbing,
    /// Descending toward a target altitude.
    Descending,
    /// Flying toward the approach fix of a planned landing.
    ApproachTransit,
    /// Aligned with the runway, descending to field elevation.
    FinalApproach,
}

impl fmt::Display for FlightState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FlightState::Cruise => "CRUISE",
            FlightState::Turning => "TURNING",
            FlightState::Climbing => "CLIMBING",
            FlightState::Descending => "DESCENDING",
            FlightState::ApproachTransit => "APPROACH_TRANSIT",
            FlightState::FinalApproach => "FINAL_APPROACH",
        };
        f.write_str(name)
    }
}

/// Stage of a flight plan in the mock processing pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlightPlanStage {
    /// Filed, being edited.
    #[default]
    Planning,
    /// Submitted, awaiting approval.
    Approval,
    /// Approved and flying.
    Operations,
    /// Handed to military intercept. Terminal.
    Intercept,
}

impl FlightPlanStage {
    /// The stage that follows this one, if any.
    pub fn next(self) -> Option<FlightPlanStage> {
        match self {
            FlightPlanStage::Planning => Some(FlightPlanStage::Approval),
            FlightPlanStage::Approval => Some(FlightPlanStage::Operations),
            FlightPlanStage::Operations => Some(FlightPlanStage::Intercept),
            FlightPlanStage::Intercept => None,
        }
    }
}
