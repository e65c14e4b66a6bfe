//! Random transition table for the maneuver state machine.
//!
//! Only CRUISE has a non-trivial row. Every other state leaves through a
//! deterministic exit condition, so its row is a self-loop.

use radarscope_core::constants::CRUISE_TURN_PROBABILITY;
use radarscope_core::enums::FlightState;

/// Outgoing transitions of one state with their probabilities. Rows sum to 1.
pub type TransitionRow = &'static [(FlightState, f64)];

const CRUISE_ROW: TransitionRow = &[
    (FlightState::Cruise, 1.0 - CRUISE_TURN_PROBABILITY),
    (FlightState::Turning, CRUISE_TURN_PROBABILITY),
];

/// Transition row for `state`.
pub fn row(state: FlightState) -> TransitionRow {
    match state {
        FlightState::Cruise => CRUISE_ROW,
        FlightState::Turning => &[(FlightState::Turning, 1.0)],
        FlightState::Climbing => &[(FlightState::Climbing, 1.0)],
        FlightState::Descending => &[(FlightState::Descending, 1.0)],
        FlightState::ApproachTransit => &[(FlightState::ApproachTransit, 1.0)],
        FlightState::FinalApproach => &[(FlightState::FinalApproach, 1.0)],
    }
}

/// Cumulative-probability selection: the first entry whose running total
/// exceeds `draw` wins; the last entry catches rounding at the top end.
pub fn select(state: FlightState, draw: f64) -> FlightState {
    let row = row(state);
    let mut cumulative = 0.0;
    for &(next, probability) in row {
        cumulative += probability;
        if draw < cumulative {
            return next;
        }
    }
    row.last().map_or(state, |&(next, _)| next)
}
