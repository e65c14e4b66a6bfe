//! Per-aircraft kinematic integration.
//!
//! One call advances one aircraft by one tick: behavior first, so a heading
//! or speed decided this tick already shapes this tick's displacement, then
//! a great-circle projection along the new heading, trail bookkeeping, and
//! fuel burn. The input is never mutated; a fresh `Aircraft` comes back.

use radarscope_behavior::StepContext;
use radarscope_core::components::AircraftKinematics;
use radarscope_core::constants::MAX_HISTORY_POSITIONS;
use radarscope_core::types::TimedPosition;
use radarscope_geo::destination_point;

use crate::aircraft::Aircraft;
use crate::errors::{check_coordinate, check_finite, check_non_negative, Result};

/// Timing for one integration step.
#[derive(Debug, Clone, Copy)]
pub struct TickContext {
    /// Seconds covered by this step.
    pub elapsed_secs: f64,
    /// Simulated time at the end of this step.
    pub now_secs: f64,
    /// Timestamp stamped on the new position.
    pub timestamp_ms: u64,
}

/// Reject negative or non-finite step lengths.
pub fn validate_elapsed(elapsed_secs: f64) -> Result<f64> {
    check_non_negative("elapsed_secs", elapsed_secs)
}

/// Advance `aircraft` by `ctx.elapsed_secs`.
pub fn advance(aircraft: &Aircraft, ctx: &TickContext) -> Result<Aircraft> {
    validate_elapsed(ctx.elapsed_secs)?;
    validate_kinematics(&aircraft.kinematics)?;

    let mut next = aircraft.clone();
    let previous = next.kinematics.position;

    next.behavior.sync_position(previous.point());
    let update = next.behavior.step(&StepContext {
        heading: next.kinematics.heading_deg,
        altitude: next.kinematics.altitude_ft,
        now_secs: ctx.now_secs,
        elapsed_secs: ctx.elapsed_secs,
    });
    next.apply(&update);

    let k = &mut next.kinematics;
    let distance_nm = k.ground_speed_kt * ctx.elapsed_secs / 3600.0;
    let point = destination_point(previous.point(), distance_nm, k.heading_deg);
    k.position = TimedPosition::new(point, ctx.timestamp_ms);
    push_history(&mut k.position_history, previous);

    let burned = k.fuel_burn_gph * ctx.elapsed_secs / 3600.0;
    k.fuel_gal = (k.fuel_gal - burned).max(0.0);

    Ok(next)
}

/// Newest first, bounded.
pub fn push_history(history: &mut Vec<TimedPosition>, previous: TimedPosition) {
    history.insert(0, previous);
    history.truncate(MAX_HISTORY_POSITIONS);
}

fn validate_kinematics(k: &AircraftKinematics) -> Result<()> {
    check_coordinate(k.position.lon, k.position.lat)?;
    check_non_negative("ground_speed_kt", k.ground_speed_kt)?;
    check_finite("heading_deg", k.heading_deg)?;
    check_finite("altitude_ft", k.altitude_ft)?;
    Ok(())
}
