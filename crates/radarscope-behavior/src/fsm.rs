//! Aircraft maneuver finite state machine.
//!
//! `BehaviorState` owns the maneuver, its entry time, the aircraft's own
//! seeded RNG stream, and a cached copy of the aircraft position. Once per
//! tick `step` decides whether the maneuver changes and returns the sparse
//! set of kinematic changes; the caller applies them before integrating.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use radarscope_core::airports::AirportTable;
use radarscope_core::constants::*;
use radarscope_core::enums::FlightState;
use radarscope_core::types::GeoPoint;
use radarscope_geo::{bearing_deg, distance_nm, normalize_heading, turn_toward};

use crate::approach::{nearest_airport, plan_approach, ApproachPlan};
use crate::transitions;
use crate::BehaviorError;

/// What happens once a turn reaches its target heading.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnExit {
    Cruise,
    /// Turned toward the approach fix; fly to it next.
    ApproachTransit(ApproachPlan),
    /// Turned onto the runway heading; descend to land.
    FinalApproach(ApproachPlan),
}

/// Current maneuver with exactly the data that maneuver needs.
#[derive(Debug, Clone, PartialEq)]
pub enum Maneuver {
    Cruise,
    Turning { target_heading: f64, exit: TurnExit },
    Climbing { target_altitude: f64 },
    Descending { target_altitude: f64 },
    ApproachTransit { plan: ApproachPlan },
    FinalApproach { plan: ApproachPlan },
}

impl Maneuver {
    pub fn flight_state(&self) -> FlightState {
        match self {
            Maneuver::Cruise => FlightState::Cruise,
            Maneuver::Turning { .. } => FlightState::Turning,
            Maneuver::Climbing { .. } => FlightState::Climbing,
            Maneuver::Descending { .. } => FlightState::Descending,
            Maneuver::ApproachTransit { .. } => FlightState::ApproachTransit,
            Maneuver::FinalApproach { .. } => FlightState::FinalApproach,
        }
    }

    pub fn approach_plan(&self) -> Option<&ApproachPlan> {
        match self {
            Maneuver::Turning {
                exit: TurnExit::ApproachTransit(plan) | TurnExit::FinalApproach(plan),
                ..
            }
            | Maneuver::ApproachTransit { plan }
            | Maneuver::FinalApproach { plan } => Some(plan),
            _ => None,
        }
    }
}

/// Changes produced by one step. `None` means "unchanged this tick".
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BehaviorUpdate {
    pub new_heading: Option<f64>,
    pub new_altitude: Option<f64>,
    pub new_ground_speed: Option<f64>,
    pub new_state: Option<FlightState>,
}

impl BehaviorUpdate {
    pub fn is_empty(&self) -> bool {
        *self == BehaviorUpdate::default()
    }
}

/// Kinematic input to a single step.
#[derive(Debug, Clone, Copy)]
pub struct StepContext {
    pub heading: f64,
    pub altitude: f64,
    /// Simulated time now (seconds).
    pub now_secs: f64,
    /// Seconds since the previous step.
    pub elapsed_secs: f64,
}

/// Behavior state of one aircraft.
///
/// The RNG is injectable; production code uses `ChaCha8Rng` seeded per
/// aircraft so maneuver sequences are reproducible and uncorrelated.
#[derive(Debug, Clone)]
pub struct BehaviorState<R = ChaCha8Rng> {
    maneuver: Maneuver,
    state_start_secs: f64,
    rng: R,
    position: GeoPoint,
}

impl BehaviorState<ChaCha8Rng> {
    /// Fresh CRUISE state with a `ChaCha8Rng` stream from `seed`.
    pub fn seeded(seed: u64, position: GeoPoint, now_secs: f64) -> Self {
        Self::with_rng(ChaCha8Rng::seed_from_u64(seed), position, now_secs)
    }
}

impl<R: Rng> BehaviorState<R> {
    /// Fresh CRUISE state using the given generator.
    pub fn with_rng(rng: R, position: GeoPoint, now_secs: f64) -> Self {
        Self {
            maneuver: Maneuver::Cruise,
            state_start_secs: now_secs,
            rng,
            position,
        }
    }

    pub fn maneuver(&self) -> &Maneuver {
        &self.maneuver
    }

    pub fn state(&self) -> FlightState {
        self.maneuver.flight_state()
    }

    /// Time the current maneuver was entered (or the cruise dwell timer last restarted).
    pub fn state_start_secs(&self) -> f64 {
        self.state_start_secs
    }

    /// Cached aircraft position as of the last sync.
    pub fn position(&self) -> GeoPoint {
        self.position
    }

    /// Refresh the cached position. Called by the integrator before `step`.
    pub fn sync_position(&mut self, position: GeoPoint) {
        self.position = position;
    }

    /// Heading being turned or steered toward.
    pub fn target_heading(&self) -> Option<f64> {
        match &self.maneuver {
            Maneuver::Turning { target_heading, .. } => Some(*target_heading),
            Maneuver::ApproachTransit { plan } => Some(bearing_deg(self.position, plan.fix.point)),
            _ => None,
        }
    }

    /// Altitude being climbed or descended toward.
    pub fn target_altitude(&self) -> Option<f64> {
        match &self.maneuver {
            Maneuver::Climbing { target_altitude } | Maneuver::Descending { target_altitude } => {
                Some(*target_altitude)
            }
            Maneuver::ApproachTransit { plan } => Some(plan.fix.altitude_ft),
            Maneuver::FinalApproach { plan } => Some(plan.runway.field_elevation_ft),
            _ => None,
        }
    }

    pub fn approach_plan(&self) -> Option<&ApproachPlan> {
        self.maneuver.approach_plan()
    }

    /// Advance the state machine by one tick.
    pub fn step(&mut self, ctx: &StepContext) -> BehaviorUpdate {
        let start_state = self.state();
        let mut update = BehaviorUpdate::default();

        if matches!(self.maneuver, Maneuver::Cruise) {
            self.roll_cruise(ctx);
        }

        match &self.maneuver {
            Maneuver::Cruise => {}
            Maneuver::Turning { target_heading, .. } => {
                let target = normalize_heading(*target_heading);
                let max_turn = TURN_RATE_DEG_PER_SEC * ctx.elapsed_secs;
                let heading = turn_toward(ctx.heading, target, max_turn, HEADING_EPSILON_DEG);
                if heading != ctx.heading {
                    update.new_heading = Some(heading);
                }
                if heading == target {
                    self.finish_turn(ctx.now_secs, &mut update);
                }
            }
            Maneuver::Climbing { target_altitude } | Maneuver::Descending { target_altitude } => {
                let target = *target_altitude;
                let rate_fpm = if target >= ctx.altitude {
                    CLIMB_RATE_FPM
                } else {
                    DESCENT_RATE_FPM
                };
                let altitude = move_toward(ctx.altitude, target, rate_fpm / 60.0 * ctx.elapsed_secs);
                if altitude != ctx.altitude {
                    update.new_altitude = Some(altitude);
                }
                if altitude == target {
                    self.enter(Maneuver::Cruise, ctx.now_secs);
                    update.new_ground_speed = Some(CRUISE_SPEED_KT);
                }
            }
            Maneuver::ApproachTransit { plan } => {
                let fix = plan.fix.point;
                if distance_nm(self.position, fix) <= APPROACH_CAPTURE_RADIUS_NM {
                    let runway_heading = plan.runway.heading_deg;
                    let plan = plan.clone();
                    self.enter(
                        Maneuver::Turning {
                            target_heading: normalize_heading(runway_heading),
                            exit: TurnExit::FinalApproach(plan),
                        },
                        ctx.now_secs,
                    );
                } else {
                    let bearing = bearing_deg(self.position, fix);
                    let max_turn = TURN_RATE_DEG_PER_SEC * ctx.elapsed_secs;
                    let heading = turn_toward(ctx.heading, bearing, max_turn, HEADING_EPSILON_DEG);
                    if heading != ctx.heading {
                        update.new_heading = Some(heading);
                    }
                }
            }
            Maneuver::FinalApproach { plan } => {
                let field = plan.runway.field_elevation_ft;
                let step_ft = FINAL_APPROACH_DESCENT_FPM / 60.0 * ctx.elapsed_secs;
                let altitude = move_toward(ctx.altitude, field, step_ft).max(field);
                if altitude != ctx.altitude {
                    update.new_altitude = Some(altitude);
                }
                if altitude == field {
                    info!(
                        airport = %plan.airport_id,
                        runway = %plan.runway.id,
                        "touchdown, climbing to circuit altitude"
                    );
                    self.enter(
                        Maneuver::Climbing {
                            target_altitude: field + CIRCUIT_ALTITUDE_FT,
                        },
                        ctx.now_secs,
                    );
                    update.new_ground_speed = Some(CRUISE_SPEED_KT);
                }
            }
        }

        update.new_state = self.changed_from(start_state);
        update
    }

    /// Turn onto the reciprocal of `heading`.
    pub fn force_turn(&mut self, heading: f64, now_secs: f64) -> BehaviorUpdate {
        self.force(
            Maneuver::Turning {
                target_heading: normalize_heading(heading + 180.0),
                exit: TurnExit::Cruise,
            },
            now_secs,
        )
    }

    /// Plan an approach at `altitude` and turn toward its fix. Speed is kept
    /// until final approach.
    pub fn force_landing(
        &mut self,
        altitude: f64,
        now_secs: f64,
        airports: &AirportTable,
    ) -> Result<BehaviorUpdate, BehaviorError> {
        let plan = plan_approach(self.position, altitude, airports, &mut self.rng)?;
        let target = bearing_deg(self.position, plan.fix.point);
        info!(
            airport = %plan.airport_id,
            runway = %plan.runway.id,
            fix_range_nm = distance_nm(plan.runway.threshold, plan.fix.point),
            "approach planned"
        );
        Ok(self.force(
            Maneuver::Turning {
                target_heading: target,
                exit: TurnExit::ApproachTransit(plan),
            },
            now_secs,
        ))
    }

    /// Turn toward an arbitrary point. Altitude is unchanged.
    pub fn force_fly_to(
        &mut self,
        target_lat: f64,
        target_lon: f64,
        now_secs: f64,
    ) -> Result<BehaviorUpdate, BehaviorError> {
        let target = GeoPoint::new(target_lon, target_lat);
        if !target.is_valid() {
            return Err(BehaviorError::InvalidCoordinate {
                lat: target_lat,
                lon: target_lon,
            });
        }
        Ok(self.force(
            Maneuver::Turning {
                target_heading: bearing_deg(self.position, target),
                exit: TurnExit::Cruise,
            },
            now_secs,
        ))
    }

    /// Climb 1000 ft at the reduced maneuvering speed.
    pub fn force_climb(&mut self, altitude: f64, now_secs: f64) -> BehaviorUpdate {
        let mut update = self.force(
            Maneuver::Climbing {
                target_altitude: altitude + FORCED_ALTITUDE_CHANGE_FT,
            },
            now_secs,
        );
        update.new_ground_speed = Some(ALTITUDE_CHANGE_SPEED_KT);
        update
    }

    /// Descend 1000 ft, never below 500 ft above the nearest field. A no-op
    /// when already at or below that floor.
    pub fn force_descent(
        &mut self,
        altitude: f64,
        now_secs: f64,
        airports: &AirportTable,
    ) -> BehaviorUpdate {
        let field = nearest_airport(self.position, airports).map_or(0.0, |a| a.elevation_ft);
        let floor = field + MIN_DESCENT_HEIGHT_FT;
        let target = (altitude - FORCED_ALTITUDE_CHANGE_FT).max(floor);
        if target >= altitude - ALTITUDE_EPSILON_FT {
            debug!(altitude, floor, "descent ignored, already at minimum");
            return BehaviorUpdate::default();
        }

        let mut update = self.force(
            Maneuver::Descending {
                target_altitude: target,
            },
            now_secs,
        );
        update.new_ground_speed = Some(ALTITUDE_CHANGE_SPEED_KT);
        update
    }

    /// Replace the maneuver directly.
    #[cfg(test)]
    pub(crate) fn set_maneuver(&mut self, maneuver: Maneuver, now_secs: f64) {
        self.maneuver = maneuver;
        self.state_start_secs = now_secs;
    }

    /// Consult the transition table once the cruise dwell time has passed.
    fn roll_cruise(&mut self, ctx: &StepContext) {
        if ctx.now_secs - self.state_start_secs < CRUISE_DWELL_SECS {
            return;
        }
        self.state_start_secs = ctx.now_secs;

        let draw: f64 = self.rng.gen();
        if transitions::select(FlightState::Cruise, draw) == FlightState::Turning {
            let slot = self.rng.gen_range(0..RANDOM_HEADING_SLOTS);
            self.enter(
                Maneuver::Turning {
                    target_heading: f64::from(slot) * RANDOM_HEADING_STEP_DEG,
                    exit: TurnExit::Cruise,
                },
                ctx.now_secs,
            );
        }
    }

    /// Leave TURNING according to its exit.
    fn finish_turn(&mut self, now_secs: f64, update: &mut BehaviorUpdate) {
        let Maneuver::Turning { exit, .. } = &self.maneuver else {
            return;
        };
        let next = match exit.clone() {
            TurnExit::Cruise => Maneuver::Cruise,
            TurnExit::ApproachTransit(plan) => Maneuver::ApproachTransit { plan },
            TurnExit::FinalApproach(plan) => {
                update.new_ground_speed = Some(APPROACH_SPEED_KT);
                Maneuver::FinalApproach { plan }
            }
        };
        self.enter(next, now_secs);
    }

    fn force(&mut self, maneuver: Maneuver, now_secs: f64) -> BehaviorUpdate {
        let start_state = self.state();
        self.enter(maneuver, now_secs);
        BehaviorUpdate {
            new_state: self.changed_from(start_state),
            ..Default::default()
        }
    }

    fn enter(&mut self, maneuver: Maneuver, now_secs: f64) {
        let from = self.state();
        self.maneuver = maneuver;
        self.state_start_secs = now_secs;
        debug!(
            from = %from,
            to = %self.state(),
            target_heading = ?self.target_heading(),
            target_altitude = ?self.target_altitude(),
            "maneuver change"
        );
    }

    fn changed_from(&self, start_state: FlightState) -> Option<FlightState> {
        let state = self.state();
        (state != start_state).then_some(state)
    }
}

/// Move `current` toward `target` by at most `max_step`, landing exactly on
/// `target` when within one step.
fn move_toward(current: f64, target: f64, max_step: f64) -> f64 {
    let delta = target - current;
    if delta.abs() <= max_step + ALTITUDE_EPSILON_FT {
        target
    } else {
        current + max_step.copysign(delta)
    }
}
