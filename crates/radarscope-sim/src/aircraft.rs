//! The simulated aircraft: kinematics plus the behavior state driving them.

use radarscope_behavior::{BehaviorState, BehaviorUpdate};
use radarscope_core::commands::AircraftSpawn;
use radarscope_core::components::AircraftKinematics;
use radarscope_core::enums::FlightState;
use radarscope_core::types::TimedPosition;
use radarscope_geo::normalize_heading;

use crate::errors::{check_coordinate, check_finite, check_non_negative, Result};

/// One aircraft. Replaced wholesale by the integrator every tick.
#[derive(Debug, Clone)]
pub struct Aircraft {
    pub kinematics: AircraftKinematics,
    pub behavior: BehaviorState,
}

impl Aircraft {
    /// Validate spawn parameters and build a CRUISE aircraft with an empty trail.
    pub fn from_spawn(
        spawn: &AircraftSpawn,
        seed: u64,
        now_secs: f64,
        timestamp_ms: u64,
    ) -> Result<Self> {
        let point = check_coordinate(spawn.lon, spawn.lat)?;

        let kinematics = AircraftKinematics {
            position: TimedPosition::new(point, timestamp_ms),
            position_history: Vec::new(),
            altitude_ft: check_non_negative("altitude_ft", spawn.altitude_ft)?,
            heading_deg: normalize_heading(check_finite("heading_deg", spawn.heading_deg)?),
            ground_speed_kt: check_non_negative("ground_speed_kt", spawn.ground_speed_kt)?,
            fuel_gal: check_non_negative("fuel_gal", spawn.fuel_gal)?,
            fuel_burn_gph: check_non_negative("fuel_burn_gph", spawn.fuel_burn_gph)?,
        };

        Ok(Self {
            kinematics,
            behavior: BehaviorState::seeded(seed, point, now_secs),
        })
    }

    pub fn state(&self) -> FlightState {
        self.behavior.state()
    }

    /// Copy the populated fields of a behavior update onto the kinematics.
    pub fn apply(&mut self, update: &BehaviorUpdate) {
        if let Some(heading) = update.new_heading {
            self.kinematics.heading_deg = heading;
        }
        if let Some(altitude) = update.new_altitude {
            self.kinematics.altitude_ft = altitude;
        }
        if let Some(speed) = update.new_ground_speed {
            self.kinematics.ground_speed_kt = speed;
        }
    }
}
