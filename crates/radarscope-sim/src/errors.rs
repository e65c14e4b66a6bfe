use thiserror::Error;

use radarscope_behavior::BehaviorError;
use radarscope_core::airports::ReferenceDataError;
use radarscope_core::enums::FlightPlanStage;
use radarscope_core::types::GeoPoint;

pub type Result<T> = std::result::Result<T, SimError>;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("invalid {field}: {value}")]
    InvalidInput { field: &'static str, value: f64 },

    #[error("unknown aircraft {0}")]
    UnknownAircraft(u32),

    #[error("unknown flight plan {0}")]
    UnknownFlightPlan(u32),

    #[error("unknown airport '{0}'")]
    UnknownAirport(String),

    #[error("flight plan {plan_id} cannot advance past {stage:?}")]
    StageTransition { plan_id: u32, stage: FlightPlanStage },

    #[error("behavior error {0}")]
    Behavior(#[from] BehaviorError),

    #[error("reference data error {0}")]
    ReferenceData(#[from] ReferenceDataError),
}

pub fn invalid_input(field: &'static str, value: f64) -> SimError {
    SimError::InvalidInput { field, value }
}

/// Build a point, naming the offending axis when it is off the globe.
pub fn check_coordinate(lon: f64, lat: f64) -> Result<GeoPoint> {
    let point = GeoPoint::new(lon, lat);
    if point.is_valid() {
        return Ok(point);
    }
    if lat.is_finite() && (-90.0..=90.0).contains(&lat) {
        Err(invalid_input("lon", lon))
    } else {
        Err(invalid_input("lat", lat))
    }
}

/// `value` must be finite.
pub fn check_finite(field: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(invalid_input(field, value))
    }
}

/// `value` must be finite and not negative.
pub fn check_non_negative(field: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(invalid_input(field, value))
    }
}
