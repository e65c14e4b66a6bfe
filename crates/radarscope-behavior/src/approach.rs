//! Approach planning: destination choice, runway choice, and the
//! stabilized approach fix on the extended centerline.

use rand::Rng;

use radarscope_core::airports::{Airport, AirportTable, Runway};
use radarscope_core::constants::APPROACH_NM_PER_1000_FT;
use radarscope_core::types::GeoPoint;
use radarscope_geo::{bearing_deg, destination_point, distance_nm, heading_delta, normalize_heading};

use crate::BehaviorError;

/// The runway an approach is flown to.
#[derive(Debug, Clone, PartialEq)]
pub struct RunwayDescriptor {
    pub id: String,
    /// Landing direction (degrees true).
    pub heading_deg: f64,
    pub threshold: GeoPoint,
    /// Field elevation (feet MSL).
    pub field_elevation_ft: f64,
}

/// Point and altitude the aircraft passes before turning final.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApproachFix {
    pub point: GeoPoint,
    pub altitude_ft: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApproachPlan {
    pub airport_id: String,
    pub runway: RunwayDescriptor,
    pub fix: ApproachFix,
}

impl RunwayDescriptor {
    pub fn new(airport: &Airport, runway: &Runway) -> Self {
        Self {
            id: runway.id.clone(),
            heading_deg: runway.heading_deg,
            threshold: runway.start,
            field_elevation_ft: airport.elevation_ft,
        }
    }
}

/// Fix on the extended centerline, `(altitude - elevation) / 1000 * 3` nm
/// out from the threshold, at `altitude_ft`.
///
/// An aircraft already at or below field elevation gets a fix on the threshold.
pub fn calculate_approach_fix(runway: &RunwayDescriptor, altitude_ft: f64) -> ApproachFix {
    let to_lose = (altitude_ft - runway.field_elevation_ft).max(0.0);
    let range_nm = to_lose / 1000.0 * APPROACH_NM_PER_1000_FT;
    let outbound = normalize_heading(runway.heading_deg + 180.0);

    ApproachFix {
        point: destination_point(runway.threshold, range_nm, outbound),
        altitude_ft,
    }
}

/// Plan an approach from `position` at `altitude_ft`.
///
/// The destination is drawn uniformly from the table with the caller's
/// RNG; the runway is the one needing the least turn from the aircraft's
/// bearing to its threshold.
pub fn plan_approach<R: Rng>(
    position: GeoPoint,
    altitude_ft: f64,
    airports: &AirportTable,
    rng: &mut R,
) -> Result<ApproachPlan, BehaviorError> {
    if airports.is_empty() {
        return Err(BehaviorError::NoApproach("airport table is empty".into()));
    }
    let index = rng.gen_range(0..airports.len());
    let airport = airports
        .by_index(index)
        .ok_or_else(|| BehaviorError::NoApproach(format!("no airport at index {index}")))?;

    let runway = choose_runway(airport, position).ok_or_else(|| {
        BehaviorError::NoApproach(format!("airport {} has no runways", airport.id))
    })?;
    let fix = calculate_approach_fix(&runway, altitude_ft);

    Ok(ApproachPlan {
        airport_id: airport.id.clone(),
        runway,
        fix,
    })
}

/// Runway whose landing direction is closest to the aircraft's bearing to
/// its threshold.
pub fn choose_runway(airport: &Airport, position: GeoPoint) -> Option<RunwayDescriptor> {
    airport
        .runways
        .iter()
        .min_by(|a, b| {
            let da = heading_delta(bearing_deg(position, a.start), a.heading_deg).abs();
            let db = heading_delta(bearing_deg(position, b.start), b.heading_deg).abs();
            da.total_cmp(&db)
        })
        .map(|runway| RunwayDescriptor::new(airport, runway))
}

/// Airport closest to `position`.
pub fn nearest_airport(position: GeoPoint, airports: &AirportTable) -> Option<&Airport> {
    airports.iter().min_by(|a, b| {
        distance_nm(position, a.location()).total_cmp(&distance_nm(position, b.location()))
    })
}
