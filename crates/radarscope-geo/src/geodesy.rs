//! Great-circle distance, bearing, and destination-point calculations.
//!
//! Standard spherical-earth formulas with distances in nautical miles.
//! Total functions: finite inputs always produce a point or number, and
//! non-finite inputs propagate through the arithmetic. Callers validate.

use radarscope_core::types::GeoPoint;

use crate::angle::normalize_heading;

/// Mean earth radius in nautical miles.
pub const EARTH_RADIUS_NM: f64 = 3440.065;

/// Project a point `distance_nm` along the great circle leaving `origin`
/// on `bearing_deg` (degrees true).
pub fn destination_point(origin: GeoPoint, distance_nm: f64, bearing_deg: f64) -> GeoPoint {
    let lat1 = origin.lat.to_radians();
    let lon1 = origin.lon.to_radians();
    let brng = bearing_deg.to_radians();
    let delta = distance_nm / EARTH_RADIUS_NM;

    let sin_lat2 = lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * brng.cos();
    let lat2 = sin_lat2.clamp(-1.0, 1.0).asin();
    let lon2 = lon1
        + (brng.sin() * delta.sin() * lat1.cos()).atan2(delta.cos() - lat1.sin() * sin_lat2);

    GeoPoint::new(normalize_longitude(lon2.to_degrees()), lat2.to_degrees())
}

/// Great-circle distance in nautical miles (haversine). `distance_nm(a, a) == 0`.
pub fn distance_nm(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_NM * h.sqrt().min(1.0).asin()
}

/// Initial great-circle bearing from `from` to `to`, degrees true in [0, 360).
///
/// When the two points coincide the result is arbitrary (whatever `atan2(0, 0)`
/// gives); it is not special-cased.
pub fn bearing_deg(from: GeoPoint, to: GeoPoint) -> f64 {
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();
    let dlon = (to.lon - from.lon).to_radians();

    let y = dlon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();
    normalize_heading(y.atan2(x).to_degrees())
}

/// Wrap a longitude into [-180, 180).
fn normalize_longitude(lon: f64) -> f64 {
    (lon + 540.0).rem_euclid(360.0) - 180.0
}
