//! Fundamental geographic and simulation types.

use serde::{Deserialize, Serialize};

/// A point on the earth's surface in decimal degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

/// A geographic position stamped with the time it was recorded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TimedPosition {
    pub lon: f64,
    pub lat: f64,
    /// Milliseconds since the Unix epoch (simulated clock).
    pub timestamp_ms: u64,
}

/// Simulation time tracking.
///
/// Ticks are not fixed-rate: the tick driver supplies the elapsed seconds
/// of each tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimTime {
    /// Number of ticks applied so far.
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

impl GeoPoint {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Both coordinates are finite and within their geographic range.
    pub fn is_valid(&self) -> bool {
        self.lon.is_finite()
            && self.lat.is_finite()
            && (-180.0..=180.0).contains(&self.lon)
            && (-90.0..=90.0).contains(&self.lat)
    }
}

impl TimedPosition {
    pub fn new(point: GeoPoint, timestamp_ms: u64) -> Self {
        Self {
            lon: point.lon,
            lat: point.lat,
            timestamp_ms,
        }
    }

    /// The position without its timestamp.
    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.lon, self.lat)
    }
}

impl SimTime {
    /// Advance by one tick of `dt` seconds.
    pub fn advance(&mut self, dt: f64) {
        self.tick += 1;
        self.elapsed_secs += dt;
    }

    /// Wall-clock style timestamp for the current time, given the epoch the
    /// simulation started at.
    pub fn timestamp_ms(&self, start_epoch_ms: u64) -> u64 {
        start_epoch_ms + (self.elapsed_secs * 1000.0).round() as u64
    }
}
