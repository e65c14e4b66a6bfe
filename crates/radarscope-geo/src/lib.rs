//! Spherical-earth geodesy and heading arithmetic.
//!
//! Every other crate goes through these primitives; no trigonometry is
//! duplicated elsewhere.

pub mod angle;
pub mod geodesy;

pub use angle::{heading_delta, normalize_heading, turn_toward};
pub use geodesy::{bearing_deg, destination_point, distance_nm, EARTH_RADIUS_NM};
