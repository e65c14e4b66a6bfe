//! Airport and runway reference data.
//!
//! The table is static for the lifetime of a simulation and is validated
//! once when it is built: approach planning relies on every airport having
//! usable runways, and on at least two airports being available.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::GeoPoint;

/// Minimum number of airports an approach planner can choose between.
pub const MIN_AIRPORTS: usize = 2;

#[derive(Error, Debug)]
pub enum ReferenceDataError {
    #[error("at least {MIN_AIRPORTS} airports are required, got {0}")]
    TooFewAirports(usize),

    #[error("duplicate airport id '{0}'")]
    DuplicateAirport(String),

    #[error("invalid airport '{id}': {reason}")]
    InvalidAirport { id: String, reason: String },

    #[error("unparsable airport data: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One landing direction of a runway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Runway {
    /// Designator, e.g. "31".
    pub id: String,
    /// Landing direction (degrees true).
    pub heading_deg: f64,
    /// Threshold the landing direction starts at.
    pub start: GeoPoint,
    pub length_ft: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Airport {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    /// Field elevation (feet MSL).
    pub elevation_ft: f64,
    pub runways: Vec<Runway>,
}

impl Airport {
    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.lon, self.lat)
    }

    fn validate(&self) -> Result<(), ReferenceDataError> {
        let invalid = |reason: String| ReferenceDataError::InvalidAirport {
            id: self.id.clone(),
            reason,
        };

        if !self.location().is_valid() {
            return Err(invalid(format!("bad location {}, {}", self.lat, self.lon)));
        }
        if !self.elevation_ft.is_finite() {
            return Err(invalid("non-finite elevation".into()));
        }
        if self.runways.is_empty() {
            return Err(invalid("no runways".into()));
        }
        for runway in &self.runways {
            if !(0.0..360.0).contains(&runway.heading_deg) {
                return Err(invalid(format!(
                    "runway {} heading {} outside [0, 360)",
                    runway.id, runway.heading_deg
                )));
            }
            if !runway.start.is_valid() {
                return Err(invalid(format!("runway {} has a bad threshold", runway.id)));
            }
        }
        Ok(())
    }
}

/// Validated, read-only airport lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AirportTable {
    airports: Vec<Airport>,
}

impl AirportTable {
    /// Validate and build a table.
    pub fn new(airports: Vec<Airport>) -> Result<Self, ReferenceDataError> {
        if airports.len() < MIN_AIRPORTS {
            return Err(ReferenceDataError::TooFewAirports(airports.len()));
        }

        let mut seen = HashSet::new();
        for airport in &airports {
            if !seen.insert(airport.id.as_str()) {
                return Err(ReferenceDataError::DuplicateAirport(airport.id.clone()));
            }
            airport.validate()?;
        }

        Ok(Self { airports })
    }

    /// Parse a JSON array of airports and validate it.
    pub fn from_json(json: &str) -> Result<Self, ReferenceDataError> {
        let airports: Vec<Airport> = serde_json::from_str(json)?;
        Self::new(airports)
    }

    /// Look up an airport by id.
    pub fn get(&self, id: &str) -> Option<&Airport> {
        self.airports.iter().find(|a| a.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Airport> {
        self.airports.iter()
    }

    /// Airport at a position in table order.
    pub fn by_index(&self, index: usize) -> Option<&Airport> {
        self.airports.get(index)
    }

    pub fn len(&self) -> usize {
        self.airports.len()
    }

    /// Always false for a validated table.
    pub fn is_empty(&self) -> bool {
        self.airports.is_empty()
    }

    /// Built-in reference data for a small demo airspace (south San Francisco Bay).
    pub fn demo() -> Self {
        Self {
            airports: demo_airports(),
        }
    }
}

/// The airports behind [`AirportTable::demo`].
pub fn demo_airports() -> Vec<Airport> {
    vec![
        Airport {
            id: "KPAO".into(),
            name: "Palo Alto".into(),
            lat: 37.4611,
            lon: -122.1150,
            elevation_ft: 7.0,
            runways: vec![
                Runway {
                    id: "31".into(),
                    heading_deg: 313.0,
                    start: GeoPoint::new(-122.1097, 37.4575),
                    length_ft: 2443.0,
                },
                Runway {
                    id: "13".into(),
                    heading_deg: 133.0,
                    start: GeoPoint::new(-122.1195, 37.4650),
                    length_ft: 2443.0,
                },
            ],
        },
        Airport {
            id: "KSQL".into(),
            name: "San Carlos".into(),
            lat: 37.5119,
            lon: -122.2495,
            elevation_ft: 5.0,
            runways: vec![
                Runway {
                    id: "30".into(),
                    heading_deg: 315.0,
                    start: GeoPoint::new(-122.2440, 37.5090),
                    length_ft: 2600.0,
                },
                Runway {
                    id: "12".into(),
                    heading_deg: 135.0,
                    start: GeoPoint::new(-122.2540, 37.5150),
                    length_ft: 2600.0,
                },
            ],
        },
        Airport {
            id: "KHWD".into(),
            name: "Hayward Executive".into(),
            lat: 37.6589,
            lon: -122.1217,
            elevation_ft: 52.0,
            runways: vec![
                Runway {
                    id: "28L".into(),
                    heading_deg: 295.0,
                    start: GeoPoint::new(-122.1140, 37.6570),
                    length_ft: 3107.0,
                },
                Runway {
                    id: "10R".into(),
                    heading_deg: 115.0,
                    start: GeoPoint::new(-122.1290, 37.6600),
                    length_ft: 3107.0,
                },
            ],
        },
    ]
}
