//! Mock flight-plan pipeline: Planning, Approval, Operations, Intercept.
//!
//! Reaching Operations activates the plan: an aircraft appears over the
//! departure airport at cruise altitude and speed, pointed at the
//! destination.

use radarscope_core::airports::AirportTable;
use radarscope_core::commands::{AircraftSpawn, FlightPlanFiling};
use radarscope_core::constants::{DEFAULT_FUEL_BURN_GPH, DEFAULT_FUEL_GAL};
use radarscope_core::enums::FlightPlanStage;
use radarscope_core::state::FlightPlanView;
use radarscope_core::types::GeoPoint;
use radarscope_geo::bearing_deg;

use crate::errors::{check_non_negative, invalid_input, Result, SimError};

#[derive(Debug, Clone, PartialEq)]
pub struct FlightPlan {
    pub id: u32,
    pub filing: FlightPlanFiling,
    pub stage: FlightPlanStage,
    /// Aircraft flying this plan, once activated.
    pub aircraft_id: Option<u32>,
}

/// Where an activated plan starts and where it is headed.
#[derive(Debug, Clone, PartialEq)]
pub struct Activation {
    pub spawn: AircraftSpawn,
    pub destination: GeoPoint,
}

impl FlightPlan {
    /// File a new plan in the Planning stage. Both airports must be known.
    pub fn file(id: u32, filing: FlightPlanFiling, airports: &AirportTable) -> Result<Self> {
        for airport in [&filing.departure, &filing.destination] {
            if airports.get(airport).is_none() {
                return Err(SimError::UnknownAirport(airport.clone()));
            }
        }
        check_non_negative("cruise_altitude_ft", filing.cruise_altitude_ft)?;
        if !(filing.cruise_speed_kt.is_finite() && filing.cruise_speed_kt > 0.0) {
            return Err(invalid_input("cruise_speed_kt", filing.cruise_speed_kt));
        }

        Ok(Self {
            id,
            filing,
            stage: FlightPlanStage::Planning,
            aircraft_id: None,
        })
    }

    /// The stage this plan would move to next.
    pub fn next_stage(&self) -> Result<FlightPlanStage> {
        self.stage.next().ok_or(SimError::StageTransition {
            plan_id: self.id,
            stage: self.stage,
        })
    }

    /// Build the aircraft this plan puts into the air.
    pub fn activation(&self, airports: &AirportTable) -> Result<Activation> {
        let departure = self.airport(airports, &self.filing.departure)?.location();
        let destination = self.airport(airports, &self.filing.destination)?.location();

        let spawn = AircraftSpawn {
            callsign: self.filing.callsign.clone(),
            aircraft_type: self.filing.aircraft_type.clone(),
            squawk: self.filing.squawk.clone(),
            lon: departure.lon,
            lat: departure.lat,
            altitude_ft: self.filing.cruise_altitude_ft,
            heading_deg: bearing_deg(departure, destination),
            ground_speed_kt: self.filing.cruise_speed_kt,
            fuel_gal: DEFAULT_FUEL_GAL,
            fuel_burn_gph: DEFAULT_FUEL_BURN_GPH,
        };
        Ok(Activation { spawn, destination })
    }

    pub fn view(&self) -> FlightPlanView {
        FlightPlanView {
            plan_id: self.id,
            callsign: self.filing.callsign.clone(),
            departure: self.filing.departure.clone(),
            destination: self.filing.destination.clone(),
            stage: self.stage,
            aircraft_id: self.aircraft_id,
        }
    }

    fn airport<'a>(
        &self,
        airports: &'a AirportTable,
        id: &str,
    ) -> Result<&'a radarscope_core::airports::Airport> {
        airports
            .get(id)
            .ok_or_else(|| SimError::UnknownAirport(id.to_string()))
    }
}
