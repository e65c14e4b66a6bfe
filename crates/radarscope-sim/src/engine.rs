//! Simulation engine.
//!
//! `SimulationEngine` owns the hecs ECS world, processes control commands
//! at tick boundaries, advances every aircraft, and produces
//! `TrafficSnapshot`s. Headless and deterministic for a given seed and
//! command sequence.

use std::collections::{BTreeMap, HashMap, VecDeque};

use hecs::{Entity, World};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use radarscope_behavior::BehaviorUpdate;
use radarscope_core::airports::AirportTable;
use radarscope_core::commands::{AircraftSpawn, ControlCommand, FlightPlanFiling};
use radarscope_core::constants::MAX_TIME_SCALE;
use radarscope_core::enums::FlightPlanStage;
use radarscope_core::events::SimEvent;
use radarscope_core::state::TrafficSnapshot;
use radarscope_core::types::SimTime;

use crate::aircraft::Aircraft;
use crate::errors::{check_finite, Result, SimError};
use crate::flight_plan::FlightPlan;
use crate::integrator::{self, TickContext};
use crate::systems;
use crate::world_setup;

/// Configuration for starting a new simulation.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Master seed. Each aircraft's own seed is drawn from this stream.
    pub seed: u64,
    /// Timestamp of simulated time zero.
    pub start_epoch_ms: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            start_epoch_ms: 0,
        }
    }
}

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    airports: AirportTable,
    time: SimTime,
    start_epoch_ms: u64,
    paused: bool,
    time_scale: f64,
    rng: ChaCha8Rng,
    next_aircraft_id: u32,
    next_plan_id: u32,
    aircraft_index: HashMap<u32, Entity>,
    flight_plans: BTreeMap<u32, FlightPlan>,
    command_queue: VecDeque<ControlCommand>,
    events: Vec<SimEvent>,
}

impl SimulationEngine {
    pub fn new(config: SimConfig, airports: AirportTable) -> Self {
        Self {
            world: World::new(),
            airports,
            time: SimTime::default(),
            start_epoch_ms: config.start_epoch_ms,
            paused: false,
            time_scale: 1.0,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            next_aircraft_id: 1,
            next_plan_id: 1,
            aircraft_index: HashMap::new(),
            flight_plans: BTreeMap::new(),
            command_queue: VecDeque::new(),
            events: Vec::new(),
        }
    }

    /// Queue a command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: ControlCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = ControlCommand>) {
        self.command_queue.extend(commands);
    }

    /// Apply queued commands, advance every aircraft by `elapsed_secs`
    /// unless paused, and return the resulting snapshot.
    ///
    /// An invalid `elapsed_secs` is rejected before anything changes.
    pub fn tick(&mut self, elapsed_secs: f64) -> Result<TrafficSnapshot> {
        integrator::validate_elapsed(elapsed_secs)?;
        self.process_commands();

        if !self.paused {
            let mut next_time = self.time;
            next_time.advance(elapsed_secs);
            let ctx = TickContext {
                elapsed_secs,
                now_secs: next_time.elapsed_secs,
                timestamp_ms: next_time.timestamp_ms(self.start_epoch_ms),
            };
            systems::movement::run(&mut self.world, &ctx, &mut self.events)?;
            self.time = next_time;
        }

        let flight_plans = self.flight_plans.values().map(FlightPlan::view).collect();
        Ok(systems::snapshot::build_snapshot(
            &self.world,
            &self.time,
            self.paused,
            self.time_scale,
            flight_plans,
            std::mem::take(&mut self.events),
        ))
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn airports(&self) -> &AirportTable {
        &self.airports
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn aircraft_count(&self) -> usize {
        self.aircraft_index.len()
    }

    /// Borrow one aircraft by id.
    pub fn aircraft(&self, aircraft_id: u32) -> Option<hecs::Ref<'_, Aircraft>> {
        let entity = *self.aircraft_index.get(&aircraft_id)?;
        self.world.get::<&Aircraft>(entity).ok()
    }

    pub fn flight_plan(&self, plan_id: u32) -> Option<&FlightPlan> {
        self.flight_plans.get(&plan_id)
    }

    /// Apply queued commands now instead of at the next tick.
    pub fn apply_commands(&mut self) {
        self.process_commands();
    }

    /// Process all queued commands. Failures become `CommandRejected` events.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            if let Err(err) = self.handle_command(command) {
                warn!(error = %err, "command rejected");
                self.events.push(SimEvent::CommandRejected {
                    reason: err.to_string(),
                });
            }
        }
    }

    fn handle_command(&mut self, command: ControlCommand) -> Result<()> {
        match command {
            ControlCommand::SpawnAircraft { spawn } => {
                self.spawn_aircraft(&spawn)?;
            }
            ControlCommand::RemoveAircraft { aircraft_id } => {
                self.remove_aircraft(aircraft_id)?;
            }
            ControlCommand::ForceTurn { aircraft_id } => {
                self.force_maneuver(aircraft_id, |aircraft, now, _| {
                    let heading = aircraft.kinematics.heading_deg;
                    Ok(aircraft.behavior.force_turn(heading, now))
                })?;
            }
            ControlCommand::ForceLanding { aircraft_id } => {
                self.force_maneuver(aircraft_id, |aircraft, now, airports| {
                    let altitude = aircraft.kinematics.altitude_ft;
                    Ok(aircraft.behavior.force_landing(altitude, now, airports)?)
                })?;
            }
            ControlCommand::ForceFlyTo {
                aircraft_id,
                lat,
                lon,
            } => {
                self.force_maneuver(aircraft_id, |aircraft, now, _| {
                    Ok(aircraft.behavior.force_fly_to(lat, lon, now)?)
                })?;
            }
            ControlCommand::ForceClimb { aircraft_id } => {
                self.force_maneuver(aircraft_id, |aircraft, now, _| {
                    let altitude = aircraft.kinematics.altitude_ft;
                    Ok(aircraft.behavior.force_climb(altitude, now))
                })?;
            }
            ControlCommand::ForceDescent { aircraft_id } => {
                self.force_maneuver(aircraft_id, |aircraft, now, airports| {
                    let altitude = aircraft.kinematics.altitude_ft;
                    Ok(aircraft.behavior.force_descent(altitude, now, airports))
                })?;
            }
            ControlCommand::FileFlightPlan { filing } => {
                self.file_flight_plan(filing)?;
            }
            ControlCommand::AdvanceFlightPlan { plan_id } => {
                self.advance_flight_plan(plan_id)?;
            }
            ControlCommand::CloseFlightPlan { plan_id } => {
                self.close_flight_plan(plan_id)?;
            }
            ControlCommand::Pause => self.paused = true,
            ControlCommand::Resume => self.paused = false,
            ControlCommand::SetTimeScale { scale } => {
                self.time_scale = check_finite("time_scale", scale)?.clamp(0.0, MAX_TIME_SCALE);
            }
        }
        Ok(())
    }

    fn spawn_aircraft(&mut self, spawn: &AircraftSpawn) -> Result<u32> {
        let id = self.next_aircraft_id;
        let seed: u64 = self.rng.gen();
        let entity = world_setup::spawn_aircraft(
            &mut self.world,
            id,
            spawn,
            seed,
            self.time.elapsed_secs,
            self.time.timestamp_ms(self.start_epoch_ms),
        )?;
        self.next_aircraft_id += 1;
        self.aircraft_index.insert(id, entity);

        info!(id, callsign = %spawn.callsign, "aircraft activated");
        self.events.push(SimEvent::AircraftActivated {
            aircraft_id: id,
            callsign: spawn.callsign.clone(),
        });
        Ok(id)
    }

    fn remove_aircraft(&mut self, aircraft_id: u32) -> Result<()> {
        let entity = self
            .aircraft_index
            .remove(&aircraft_id)
            .ok_or(SimError::UnknownAircraft(aircraft_id))?;
        self.world
            .despawn(entity)
            .map_err(|_| SimError::UnknownAircraft(aircraft_id))?;
        for plan in self.flight_plans.values_mut() {
            if plan.aircraft_id == Some(aircraft_id) {
                plan.aircraft_id = None;
            }
        }

        info!(id = aircraft_id, "aircraft removed");
        self.events.push(SimEvent::AircraftRemoved { aircraft_id });
        Ok(())
    }

    /// Run a forced maneuver against one aircraft at the current time and
    /// apply the returned update immediately.
    fn force_maneuver<F>(&mut self, aircraft_id: u32, maneuver: F) -> Result<()>
    where
        F: FnOnce(&mut Aircraft, f64, &AirportTable) -> Result<BehaviorUpdate>,
    {
        let entity = *self
            .aircraft_index
            .get(&aircraft_id)
            .ok_or(SimError::UnknownAircraft(aircraft_id))?;
        let mut aircraft = self
            .world
            .get::<&mut Aircraft>(entity)
            .map_err(|_| SimError::UnknownAircraft(aircraft_id))?;

        let from = aircraft.state();
        let position = aircraft.kinematics.position.point();
        aircraft.behavior.sync_position(position);
        let update = maneuver(&mut *aircraft, self.time.elapsed_secs, &self.airports)?;
        aircraft.apply(&update);

        debug!(id = aircraft_id, ?update, "forced maneuver");
        let to = aircraft.state();
        if from != to {
            self.events.push(SimEvent::StateChanged {
                aircraft_id,
                from,
                to,
            });
        }
        Ok(())
    }

    fn file_flight_plan(&mut self, filing: FlightPlanFiling) -> Result<u32> {
        let id = self.next_plan_id;
        let plan = FlightPlan::file(id, filing, &self.airports)?;
        self.next_plan_id += 1;

        info!(
            plan_id = id,
            callsign = %plan.filing.callsign,
            departure = %plan.filing.departure,
            destination = %plan.filing.destination,
            "flight plan filed"
        );
        self.flight_plans.insert(id, plan);
        self.events.push(SimEvent::FlightPlanAdvanced {
            plan_id: id,
            stage: FlightPlanStage::Planning,
        });
        Ok(id)
    }

    /// Move a plan one stage forward. Entering Operations activates its
    /// aircraft and points it at the destination.
    fn advance_flight_plan(&mut self, plan_id: u32) -> Result<()> {
        let plan = self
            .flight_plans
            .get(&plan_id)
            .ok_or(SimError::UnknownFlightPlan(plan_id))?;
        let next = plan.next_stage()?;
        let activation = if next == FlightPlanStage::Operations {
            Some(plan.activation(&self.airports)?)
        } else {
            None
        };

        let aircraft_id = match activation {
            Some(activation) => {
                let id = self.spawn_aircraft(&activation.spawn)?;
                let destination = activation.destination;
                self.force_maneuver(id, |aircraft, now, _| {
                    Ok(aircraft
                        .behavior
                        .force_fly_to(destination.lat, destination.lon, now)?)
                })?;
                Some(id)
            }
            None => None,
        };

        let plan = self
            .flight_plans
            .get_mut(&plan_id)
            .ok_or(SimError::UnknownFlightPlan(plan_id))?;
        plan.stage = next;
        if aircraft_id.is_some() {
            plan.aircraft_id = aircraft_id;
        }

        info!(plan_id, stage = ?next, "flight plan advanced");
        self.events.push(SimEvent::FlightPlanAdvanced {
            plan_id,
            stage: next,
        });
        Ok(())
    }

    /// Drop a plan and deactivate the aircraft flying it.
    fn close_flight_plan(&mut self, plan_id: u32) -> Result<()> {
        let plan = self
            .flight_plans
            .remove(&plan_id)
            .ok_or(SimError::UnknownFlightPlan(plan_id))?;
        info!(plan_id, "flight plan closed");

        if let Some(aircraft_id) = plan.aircraft_id {
            if self.aircraft_index.contains_key(&aircraft_id) {
                self.remove_aircraft(aircraft_id)?;
            }
        }
        Ok(())
    }
}
