//! Tests for the integrator, the engine command pipeline, and flight plans.

use radarscope_core::airports::AirportTable;
use radarscope_core::commands::{AircraftSpawn, ControlCommand, FlightPlanFiling};
use radarscope_core::constants::*;
use radarscope_core::enums::{FlightPlanStage, FlightState};
use radarscope_core::events::SimEvent;
use radarscope_core::state::TrafficSnapshot;
use radarscope_core::types::GeoPoint;
use radarscope_geo::{bearing_deg, destination_point};

use crate::aircraft::Aircraft;
use crate::engine::{SimConfig, SimulationEngine};
use crate::errors::SimError;
use crate::integrator::{advance, TickContext};

fn spawn(callsign: &str, lon: f64, lat: f64, heading_deg: f64) -> AircraftSpawn {
    AircraftSpawn {
        callsign: callsign.into(),
        aircraft_type: "C172".into(),
        squawk: "1200".into(),
        lon,
        lat,
        altitude_ft: 3000.0,
        heading_deg,
        ground_speed_kt: 120.0,
        fuel_gal: DEFAULT_FUEL_GAL,
        fuel_burn_gph: DEFAULT_FUEL_BURN_GPH,
    }
}

fn aircraft(lon: f64, lat: f64, heading_deg: f64) -> Aircraft {
    Aircraft::from_spawn(&spawn("N1", lon, lat, heading_deg), 7, 0.0, 0).unwrap()
}

fn ctx(elapsed_secs: f64, now_secs: f64) -> TickContext {
    TickContext {
        elapsed_secs,
        now_secs,
        timestamp_ms: (now_secs * 1000.0) as u64,
    }
}

fn engine(seed: u64) -> SimulationEngine {
    SimulationEngine::new(
        SimConfig {
            seed,
            ..Default::default()
        },
        AirportTable::demo(),
    )
}

fn state_changes(snapshot: &TrafficSnapshot, id: u32) -> Vec<(FlightState, FlightState)> {
    snapshot
        .events
        .iter()
        .filter_map(|event| match event {
            SimEvent::StateChanged {
                aircraft_id,
                from,
                to,
            } if *aircraft_id == id => Some((*from, *to)),
            _ => None,
        })
        .collect()
}

fn rejections(snapshot: &TrafficSnapshot) -> Vec<String> {
    snapshot
        .events
        .iter()
        .filter_map(|event| match event {
            SimEvent::CommandRejected { reason } => Some(reason.clone()),
            _ => None,
        })
        .collect()
}

// ---- Integrator ----

#[test]
fn test_advance_does_not_mutate_input() {
    let before = aircraft(-122.3, 37.35, 90.0);
    let snapshot = before.kinematics.clone();
    let after = advance(&before, &ctx(2.0, 2.0)).unwrap();
    assert_eq!(before.kinematics, snapshot);
    assert_ne!(after.kinematics.position, before.kinematics.position);
}

#[test]
fn test_history_is_bounded_and_newest_first() {
    let mut current = aircraft(-122.3, 37.35, 0.0);
    let mut positions = vec![current.kinematics.position];

    for tick in 1..=15 {
        current = advance(&current, &ctx(1.0, tick as f64)).unwrap();
        positions.push(current.kinematics.position);

        let history = &current.kinematics.position_history;
        assert_eq!(history.len(), tick.min(MAX_HISTORY_POSITIONS));
        assert_eq!(history[0], positions[positions.len() - 2]);
    }

    let history = &current.kinematics.position_history;
    for pair in history.windows(2) {
        assert!(pair[0].timestamp_ms > pair[1].timestamp_ms);
    }
}

#[test]
fn test_position_is_timestamped() {
    let start = aircraft(-122.3, 37.35, 0.0);
    let next = advance(
        &start,
        &TickContext {
            elapsed_secs: 2.0,
            now_secs: 2.0,
            timestamp_ms: 1_700_000_002_000,
        },
    )
    .unwrap();
    assert_eq!(next.kinematics.position.timestamp_ms, 1_700_000_002_000);
}

#[test]
fn test_distance_matches_elapsed_time() {
    // A climb holds heading and speed without random turns.
    let mut start = aircraft(-122.3, 37.35, 0.0);
    let update = start
        .behavior
        .force_climb(start.kinematics.altitude_ft, 0.0);
    start.apply(&update);
    assert_eq!(start.kinematics.ground_speed_kt, ALTITUDE_CHANGE_SPEED_KT);

    let mut stepped = start.clone();
    for tick in 1..=100 {
        stepped = advance(&stepped, &ctx(1.0, tick as f64)).unwrap();
    }
    let single = advance(&start, &ctx(100.0, 100.0)).unwrap();

    let expected = destination_point(
        start.kinematics.position.point(),
        ALTITUDE_CHANGE_SPEED_KT * 100.0 / 3600.0,
        0.0,
    );
    for result in [&stepped, &single] {
        let p = result.kinematics.position;
        assert!((p.lat - expected.lat).abs() < 1e-9, "lat {} vs {}", p.lat, expected.lat);
        assert!((p.lon - expected.lon).abs() < 1e-9, "lon {} vs {}", p.lon, expected.lon);
        assert_eq!(result.state(), FlightState::Climbing);
    }
}

#[test]
fn test_equator_eastbound_matches_single_step() {
    let mut start = aircraft(10.0, 0.0, 90.0);
    let update = start.behavior.force_climb(3000.0, 0.0);
    start.apply(&update);

    let mut stepped = start.clone();
    for tick in 1..=60 {
        stepped = advance(&stepped, &ctx(1.0, tick as f64)).unwrap();
    }
    let single = advance(&start, &ctx(60.0, 60.0)).unwrap();

    assert!(stepped.kinematics.position.lat.abs() < 1e-9);
    assert!((stepped.kinematics.position.lon - single.kinematics.position.lon).abs() < 1e-9);
}

#[test]
fn test_heading_change_applies_before_projection() {
    let mut start = aircraft(-122.3, 37.35, 0.0);
    let update = start.behavior.force_turn(0.0, 0.0);
    start.apply(&update);

    let next = advance(&start, &ctx(1.0, 1.0)).unwrap();
    assert_eq!(next.kinematics.heading_deg, TURN_RATE_DEG_PER_SEC);

    let expected = destination_point(start.kinematics.position.point(), 120.0 / 3600.0, 3.0);
    assert_eq!(next.kinematics.position.point(), expected);
}

#[test]
fn test_fuel_burns_linearly_and_floors_at_zero() {
    let start = aircraft(-122.3, 37.35, 0.0);
    let next = advance(&start, &ctx(360.0, 360.0)).unwrap();
    let expected = DEFAULT_FUEL_GAL - DEFAULT_FUEL_BURN_GPH * 0.1;
    assert!((next.kinematics.fuel_gal - expected).abs() < 1e-9);

    let mut low = start.clone();
    low.kinematics.fuel_gal = 0.01;
    let empty = advance(&low, &ctx(60.0, 60.0)).unwrap();
    assert_eq!(empty.kinematics.fuel_gal, 0.0);
}

#[test]
fn test_zero_elapsed_is_a_no_op_move() {
    let start = aircraft(-122.3, 37.35, 45.0);
    let next = advance(&start, &ctx(0.0, 0.0)).unwrap();
    let (a, b) = (next.kinematics.position, start.kinematics.position);
    assert!((a.lat - b.lat).abs() < 1e-12 && (a.lon - b.lon).abs() < 1e-12);
    assert_eq!(next.kinematics.position_history.len(), 1);
}

#[test]
fn test_invalid_elapsed_rejected() {
    let start = aircraft(-122.3, 37.35, 0.0);
    for bad in [-1.0, f64::NAN, f64::INFINITY] {
        let err = advance(&start, &ctx(bad, 1.0)).unwrap_err();
        assert!(matches!(err, SimError::InvalidInput { field: "elapsed_secs", .. }));
    }
}

#[test]
fn test_invalid_kinematics_rejected() {
    let mut bad = aircraft(-122.3, 37.35, 0.0);
    bad.kinematics.ground_speed_kt = -5.0;
    assert!(advance(&bad, &ctx(1.0, 1.0)).is_err());

    let mut bad = aircraft(-122.3, 37.35, 0.0);
    bad.kinematics.position.lat = f64::NAN;
    assert!(advance(&bad, &ctx(1.0, 1.0)).is_err());

    let mut bad = aircraft(-122.3, 37.35, 0.0);
    bad.kinematics.position.lat = 95.0;
    assert!(matches!(
        advance(&bad, &ctx(1.0, 1.0)),
        Err(SimError::InvalidInput { field: "lat", value }) if value == 95.0
    ));

    let mut bad = aircraft(-122.3, 37.35, 0.0);
    bad.kinematics.position.lon = 200.0;
    assert!(matches!(
        advance(&bad, &ctx(1.0, 1.0)),
        Err(SimError::InvalidInput { field: "lon", value }) if value == 200.0
    ));
}

#[test]
fn test_spawn_validation() {
    let mut bad = spawn("N1", -122.3, 95.0, 0.0);
    assert!(matches!(
        Aircraft::from_spawn(&bad, 1, 0.0, 0),
        Err(SimError::InvalidInput { field: "lat", .. })
    ));

    bad = spawn("N1", -122.3, 37.0, 0.0);
    bad.altitude_ft = -10.0;
    assert!(Aircraft::from_spawn(&bad, 1, 0.0, 0).is_err());

    let ok = spawn("N1", -122.3, 37.0, 450.0);
    let aircraft = Aircraft::from_spawn(&ok, 1, 0.0, 0).unwrap();
    assert_eq!(aircraft.kinematics.heading_deg, 90.0);
    assert_eq!(aircraft.state(), FlightState::Cruise);
    assert!(aircraft.kinematics.position_history.is_empty());
}

// ---- Engine ----

#[test]
fn test_determinism_same_seed() {
    let mut engine_a = engine(12345);
    let mut engine_b = engine(12345);
    for e in [&mut engine_a, &mut engine_b] {
        e.queue_command(ControlCommand::SpawnAircraft {
            spawn: spawn("N1", -122.3, 37.35, 90.0),
        });
        e.queue_command(ControlCommand::SpawnAircraft {
            spawn: spawn("N2", -122.0, 37.6, 200.0),
        });
    }

    for _ in 0..1000 {
        let json_a = serde_json::to_string(&engine_a.tick(2.0).unwrap()).unwrap();
        let json_b = serde_json::to_string(&engine_b.tick(2.0).unwrap()).unwrap();
        assert_eq!(json_a, json_b, "Snapshots diverged with same seed");
    }
}

#[test]
fn test_determinism_with_forced_commands() {
    let mut engine_a = engine(4242);
    let mut engine_b = engine(4242);
    for e in [&mut engine_a, &mut engine_b] {
        e.queue_commands([
            ControlCommand::SpawnAircraft {
                spawn: spawn("N1", -122.3, 37.35, 90.0),
            },
            ControlCommand::SpawnAircraft {
                spawn: spawn("N2", -122.0, 37.6, 200.0),
            },
            ControlCommand::SpawnAircraft {
                spawn: spawn("N3", -122.2, 37.8, 10.0),
            },
        ]);
    }

    let scripted = |tick: u32| -> Vec<ControlCommand> {
        match tick {
            10 => vec![
                ControlCommand::ForceLanding { aircraft_id: 1 },
                ControlCommand::ForceTurn { aircraft_id: 2 },
            ],
            60 => vec![ControlCommand::ForceLanding { aircraft_id: 3 }],
            120 => vec![ControlCommand::ForceFlyTo {
                aircraft_id: 2,
                lat: 37.5,
                lon: -122.1,
            }],
            250 => vec![ControlCommand::ForceClimb { aircraft_id: 2 }],
            400 => vec![
                ControlCommand::ForceDescent { aircraft_id: 2 },
                ControlCommand::ForceLanding { aircraft_id: 2 },
            ],
            _ => Vec::new(),
        }
    };

    let mut landings = 0;
    for tick in 0..1500 {
        engine_a.queue_commands(scripted(tick));
        engine_b.queue_commands(scripted(tick));
        let snap_a = engine_a.tick(2.0).unwrap();
        let snap_b = engine_b.tick(2.0).unwrap();
        assert!(rejections(&snap_a).is_empty());
        landings += snap_a
            .events
            .iter()
            .filter(|e| matches!(e, SimEvent::Landed { .. }))
            .count();

        let json_a = serde_json::to_string(&snap_a).unwrap();
        let json_b = serde_json::to_string(&snap_b).unwrap();
        assert_eq!(json_a, json_b, "Snapshots diverged at tick {tick}");
    }
    assert!(landings > 0, "Forced landings should touch down");
}

#[test]
fn test_determinism_different_seeds() {
    let mut engine_a = engine(111);
    let mut engine_b = engine(222);
    for e in [&mut engine_a, &mut engine_b] {
        e.queue_command(ControlCommand::SpawnAircraft {
            spawn: spawn("N1", -122.3, 37.35, 90.0),
        });
    }

    let mut diverged = false;
    for _ in 0..2000 {
        let json_a = serde_json::to_string(&engine_a.tick(2.0).unwrap()).unwrap();
        let json_b = serde_json::to_string(&engine_b.tick(2.0).unwrap()).unwrap();
        if json_a != json_b {
            diverged = true;
            break;
        }
    }
    assert!(diverged, "Different seeds should produce divergent output");
}

#[test]
fn test_aircraft_are_independent() {
    let mut solo = engine(9);
    let mut crowded = engine(9);
    solo.queue_command(ControlCommand::SpawnAircraft {
        spawn: spawn("N1", -122.3, 37.35, 90.0),
    });
    crowded.queue_commands([
        ControlCommand::SpawnAircraft {
            spawn: spawn("N1", -122.3, 37.35, 90.0),
        },
        ControlCommand::SpawnAircraft {
            spawn: spawn("N2", -122.1, 37.5, 270.0),
        },
    ]);

    for tick in 0..1500 {
        if tick == 300 {
            crowded.queue_command(ControlCommand::ForceLanding { aircraft_id: 2 });
        }
        let a = solo.tick(2.0).unwrap();
        let b = crowded.tick(2.0).unwrap();
        assert_eq!(a.aircraft[0], b.aircraft[0]);
    }
}

#[test]
fn test_spawn_and_remove_events() {
    let mut engine = engine(1);
    engine.queue_command(ControlCommand::SpawnAircraft {
        spawn: spawn("N1", -122.3, 37.35, 90.0),
    });
    let snap = engine.tick(2.0).unwrap();
    assert_eq!(engine.aircraft_count(), 1);
    assert!(snap.events.contains(&SimEvent::AircraftActivated {
        aircraft_id: 1,
        callsign: "N1".into(),
    }));

    engine.queue_command(ControlCommand::RemoveAircraft { aircraft_id: 1 });
    let snap = engine.tick(2.0).unwrap();
    assert_eq!(engine.aircraft_count(), 0);
    assert!(snap.aircraft.is_empty());
    assert!(snap
        .events
        .contains(&SimEvent::AircraftRemoved { aircraft_id: 1 }));
}

#[test]
fn test_snapshot_lists_aircraft_by_id() {
    let mut engine = engine(3);
    for (i, callsign) in ["N3", "N1", "N2"].iter().enumerate() {
        engine.queue_command(ControlCommand::SpawnAircraft {
            spawn: spawn(callsign, -122.3 + i as f64 * 0.1, 37.35, 90.0),
        });
    }
    let snap = engine.tick(2.0).unwrap();
    let ids: Vec<u32> = snap.aircraft.iter().map(|a| a.aircraft_id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(snap.aircraft[0].callsign, "N3");
    assert_eq!(snap.aircraft[0].history.len(), 1);
}

#[test]
fn test_unknown_aircraft_command_rejected() {
    let mut engine = engine(1);
    engine.queue_command(ControlCommand::ForceClimb { aircraft_id: 99 });
    let snap = engine.tick(2.0).unwrap();
    assert_eq!(rejections(&snap), vec!["unknown aircraft 99".to_string()]);
}

#[test]
fn test_invalid_spawn_rejected() {
    let mut engine = engine(1);
    engine.queue_command(ControlCommand::SpawnAircraft {
        spawn: spawn("N1", -122.3, 95.0, 90.0),
    });
    let snap = engine.tick(2.0).unwrap();
    assert_eq!(engine.aircraft_count(), 0);
    assert_eq!(rejections(&snap).len(), 1);
}

#[test]
fn test_invalid_fly_to_rejected_without_state_change() {
    let mut engine = engine(1);
    engine.queue_command(ControlCommand::SpawnAircraft {
        spawn: spawn("N1", -122.3, 37.35, 90.0),
    });
    engine.tick(0.0).unwrap();

    engine.queue_command(ControlCommand::ForceFlyTo {
        aircraft_id: 1,
        lat: 120.0,
        lon: 0.0,
    });
    let snap = engine.tick(0.0).unwrap();
    assert_eq!(rejections(&snap).len(), 1);
    assert_eq!(snap.aircraft[0].state, FlightState::Cruise);
}

#[test]
fn test_invalid_tick_leaves_engine_untouched() {
    let mut engine = engine(1);
    engine.queue_command(ControlCommand::SpawnAircraft {
        spawn: spawn("N1", -122.3, 37.35, 90.0),
    });
    assert!(matches!(
        engine.tick(f64::NAN),
        Err(SimError::InvalidInput { .. })
    ));
    assert_eq!(engine.aircraft_count(), 0);
    assert_eq!(engine.time().tick, 0);

    engine.tick(2.0).unwrap();
    assert_eq!(engine.aircraft_count(), 1);
}

#[test]
fn test_forced_climb_through_engine() {
    let mut engine = engine(5);
    engine.queue_command(ControlCommand::SpawnAircraft {
        spawn: spawn("N1", -122.3, 37.35, 90.0),
    });
    engine.tick(0.0).unwrap();

    engine.queue_command(ControlCommand::ForceClimb { aircraft_id: 1 });
    let snap = engine.tick(1.0).unwrap();
    assert_eq!(
        state_changes(&snap, 1),
        vec![(FlightState::Cruise, FlightState::Climbing)]
    );
    let view = &snap.aircraft[0];
    assert_eq!(view.target_altitude_ft, Some(4000.0));
    assert_eq!(view.ground_speed_kt, ALTITUDE_CHANGE_SPEED_KT);

    let mut last = snap;
    for _ in 0..119 {
        last = engine.tick(1.0).unwrap();
    }
    assert_eq!(last.aircraft[0].altitude_ft, 4000.0);
    assert_eq!(last.aircraft[0].state, FlightState::Cruise);
    assert_eq!(last.aircraft[0].ground_speed_kt, CRUISE_SPEED_KT);
}

#[test]
fn test_forced_landing_touch_and_go() {
    let mut engine = engine(21);
    engine.queue_command(ControlCommand::SpawnAircraft {
        spawn: spawn("N1", -122.30, 37.30, 90.0),
    });
    engine.tick(0.0).unwrap();
    engine.queue_command(ControlCommand::ForceLanding { aircraft_id: 1 });

    let mut changes = Vec::new();
    let mut landed = None;
    let mut field = None;
    for _ in 0..5000 {
        let snap = engine.tick(2.0).unwrap();
        changes.extend(state_changes(&snap, 1));

        let view = &snap.aircraft[0];
        if view.state == FlightState::FinalApproach {
            field = view.target_altitude_ft;
            assert!(view.altitude_ft >= field.unwrap());
            assert_eq!(view.ground_speed_kt, APPROACH_SPEED_KT);
        }
        for event in &snap.events {
            if let SimEvent::Landed { airport_id, .. } = event {
                landed = Some(airport_id.clone());
                assert_eq!(Some(view.altitude_ft), field);
            }
        }
        if changes.last() == Some(&(FlightState::Climbing, FlightState::Cruise)) {
            assert_eq!(Some(view.altitude_ft), field.map(|f| f + CIRCUIT_ALTITUDE_FT));
            break;
        }
    }

    assert!(landed.is_some(), "aircraft never landed");
    assert_eq!(
        changes,
        vec![
            (FlightState::Cruise, FlightState::Turning),
            (FlightState::Turning, FlightState::ApproachTransit),
            (FlightState::ApproachTransit, FlightState::Turning),
            (FlightState::Turning, FlightState::FinalApproach),
            (FlightState::FinalApproach, FlightState::Climbing),
            (FlightState::Climbing, FlightState::Cruise),
        ]
    );
}

#[test]
fn test_approach_shown_in_view() {
    let mut engine = engine(4);
    engine.queue_command(ControlCommand::SpawnAircraft {
        spawn: spawn("N1", -122.30, 37.30, 90.0),
    });
    engine.queue_command(ControlCommand::ForceLanding { aircraft_id: 1 });
    let snap = engine.tick(2.0).unwrap();

    let view = &snap.aircraft[0];
    let (airport_id, runway_id) = view.approach.clone().unwrap();
    let airport = engine.airports().get(&airport_id).unwrap();
    assert!(airport.runways.iter().any(|r| r.id == runway_id));
    assert!(view.target_heading_deg.is_some());
}

#[test]
fn test_pause_freezes_aircraft() {
    let mut engine = engine(1);
    engine.queue_command(ControlCommand::SpawnAircraft {
        spawn: spawn("N1", -122.3, 37.35, 90.0),
    });
    let before = engine.tick(2.0).unwrap();

    engine.queue_command(ControlCommand::Pause);
    let paused = engine.tick(2.0).unwrap();
    assert!(paused.paused);
    assert_eq!(paused.time, before.time);
    assert_eq!(paused.aircraft, before.aircraft);

    engine.queue_command(ControlCommand::Resume);
    let resumed = engine.tick(2.0).unwrap();
    assert!(!resumed.paused);
    assert_eq!(resumed.time.tick, before.time.tick + 1);
    assert_ne!(resumed.aircraft[0].position, before.aircraft[0].position);
}

#[test]
fn test_time_scale_clamped() {
    let mut engine = engine(1);
    engine.queue_command(ControlCommand::SetTimeScale { scale: 20.0 });
    engine.tick(0.0).unwrap();
    assert_eq!(engine.time_scale(), MAX_TIME_SCALE);

    engine.queue_command(ControlCommand::SetTimeScale { scale: -1.0 });
    engine.tick(0.0).unwrap();
    assert_eq!(engine.time_scale(), 0.0);

    engine.queue_command(ControlCommand::SetTimeScale { scale: f64::NAN });
    let snap = engine.tick(0.0).unwrap();
    assert_eq!(rejections(&snap).len(), 1);
    assert_eq!(engine.time_scale(), 0.0);
}

// ---- Flight plans ----

fn filing() -> FlightPlanFiling {
    FlightPlanFiling {
        callsign: "N456CD".into(),
        aircraft_type: "PA28".into(),
        squawk: "3344".into(),
        departure: "KPAO".into(),
        destination: "KHWD".into(),
        cruise_altitude_ft: 3500.0,
        cruise_speed_kt: 110.0,
    }
}

#[test]
fn test_flight_plan_pipeline() {
    let mut engine = engine(8);
    engine.queue_command(ControlCommand::FileFlightPlan { filing: filing() });
    let snap = engine.tick(0.0).unwrap();
    assert_eq!(snap.flight_plans.len(), 1);
    assert_eq!(snap.flight_plans[0].stage, FlightPlanStage::Planning);
    assert_eq!(engine.aircraft_count(), 0);

    engine.queue_command(ControlCommand::AdvanceFlightPlan { plan_id: 1 });
    let snap = engine.tick(0.0).unwrap();
    assert_eq!(snap.flight_plans[0].stage, FlightPlanStage::Approval);
    assert_eq!(engine.aircraft_count(), 0);

    engine.queue_command(ControlCommand::AdvanceFlightPlan { plan_id: 1 });
    let snap = engine.tick(2.0).unwrap();
    assert_eq!(snap.flight_plans[0].stage, FlightPlanStage::Operations);
    assert_eq!(snap.flight_plans[0].aircraft_id, Some(1));
    assert!(snap.events.contains(&SimEvent::FlightPlanAdvanced {
        plan_id: 1,
        stage: FlightPlanStage::Operations,
    }));

    let view = &snap.aircraft[0];
    let kpao = engine.airports().get("KPAO").unwrap().location();
    let khwd = engine.airports().get("KHWD").unwrap().location();
    assert_eq!(view.callsign, "N456CD");
    assert_eq!(view.altitude_ft, 3500.0);
    assert_eq!(view.ground_speed_kt, 110.0);
    assert!((view.heading_deg - bearing_deg(kpao, khwd)).abs() < 1e-6);

    engine.queue_command(ControlCommand::AdvanceFlightPlan { plan_id: 1 });
    let snap = engine.tick(0.0).unwrap();
    assert_eq!(snap.flight_plans[0].stage, FlightPlanStage::Intercept);

    engine.queue_command(ControlCommand::AdvanceFlightPlan { plan_id: 1 });
    let snap = engine.tick(0.0).unwrap();
    assert_eq!(rejections(&snap).len(), 1);
    assert_eq!(snap.flight_plans[0].stage, FlightPlanStage::Intercept);

    engine.queue_command(ControlCommand::CloseFlightPlan { plan_id: 1 });
    let snap = engine.tick(0.0).unwrap();
    assert!(snap.flight_plans.is_empty());
    assert_eq!(engine.aircraft_count(), 0);
    assert!(snap
        .events
        .contains(&SimEvent::AircraftRemoved { aircraft_id: 1 }));
}

#[test]
fn test_removing_plan_aircraft_clears_link() {
    let mut engine = engine(8);
    engine.queue_commands([
        ControlCommand::FileFlightPlan { filing: filing() },
        ControlCommand::AdvanceFlightPlan { plan_id: 1 },
        ControlCommand::AdvanceFlightPlan { plan_id: 1 },
    ]);
    let snap = engine.tick(2.0).unwrap();
    assert_eq!(snap.flight_plans[0].aircraft_id, Some(1));

    engine.queue_command(ControlCommand::RemoveAircraft { aircraft_id: 1 });
    let snap = engine.tick(2.0).unwrap();
    assert_eq!(engine.aircraft_count(), 0);
    assert_eq!(snap.flight_plans[0].stage, FlightPlanStage::Operations);
    assert_eq!(snap.flight_plans[0].aircraft_id, None);
    assert_eq!(engine.flight_plan(1).unwrap().aircraft_id, None);

    engine.queue_command(ControlCommand::CloseFlightPlan { plan_id: 1 });
    let snap = engine.tick(2.0).unwrap();
    assert!(rejections(&snap).is_empty());
    assert!(snap.flight_plans.is_empty());
}

#[test]
fn test_flight_plan_with_unknown_airport_rejected() {
    let mut engine = engine(8);
    let mut bad = filing();
    bad.departure = "KZZZ".into();
    engine.queue_command(ControlCommand::FileFlightPlan { filing: bad });
    let snap = engine.tick(0.0).unwrap();
    assert!(snap.flight_plans.is_empty());
    assert_eq!(rejections(&snap), vec!["unknown airport 'KZZZ'".to_string()]);
}

#[test]
fn test_unknown_flight_plan_rejected() {
    let mut engine = engine(8);
    engine.queue_command(ControlCommand::AdvanceFlightPlan { plan_id: 4 });
    engine.queue_command(ControlCommand::CloseFlightPlan { plan_id: 4 });
    let snap = engine.tick(0.0).unwrap();
    assert_eq!(rejections(&snap).len(), 2);
}

#[test]
fn test_snapshot_serializes() {
    let mut engine = engine(2);
    engine.queue_command(ControlCommand::SpawnAircraft {
        spawn: spawn("N1", -122.3, 37.35, 90.0),
    });
    engine.queue_command(ControlCommand::ForceLanding { aircraft_id: 1 });
    let snap = engine.tick(2.0).unwrap();
    let json = serde_json::to_string(&snap).unwrap();
    let back: TrafficSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(back.aircraft.len(), 1);
    assert_eq!(back.aircraft[0].approach, snap.aircraft[0].approach);
    assert!(json.contains("\"state\":\"ApproachTransit\"") || json.contains("\"state\":\"Turning\""));
}

#[test]
fn test_forced_commands_use_current_position() {
    let mut engine = engine(6);
    engine.queue_command(ControlCommand::SpawnAircraft {
        spawn: spawn("N1", -122.3, 37.35, 0.0),
    });
    for _ in 0..30 {
        engine.tick(2.0).unwrap();
    }
    let target = GeoPoint::new(-122.25, 37.35);
    engine.queue_command(ControlCommand::ForceFlyTo {
        aircraft_id: 1,
        lat: target.lat,
        lon: target.lon,
    });
    engine.tick(0.0).unwrap();

    let aircraft = engine.aircraft(1).unwrap();
    let here = aircraft.kinematics.position.point();
    let target_heading = aircraft.behavior.target_heading().unwrap();
    assert!((target_heading - bearing_deg(here, target)).abs() < 1e-6);
}
