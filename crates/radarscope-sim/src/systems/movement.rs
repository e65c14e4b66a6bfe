//! Movement system: integrates every aircraft by one tick.
//!
//! All aircraft are advanced from the same pre-tick world before any result
//! is written back, so a failure leaves the world untouched and no aircraft
//! sees another's post-tick state.

use hecs::{Entity, World};
use tracing::{debug_span, info};

use radarscope_core::components::Identity;
use radarscope_core::enums::FlightState;
use radarscope_core::events::SimEvent;

use crate::aircraft::Aircraft;
use crate::errors::Result;
use crate::integrator::{self, TickContext};

/// Advance all aircraft and append transition events to `events`.
pub fn run(world: &mut World, ctx: &TickContext, events: &mut Vec<SimEvent>) -> Result<()> {
    let mut advanced: Vec<(Entity, Aircraft)> = Vec::new();
    let mut tick_events = Vec::new();

    for (entity, (identity, aircraft)) in world.query::<(&Identity, &Aircraft)>().iter() {
        let span = debug_span!("aircraft", id = identity.id, callsign = %identity.callsign);
        let _guard = span.enter();

        let next = integrator::advance(aircraft, ctx)?;
        record_transition(identity, aircraft, &next, &mut tick_events);
        advanced.push((entity, next));
    }

    for (entity, next) in advanced {
        if let Ok(mut aircraft) = world.get::<&mut Aircraft>(entity) {
            *aircraft = next;
        }
    }
    events.extend(tick_events);
    Ok(())
}

fn record_transition(
    identity: &Identity,
    before: &Aircraft,
    after: &Aircraft,
    events: &mut Vec<SimEvent>,
) {
    let (from, to) = (before.state(), after.state());
    if from == to {
        return;
    }
    events.push(SimEvent::StateChanged {
        aircraft_id: identity.id,
        from,
        to,
    });

    if from == FlightState::FinalApproach && to == FlightState::Climbing {
        if let Some(plan) = before.behavior.approach_plan() {
            info!(
                callsign = %identity.callsign,
                airport = %plan.airport_id,
                runway = %plan.runway.id,
                "touch and go"
            );
            events.push(SimEvent::Landed {
                aircraft_id: identity.id,
                airport_id: plan.airport_id.clone(),
                runway_id: plan.runway.id.clone(),
            });
        }
    }
}
