//! Event consequence resolution.
//!
//! Every authored (event, choice) pair maps to a signed resource delta scaled
//! by a single impact roll shared across all resources touched by that
//! resolution.
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{IMPACT_MAX, IMPACT_MIN};
use crate::events::EventChoice;
use crate::resources::ResourceDelta;

/// Highest event id with an authored consequence.
pub const LAST_AUTHORED_EVENT: u32 = 12;

/// Outcome of resolving one event dialog.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Consequence {
    pub event_id: u32,
    pub choice: EventChoice,
    pub impact: f64,
    pub delta: ResourceDelta,
    /// `false` when the event id had no authored mapping and resolved to a no-op.
    pub authored: bool,
}

/// Draw the shared impact magnitude, an integer in `[5, 14]`.
pub fn roll_impact<R>(rng: &mut R) -> f64
where
    R: Rng + ?Sized,
{
    f64::from(rng.gen_range(IMPACT_MIN..=IMPACT_MAX))
}

#[must_use]
pub const fn has_consequence(event_id: u32) -> bool {
    matches!(event_id, 1..=LAST_AUTHORED_EVENT)
}

/// Map an event choice and impact to a resource delta.
///
/// Unknown ids resolve to an empty delta and are logged as a content gap.
#[must_use]
pub fn resolve(event_id: u32, choice: EventChoice, impact: f64) -> ResourceDelta {
    let i = impact;
    let a = matches!(choice, EventChoice::A);
    let none = ResourceDelta::default();
    match event_id {
        1 => ResourceDelta {
            power: if a { -i } else { -2.0 * i },
            ..none
        },
        2 => ResourceDelta {
            food: -i,
            morale: if a { -i } else { -i / 2.0 },
            ..none
        },
        3 => ResourceDelta {
            morale: if a { i } else { -i },
            ..none
        },
        4 => ResourceDelta {
            water: -i,
            repairs: if a { 0.0 } else { -i },
            ..none
        },
        5 => ResourceDelta {
            morale: -i / 2.0,
            ..none
        },
        6 => ResourceDelta {
            power: -i,
            repairs: if a { 0.0 } else { -i },
            ..none
        },
        // Morale crisis: recreation costs rations, strict schedules cost morale.
        7 if a => ResourceDelta {
            morale: i,
            food: -i / 2.0,
            ..none
        },
        7 => ResourceDelta {
            morale: -i,
            ..none
        },
        8 if a => ResourceDelta {
            power: -2.0 * i,
            ..none
        },
        8 => ResourceDelta {
            power: -i,
            repairs: -i,
            ..none
        },
        9 if a => ResourceDelta {
            repairs: -2.0 * i,
            power: -i / 2.0,
            ..none
        },
        9 => ResourceDelta {
            oxygen: -i,
            repairs: -i / 2.0,
            ..none
        },
        10 if a => ResourceDelta {
            morale: -i / 2.0,
            power: -i / 2.0,
            ..none
        },
        10 => ResourceDelta {
            morale: -i,
            ..none
        },
        11 if a => ResourceDelta {
            repairs: -i,
            power: -i / 2.0,
            ..none
        },
        11 => ResourceDelta {
            power: -i,
            morale: -i / 2.0,
            ..none
        },
        12 if a => ResourceDelta {
            morale: i / 2.0,
            repairs: -i / 2.0,
            ..none
        },
        12 => ResourceDelta {
            morale: -i,
            ..none
        },
        unknown => {
            log::warn!("event {unknown} has no authored consequence; choice {choice} is a no-op");
            none
        }
    }
}

/// Roll an impact and resolve the event in one step.
pub fn resolve_with_rng<R>(event_id: u32, choice: EventChoice, rng: &mut R) -> Consequence
where
    R: Rng + ?Sized,
{
    let impact = roll_impact(rng);
    Consequence {
        event_id,
        choice,
        impact,
        delta: resolve(event_id, choice, impact),
        authored: has_consequence(event_id),
    }
}
