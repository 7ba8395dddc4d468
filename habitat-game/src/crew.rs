//! Crew roster generation, daily crew-state derivation, and end-of-mission stories.
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::constants::{
    CREW_FATIGUE_START, CREW_FOOD_FLOOR, CREW_FOOD_PENALTY, CREW_MEDICAL_PENALTY, CREW_MORALE_DRIFT,
    CREW_NUTRITION_START, CREW_OXYGEN_FLOOR, CREW_OXYGEN_PENALTY, CREW_RECREATION_PENALTY,
    CREW_STAT_START, CREW_STRESS_START, CREW_WATER_FLOOR, CREW_WATER_PENALTY, MAINTENANCE_THRESHOLD,
    MEDICAL_THRESHOLD, RECREATION_THRESHOLD, RESOURCE_MAX, STORY_HIGH, STORY_LIFE_SUPPORT_OXYGEN,
    STORY_LOW, STORY_MID, STORY_PERFORMANCE_LOW,
};
use crate::mission::{CrewSize, Difficulty};
use crate::numbers::{clamp_pct, mean};
use crate::resources::ResourceState;
use crate::zones::{Zone, ZoneAllocations};

pub const FIRST_NAMES: [&str; 16] = [
    "Alex", "Jordan", "Sam", "Morgan", "Casey", "Riley", "Taylor", "Quinn", "Avery", "Dakota",
    "Skyler", "Rowan", "Blake", "Cameron", "Parker", "Reese",
];

pub const LAST_NAMES: [&str; 15] = [
    "Chen", "Patel", "Rodriguez", "Kim", "Johnson", "Martinez", "Williams", "Garcia", "Brown",
    "Davis", "Miller", "Wilson", "Moore", "Taylor", "Anderson",
];

/// Crew assignment, listed in order of seniority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Commander,
    Pilot,
    Engineer,
    MedicalOfficer,
    ScienceOfficer,
    LifeSupportSpecialist,
    CommunicationsOfficer,
    MaintenanceChief,
}

impl Role {
    pub const ALL: [Self; 8] = [
        Self::Commander,
        Self::Pilot,
        Self::Engineer,
        Self::MedicalOfficer,
        Self::ScienceOfficer,
        Self::LifeSupportSpecialist,
        Self::CommunicationsOfficer,
        Self::MaintenanceChief,
    ];

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Commander => "Commander",
            Self::Pilot => "Pilot",
            Self::Engineer => "Engineer",
            Self::MedicalOfficer => "Medical Officer",
            Self::ScienceOfficer => "Science Officer",
            Self::LifeSupportSpecialist => "Life Support Specialist",
            Self::CommunicationsOfficer => "Communications Officer",
            Self::MaintenanceChief => "Maintenance Chief",
        }
    }

    /// Role for the member at `index`; the list cycles once every role is taken.
    #[must_use]
    pub const fn for_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// A single crew member. All gauges are kept in `[0, 100]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrewMember {
    pub id: u32,
    pub name: String,
    pub role: Role,
    pub health: f64,
    pub morale: f64,
    pub performance: f64,
    /// Display-only; no daily rule updates it.
    pub fatigue: f64,
    /// Display-only; no daily rule updates it.
    pub stress: f64,
    /// Display-only; no daily rule updates it.
    pub nutrition: f64,
    #[serde(default)]
    pub story: String,
}

impl CrewMember {
    #[must_use]
    pub fn new(id: u32, name: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            name: name.into(),
            role,
            health: CREW_STAT_START,
            morale: CREW_STAT_START,
            performance: CREW_STAT_START,
            fatigue: CREW_FATIGUE_START,
            stress: CREW_STRESS_START,
            nutrition: CREW_NUTRITION_START,
            story: String::new(),
        }
    }
}

/// Mean health, morale and performance across a roster.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrewAverages {
    pub health: f64,
    pub morale: f64,
    pub performance: f64,
}

impl CrewAverages {
    /// `None` for an empty roster.
    #[must_use]
    pub fn of(crew: &[CrewMember]) -> Option<Self> {
        Some(Self {
            health: mean(crew.iter().map(|m| m.health))?,
            morale: mean(crew.iter().map(|m| m.morale))?,
            performance: mean(crew.iter().map(|m| m.performance))?,
        })
    }
}

/// Generate a roster with unique names and seniority-ordered roles.
///
/// Names are redrawn until unused. The pool holds 240 combinations, far above
/// the largest crew, so the retry loop always terminates.
pub fn generate_crew<R>(size: CrewSize, rng: &mut R) -> Vec<CrewMember>
where
    R: Rng + ?Sized,
{
    let count = size.count();
    let mut used_names: HashSet<String> = HashSet::with_capacity(count);
    let mut crew = Vec::with_capacity(count);

    for (index, id) in (0..count).zip(1_u32..) {
        let name = loop {
            let first = FIRST_NAMES[rng.gen_range(0..FIRST_NAMES.len())];
            let last = LAST_NAMES[rng.gen_range(0..LAST_NAMES.len())];
            let candidate = format!("{first} {last}");
            if used_names.insert(candidate.clone()) {
                break candidate;
            }
        };
        crew.push(CrewMember::new(id, name, Role::for_index(index)));
    }

    crew
}

/// Derive each member's next-day health, morale and performance.
///
/// Applied identically to every member once per simulated day, using the
/// resource levels after that day's decay.
#[must_use]
pub fn update_crew_stats(
    crew: &[CrewMember],
    resources: &ResourceState,
    allocations: &ZoneAllocations,
    difficulty: Difficulty,
) -> Vec<CrewMember> {
    let mult = difficulty.crew_multiplier();
    let health_change = health_penalty(resources, allocations, mult);
    let morale_change = morale_change(resources, allocations, mult);

    crew.iter()
        .map(|member| {
            let health = clamp_pct(member.health + health_change);
            let morale = clamp_pct(member.morale + morale_change);
            let performance_change = (health + morale) / 2.0 - member.performance;
            CrewMember {
                health,
                morale,
                performance: clamp_pct(member.performance + performance_change),
                ..member.clone()
            }
        })
        .collect()
}

/// Health never improves from habitat conditions; only shortfalls count.
fn health_penalty(resources: &ResourceState, allocations: &ZoneAllocations, mult: f64) -> f64 {
    let shortfall = |floor: f64, value: f64| (floor - value).max(0.0);
    let penalty = shortfall(CREW_OXYGEN_FLOOR, resources.oxygen) * CREW_OXYGEN_PENALTY
        + shortfall(CREW_WATER_FLOOR, resources.water) * CREW_WATER_PENALTY
        + shortfall(CREW_FOOD_FLOOR, resources.food) * CREW_FOOD_PENALTY
        + shortfall(MEDICAL_THRESHOLD, allocations.pct(Zone::Medical)) * CREW_MEDICAL_PENALTY;
    -(penalty * mult).max(0.0)
}

fn morale_change(resources: &ResourceState, allocations: &ZoneAllocations, mult: f64) -> f64 {
    let drift = (resources.morale - RESOURCE_MAX) * CREW_MORALE_DRIFT;
    let recreation_gap = (RECREATION_THRESHOLD - allocations.pct(Zone::Recreation)).max(0.0);
    drift - recreation_gap * CREW_RECREATION_PENALTY * mult
}

type StoryRule = fn(&CrewMember, &ResourceState, &ZoneAllocations) -> Option<String>;

/// Independent fragments; several may fire for the same member.
const STORY_RULES: [StoryRule; 4] = [
    health_fragment,
    morale_fragment,
    role_fragment,
    performance_fragment,
];

fn health_fragment(m: &CrewMember, _: &ResourceState, _: &ZoneAllocations) -> Option<String> {
    let name = &m.name;
    if m.health < STORY_LOW {
        Some(format!("{name} struggled with serious health issues throughout the mission."))
    } else if m.health < STORY_MID {
        Some(format!("{name} experienced periodic health concerns but remained functional."))
    } else if m.health > STORY_HIGH {
        Some(format!("{name} maintained excellent health throughout the mission."))
    } else {
        None
    }
}

fn morale_fragment(m: &CrewMember, _: &ResourceState, _: &ZoneAllocations) -> Option<String> {
    let name = &m.name;
    if m.morale < STORY_LOW {
        Some(format!("The isolation took a severe toll on {name}'s mental state."))
    } else if m.morale < STORY_MID {
        Some(format!("{name} found the mission psychologically challenging at times."))
    } else if m.morale > STORY_HIGH {
        Some(format!("{name} remained positive and became a morale booster for the team."))
    } else {
        None
    }
}

fn role_fragment(
    m: &CrewMember,
    final_stats: &ResourceState,
    allocations: &ZoneAllocations,
) -> Option<String> {
    let role = m.role.title();
    match m.role {
        Role::Engineer if allocations.pct(Zone::Maintenance) < MAINTENANCE_THRESHOLD => {
            Some(format!("As {role}, they were constantly overwhelmed by repair demands."))
        }
        Role::MedicalOfficer if allocations.pct(Zone::Medical) < MEDICAL_THRESHOLD => {
            Some(format!("As {role}, they struggled with limited medical resources."))
        }
        Role::LifeSupportSpecialist if final_stats.oxygen < STORY_LIFE_SUPPORT_OXYGEN => {
            Some(format!("As {role}, they worked overtime to keep oxygen systems operational."))
        }
        _ => None,
    }
}

fn performance_fragment(m: &CrewMember, _: &ResourceState, _: &ZoneAllocations) -> Option<String> {
    let name = &m.name;
    if m.performance > STORY_HIGH {
        Some(format!("Overall, {name} performed admirably and exceeded expectations."))
    } else if m.performance < STORY_PERFORMANCE_LOW {
        Some(format!("{name}'s performance suffered significantly under mission stress."))
    } else {
        None
    }
}

/// Attach an end-of-mission story to every member.
///
/// Pure function of the final member stats, final resources and allocations.
/// Difficulty is accepted for parity with the other end-of-mission calls but
/// does not change the wording.
#[must_use]
pub fn generate_crew_stories(
    crew: &[CrewMember],
    final_stats: &ResourceState,
    allocations: &ZoneAllocations,
    _difficulty: Difficulty,
) -> Vec<CrewMember> {
    crew.iter()
        .map(|member| {
            let parts: Vec<String> = STORY_RULES
                .iter()
                .filter_map(|rule| rule(member, final_stats, allocations))
                .collect();
            let story = if parts.is_empty() {
                format!("{} completed the mission without major incident.", member.name)
            } else {
                parts.join(" ")
            };
            CrewMember {
                story,
                ..member.clone()
            }
        })
        .collect()
}
