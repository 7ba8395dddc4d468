//! End-of-mission grading, narrative, per-system analysis and advice.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{
    ADVICE_FOOD_MIN, ADVICE_LIFE_SUPPORT_MIN, ADVICE_MAINTENANCE_MIN, ADVICE_MEDICAL_MIN,
    ADVICE_RECREATION_MIN, ADVICE_TOTAL_MAX, ADVICE_TOTAL_MIN, GRADE_EASY, GRADE_HARD, GRADE_MEDIUM,
    STORY_BAND_HIGH, STORY_BAND_LOW, TIER_ADEQUATE, TIER_GOOD,
};
use crate::crew::{CrewAverages, CrewMember};
use crate::mission::Difficulty;
use crate::resources::{Resource, ResourceState};
use crate::zones::{Zone, ZoneAllocations};

/// Letter grade for a finished mission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
}

impl Grade {
    #[must_use]
    pub const fn letter(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        }
    }

    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::A => "Outstanding!",
            Self::B => "Well Done!",
            Self::C => "Good Effort!",
            Self::D => "Keep Learning!",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.letter())
    }
}

const fn grade_bands(difficulty: Difficulty) -> [f64; 3] {
    match difficulty {
        Difficulty::Easy => GRADE_EASY,
        Difficulty::Medium => GRADE_MEDIUM,
        Difficulty::Hard => GRADE_HARD,
    }
}

/// Grade an average resource level against the difficulty's bands (inclusive lower bounds).
#[must_use]
pub fn grade_for(average: f64, difficulty: Difficulty) -> Grade {
    let [a, b, c] = grade_bands(difficulty);
    if average >= a {
        Grade::A
    } else if average >= b {
        Grade::B
    } else if average >= c {
        Grade::C
    } else {
        Grade::D
    }
}

/// Habitat subsystem assessed in the debrief.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subsystem {
    LifeSupport,
    Food,
    Water,
    Power,
    CrewWelfare,
    Maintenance,
}

impl Subsystem {
    pub const ALL: [Self; 6] = [
        Self::LifeSupport,
        Self::Food,
        Self::Water,
        Self::Power,
        Self::CrewWelfare,
        Self::Maintenance,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::LifeSupport => "Life Support",
            Self::Food => "Food Supply",
            Self::Water => "Water Reclamation",
            Self::Power => "Power Grid",
            Self::CrewWelfare => "Crew Welfare",
            Self::Maintenance => "Maintenance",
        }
    }

    /// Stat that measures the subsystem.
    #[must_use]
    pub const fn resource(self) -> Resource {
        match self {
            Self::LifeSupport => Resource::Oxygen,
            Self::Food => Resource::Food,
            Self::Water => Resource::Water,
            Self::Power => Resource::Power,
            Self::CrewWelfare => Resource::Morale,
            Self::Maintenance => Resource::Repairs,
        }
    }

    /// Zone whose allocation drives the subsystem.
    #[must_use]
    pub const fn zone(self) -> Zone {
        match self {
            Self::LifeSupport => Zone::LifeSupport,
            Self::Food => Zone::Food,
            Self::Water => Zone::Hygiene,
            Self::Power => Zone::Stowage,
            Self::CrewWelfare => Zone::Recreation,
            Self::Maintenance => Zone::Maintenance,
        }
    }
}

/// Feedback band for one subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackTier {
    Good,
    Adequate,
    Critical,
}

impl FeedbackTier {
    #[must_use]
    pub fn for_value(value: f64) -> Self {
        if value > TIER_GOOD {
            Self::Good
        } else if value > TIER_ADEQUATE {
            Self::Adequate
        } else {
            Self::Critical
        }
    }
}

/// Assessment of a single subsystem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemAnalysis {
    pub subsystem: Subsystem,
    pub value: f64,
    pub allocation: u8,
    pub tier: FeedbackTier,
    pub feedback: String,
}

impl SystemAnalysis {
    fn assess(
        subsystem: Subsystem,
        final_stats: &ResourceState,
        allocations: &ZoneAllocations,
    ) -> Self {
        let value = final_stats.get(subsystem.resource());
        let allocation = allocations.get(subsystem.zone());
        let tier = FeedbackTier::for_value(value);
        let label = subsystem.label();
        let zone = subsystem.zone().label();
        let feedback = match tier {
            FeedbackTier::Good => format!(
                "{label} held strong at {value:.0}%; the {allocation}% {zone} allocation was sufficient."
            ),
            FeedbackTier::Adequate => format!(
                "{label} finished at {value:.0}%, adequate but strained; consider more than {allocation}% for {zone}."
            ),
            FeedbackTier::Critical => format!(
                "{label} fell to {value:.0}%, a critical shortfall; {allocation}% for {zone} was not enough."
            ),
        };
        Self {
            subsystem,
            value,
            allocation,
            tier,
            feedback,
        }
    }
}

/// Scored debrief of a finished mission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub grade: Grade,
    /// Mean of the six final resource levels.
    pub average: f64,
    pub story: String,
    pub system_analysis: Vec<SystemAnalysis>,
    pub advice: Vec<String>,
    pub total_allocation: u32,
}

struct StoryInputs {
    oxygen: f64,
    food: f64,
    power: f64,
    crew_morale: f64,
    crew_health: f64,
}

struct StoryRule {
    applies: fn(&StoryInputs) -> bool,
    text: &'static str,
}

const STORY_RULES: &[StoryRule] = &[
    StoryRule {
        applies: |s| s.oxygen < STORY_BAND_LOW,
        text: "The crew struggled with oxygen supply, leading to emergency protocols and reduced activity.",
    },
    StoryRule {
        applies: |s| s.oxygen > STORY_BAND_HIGH,
        text: "Life support systems operated flawlessly, keeping the crew well-oxygenated throughout the mission.",
    },
    StoryRule {
        applies: |s| s.crew_morale < STORY_BAND_LOW,
        text: "Crew morale plummeted due to limited recreation facilities, affecting mission efficiency.",
    },
    StoryRule {
        applies: |s| s.crew_morale > STORY_BAND_HIGH,
        text: "Strong team cohesion and adequate recreation maintained excellent crew morale.",
    },
    StoryRule {
        applies: |s| s.food < STORY_BAND_LOW,
        text: "Food shortages forced the crew to ration supplies, causing stress and health concerns.",
    },
    StoryRule {
        applies: |s| s.power < STORY_BAND_LOW,
        text: "Power management became critical, with frequent brownouts affecting operations.",
    },
    StoryRule {
        applies: |s| s.crew_health < STORY_BAND_LOW,
        text: "Declining crew health left the habitat short-handed during the final stretch.",
    },
    StoryRule {
        applies: |s| s.crew_health > STORY_BAND_HIGH,
        text: "The crew returned in excellent physical condition.",
    },
];

const STORY_FALLBACK: &str =
    "The mission proceeded smoothly with balanced resource management and crew cooperation.";

struct AdviceRule {
    applies: fn(&ZoneAllocations, u32) -> bool,
    text: &'static str,
}

const ADVICE_RULES: &[AdviceRule] = &[
    AdviceRule {
        applies: |a, _| a.life_support < ADVICE_LIFE_SUPPORT_MIN,
        text: "**Life Support**: Increase allocation to at least 20% to ensure stable oxygen and climate control.",
    },
    AdviceRule {
        applies: |a, _| a.food < ADVICE_FOOD_MIN,
        text: "**Food Production**: Boost to 15%+ for reliable nutrition and hydroponics backup.",
    },
    AdviceRule {
        applies: |a, _| a.recreation < ADVICE_RECREATION_MIN,
        text: "**Recreation**: Allocate 10-15% to maintain crew mental health on long missions.",
    },
    AdviceRule {
        applies: |a, _| a.maintenance < ADVICE_MAINTENANCE_MIN,
        text: "**Maintenance**: Ensure 10%+ for repairs and spare parts to handle emergencies.",
    },
    AdviceRule {
        applies: |a, _| a.medical < ADVICE_MEDICAL_MIN,
        text: "**Medical**: Dedicate 10%+ for health monitoring and emergency treatment.",
    },
    AdviceRule {
        applies: |_, total| !(ADVICE_TOTAL_MIN..=ADVICE_TOTAL_MAX).contains(&total),
        text: "**Balance**: Your total allocation is unbalanced. Aim for around 100% distributed wisely.",
    },
];

const ADVICE_FALLBACK: &str =
    "**Excellent balance!** Consider minor tweaks based on mission-specific needs.";

/// Mission narrative; every matching fragment is included, in rule order.
///
/// Crew bands fall back to the morale resource when the roster is empty.
#[must_use]
pub fn mission_story(final_stats: &ResourceState, crew: &[CrewMember]) -> String {
    let averages = CrewAverages::of(crew);
    let inputs = StoryInputs {
        oxygen: final_stats.oxygen,
        food: final_stats.food,
        power: final_stats.power,
        crew_morale: averages.map_or(final_stats.morale, |a| a.morale),
        crew_health: averages.map_or(STORY_BAND_LOW, |a| a.health),
    };
    let parts: Vec<&str> = STORY_RULES
        .iter()
        .filter(|rule| (rule.applies)(&inputs))
        .map(|rule| rule.text)
        .collect();
    if parts.is_empty() {
        STORY_FALLBACK.to_string()
    } else {
        parts.join(" ")
    }
}

/// Improvement checklist for the chosen layout.
#[must_use]
pub fn improvement_advice(allocations: &ZoneAllocations) -> Vec<String> {
    let total = allocations.total();
    let advice: Vec<String> = ADVICE_RULES
        .iter()
        .filter(|rule| (rule.applies)(allocations, total))
        .map(|rule| rule.text.to_string())
        .collect();
    if advice.is_empty() {
        vec![ADVICE_FALLBACK.to_string()]
    } else {
        advice
    }
}

#[must_use]
pub fn system_analysis(
    final_stats: &ResourceState,
    allocations: &ZoneAllocations,
) -> Vec<SystemAnalysis> {
    Subsystem::ALL
        .into_iter()
        .map(|subsystem| SystemAnalysis::assess(subsystem, final_stats, allocations))
        .collect()
}

/// Score a finished mission. Pure; identical inputs give identical reports.
#[must_use]
pub fn score(
    final_stats: &ResourceState,
    crew: &[CrewMember],
    allocations: &ZoneAllocations,
    difficulty: Difficulty,
) -> Report {
    let average = final_stats.average();
    Report {
        grade: grade_for(average, difficulty),
        average,
        story: mission_story(final_stats, crew),
        system_analysis: system_analysis(final_stats, allocations),
        advice: improvement_advice(allocations),
        total_allocation: allocations.total(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crew::Role;

    fn uniform(value: f64) -> ResourceState {
        ResourceState {
            oxygen: value,
            water: value,
            food: value,
            power: value,
            morale: value,
            repairs: value,
        }
    }

    #[test]
    fn medium_grade_boundary_is_inclusive() {
        assert_eq!(grade_for(80.0, Difficulty::Medium), Grade::A);
        assert_eq!(grade_for(79.999, Difficulty::Medium), Grade::B);
        assert_eq!(grade_for(40.0, Difficulty::Medium), Grade::C);
        assert_eq!(grade_for(39.9, Difficulty::Medium), Grade::D);
    }

    #[test]
    fn difficulty_shifts_every_band() {
        assert_eq!(grade_for(72.0, Difficulty::Easy), Grade::A);
        assert_eq!(grade_for(72.0, Difficulty::Medium), Grade::B);
        assert_eq!(grade_for(72.0, Difficulty::Hard), Grade::B);
        assert_eq!(grade_for(69.0, Difficulty::Hard), Grade::C);
        assert_eq!(grade_for(45.0, Difficulty::Hard), Grade::D);
        assert_eq!(Grade::D.message(), "Keep Learning!");
    }

    #[test]
    fn story_fragments_co_fire_in_order() {
        let stats = ResourceState {
            oxygen: 30.0,
            food: 20.0,
            power: 10.0,
            ..uniform(60.0)
        };
        let story = mission_story(&stats, &[]);
        assert!(story.starts_with("The crew struggled with oxygen supply"));
        assert!(story.contains("Food shortages"));
        assert!(story.ends_with("frequent brownouts affecting operations."));
    }

    #[test]
    fn quiet_missions_get_the_fallback_story() {
        let mut member = CrewMember::new(1, "Avery Kim", Role::Commander);
        member.health = 60.0;
        member.morale = 60.0;
        assert_eq!(mission_story(&uniform(60.0), &[member]), STORY_FALLBACK);
    }

    #[test]
    fn crew_averages_drive_crew_fragments() {
        let mut a = CrewMember::new(1, "A", Role::Commander);
        a.health = 20.0;
        a.morale = 90.0;
        let mut b = CrewMember::new(2, "B", Role::Pilot);
        b.health = 30.0;
        b.morale = 95.0;
        let story = mission_story(&uniform(60.0), &[a, b]);
        assert!(story.contains("Strong team cohesion"));
        assert!(story.contains("Declining crew health"));
    }

    #[test]
    fn default_layout_earns_the_affirmation() {
        let advice = improvement_advice(&ZoneAllocations::default());
        assert_eq!(advice, vec![ADVICE_FALLBACK.to_string()]);
    }

    #[test]
    fn starved_layout_flags_every_zone_and_balance() {
        let advice = improvement_advice(&ZoneAllocations::empty());
        assert_eq!(advice.len(), 6);
        assert!(advice[0].starts_with("**Life Support**"));
        assert!(advice[5].starts_with("**Balance**"));
    }

    #[test]
    fn balance_window_is_inclusive() {
        let at_110 = ZoneAllocations::default()
            .with(Zone::Science, 20)
            .unwrap();
        assert_eq!(at_110.total(), 110);
        assert_eq!(improvement_advice(&at_110), vec![ADVICE_FALLBACK.to_string()]);

        let at_115 = at_110.with(Zone::Science, 25).unwrap();
        assert_eq!(improvement_advice(&at_115).len(), 1);
    }

    #[test]
    fn analysis_pairs_each_subsystem_with_its_zone() {
        let stats = ResourceState {
            oxygen: 90.0,
            water: 55.0,
            power: 40.0,
            ..uniform(75.0)
        };
        let rows = system_analysis(&stats, &ZoneAllocations::default());
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0].tier, FeedbackTier::Good);
        assert_eq!(rows[0].allocation, 20);
        let water = rows.iter().find(|r| r.subsystem == Subsystem::Water).unwrap();
        assert_eq!(water.tier, FeedbackTier::Adequate);
        let power = rows.iter().find(|r| r.subsystem == Subsystem::Power).unwrap();
        assert_eq!(power.tier, FeedbackTier::Critical);
        assert_eq!(power.allocation, 15);
    }

    #[test]
    fn score_bundles_every_section() {
        let report = score(
            &uniform(85.0),
            &[],
            &ZoneAllocations::default(),
            Difficulty::Hard,
        );
        assert_eq!(report.grade, Grade::A);
        assert!((report.average - 85.0).abs() < 1e-9);
        assert_eq!(report.total_allocation, 100);
        assert_eq!(report.system_analysis.len(), 6);
        assert_eq!(report.advice.len(), 1);
    }
}
