//! Habitat resource levels and the daily decay model.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{
    FOOD_DECAY, FOOD_THRESHOLD, HYGIENE_THRESHOLD, LIFE_SUPPORT_THRESHOLD, MAINTENANCE_THRESHOLD,
    MORALE_DECAY, OXYGEN_DECAY, POWER_DECAY, RECREATION_THRESHOLD, REPAIRS_DECAY, RESOURCE_START,
    TIER_ADEQUATE, TIER_GOOD, WATER_DECAY,
};
use crate::mission::Difficulty;
use crate::numbers::{clamp_pct, mean};
use crate::zones::{Zone, ZoneAllocations};

/// One of the six tracked habitat resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Oxygen,
    Water,
    Food,
    Power,
    Morale,
    Repairs,
}

impl Resource {
    pub const ALL: [Self; 6] = [
        Self::Oxygen,
        Self::Water,
        Self::Food,
        Self::Power,
        Self::Morale,
        Self::Repairs,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Oxygen => "Oxygen",
            Self::Water => "Water",
            Self::Food => "Food",
            Self::Power => "Power",
            Self::Morale => "Morale",
            Self::Repairs => "Repairs",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Display band for a 0–100 gauge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusTier {
    Nominal,
    Caution,
    Critical,
}

impl StatusTier {
    /// Band for a gauge where higher is better.
    #[must_use]
    pub fn for_value(value: f64) -> Self {
        if value > TIER_GOOD {
            Self::Nominal
        } else if value > TIER_ADEQUATE {
            Self::Caution
        } else {
            Self::Critical
        }
    }

    /// Band for a gauge where higher is worse (fatigue, stress).
    #[must_use]
    pub fn for_inverted(value: f64) -> Self {
        if value > TIER_GOOD {
            Self::Critical
        } else if value > TIER_ADEQUATE {
            Self::Caution
        } else {
            Self::Nominal
        }
    }
}

/// Mission health at the current simulated day. Every field stays in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResourceState {
    pub oxygen: f64,
    pub water: f64,
    pub food: f64,
    pub power: f64,
    pub morale: f64,
    pub repairs: f64,
}

impl Default for ResourceState {
    fn default() -> Self {
        Self {
            oxygen: RESOURCE_START,
            water: RESOURCE_START,
            food: RESOURCE_START,
            power: RESOURCE_START,
            morale: RESOURCE_START,
            repairs: RESOURCE_START,
        }
    }
}

impl ResourceState {
    #[must_use]
    pub const fn get(&self, resource: Resource) -> f64 {
        match resource {
            Resource::Oxygen => self.oxygen,
            Resource::Water => self.water,
            Resource::Food => self.food,
            Resource::Power => self.power,
            Resource::Morale => self.morale,
            Resource::Repairs => self.repairs,
        }
    }

    /// Resources paired with their level, in display order.
    pub fn iter(&self) -> impl Iterator<Item = (Resource, f64)> + '_ {
        Resource::ALL.into_iter().map(|r| (r, self.get(r)))
    }

    /// Mean of the six resource levels.
    #[must_use]
    pub fn average(&self) -> f64 {
        mean(self.iter().map(|(_, v)| v)).unwrap_or(0.0)
    }

    /// Force every field back into `[0, 100]`.
    pub fn clamp(&mut self) {
        self.oxygen = clamp_pct(self.oxygen);
        self.water = clamp_pct(self.water);
        self.food = clamp_pct(self.food);
        self.power = clamp_pct(self.power);
        self.morale = clamp_pct(self.morale);
        self.repairs = clamp_pct(self.repairs);
    }

    #[must_use]
    pub fn clamped(mut self) -> Self {
        self.clamp();
        self
    }
}

/// Signed change to resource levels, produced by event consequences.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ResourceDelta {
    #[serde(default)]
    pub oxygen: f64,
    #[serde(default)]
    pub water: f64,
    #[serde(default)]
    pub food: f64,
    #[serde(default)]
    pub power: f64,
    #[serde(default)]
    pub morale: f64,
    #[serde(default)]
    pub repairs: f64,
}

impl ResourceDelta {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        Resource::ALL.into_iter().all(|r| self.get(r) == 0.0)
    }

    #[must_use]
    pub const fn get(&self, resource: Resource) -> f64 {
        match resource {
            Resource::Oxygen => self.oxygen,
            Resource::Water => self.water,
            Resource::Food => self.food,
            Resource::Power => self.power,
            Resource::Morale => self.morale,
            Resource::Repairs => self.repairs,
        }
    }

    /// Add the delta to `state` and clamp the result into `[0, 100]`.
    #[must_use]
    pub fn apply_to(&self, state: &ResourceState) -> ResourceState {
        ResourceState {
            oxygen: state.oxygen + self.oxygen,
            water: state.water + self.water,
            food: state.food + self.food,
            power: state.power + self.power,
            morale: state.morale + self.morale,
            repairs: state.repairs + self.repairs,
        }
        .clamped()
    }
}

/// Normalized shortfall of an allocation below its survival threshold, in `[0, 1]`.
#[must_use]
pub fn deficiency_ratio(allocation: f64, threshold: f64) -> f64 {
    if threshold <= 0.0 {
        return 0.0;
    }
    ((threshold - allocation) / threshold).clamp(0.0, 1.0)
}

/// Advance resource levels by one simulated day.
///
/// Pure: the result depends only on the inputs. Decay is never positive, so
/// only the floor of the clamp can bite.
#[must_use]
pub fn decay_tick(
    state: &ResourceState,
    allocations: &ZoneAllocations,
    difficulty: Difficulty,
) -> ResourceState {
    let mult = difficulty.decay_multiplier();
    let life = deficiency_ratio(allocations.pct(Zone::LifeSupport), LIFE_SUPPORT_THRESHOLD);
    let food = deficiency_ratio(allocations.pct(Zone::Food), FOOD_THRESHOLD);
    let hygiene = deficiency_ratio(allocations.pct(Zone::Hygiene), HYGIENE_THRESHOLD);
    let recreation = deficiency_ratio(allocations.pct(Zone::Recreation), RECREATION_THRESHOLD);
    let maintenance =
        deficiency_ratio(allocations.pct(Zone::Maintenance), MAINTENANCE_THRESHOLD);

    ResourceState {
        oxygen: state.oxygen - life * OXYGEN_DECAY * mult,
        water: state.water - hygiene * WATER_DECAY * mult,
        food: state.food - food * FOOD_DECAY * mult,
        power: state.power - POWER_DECAY * mult,
        morale: state.morale - recreation * MORALE_DECAY * mult,
        repairs: state.repairs - maintenance * REPAIRS_DECAY * mult,
    }
    .clamped()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn baseline_layout_only_drains_power() {
        let alloc = ZoneAllocations::default();
        let next = decay_tick(&ResourceState::default(), &alloc, Difficulty::Medium);
        assert!((next.oxygen - 100.0).abs() < EPS, "lifeSupport at threshold");
        assert!((next.water - 100.0).abs() < EPS);
        assert!((next.food - 100.0).abs() < EPS);
        assert!((next.morale - 100.0).abs() < EPS);
        assert!((next.repairs - 100.0).abs() < EPS);
        assert!((next.power - 99.7).abs() < EPS);
    }

    #[test]
    fn empty_life_support_costs_half_a_point() {
        let alloc = ZoneAllocations::default()
            .with(Zone::LifeSupport, 0)
            .unwrap();
        let next = decay_tick(&ResourceState::default(), &alloc, Difficulty::Medium);
        assert!((next.oxygen - 99.5).abs() < EPS);
    }

    #[test]
    fn difficulty_scales_every_term() {
        let alloc = ZoneAllocations::empty();
        let start = ResourceState::default();
        let easy = decay_tick(&start, &alloc, Difficulty::Easy);
        let hard = decay_tick(&start, &alloc, Difficulty::Hard);
        assert!((easy.oxygen - (100.0 - 0.5 * 0.7)).abs() < EPS);
        assert!((hard.oxygen - (100.0 - 0.5 * 1.3)).abs() < EPS);
        assert!((hard.water - (100.0 - 0.3 * 1.3)).abs() < EPS);
        assert!((hard.food - (100.0 - 0.4 * 1.3)).abs() < EPS);
        assert!((hard.morale - (100.0 - 0.2 * 1.3)).abs() < EPS);
        assert!((hard.repairs - (100.0 - 0.2 * 1.3)).abs() < EPS);
    }

    #[test]
    fn partial_deficiency_is_proportional() {
        assert!((deficiency_ratio(10.0, 20.0) - 0.5).abs() < EPS);
        assert!((deficiency_ratio(25.0, 20.0) - 0.0).abs() < EPS);
        assert!((deficiency_ratio(0.0, 15.0) - 1.0).abs() < EPS);
    }

    #[test]
    fn decay_floors_at_zero_and_is_deterministic() {
        let alloc = ZoneAllocations::empty();
        let start = ResourceState {
            oxygen: 0.1,
            water: 0.0,
            food: 0.2,
            power: 0.1,
            morale: 0.0,
            repairs: 0.05,
        };
        let a = decay_tick(&start, &alloc, Difficulty::Hard);
        let b = decay_tick(&start, &alloc, Difficulty::Hard);
        assert_eq!(a, b);
        for (_, value) in a.iter() {
            assert!((0.0..=100.0).contains(&value));
            assert!(value.abs() < EPS);
        }
    }

    #[test]
    fn delta_application_clamps_both_ends() {
        let start = ResourceState {
            morale: 96.0,
            power: 4.0,
            ..ResourceState::default()
        };
        let delta = ResourceDelta {
            morale: 9.0,
            power: -12.0,
            ..ResourceDelta::default()
        };
        let next = delta.apply_to(&start);
        assert!((next.morale - 100.0).abs() < EPS);
        assert!((next.power - 0.0).abs() < EPS);
        assert!(ResourceDelta::default().is_empty());
        assert!(!delta.is_empty());
    }

    #[test]
    fn status_tiers_follow_gauge_bands() {
        assert_eq!(StatusTier::for_value(71.0), StatusTier::Nominal);
        assert_eq!(StatusTier::for_value(70.0), StatusTier::Caution);
        assert_eq!(StatusTier::for_value(40.0), StatusTier::Critical);
        assert_eq!(StatusTier::for_inverted(80.0), StatusTier::Critical);
        assert_eq!(StatusTier::for_inverted(10.0), StatusTier::Nominal);
    }
}
