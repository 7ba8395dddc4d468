//! Habitat zone allocation.
//!
//! Allocations are percentages of habitat volume assigned to each functional
//! module. They are set once before launch and read-only afterwards. Nothing
//! forces them to sum to 100; an unbalanced layout is only called out in the
//! debrief advice.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::constants::{ALLOCATION_MAX, ALLOCATION_STEP};

/// Errors raised when editing zone allocations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocationError {
    #[error("unknown habitat zone `{0}`")]
    UnknownZone(String),
    #[error("{zone} allocation {value}% exceeds {max}%")]
    AboveMaximum { zone: Zone, value: u8, max: u8 },
    #[error("{zone} allocation {value}% is not a multiple of {step}")]
    OffStep { zone: Zone, value: u8, step: u8 },
    #[error("{zone} allocation `{raw}` is not a whole percentage")]
    InvalidValue { zone: Zone, raw: String },
}

/// Functional habitat module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Zone {
    LifeSupport,
    Food,
    Hygiene,
    Recreation,
    Medical,
    Maintenance,
    Stowage,
    Science,
}

impl Zone {
    pub const ALL: [Self; 8] = [
        Self::LifeSupport,
        Self::Food,
        Self::Hygiene,
        Self::Recreation,
        Self::Medical,
        Self::Maintenance,
        Self::Stowage,
        Self::Science,
    ];

    /// Stable camelCase key.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::LifeSupport => "lifeSupport",
            Self::Food => "food",
            Self::Hygiene => "hygiene",
            Self::Recreation => "recreation",
            Self::Medical => "medical",
            Self::Maintenance => "maintenance",
            Self::Stowage => "stowage",
            Self::Science => "science",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::LifeSupport => "Life Support",
            Self::Food => "Food Production",
            Self::Hygiene => "Hygiene",
            Self::Recreation => "Recreation",
            Self::Medical => "Medical Bay",
            Self::Maintenance => "Maintenance",
            Self::Stowage => "Stowage",
            Self::Science => "Science",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::LifeSupport => "Oxygen, CO₂ scrubbing, climate control",
            Self::Food => "Hydroponics, food storage, preparation",
            Self::Hygiene => "Bathrooms, water recycling, sanitation",
            Self::Recreation => "Exercise, entertainment, social spaces",
            Self::Medical => "Health monitoring, treatment, emergency",
            Self::Maintenance => "Tools, repairs, spare parts",
            Self::Stowage => "General supplies, equipment storage",
            Self::Science => "Research, experiments, data collection",
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Zone {
    type Err = AllocationError;

    /// Accepts `lifeSupport`, `life-support` and `life_support` spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .map(|c| c.to_ascii_lowercase())
            .collect();
        Self::ALL
            .into_iter()
            .find(|zone| zone.key().eq_ignore_ascii_case(&normalized))
            .ok_or_else(|| AllocationError::UnknownZone(s.trim().to_string()))
    }
}

/// Percentage of habitat volume per zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneAllocations {
    pub life_support: u8,
    pub food: u8,
    pub hygiene: u8,
    pub recreation: u8,
    pub medical: u8,
    pub maintenance: u8,
    pub stowage: u8,
    pub science: u8,
}

impl Default for ZoneAllocations {
    /// The balanced layout the allocation step starts from.
    fn default() -> Self {
        Self {
            life_support: 20,
            food: 15,
            hygiene: 10,
            recreation: 10,
            medical: 10,
            maintenance: 10,
            stowage: 15,
            science: 10,
        }
    }
}

impl ZoneAllocations {
    /// Every zone at 0%.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            life_support: 0,
            food: 0,
            hygiene: 0,
            recreation: 0,
            medical: 0,
            maintenance: 0,
            stowage: 0,
            science: 0,
        }
    }

    #[must_use]
    pub const fn get(&self, zone: Zone) -> u8 {
        match zone {
            Zone::LifeSupport => self.life_support,
            Zone::Food => self.food,
            Zone::Hygiene => self.hygiene,
            Zone::Recreation => self.recreation,
            Zone::Medical => self.medical,
            Zone::Maintenance => self.maintenance,
            Zone::Stowage => self.stowage,
            Zone::Science => self.science,
        }
    }

    /// Allocation as a float, for the decay math.
    #[must_use]
    pub fn pct(&self, zone: Zone) -> f64 {
        f64::from(self.get(zone))
    }

    /// Set one zone, enforcing the slider's 0–100 range and 5% step.
    ///
    /// # Errors
    ///
    /// Returns [`AllocationError`] when the value is above 100 or off-step.
    pub fn set(&mut self, zone: Zone, value: u8) -> Result<(), AllocationError> {
        validate_value(zone, value)?;
        *self.slot_mut(zone) = value;
        Ok(())
    }

    /// Builder-style variant of [`Self::set`].
    ///
    /// # Errors
    ///
    /// Returns [`AllocationError`] when the value is above 100 or off-step.
    pub fn with(mut self, zone: Zone, value: u8) -> Result<Self, AllocationError> {
        self.set(zone, value)?;
        Ok(self)
    }

    /// Check every zone against the slider constraints.
    ///
    /// # Errors
    ///
    /// Returns the first [`AllocationError`] encountered in zone order.
    pub fn validate(&self) -> Result<(), AllocationError> {
        for (zone, value) in self.iter() {
            validate_value(zone, value)?;
        }
        Ok(())
    }

    /// Sum of all zones; may be above or below 100.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.iter().map(|(_, value)| u32::from(value)).sum()
    }

    /// Zones paired with their allocation, in display order.
    pub fn iter(&self) -> impl Iterator<Item = (Zone, u8)> + '_ {
        Zone::ALL.into_iter().map(|zone| (zone, self.get(zone)))
    }

    /// Apply `zone=value` overrides, e.g. `lifeSupport=25,food=10`.
    ///
    /// # Errors
    ///
    /// Returns [`AllocationError`] for unknown zones, unparsable values or
    /// values outside the slider constraints.
    pub fn apply_overrides(&mut self, spec: &str) -> Result<(), AllocationError> {
        for pair in spec.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, raw) = pair
                .split_once('=')
                .ok_or_else(|| AllocationError::UnknownZone(pair.to_string()))?;
            let zone: Zone = key.parse()?;
            let value: u8 = raw
                .trim()
                .parse()
                .map_err(|_| AllocationError::InvalidValue {
                    zone,
                    raw: raw.trim().to_string(),
                })?;
            self.set(zone, value)?;
        }
        Ok(())
    }

    fn slot_mut(&mut self, zone: Zone) -> &mut u8 {
        match zone {
            Zone::LifeSupport => &mut self.life_support,
            Zone::Food => &mut self.food,
            Zone::Hygiene => &mut self.hygiene,
            Zone::Recreation => &mut self.recreation,
            Zone::Medical => &mut self.medical,
            Zone::Maintenance => &mut self.maintenance,
            Zone::Stowage => &mut self.stowage,
            Zone::Science => &mut self.science,
        }
    }
}

fn validate_value(zone: Zone, value: u8) -> Result<(), AllocationError> {
    if value > ALLOCATION_MAX {
        return Err(AllocationError::AboveMaximum {
            zone,
            value,
            max: ALLOCATION_MAX,
        });
    }
    if value % ALLOCATION_STEP != 0 {
        return Err(AllocationError::OffStep {
            zone,
            value,
            step: ALLOCATION_STEP,
        });
    }
    Ok(())
}
