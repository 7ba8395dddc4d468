//! Mission configuration chosen on the setup step.
//!
//! A [`MissionConfig`] is immutable once the simulation starts. Each field is
//! restricted to the fixed set of options offered by the setup form, so the
//! engine never has to reason about arbitrary crew sizes or durations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::constants::{
    CREW_MULT_EASY, CREW_MULT_HARD, CREW_MULT_MEDIUM, DECAY_MULT_EASY, DECAY_MULT_HARD,
    DECAY_MULT_MEDIUM,
};

/// Errors raised when parsing mission configuration tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MissionConfigError {
    #[error("unknown destination `{0}`")]
    UnknownDestination(String),
    #[error("unsupported crew size {0} (expected one of 2, 4, 6, 8, 12)")]
    UnsupportedCrewSize(u32),
    #[error("unsupported mission duration {0} days (expected one of 30, 90, 180, 365, 730)")]
    UnsupportedDuration(u32),
    #[error("unknown difficulty `{0}`")]
    UnknownDifficulty(String),
}

/// Mission destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Destination {
    Moon,
    Mars,
    Leo,
    Asteroid,
    DeepSpace,
}

impl Destination {
    pub const ALL: [Self; 5] = [
        Self::Moon,
        Self::Mars,
        Self::Leo,
        Self::Asteroid,
        Self::DeepSpace,
    ];

    /// Stable token used by the setup form.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Moon => "moon",
            Self::Mars => "mars",
            Self::Leo => "leo",
            Self::Asteroid => "asteroid",
            Self::DeepSpace => "deep-space",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Moon => "Lunar Orbit",
            Self::Mars => "Mars Surface",
            Self::Leo => "Low Earth Orbit (LEO)",
            Self::Asteroid => "Asteroid Belt",
            Self::DeepSpace => "Deep Space",
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Destination {
    type Err = MissionConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|dest| dest.key() == token)
            .ok_or(MissionConfigError::UnknownDestination(token))
    }
}

/// Number of crew aboard the habitat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum CrewSize {
    Two,
    Four,
    Six,
    Eight,
    Twelve,
}

impl CrewSize {
    pub const ALL: [Self; 5] = [Self::Two, Self::Four, Self::Six, Self::Eight, Self::Twelve];

    #[must_use]
    pub const fn count(self) -> usize {
        match self {
            Self::Two => 2,
            Self::Four => 4,
            Self::Six => 6,
            Self::Eight => 8,
            Self::Twelve => 12,
        }
    }
}

impl TryFrom<u32> for CrewSize {
    type Error = MissionConfigError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            2 => Ok(Self::Two),
            4 => Ok(Self::Four),
            6 => Ok(Self::Six),
            8 => Ok(Self::Eight),
            12 => Ok(Self::Twelve),
            other => Err(MissionConfigError::UnsupportedCrewSize(other)),
        }
    }
}

impl From<CrewSize> for u32 {
    fn from(value: CrewSize) -> Self {
        match value {
            CrewSize::Two => 2,
            CrewSize::Four => 4,
            CrewSize::Six => 6,
            CrewSize::Eight => 8,
            CrewSize::Twelve => 12,
        }
    }
}

/// Mission length in simulated days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum MissionDuration {
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
    TwoYears,
}

impl MissionDuration {
    pub const ALL: [Self; 5] = [
        Self::OneMonth,
        Self::ThreeMonths,
        Self::SixMonths,
        Self::OneYear,
        Self::TwoYears,
    ];

    #[must_use]
    pub const fn days(self) -> u32 {
        match self {
            Self::OneMonth => 30,
            Self::ThreeMonths => 90,
            Self::SixMonths => 180,
            Self::OneYear => 365,
            Self::TwoYears => 730,
        }
    }
}

impl TryFrom<u32> for MissionDuration {
    type Error = MissionConfigError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|duration| duration.days() == value)
            .ok_or(MissionConfigError::UnsupportedDuration(value))
    }
}

impl From<MissionDuration> for u32 {
    fn from(value: MissionDuration) -> Self {
        value.days()
    }
}

/// Difficulty level; selects the event catalog and scales every penalty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Self; 3] = [Self::Easy, Self::Medium, Self::Hard];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    /// Multiplier applied to daily resource decay.
    #[must_use]
    pub const fn decay_multiplier(self) -> f64 {
        match self {
            Self::Easy => DECAY_MULT_EASY,
            Self::Medium => DECAY_MULT_MEDIUM,
            Self::Hard => DECAY_MULT_HARD,
        }
    }

    /// Multiplier applied to crew health and morale penalties.
    #[must_use]
    pub const fn crew_multiplier(self) -> f64 {
        match self {
            Self::Easy => CREW_MULT_EASY,
            Self::Medium => CREW_MULT_MEDIUM,
            Self::Hard => CREW_MULT_HARD,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Difficulty {
    type Err = MissionConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|difficulty| difficulty.key() == token)
            .ok_or(MissionConfigError::UnknownDifficulty(token))
    }
}

/// Parameters fixed on the mission setup step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionConfig {
    pub destination: Destination,
    pub crew_size: CrewSize,
    pub duration: MissionDuration,
    #[serde(default)]
    pub difficulty: Difficulty,
}

impl MissionConfig {
    #[must_use]
    pub const fn new(
        destination: Destination,
        crew_size: CrewSize,
        duration: MissionDuration,
        difficulty: Difficulty,
    ) -> Self {
        Self {
            destination,
            crew_size,
            duration,
            difficulty,
        }
    }

    /// Build a config from the setup form's raw tokens.
    ///
    /// # Errors
    ///
    /// Returns [`MissionConfigError`] for the first token outside the offered options.
    pub fn from_tokens(
        destination: &str,
        crew_size: u32,
        duration: u32,
        difficulty: &str,
    ) -> Result<Self, MissionConfigError> {
        Ok(Self {
            destination: destination.parse()?,
            crew_size: CrewSize::try_from(crew_size)?,
            duration: MissionDuration::try_from(duration)?,
            difficulty: difficulty.parse()?,
        })
    }

    /// One-line mission banner, e.g. `Mars Surface • 180 Days • 6 Crew`.
    #[must_use]
    pub fn headline(&self) -> String {
        format!(
            "{} • {} Days • {} Crew",
            self.destination.label(),
            self.duration.days(),
            self.crew_size.count()
        )
    }
}
