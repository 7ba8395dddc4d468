//! JSON mission plans: a setup-form snapshot loadable from disk or the command line.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::mission::{MissionConfig, MissionConfigError};
use crate::session::{MissionSession, MissionSetup, SetupError};
use crate::zones::{AllocationError, ZoneAllocations};

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("mission plan is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Config(#[from] MissionConfigError),
    #[error(transparent)]
    Allocation(#[from] AllocationError),
    #[error(transparent)]
    Setup(#[from] SetupError),
}

/// Optional mission config and allocations, plus an optional seed.
///
/// Missing sections deserialize to `None`; the setup guard, not the parser,
/// reports them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionPlan {
    #[serde(default, alias = "missionConfig")]
    pub config: Option<MissionConfig>,
    #[serde(default, alias = "zoneAllocations")]
    pub allocations: Option<ZoneAllocations>,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl MissionPlan {
    /// # Errors
    ///
    /// Returns [`PlanError::Parse`] for malformed JSON or out-of-range tokens.
    pub fn from_json(json: &str) -> Result<Self, PlanError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Plan built from raw setup tokens and `zone=value` overrides applied to
    /// the default layout.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError`] for unsupported tokens or invalid overrides.
    pub fn from_tokens(
        destination: &str,
        crew_size: u32,
        duration: u32,
        difficulty: &str,
        overrides: Option<&str>,
    ) -> Result<Self, PlanError> {
        let config = MissionConfig::from_tokens(destination, crew_size, duration, difficulty)?;
        let mut allocations = ZoneAllocations::default();
        if let Some(spec) = overrides {
            allocations.apply_overrides(spec)?;
        }
        Ok(Self {
            config: Some(config),
            allocations: Some(allocations),
            seed: None,
        })
    }

    /// Apply `zone=value` overrides, starting from the default layout when
    /// the plan has no allocations yet.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::Allocation`] for unknown zones or invalid values.
    pub fn apply_overrides(&mut self, spec: &str) -> Result<(), PlanError> {
        let allocations = self.allocations.get_or_insert_with(ZoneAllocations::default);
        allocations.apply_overrides(spec)?;
        Ok(())
    }

    #[must_use]
    pub const fn setup(&self) -> MissionSetup {
        MissionSetup {
            config: self.config,
            allocations: self.allocations,
        }
    }

    /// Start a session, preferring the plan's own seed over `fallback_seed`.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::Setup`] when a section is missing or invalid.
    pub fn launch(&self, fallback_seed: u64) -> Result<MissionSession, PlanError> {
        Ok(self.setup().launch(self.seed.unwrap_or(fallback_seed))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mission::{Destination, Difficulty};
    use crate::session::SetupStep;
    use crate::zones::Zone;

    #[test]
    fn full_plan_parses_and_launches() {
        let json = r#"{
            "config": {
                "destination": "asteroid",
                "crewSize": 4,
                "duration": 90,
                "difficulty": "hard"
            },
            "allocations": {
                "lifeSupport": 25, "food": 15, "hygiene": 10, "recreation": 10,
                "medical": 10, "maintenance": 10, "stowage": 10, "science": 10
            },
            "seed": 42
        }"#;
        let plan = MissionPlan::from_json(json).unwrap();
        let session = plan.launch(0).unwrap();
        assert_eq!(session.seed(), 42);
        assert_eq!(session.controller().config().destination, Destination::Asteroid);
        assert_eq!(session.controller().allocations().life_support, 25);
    }

    #[test]
    fn missing_sections_surface_as_setup_errors() {
        let plan = MissionPlan::from_json("{}").unwrap();
        let err = plan.launch(1).unwrap_err();
        match err {
            PlanError::Setup(setup) => assert_eq!(setup.redirect_to(), SetupStep::MissionSetup),
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn form_aliases_are_accepted() {
        let json = r#"{"missionConfig": {"destination": "leo", "crewSize": 2, "duration": 30}}"#;
        let plan = MissionPlan::from_json(json).unwrap();
        assert_eq!(plan.config.map(|c| c.difficulty), Some(Difficulty::Medium));
        assert!(plan.allocations.is_none());
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            MissionPlan::from_json("{ not json"),
            Err(PlanError::Parse(_))
        ));
        assert!(matches!(
            MissionPlan::from_json(
                r#"{"config": {"destination": "venus", "crewSize": 2, "duration": 30}}"#
            ),
            Err(PlanError::Parse(_))
        ));
    }

    #[test]
    fn tokens_and_overrides_build_a_plan() {
        let plan = MissionPlan::from_tokens("mars", 6, 180, "easy", Some("science=0,stowage=25"))
            .unwrap();
        let alloc = plan.allocations.unwrap();
        assert_eq!(alloc.get(Zone::Science), 0);
        assert_eq!(alloc.get(Zone::Stowage), 25);

        assert!(matches!(
            MissionPlan::from_tokens("mars", 7, 180, "easy", None),
            Err(PlanError::Config(MissionConfigError::UnsupportedCrewSize(7)))
        ));
        assert!(matches!(
            MissionPlan::from_tokens("mars", 6, 180, "easy", Some("galley=10")),
            Err(PlanError::Allocation(AllocationError::UnknownZone(_)))
        ));
    }

    #[test]
    fn overrides_seed_missing_allocations_with_defaults() {
        let mut plan = MissionPlan::default();
        plan.apply_overrides("food=20").unwrap();
        let alloc = plan.allocations.unwrap();
        assert_eq!(alloc.food, 20);
        assert_eq!(alloc.life_support, 20);
    }
}
