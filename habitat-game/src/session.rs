//! Mission session: setup guard, driver wrapper and end-of-mission debrief.
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::crew::{CrewMember, generate_crew_stories};
use crate::driver::{
    ChoiceOutcome, DayRecord, EndReason, EventChoiceRecord, MissionController, MissionError,
    MissionState, TickIgnored, TickOutcome, TickSpeed,
};
use crate::events::{EventCatalog, EventChoice, GameEvent};
use crate::mission::MissionConfig;
use crate::report::{Report, score};
use crate::resources::ResourceState;
use crate::rng::RngDraws;
use crate::zones::{AllocationError, ZoneAllocations};

/// Step of the setup flow a caller is sent back to when inputs are missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetupStep {
    MissionSetup,
    ZoneAllocation,
}

impl fmt::Display for SetupStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::MissionSetup => "mission setup",
            Self::ZoneAllocation => "zone allocation",
        })
    }
}

/// Precondition failures raised before a mission can start.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    #[error("mission configuration is missing; return to mission setup")]
    MissingConfig,
    #[error("zone allocations are missing; return to mission setup")]
    MissingAllocations,
    #[error(transparent)]
    InvalidAllocations(#[from] AllocationError),
}

impl SetupError {
    /// Where the caller should send the user.
    #[must_use]
    pub const fn redirect_to(&self) -> SetupStep {
        match self {
            Self::MissingConfig | Self::MissingAllocations => SetupStep::MissionSetup,
            Self::InvalidAllocations(_) => SetupStep::ZoneAllocation,
        }
    }
}

/// Inputs collected across the setup steps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionSetup {
    pub config: Option<MissionConfig>,
    pub allocations: Option<ZoneAllocations>,
}

impl MissionSetup {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            config: None,
            allocations: None,
        }
    }

    #[must_use]
    pub const fn with_config(mut self, config: MissionConfig) -> Self {
        self.config = Some(config);
        self
    }

    #[must_use]
    pub const fn with_allocations(mut self, allocations: ZoneAllocations) -> Self {
        self.allocations = Some(allocations);
        self
    }

    /// Confirm both steps were completed with valid data.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError`] naming the missing or invalid input.
    pub fn validate(&self) -> Result<(MissionConfig, ZoneAllocations), SetupError> {
        let config = self.config.ok_or(SetupError::MissingConfig)?;
        let allocations = self.allocations.ok_or(SetupError::MissingAllocations)?;
        allocations.validate()?;
        Ok((config, allocations))
    }

    /// Start a mission with the built-in event catalog.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError`] when a setup step is incomplete.
    pub fn launch(&self, seed: u64) -> Result<MissionSession, SetupError> {
        let (config, allocations) = self.validate()?;
        Ok(MissionSession::new(config, allocations, seed))
    }
}

/// Everything the results view needs once a mission has ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionDebrief {
    pub config: MissionConfig,
    pub allocations: ZoneAllocations,
    pub seed: u64,
    pub end_reason: EndReason,
    pub days_elapsed: u32,
    pub final_resources: ResourceState,
    pub crew: Vec<CrewMember>,
    pub choice_log: Vec<EventChoiceRecord>,
    pub consequence_gaps: Vec<u32>,
    pub history: Vec<DayRecord>,
    pub report: Report,
    pub rng_draws: RngDraws,
}

/// High-level session binding a mission controller to its state.
#[derive(Debug, Clone)]
pub struct MissionSession {
    controller: MissionController,
    state: MissionState,
    seed: u64,
}

impl MissionSession {
    /// Fresh session on day 1 with a generated roster.
    #[must_use]
    pub fn new(config: MissionConfig, allocations: ZoneAllocations, seed: u64) -> Self {
        Self::from_controller(MissionController::new(config, allocations, seed), seed)
    }

    /// Session drawing events from a caller-supplied catalog.
    #[must_use]
    pub fn with_catalog(
        config: MissionConfig,
        allocations: ZoneAllocations,
        seed: u64,
        catalog: EventCatalog,
    ) -> Self {
        Self::from_controller(
            MissionController::with_catalog(config, allocations, seed, catalog),
            seed,
        )
    }

    fn from_controller(controller: MissionController, seed: u64) -> Self {
        let state = controller.initial_state();
        log::debug!(
            "mission launched: {} ({}), seed {seed}",
            controller.config().headline(),
            controller.config().difficulty
        );
        Self {
            controller,
            state,
            seed,
        }
    }

    /// Advance the simulation by one day.
    pub fn tick(&mut self) -> TickOutcome {
        self.controller.tick(&mut self.state)
    }

    /// Supply the player's answer to the pending event.
    ///
    /// # Errors
    ///
    /// Returns [`MissionError`] when no event is pending.
    pub fn choose(&mut self, choice: EventChoice) -> Result<ChoiceOutcome, MissionError> {
        self.controller.choose(&mut self.state, choice)
    }

    pub fn abort(&mut self) -> EndReason {
        self.controller.abort(&mut self.state)
    }

    /// # Errors
    ///
    /// Returns [`MissionError::MissionEnded`] after the mission has ended.
    pub fn hold(&mut self) -> Result<(), MissionError> {
        self.controller.hold(&mut self.state)
    }

    /// # Errors
    ///
    /// Refused while an event is pending or after the mission has ended.
    pub fn resume(&mut self) -> Result<(), MissionError> {
        self.controller.resume(&mut self.state)
    }

    pub fn cycle_speed(&mut self) -> TickSpeed {
        self.controller.cycle_speed(&mut self.state)
    }

    #[must_use]
    pub fn progress_pct(&self) -> f64 {
        self.controller.progress_pct(&self.state)
    }

    #[must_use]
    pub const fn state(&self) -> &MissionState {
        &self.state
    }

    #[must_use]
    pub const fn controller(&self) -> &MissionController {
        &self.controller
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    #[must_use]
    pub const fn pending_event(&self) -> Option<&GameEvent> {
        self.state.pending_event()
    }

    /// Tick until the mission ends, answering every event with `decide`.
    pub fn run_to_end<F>(&mut self, mut decide: F) -> EndReason
    where
        F: FnMut(&GameEvent, &MissionState) -> EventChoice,
    {
        loop {
            if let Some(reason) = self.state.end_reason() {
                return reason;
            }
            if let Some(event) = self.state.pending_event().cloned() {
                let choice = decide(&event, &self.state);
                if let Err(err) = self.choose(choice) {
                    log::warn!("choice for event {} rejected: {err}", event.id);
                    return self.abort();
                }
                continue;
            }
            // A manual hold would otherwise spin forever.
            if matches!(self.tick(), TickOutcome::Ignored(TickIgnored::Held))
                && self.resume().is_err()
            {
                return self.abort();
            }
        }
    }

    /// Debrief for an ended mission; `None` while it is still in progress.
    #[must_use]
    pub fn debrief(&self) -> Option<MissionDebrief> {
        self.state
            .end_reason()
            .map(|reason| self.build_debrief(reason))
    }

    /// End the mission (aborting if still running) and produce the debrief.
    #[must_use]
    pub fn finish(mut self) -> MissionDebrief {
        let reason = self.abort();
        self.build_debrief(reason)
    }

    fn build_debrief(&self, end_reason: EndReason) -> MissionDebrief {
        let config = *self.controller.config();
        let allocations = *self.controller.allocations();
        let state = &self.state;
        let crew = generate_crew_stories(
            &state.crew,
            &state.resources,
            &allocations,
            config.difficulty,
        );
        let report = score(&state.resources, &crew, &allocations, config.difficulty);
        MissionDebrief {
            config,
            allocations,
            seed: self.seed,
            end_reason,
            days_elapsed: state.day,
            final_resources: state.resources,
            crew,
            choice_log: state.choice_log.clone(),
            consequence_gaps: state.consequence_gaps.clone(),
            history: state.history.clone(),
            report,
            rng_draws: self.controller.rng().draws(),
        }
    }
}
