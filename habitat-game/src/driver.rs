//! Simulation clock: advances mission days, injects events and detects the end.
//!
//! [`MissionState`] is the explicit state object; [`MissionController`] holds the
//! immutable mission inputs and RNG streams and performs every transition on a
//! borrowed state. Nothing here knows about wall-clock time: [`TickSpeed`] only
//! tells the caller how often to call [`MissionController::tick`].
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

use crate::constants::{TICK_INTERVAL_1X_MS, TICK_INTERVAL_2X_MS, TICK_INTERVAL_4X_MS};
use crate::consequences::{Consequence, resolve_with_rng};
use crate::crew::{CrewAverages, CrewMember, generate_crew, update_crew_stats};
use crate::events::{EventCatalog, EventChoice, GameEvent, catalog};
use crate::mission::MissionConfig;
use crate::numbers::clamp_pct;
use crate::resources::{ResourceState, decay_tick};
use crate::rng::RngBundle;
use crate::zones::ZoneAllocations;

/// Errors raised by operator actions that do not fit the current phase.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MissionError {
    #[error("no event is awaiting a choice")]
    NoPendingEvent,
    #[error("event {0} must be resolved before the clock can resume")]
    EventPending(u32),
    #[error("mission has already ended")]
    MissionEnded,
}

/// Why a mission stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    Completed,
    Aborted,
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Completed => "completed",
            Self::Aborted => "aborted",
        })
    }
}

/// Clock state machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "phase", content = "detail")]
pub enum MissionPhase {
    Running,
    AwaitingChoice(GameEvent),
    Ended(EndReason),
}

/// What happened on a recorded day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayKind {
    /// Resources decayed and the crew was updated.
    Decay,
    /// An event fired; decay was skipped.
    Event,
}

/// Immutable ledger entry for one processed tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayRecord {
    pub day: u32,
    pub kind: DayKind,
    pub resources: ResourceState,
    /// Mean crew health after the tick.
    pub crew_health: f64,
    /// Mean crew morale after the tick.
    pub crew_morale: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<u32>,
}

/// Append-only log entry for a resolved event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventChoiceRecord {
    pub event_id: u32,
    pub choice: EventChoice,
    pub day: u32,
}

/// Why a tick was not processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TickIgnored {
    AwaitingChoice,
    Held,
    Ended,
}

/// Result returned by a clock tick.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// A normal day: decay and crew update applied.
    Advanced(DayRecord),
    /// A checkpoint fired; the clock now waits for a choice.
    EventTriggered { event: GameEvent, record: DayRecord },
    /// The final day was processed and the mission ended.
    Completed(DayRecord),
    /// The tick was dropped without touching state.
    Ignored(TickIgnored),
}

impl TickOutcome {
    #[must_use]
    pub const fn record(&self) -> Option<&DayRecord> {
        match self {
            Self::Advanced(record) | Self::Completed(record) => Some(record),
            Self::EventTriggered { record, .. } => Some(record),
            Self::Ignored(_) => None,
        }
    }

    #[must_use]
    pub const fn ended(&self) -> bool {
        matches!(self, Self::Completed(_) | Self::Ignored(TickIgnored::Ended))
    }
}

/// Result of supplying a choice to a pending event.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceOutcome {
    pub consequence: Consequence,
    pub resources: ResourceState,
}

/// Wall-clock pacing hint for the caller's timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TickSpeed {
    #[default]
    #[serde(rename = "1x")]
    Normal,
    #[serde(rename = "2x")]
    Double,
    #[serde(rename = "4x")]
    Quadruple,
}

impl TickSpeed {
    /// Cycle 1x → 2x → 4x → 1x.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Normal => Self::Double,
            Self::Double => Self::Quadruple,
            Self::Quadruple => Self::Normal,
        }
    }

    #[must_use]
    pub const fn interval_ms(self) -> u64 {
        match self {
            Self::Normal => TICK_INTERVAL_1X_MS,
            Self::Double => TICK_INTERVAL_2X_MS,
            Self::Quadruple => TICK_INTERVAL_4X_MS,
        }
    }

    #[must_use]
    pub const fn interval(self) -> Duration {
        Duration::from_millis(self.interval_ms())
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Normal => "1x",
            Self::Double => "2x",
            Self::Quadruple => "4x",
        }
    }
}

impl fmt::Display for TickSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Mutable mission state, exclusively owned by one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionState {
    pub day: u32,
    pub phase: MissionPhase,
    pub resources: ResourceState,
    pub crew: Vec<CrewMember>,
    pub used_event_ids: BTreeSet<u32>,
    pub choice_log: Vec<EventChoiceRecord>,
    /// Event ids resolved without an authored consequence.
    pub consequence_gaps: Vec<u32>,
    pub history: Vec<DayRecord>,
    pub held: bool,
    pub speed: TickSpeed,
}

impl MissionState {
    /// Fresh state on day 1 with full resources and the given roster.
    #[must_use]
    pub fn new(crew: Vec<CrewMember>) -> Self {
        Self {
            day: 1,
            phase: MissionPhase::Running,
            resources: ResourceState::default(),
            crew,
            used_event_ids: BTreeSet::new(),
            choice_log: Vec::new(),
            consequence_gaps: Vec::new(),
            history: Vec::new(),
            held: false,
            speed: TickSpeed::default(),
        }
    }

    #[must_use]
    pub const fn pending_event(&self) -> Option<&GameEvent> {
        match &self.phase {
            MissionPhase::AwaitingChoice(event) => Some(event),
            _ => None,
        }
    }

    #[must_use]
    pub const fn end_reason(&self) -> Option<EndReason> {
        match self.phase {
            MissionPhase::Ended(reason) => Some(reason),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_ended(&self) -> bool {
        matches!(self.phase, MissionPhase::Ended(_))
    }

    /// True when a tick would be processed.
    #[must_use]
    pub const fn is_ticking(&self) -> bool {
        matches!(self.phase, MissionPhase::Running) && !self.held
    }

    #[must_use]
    pub fn crew_averages(&self) -> Option<CrewAverages> {
        CrewAverages::of(&self.crew)
    }

    fn record(&self, kind: DayKind, event_id: Option<u32>) -> DayRecord {
        let averages = self.crew_averages();
        DayRecord {
            day: self.day,
            kind,
            resources: self.resources,
            crew_health: averages.map_or(0.0, |a| a.health),
            crew_morale: averages.map_or(0.0, |a| a.morale),
            event_id,
        }
    }
}

/// Share of the mission elapsed, in `[0, 100]`.
#[must_use]
pub fn progress_pct(day: u32, duration: u32) -> f64 {
    if duration == 0 {
        return 100.0;
    }
    clamp_pct(f64::from(day) / f64::from(duration) * 100.0)
}

/// Drives a [`MissionState`] through one mission.
#[derive(Debug, Clone)]
pub struct MissionController {
    config: MissionConfig,
    allocations: ZoneAllocations,
    catalog: EventCatalog,
    rng: RngBundle,
}

impl MissionController {
    /// Controller using the built-in event catalog.
    #[must_use]
    pub fn new(config: MissionConfig, allocations: ZoneAllocations, seed: u64) -> Self {
        Self::with_catalog(config, allocations, seed, catalog().clone())
    }

    #[must_use]
    pub fn with_catalog(
        config: MissionConfig,
        allocations: ZoneAllocations,
        seed: u64,
        catalog: EventCatalog,
    ) -> Self {
        Self {
            config,
            allocations,
            catalog,
            rng: RngBundle::from_user_seed(seed),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &MissionConfig {
        &self.config
    }

    #[must_use]
    pub const fn allocations(&self) -> &ZoneAllocations {
        &self.allocations
    }

    #[must_use]
    pub const fn rng(&self) -> &RngBundle {
        &self.rng
    }

    /// Generate the roster from the crew stream and build the day-1 state.
    #[must_use]
    pub fn initial_state(&self) -> MissionState {
        let crew = generate_crew(self.config.crew_size, &mut *self.rng.crew());
        MissionState::new(crew)
    }

    /// Advance the clock by one simulated day.
    ///
    /// Ticks are dropped while an event awaits a choice, while held, and
    /// after the mission has ended, so re-entrant timer callbacks are
    /// harmless.
    pub fn tick(&self, state: &mut MissionState) -> TickOutcome {
        match state.phase {
            MissionPhase::Ended(_) => return TickOutcome::Ignored(TickIgnored::Ended),
            MissionPhase::AwaitingChoice(_) => {
                return TickOutcome::Ignored(TickIgnored::AwaitingChoice);
            }
            MissionPhase::Running if state.held => {
                return TickOutcome::Ignored(TickIgnored::Held);
            }
            MissionPhase::Running => {}
        }

        let duration = self.config.duration.days();
        state.day = state.day.saturating_add(1);

        let triggered = self.catalog.maybe_trigger(
            state.day,
            duration,
            self.config.difficulty,
            &state.used_event_ids,
            &mut *self.rng.events(),
        );
        if let Some(event) = triggered {
            log::debug!("day {}: event {} \"{}\"", state.day, event.id, event.title);
            let record = state.record(DayKind::Event, Some(event.id));
            state.history.push(record.clone());
            state.phase = MissionPhase::AwaitingChoice(event.clone());
            return TickOutcome::EventTriggered { event, record };
        }

        self.apply_day(state);
        let record = state.record(DayKind::Decay, None);
        state.history.push(record.clone());
        log::debug!(
            "day {}: avg resources {:.2}, crew health {:.2}",
            state.day,
            state.resources.average(),
            record.crew_health
        );

        if state.day >= duration {
            state.phase = MissionPhase::Ended(EndReason::Completed);
            log::info!(
                "mission completed on day {} with avg resources {:.2}",
                state.day,
                state.resources.average()
            );
            return TickOutcome::Completed(record);
        }
        TickOutcome::Advanced(record)
    }

    fn apply_day(&self, state: &mut MissionState) {
        let difficulty = self.config.difficulty;
        state.resources = decay_tick(&state.resources, &self.allocations, difficulty);
        state.crew = update_crew_stats(
            &state.crew,
            &state.resources,
            &self.allocations,
            difficulty,
        );
    }

    /// Resolve the pending event and resume the clock.
    ///
    /// # Errors
    ///
    /// Returns [`MissionError::NoPendingEvent`] when nothing awaits a choice.
    pub fn choose(
        &self,
        state: &mut MissionState,
        choice: EventChoice,
    ) -> Result<ChoiceOutcome, MissionError> {
        let event_id = match &state.phase {
            MissionPhase::AwaitingChoice(event) => event.id,
            MissionPhase::Ended(_) => return Err(MissionError::MissionEnded),
            MissionPhase::Running => return Err(MissionError::NoPendingEvent),
        };

        let consequence = resolve_with_rng(event_id, choice, &mut *self.rng.consequences());
        state.resources = consequence.delta.apply_to(&state.resources);
        state.used_event_ids.insert(event_id);
        state.choice_log.push(EventChoiceRecord {
            event_id,
            choice,
            day: state.day,
        });
        if !consequence.authored {
            state.consequence_gaps.push(event_id);
        }
        state.phase = MissionPhase::Running;
        state.held = false;
        log::debug!(
            "day {}: event {event_id} resolved with {choice}, impact {}",
            state.day,
            consequence.impact
        );

        Ok(ChoiceOutcome {
            consequence,
            resources: state.resources,
        })
    }

    /// Force the mission to end with the current state as final.
    ///
    /// Always legal; an already-ended mission keeps its original reason.
    pub fn abort(&self, state: &mut MissionState) -> EndReason {
        if let MissionPhase::Ended(reason) = state.phase {
            return reason;
        }
        state.phase = MissionPhase::Ended(EndReason::Aborted);
        state.held = false;
        log::info!("mission aborted on day {}", state.day);
        EndReason::Aborted
    }

    /// Pause the clock without an event.
    ///
    /// # Errors
    ///
    /// Refused while an event is pending or after the mission has ended.
    pub fn hold(&self, state: &mut MissionState) -> Result<(), MissionError> {
        match &state.phase {
            MissionPhase::AwaitingChoice(event) => Err(MissionError::EventPending(event.id)),
            MissionPhase::Ended(_) => Err(MissionError::MissionEnded),
            MissionPhase::Running => {
                state.held = true;
                Ok(())
            }
        }
    }

    /// Release a manual hold.
    ///
    /// # Errors
    ///
    /// Refused while an event is pending or after the mission has ended.
    pub fn resume(&self, state: &mut MissionState) -> Result<(), MissionError> {
        match &state.phase {
            MissionPhase::AwaitingChoice(event) => Err(MissionError::EventPending(event.id)),
            MissionPhase::Ended(_) => Err(MissionError::MissionEnded),
            MissionPhase::Running => {
                state.held = false;
                Ok(())
            }
        }
    }

    /// Step the pacing hint to the next speed and return it.
    ///
    /// An ended mission keeps its last speed.
    pub fn cycle_speed(&self, state: &mut MissionState) -> TickSpeed {
        if state.end_reason().is_none() {
            state.speed = state.speed.next();
        }
        state.speed
    }

    #[must_use]
    pub fn progress_pct(&self, state: &MissionState) -> f64 {
        progress_pct(state.day, self.config.duration.days())
    }
}
