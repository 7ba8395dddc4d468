//! Habitat Game Engine
//!
//! Platform-agnostic simulation core for the space-habitat mission trainer.
//! A mission is configured, its habitat volume split across eight zones, and
//! then stepped day by day: resources decay according to the layout, the crew
//! reacts to habitat conditions, and checkpoint events ask for a binary choice.
//! When the clock runs out (or the operator aborts) the mission is graded.
//!
//! This crate holds no UI, timer or platform dependencies; callers drive
//! [`MissionSession::tick`] on their own schedule.

pub mod consequences;
pub mod constants;
pub mod crew;
pub mod driver;
pub mod events;
pub mod mission;
pub mod numbers;
pub mod plan;
pub mod report;
pub mod resources;
pub mod rng;
pub mod session;
pub mod zones;

// Re-export commonly used types
pub use consequences::{Consequence, has_consequence, resolve, resolve_with_rng, roll_impact};
pub use crew::{
    CrewAverages, CrewMember, Role, generate_crew, generate_crew_stories, update_crew_stats,
};
pub use driver::{
    ChoiceOutcome, DayKind, DayRecord, EndReason, EventChoiceRecord, MissionController,
    MissionError, MissionPhase, MissionState, TickIgnored, TickOutcome, TickSpeed, progress_pct,
};
pub use events::{
    EventCatalog, EventChoice, GameEvent, catalog, checkpoint_interval, is_checkpoint,
    maybe_trigger,
};
pub use mission::{
    CrewSize, Destination, Difficulty, MissionConfig, MissionConfigError, MissionDuration,
};
pub use plan::{MissionPlan, PlanError};
pub use report::{
    FeedbackTier, Grade, Report, Subsystem, SystemAnalysis, grade_for, improvement_advice,
    mission_story, score, system_analysis,
};
pub use resources::{
    Resource, ResourceDelta, ResourceState, StatusTier, decay_tick, deficiency_ratio,
};
pub use rng::{CountingRng, RngBundle, RngDraws, Stream};
pub use session::{MissionDebrief, MissionSession, MissionSetup, SetupError, SetupStep};
pub use zones::{AllocationError, Zone, ZoneAllocations};
