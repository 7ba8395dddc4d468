//! Centralized balance and tuning constants for the habitat engine.
//!
//! These values define the deterministic math for the core simulation.
//! Keeping them together ensures that mission balance can only be adjusted
//! via code changes reviewed in version control, rather than through external
//! assets.

// Resource bounds ----------------------------------------------------------
pub(crate) const RESOURCE_MIN: f64 = 0.0;
pub(crate) const RESOURCE_MAX: f64 = 100.0;
pub(crate) const RESOURCE_START: f64 = 100.0;

// Decay multipliers ---------------------------------------------------------
pub(crate) const DECAY_MULT_EASY: f64 = 0.7;
pub(crate) const DECAY_MULT_MEDIUM: f64 = 1.0;
pub(crate) const DECAY_MULT_HARD: f64 = 1.3;

// Zone survival thresholds (percent of habitat volume) ----------------------
pub(crate) const LIFE_SUPPORT_THRESHOLD: f64 = 20.0;
pub(crate) const FOOD_THRESHOLD: f64 = 15.0;
pub(crate) const HYGIENE_THRESHOLD: f64 = 10.0;
pub(crate) const RECREATION_THRESHOLD: f64 = 10.0;
pub(crate) const MAINTENANCE_THRESHOLD: f64 = 10.0;
pub(crate) const MEDICAL_THRESHOLD: f64 = 10.0;

// Daily decay coefficients --------------------------------------------------
pub(crate) const OXYGEN_DECAY: f64 = 0.5;
pub(crate) const WATER_DECAY: f64 = 0.3;
pub(crate) const FOOD_DECAY: f64 = 0.4;
pub(crate) const POWER_DECAY: f64 = 0.3;
pub(crate) const MORALE_DECAY: f64 = 0.2;
pub(crate) const REPAIRS_DECAY: f64 = 0.2;

// Crew model ----------------------------------------------------------------
pub(crate) const CREW_MULT_EASY: f64 = 0.7;
pub(crate) const CREW_MULT_MEDIUM: f64 = 1.0;
pub(crate) const CREW_MULT_HARD: f64 = 1.5;
pub(crate) const CREW_OXYGEN_FLOOR: f64 = 50.0;
pub(crate) const CREW_OXYGEN_PENALTY: f64 = 0.3;
pub(crate) const CREW_WATER_FLOOR: f64 = 40.0;
pub(crate) const CREW_WATER_PENALTY: f64 = 0.25;
pub(crate) const CREW_FOOD_FLOOR: f64 = 40.0;
pub(crate) const CREW_FOOD_PENALTY: f64 = 0.3;
pub(crate) const CREW_MEDICAL_PENALTY: f64 = 0.5;
pub(crate) const CREW_MORALE_DRIFT: f64 = 0.1;
pub(crate) const CREW_RECREATION_PENALTY: f64 = 0.4;
pub(crate) const CREW_STAT_START: f64 = 100.0;
pub(crate) const CREW_FATIGUE_START: f64 = 0.0;
pub(crate) const CREW_STRESS_START: f64 = 0.0;
pub(crate) const CREW_NUTRITION_START: f64 = 100.0;

// Crew story tiers ----------------------------------------------------------
pub(crate) const STORY_LOW: f64 = 30.0;
pub(crate) const STORY_MID: f64 = 60.0;
pub(crate) const STORY_HIGH: f64 = 85.0;
pub(crate) const STORY_PERFORMANCE_LOW: f64 = 40.0;
pub(crate) const STORY_LIFE_SUPPORT_OXYGEN: f64 = 50.0;

// Events ----------------------------------------------------------------------
pub(crate) const CHECKPOINTS_PER_MISSION: u32 = 5;
pub(crate) const IMPACT_MIN: u32 = 5;
pub(crate) const IMPACT_MAX: u32 = 14;

// Grading ---------------------------------------------------------------------
pub(crate) const GRADE_EASY: [f64; 3] = [70.0, 50.0, 30.0];
pub(crate) const GRADE_MEDIUM: [f64; 3] = [80.0, 60.0, 40.0];
pub(crate) const GRADE_HARD: [f64; 3] = [85.0, 70.0, 50.0];

// Narrative and feedback bands ----------------------------------------------
pub(crate) const STORY_BAND_LOW: f64 = 40.0;
pub(crate) const STORY_BAND_HIGH: f64 = 80.0;
pub(crate) const TIER_GOOD: f64 = 70.0;
pub(crate) const TIER_ADEQUATE: f64 = 40.0;

// Advice minimums -----------------------------------------------------------
pub(crate) const ADVICE_LIFE_SUPPORT_MIN: u8 = 15;
pub(crate) const ADVICE_FOOD_MIN: u8 = 12;
pub(crate) const ADVICE_RECREATION_MIN: u8 = 8;
pub(crate) const ADVICE_MAINTENANCE_MIN: u8 = 8;
pub(crate) const ADVICE_MEDICAL_MIN: u8 = 8;
pub(crate) const ADVICE_TOTAL_MIN: u32 = 90;
pub(crate) const ADVICE_TOTAL_MAX: u32 = 110;

// Allocation input ------------------------------------------------------------
pub(crate) const ALLOCATION_MAX: u8 = 100;
pub(crate) const ALLOCATION_STEP: u8 = 5;

// Pacing ----------------------------------------------------------------------
pub(crate) const TICK_INTERVAL_1X_MS: u64 = 1_000;
pub(crate) const TICK_INTERVAL_2X_MS: u64 = 500;
pub(crate) const TICK_INTERVAL_4X_MS: u64 = 250;

// RNG stream tags -------------------------------------------------------------
pub(crate) const RNG_TAG_CREW: &[u8] = b"crew";
pub(crate) const RNG_TAG_EVENTS: &[u8] = b"events";
pub(crate) const RNG_TAG_CONSEQUENCES: &[u8] = b"consequences";
