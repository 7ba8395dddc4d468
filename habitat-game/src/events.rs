//! Static event catalog and checkpoint-driven event selection.
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::constants::CHECKPOINTS_PER_MISSION;
use crate::mission::Difficulty;

const DEFAULT_EVENT_DATA: &str = include_str!("../assets/data/events.json");

/// Player response to an event dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventChoice {
    A,
    B,
}

impl EventChoice {
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
        }
    }
}

impl fmt::Display for EventChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for EventChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "A" | "a" => Ok(Self::A),
            "B" | "b" => Ok(Self::B),
            other => Err(format!("unknown event choice `{other}` (expected A or B)")),
        }
    }
}

/// A discrete mission event with two response options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameEvent {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub option_a: String,
    pub option_b: String,
}

impl GameEvent {
    #[must_use]
    pub fn option(&self, choice: EventChoice) -> &str {
        match choice {
            EventChoice::A => &self.option_a,
            EventChoice::B => &self.option_b,
        }
    }
}

/// Event pools keyed by difficulty. Id spaces are disjoint across pools.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventCatalog {
    #[serde(default)]
    pub easy: Vec<GameEvent>,
    #[serde(default)]
    pub medium: Vec<GameEvent>,
    #[serde(default)]
    pub hard: Vec<GameEvent>,
}

impl EventCatalog {
    #[must_use]
    pub fn load_from_static() -> Self {
        serde_json::from_str(DEFAULT_EVENT_DATA).unwrap_or_default()
    }

    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into an event catalog.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn pool(&self, difficulty: Difficulty) -> &[GameEvent] {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Medium => &self.medium,
            Difficulty::Hard => &self.hard,
        }
    }

    #[must_use]
    pub fn find(&self, id: u32) -> Option<&GameEvent> {
        self.easy
            .iter()
            .chain(&self.medium)
            .chain(&self.hard)
            .find(|event| event.id == id)
    }

    /// Pick an unused event from the difficulty's pool if `day` is a checkpoint.
    ///
    /// Draws from `rng` only when a checkpoint has at least one candidate.
    pub fn maybe_trigger<R>(
        &self,
        day: u32,
        duration: u32,
        difficulty: Difficulty,
        used_ids: &BTreeSet<u32>,
        rng: &mut R,
    ) -> Option<GameEvent>
    where
        R: Rng + ?Sized,
    {
        if !is_checkpoint(day, duration) {
            return None;
        }
        let available: Vec<&GameEvent> = self
            .pool(difficulty)
            .iter()
            .filter(|event| !used_ids.contains(&event.id))
            .collect();
        if available.is_empty() {
            log::debug!("checkpoint on day {day} skipped: {difficulty} pool exhausted");
            return None;
        }
        let picked = available[rng.gen_range(0..available.len())];
        Some(picked.clone())
    }
}

#[must_use]
pub fn catalog() -> &'static EventCatalog {
    static CATALOG: OnceLock<EventCatalog> = OnceLock::new();
    CATALOG.get_or_init(EventCatalog::load_from_static)
}

/// Days between checkpoints; 0 when the mission is too short for any.
#[must_use]
pub const fn checkpoint_interval(duration: u32) -> u32 {
    duration / CHECKPOINTS_PER_MISSION
}

/// Checkpoints fall on multiples of the interval, strictly before the final day.
#[must_use]
pub const fn is_checkpoint(day: u32, duration: u32) -> bool {
    let interval = checkpoint_interval(duration);
    interval != 0 && day % interval == 0 && day < duration
}

/// [`EventCatalog::maybe_trigger`] against the built-in catalog.
pub fn maybe_trigger<R>(
    day: u32,
    duration: u32,
    difficulty: Difficulty,
    used_ids: &BTreeSet<u32>,
    rng: &mut R,
) -> Option<GameEvent>
where
    R: Rng + ?Sized,
{
    catalog().maybe_trigger(day, duration, difficulty, used_ids, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::RngBundle;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn checkpoints(duration: u32) -> Vec<u32> {
        (1..=duration)
            .filter(|day| is_checkpoint(*day, duration))
            .collect()
    }

    #[test]
    fn static_catalog_has_disjoint_pools() {
        let cat = catalog();
        assert_eq!(cat.easy.len(), 3);
        assert_eq!(cat.medium.len(), 4);
        assert_eq!(cat.hard.len(), 5);

        let ids: BTreeSet<u32> = cat
            .easy
            .iter()
            .chain(&cat.medium)
            .chain(&cat.hard)
            .map(|e| e.id)
            .collect();
        assert_eq!(ids.len(), 12);
        assert_eq!(cat.find(9).map(|e| e.title.as_str()), Some("Cascading System Failure"));
        assert!(cat.find(42).is_none());
    }

    #[test]
    fn checkpoints_stop_before_final_day() {
        assert_eq!(checkpoints(100), vec![20, 40, 60, 80]);
        assert_eq!(checkpoints(30), vec![6, 12, 18, 24]);
        assert_eq!(checkpoints(365), vec![73, 146, 219, 292]);
    }

    #[test]
    fn tiny_missions_never_checkpoint() {
        for duration in 0..5 {
            assert_eq!(checkpoint_interval(duration), 0);
            assert!(checkpoints(duration).is_empty());
        }
    }

    #[test]
    fn non_checkpoint_days_do_not_draw() {
        let bundle = RngBundle::from_user_seed(1);
        let used = BTreeSet::new();
        let trigger = |day, duration| {
            maybe_trigger(day, duration, Difficulty::Hard, &used, &mut *bundle.events())
        };
        for day in (1..100).filter(|d| d % 20 != 0) {
            assert!(trigger(day, 100).is_none());
        }
        for day in 1..=4 {
            assert!(trigger(day, 4).is_none());
        }
        assert_eq!(bundle.draws().events, 0);

        assert!(trigger(20, 100).is_some());
        assert!(bundle.draws().events > 0);
    }

    #[test]
    fn selection_skips_used_ids() {
        let mut rng = SmallRng::seed_from_u64(3);
        let used: BTreeSet<u32> = [4, 5, 6].into_iter().collect();
        for _ in 0..10 {
            let event = maybe_trigger(20, 100, Difficulty::Medium, &used, &mut rng).unwrap();
            assert_eq!(event.id, 7);
        }
    }

    #[test]
    fn exhausted_pool_is_a_silent_no_op() {
        let mut rng = SmallRng::seed_from_u64(5);
        let used: BTreeSet<u32> = [1, 2, 3].into_iter().collect();
        assert!(maybe_trigger(20, 100, Difficulty::Easy, &used, &mut rng).is_none());
    }

    #[test]
    fn custom_catalogs_parse_from_json() {
        let json = r#"{
            "easy": [{
                "id": 99,
                "title": "Drill",
                "description": "Fire drill.",
                "optionA": "Run it",
                "optionB": "Skip it"
            }]
        }"#;
        let cat = EventCatalog::from_json(json).unwrap();
        assert!(cat.medium.is_empty());
        let event = &cat.pool(Difficulty::Easy)[0];
        assert_eq!(event.option(EventChoice::B), "Skip it");
    }

    #[test]
    fn choices_parse_case_insensitively() {
        assert_eq!("a".parse::<EventChoice>().unwrap(), EventChoice::A);
        assert_eq!(" B ".parse::<EventChoice>().unwrap(), EventChoice::B);
        assert!("C".parse::<EventChoice>().is_err());
    }
}
