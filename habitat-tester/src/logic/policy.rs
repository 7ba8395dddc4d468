use clap::ValueEnum;
use serde::Serialize;
use std::fmt;

use habitat_game::{EventChoice, GameEvent, MissionState, ResourceState, resolve};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Impact assumed when a policy previews a consequence (midpoint of the roll).
const PREVIEW_IMPACT: f64 = 9.5;

/// Decision returned by a [`ChoicePolicy`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyDecision {
    pub choice: EventChoice,
    pub rationale: Option<String>,
}

impl PolicyDecision {
    #[must_use]
    pub const fn new(choice: EventChoice, rationale: Option<String>) -> Self {
        Self { choice, rationale }
    }
}

/// Policy interface for automated event handling.
pub trait ChoicePolicy {
    /// Name used for logging/debug output.
    fn name(&self) -> &'static str;

    /// Answer the pending event.
    fn pick_choice(&mut self, state: &MissionState, event: &GameEvent) -> PolicyDecision;
}

/// Built-in choice strategies for automated runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyKind {
    /// Always take option A
    AlwaysA,
    /// Always take option B
    AlwaysB,
    /// Coin flip per event
    Random,
    /// Protect the weakest resource
    Cautious,
}

impl PolicyKind {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::AlwaysA => "Always A",
            Self::AlwaysB => "Always B",
            Self::Random => "Random",
            Self::Cautious => "Cautious",
        }
    }

    #[must_use]
    pub fn create_policy(self, seed: u64) -> Box<dyn ChoicePolicy> {
        match self {
            Self::AlwaysA => Box::new(FixedPolicy(EventChoice::A)),
            Self::AlwaysB => Box::new(FixedPolicy(EventChoice::B)),
            Self::Random => Box::new(RandomPolicy::new(seed)),
            Self::Cautious => Box::new(CautiousPolicy),
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

struct FixedPolicy(EventChoice);

struct RandomPolicy {
    rng: ChaCha20Rng,
}

impl RandomPolicy {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

struct CautiousPolicy;

impl ChoicePolicy for FixedPolicy {
    fn name(&self) -> &'static str {
        match self.0 {
            EventChoice::A => "Always A",
            EventChoice::B => "Always B",
        }
    }

    fn pick_choice(&mut self, _state: &MissionState, _event: &GameEvent) -> PolicyDecision {
        PolicyDecision::new(self.0, None)
    }
}

impl ChoicePolicy for RandomPolicy {
    fn name(&self) -> &'static str {
        "Random"
    }

    fn pick_choice(&mut self, _state: &MissionState, _event: &GameEvent) -> PolicyDecision {
        let choice = if self.rng.gen_bool(0.5) {
            EventChoice::A
        } else {
            EventChoice::B
        };
        PolicyDecision::new(choice, None)
    }
}

impl ChoicePolicy for CautiousPolicy {
    fn name(&self) -> &'static str {
        "Cautious"
    }

    fn pick_choice(&mut self, state: &MissionState, event: &GameEvent) -> PolicyDecision {
        let preview = |choice| {
            let after = resolve(event.id, choice, PREVIEW_IMPACT).apply_to(&state.resources);
            (weakest(&after), after.average())
        };
        let (floor_a, avg_a) = preview(EventChoice::A);
        let (floor_b, avg_b) = preview(EventChoice::B);
        // Keep the weakest resource highest; break ties on the overall average.
        let choice = if floor_b > floor_a || (floor_b == floor_a && avg_b > avg_a) {
            EventChoice::B
        } else {
            EventChoice::A
        };
        PolicyDecision::new(
            choice,
            Some(format!(
                "floor A {floor_a:.1} / B {floor_b:.1}, avg A {avg_a:.1} / B {avg_b:.1}"
            )),
        )
    }
}

fn weakest(resources: &ResourceState) -> f64 {
    resources
        .iter()
        .map(|(_, value)| value)
        .fold(f64::INFINITY, f64::min)
}
