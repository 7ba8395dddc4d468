use anyhow::{Context, Result, bail};
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use habitat_game::numbers::{mean, round_f64_to_i32, usize_to_f64};
use habitat_game::{EndReason, EventChoice, Grade, MissionDebrief, MissionPlan};

use super::policy::PolicyKind;

/// Single automated mission, with the policy's decisions alongside the debrief.
#[derive(Debug, Clone, Serialize)]
pub struct MissionRun {
    pub seed: u64,
    pub iteration: usize,
    pub policy: PolicyKind,
    pub decisions: Vec<DecisionLog>,
    pub debrief: MissionDebrief,
    #[serde(skip)]
    pub elapsed: Duration,
}

#[derive(Debug, Clone, Serialize)]
pub struct DecisionLog {
    pub day: u32,
    pub event_id: u32,
    pub title: String,
    pub choice: EventChoice,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
}

/// Aggregate over a batch of runs.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub runs: usize,
    pub completed: usize,
    pub aborted: usize,
    pub mean_average: f64,
    pub grades: BTreeMap<String, usize>,
    pub consequence_gaps: usize,
}

impl RunSummary {
    #[must_use]
    pub fn from_runs(runs: &[MissionRun]) -> Self {
        let mut grades = BTreeMap::new();
        for grade in [Grade::A, Grade::B, Grade::C, Grade::D] {
            grades.insert(grade.letter().to_string(), 0);
        }
        for run in runs {
            *grades
                .entry(run.debrief.report.grade.letter().to_string())
                .or_insert(0) += 1;
        }
        let completed = runs
            .iter()
            .filter(|r| r.debrief.end_reason == EndReason::Completed)
            .count();
        Self {
            runs: runs.len(),
            completed,
            aborted: runs.len() - completed,
            mean_average: mean(runs.iter().map(|r| r.debrief.report.average)).unwrap_or(0.0),
            grades,
            consequence_gaps: runs.iter().map(|r| r.debrief.consequence_gaps.len()).sum(),
        }
    }

    /// Share of runs that earned an A, as a whole percentage.
    #[must_use]
    pub fn a_rate_pct(&self) -> i32 {
        if self.runs == 0 {
            return 0;
        }
        let a = self.grades.get("A").copied().unwrap_or(0);
        round_f64_to_i32(usize_to_f64(a) / usize_to_f64(self.runs) * 100.0)
    }
}

/// Seed used when neither the command line nor the plan supplies one.
pub const DEFAULT_SEED: u64 = 1337;

/// Base seeds for a batch: `--seeds` when given, else the plan's own seed,
/// else [`DEFAULT_SEED`].
pub fn batch_seeds(cli: Option<&str>, plan: &MissionPlan) -> Result<Vec<u64>> {
    match cli {
        Some(raw) => resolve_seeds(&super::split_csv(raw)),
        None => Ok(vec![plan.seed.unwrap_or(DEFAULT_SEED)]),
    }
}

/// Resolve seed tokens from the command line.
///
/// Negative integers map to their magnitude.
pub fn resolve_seeds(tokens: &[String]) -> Result<Vec<u64>> {
    let mut seeds = Vec::with_capacity(tokens.len());
    for token in tokens {
        if let Ok(value) = token.parse::<u64>() {
            seeds.push(value);
        } else if let Ok(value) = token.parse::<i64>() {
            seeds.push(value.unsigned_abs());
        } else {
            bail!("invalid seed '{token}'");
        }
    }
    if seeds.is_empty() {
        bail!("no seeds supplied");
    }
    Ok(seeds)
}

/// Play one mission from `plan` to the end, answering events with `policy`.
///
/// The mission always runs on `seed`; pick the plan's own seed up front
/// with [`batch_seeds`].
pub fn run_mission(
    plan: &MissionPlan,
    seed: u64,
    iteration: usize,
    policy: PolicyKind,
) -> Result<MissionRun> {
    let started = Instant::now();
    let mut session = plan
        .setup()
        .launch(seed)
        .with_context(|| format!("failed to launch mission for seed {seed}"))?;
    let mut chooser = policy.create_policy(session.seed());
    let mut decisions = Vec::new();
    session.run_to_end(|event, state| {
        let decision = chooser.pick_choice(state, event);
        log::debug!(
            "[{} seed {}] day {}: event {} -> {}",
            chooser.name(),
            seed,
            state.day,
            event.id,
            decision.choice
        );
        decisions.push(DecisionLog {
            day: state.day,
            event_id: event.id,
            title: event.title.clone(),
            choice: decision.choice,
            rationale: decision.rationale,
        });
        decision.choice
    });
    let debrief = session
        .debrief()
        .context("mission stopped without a debrief")?;
    Ok(MissionRun {
        seed: session.seed(),
        iteration,
        policy,
        decisions,
        debrief,
        elapsed: started.elapsed(),
    })
}

/// Run every seed `iterations` times; iteration `n` plays seed `s + n`.
pub fn run_batch(
    plan: &MissionPlan,
    seeds: &[u64],
    iterations: usize,
    policy: PolicyKind,
) -> Result<Vec<MissionRun>> {
    let mut runs = Vec::with_capacity(seeds.len() * iterations);
    for &seed in seeds {
        for iteration in 0..iterations {
            let run_seed = seed.wrapping_add(iteration as u64);
            runs.push(run_mission(plan, run_seed, iteration, policy)?);
        }
    }
    Ok(runs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan() -> MissionPlan {
        MissionPlan::from_tokens("moon", 4, 90, "medium", None).unwrap()
    }

    #[test]
    fn seeds_accept_negative_and_reject_words() {
        let tokens = vec!["7".to_string(), "-3".to_string()];
        assert_eq!(resolve_seeds(&tokens).unwrap(), vec![7, 3]);
        assert!(resolve_seeds(&["abc".to_string()]).is_err());
        assert!(resolve_seeds(&[]).is_err());
    }

    #[test]
    fn run_logs_one_decision_per_choice() {
        let run = run_mission(&plan(), 11, 0, PolicyKind::AlwaysA).unwrap();
        assert_eq!(run.debrief.end_reason, EndReason::Completed);
        assert_eq!(run.decisions.len(), run.debrief.choice_log.len());
        assert_eq!(run.decisions.len(), 4);
        assert!(run.decisions.iter().all(|d| d.choice == EventChoice::A));
        let days: Vec<u32> = run.decisions.iter().map(|d| d.day).collect();
        assert_eq!(days, vec![18, 36, 54, 72]);
    }

    #[test]
    fn batch_is_deterministic_and_summarized() {
        let first = run_batch(&plan(), &[5, 9], 2, PolicyKind::Random).unwrap();
        let second = run_batch(&plan(), &[5, 9], 2, PolicyKind::Random).unwrap();
        assert_eq!(first.len(), 4);
        let seeds: Vec<u64> = first.iter().map(|r| r.seed).collect();
        assert_eq!(seeds, vec![5, 6, 9, 10]);
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.debrief, b.debrief);
        }

        let summary = RunSummary::from_runs(&first);
        assert_eq!(summary.runs, 4);
        assert_eq!(summary.completed, 4);
        assert_eq!(summary.grades.values().sum::<usize>(), 4);
        assert!((0..=100).contains(&summary.a_rate_pct()));
    }

    #[test]
    fn seeded_plan_iterations_play_distinct_seeds() {
        let mut seeded = plan();
        seeded.seed = Some(99);
        let seeds = batch_seeds(None, &seeded).unwrap();
        assert_eq!(seeds, vec![99]);

        let runs = run_batch(&seeded, &seeds, 2, PolicyKind::AlwaysA).unwrap();
        let played: Vec<u64> = runs.iter().map(|r| r.seed).collect();
        assert_eq!(played, vec![99, 100]);
        assert_eq!(runs[1].debrief.seed, 100);
        assert_ne!(runs[0].debrief.crew, runs[1].debrief.crew);
    }

    #[test]
    fn cli_seeds_override_the_plan_seed() {
        let mut seeded = plan();
        seeded.seed = Some(99);
        assert_eq!(batch_seeds(Some("4, 8"), &seeded).unwrap(), vec![4, 8]);
        assert_eq!(batch_seeds(None, &plan()).unwrap(), vec![DEFAULT_SEED]);

        let runs = run_batch(&seeded, &[4, 8], 1, PolicyKind::AlwaysB).unwrap();
        let played: Vec<u64> = runs.iter().map(|r| r.debrief.seed).collect();
        assert_eq!(played, vec![4, 8]);
    }

    #[test]
    fn a_rate_rounds_to_whole_percent() {
        let summary = RunSummary {
            runs: 3,
            grades: [("A".to_string(), 2)].into_iter().collect(),
            ..RunSummary::default()
        };
        assert_eq!(summary.a_rate_pct(), 67);
    }

    #[test]
    fn empty_summary_is_zeroed() {
        let summary = RunSummary::from_runs(&[]);
        assert_eq!(summary.runs, 0);
        assert_eq!(summary.a_rate_pct(), 0);
        assert_eq!(summary.grades.len(), 4);
    }
}
