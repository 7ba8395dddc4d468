mod logic;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use habitat_game::MissionPlan;
use logic::{MissionRun, PolicyKind, batch_seeds, run_batch};

#[derive(Debug, Parser)]
#[command(name = "habitat-tester", version)]
#[command(about = "Headless habitat mission runner: scripted choices, graded reports")]
struct Args {
    /// Mission plan JSON (config, allocations, optional seed); overrides the token flags
    #[arg(long)]
    plan: Option<PathBuf>,

    /// Destination token (moon, mars, leo, asteroid, deep-space)
    #[arg(long, default_value = "mars")]
    destination: String,

    /// Crew size (2, 4, 6, 8 or 12)
    #[arg(long, default_value_t = 6)]
    crew_size: u32,

    /// Mission length in days (30, 90, 180, 365 or 730)
    #[arg(long, default_value_t = 180)]
    duration: u32,

    /// Difficulty (easy, medium, hard)
    #[arg(long, default_value = "medium")]
    difficulty: String,

    /// Zone overrides, e.g. "lifeSupport=25,science=5"
    #[arg(long)]
    allocations: Option<String>,

    /// Seeds to run (comma-separated); defaults to the plan's seed, then 1337
    #[arg(long)]
    seeds: Option<String>,

    /// Runs per seed; run n uses seed + n
    #[arg(long, default_value_t = 1)]
    iterations: usize,

    /// How events are answered
    #[arg(long, value_enum, default_value_t = PolicyKind::Cautious)]
    policy: PolicyKind,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console"])]
    report: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    if let Err(err) = run(&args) {
        eprintln!("{} {err:#}", "❌".red());
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    if args.report == "console" && args.output.is_none() {
        announce_banner();
    }

    let start_time = Instant::now();
    let plan = load_plan(args)?;
    let seeds = batch_seeds(args.seeds.as_deref(), &plan)?;
    log::info!(
        "running {} seed(s) x {} iteration(s) with the {} policy",
        seeds.len(),
        args.iterations,
        args.policy
    );
    let runs = run_batch(&plan, &seeds, args.iterations.max(1), args.policy)?;
    write_report(args, &plan, &runs, start_time)
}

fn announce_banner() {
    println!("{}", "🚀 Habitat Mission Tester".bright_cyan().bold());
    println!("{}", "=========================".cyan());
}

fn load_plan(args: &Args) -> Result<MissionPlan> {
    let mut plan = if let Some(path) = &args.plan {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        MissionPlan::from_json(&raw)
            .with_context(|| format!("failed to parse mission plan {}", path.display()))?
    } else {
        MissionPlan::from_tokens(
            &args.destination,
            args.crew_size,
            args.duration,
            &args.difficulty,
            None,
        )
        .context("invalid mission setup")?
    };
    if let Some(spec) = &args.allocations {
        plan.apply_overrides(spec).context("invalid zone allocations")?;
    }
    Ok(plan)
}

fn write_report(
    args: &Args,
    plan: &MissionPlan,
    runs: &[MissionRun],
    start_time: Instant,
) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;
    let now = chrono::Utc::now();

    match args.report.as_str() {
        "json" => logic::reports::generate_json_report(output_target.writer(), runs, now)?,
        "markdown" => {
            logic::reports::generate_markdown_report(output_target.writer(), plan, runs, now)?;
        }
        _ => {
            logic::reports::generate_console_report(
                output_target.writer(),
                plan,
                runs,
                args.verbose,
                start_time.elapsed(),
            )?;
        }
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use habitat_game::{Difficulty, Zone};

    fn base_args() -> Args {
        Args {
            plan: None,
            destination: "mars".to_string(),
            crew_size: 6,
            duration: 180,
            difficulty: "medium".to_string(),
            allocations: None,
            seeds: None,
            iterations: 1,
            policy: PolicyKind::Cautious,
            report: "json".to_string(),
            verbose: false,
            output: None,
        }
    }

    fn temp_path(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "habitat-main-{label}-{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ))
    }

    #[test]
    fn args_parse_defaults() {
        let args = Args::parse_from(["habitat-tester"]);
        assert_eq!(args.destination, "mars");
        assert_eq!(args.crew_size, 6);
        assert_eq!(args.policy, PolicyKind::Cautious);
        assert_eq!(args.report, "console");
    }

    #[test]
    fn token_plan_applies_overrides() {
        let mut args = base_args();
        args.difficulty = "hard".to_string();
        args.allocations = Some("science=0,lifeSupport=30".to_string());
        let plan = load_plan(&args).unwrap();
        assert_eq!(plan.config.map(|c| c.difficulty), Some(Difficulty::Hard));
        let alloc = plan.allocations.unwrap();
        assert_eq!(alloc.get(Zone::Science), 0);
        assert_eq!(alloc.get(Zone::LifeSupport), 30);
    }

    #[test]
    fn bad_tokens_are_reported() {
        let mut args = base_args();
        args.destination = "venus".to_string();
        let err = load_plan(&args).unwrap_err();
        assert!(format!("{err:#}").contains("invalid mission setup"));
    }

    #[test]
    fn plan_file_wins_over_tokens() {
        let path = temp_path("plan");
        std::fs::write(
            &path,
            r#"{"config": {"destination": "moon", "crewSize": 2, "duration": 30, "difficulty": "easy"}}"#,
        )
        .unwrap();
        let mut args = base_args();
        args.plan = Some(path.clone());
        let plan = load_plan(&args).unwrap();
        assert_eq!(plan.config.map(|c| c.duration.days()), Some(30));
        assert!(plan.allocations.is_none());
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn run_writes_report_file() {
        let path = temp_path("report");
        let mut args = base_args();
        args.duration = 30;
        args.seeds = Some("4,5".to_string());
        args.output = Some(path.clone());
        run(&args).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["summary"]["runs"], 2);
        let _ = std::fs::remove_file(path);
    }
}
