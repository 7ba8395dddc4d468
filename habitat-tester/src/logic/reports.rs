use anyhow::Result;
use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::Serialize;
use std::io::Write;
use std::time::Duration;

use habitat_game::{FeedbackTier, Grade, MissionPlan};

use super::runner::{MissionRun, RunSummary};

#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: String,
    summary: &'a RunSummary,
    runs: &'a [MissionRun],
}

fn colored_grade(grade: Grade) -> colored::ColoredString {
    match grade {
        Grade::A => grade.letter().bright_green().bold(),
        Grade::B => grade.letter().green(),
        Grade::C => grade.letter().yellow(),
        Grade::D => grade.letter().red(),
    }
}

fn headline(plan: &MissionPlan) -> String {
    plan.config
        .map_or_else(|| "Unconfigured mission".to_string(), |c| c.headline())
}

pub fn generate_console_report(
    out: &mut dyn Write,
    plan: &MissionPlan,
    runs: &[MissionRun],
    verbose: bool,
    total_duration: Duration,
) -> Result<()> {
    let summary = RunSummary::from_runs(runs);
    writeln!(out)?;
    writeln!(out, "{}", "📊 Mission Results Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "==========================".cyan())?;
    writeln!(out, "Mission: {}", headline(plan))?;
    writeln!(out, "Runs: {}", summary.runs)?;
    writeln!(out, "Completed: {}", summary.completed.to_string().green())?;
    writeln!(out, "Aborted: {}", summary.aborted.to_string().red())?;
    writeln!(out, "Mean resource average: {:.1}%", summary.mean_average)?;
    let grades: Vec<String> = summary
        .grades
        .iter()
        .map(|(letter, count)| format!("{letter}:{count}"))
        .collect();
    writeln!(out, "Grades: {} ({}% A)", grades.join(" "), summary.a_rate_pct())?;
    if summary.consequence_gaps > 0 {
        writeln!(
            out,
            "{}",
            format!("⚠️  {} choices had no authored consequence", summary.consequence_gaps)
                .yellow()
        )?;
    }
    writeln!(out, "Total time: {total_duration:?}")?;
    writeln!(out)?;

    for run in runs {
        let debrief = &run.debrief;
        writeln!(
            out,
            "{} seed {} #{} [{}] {:.1}% after {} days ({})",
            colored_grade(debrief.report.grade),
            run.seed,
            run.iteration,
            run.policy,
            debrief.report.average,
            debrief.days_elapsed,
            debrief.end_reason
        )?;
        for decision in &run.decisions {
            writeln!(
                out,
                "   day {:>3}: {} -> {}",
                decision.day, decision.title, decision.choice
            )?;
        }
        if verbose {
            writeln!(out, "   {}", debrief.report.story.italic())?;
            for analysis in &debrief.report.system_analysis {
                let value = format!("{:>5.1}%", analysis.value);
                let value = match analysis.tier {
                    FeedbackTier::Good => value.green(),
                    FeedbackTier::Adequate => value.yellow(),
                    FeedbackTier::Critical => value.red(),
                };
                writeln!(
                    out,
                    "   {:<14} {value}  {}",
                    analysis.subsystem.label(),
                    analysis.feedback
                )?;
            }
            for member in &debrief.crew {
                writeln!(out, "   • {} ({}): {}", member.name, member.role, member.story)?;
            }
            for line in &debrief.report.advice {
                writeln!(out, "   ➜ {line}")?;
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

pub fn generate_json_report(
    out: &mut dyn Write,
    runs: &[MissionRun],
    generated_at: DateTime<Utc>,
) -> Result<()> {
    let summary = RunSummary::from_runs(runs);
    let report = JsonReport {
        generated_at: generated_at.to_rfc3339(),
        summary: &summary,
        runs,
    };
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)?;
    Ok(())
}

pub fn generate_markdown_report(
    out: &mut dyn Write,
    plan: &MissionPlan,
    runs: &[MissionRun],
    generated_at: DateTime<Utc>,
) -> Result<()> {
    let summary = RunSummary::from_runs(runs);
    writeln!(out, "# Habitat Mission Results\n")?;
    writeln!(out, "_Generated {}_\n", generated_at.format("%Y-%m-%d %H:%M:%S UTC"))?;
    writeln!(out, "**Mission:** {}\n", headline(plan))?;
    writeln!(out, "## Summary\n")?;
    writeln!(out, "- **Runs:** {}", summary.runs)?;
    writeln!(out, "- **Completed:** {}", summary.completed)?;
    writeln!(out, "- **Mean resource average:** {:.1}%", summary.mean_average)?;
    writeln!(out, "- **A grades:** {}%\n", summary.a_rate_pct())?;

    writeln!(out, "## Runs\n")?;
    writeln!(out, "| Seed | Policy | Grade | Average | Days | Result | Choices |")?;
    writeln!(out, "|------|--------|-------|---------|------|--------|---------|")?;
    for run in runs {
        let choices: Vec<String> = run
            .decisions
            .iter()
            .map(|d| format!("{}{}", d.event_id, d.choice))
            .collect();
        writeln!(
            out,
            "| {} | {} | {} | {:.1}% | {} | {} | {} |",
            run.seed,
            run.policy,
            run.debrief.report.grade,
            run.debrief.report.average,
            run.debrief.days_elapsed,
            run.debrief.end_reason,
            if choices.is_empty() {
                "-".to_string()
            } else {
                choices.join(", ")
            }
        )?;
    }

    if let Some(first) = runs.first() {
        writeln!(out, "\n## Recommendations (seed {})\n", first.seed)?;
        for line in &first.debrief.report.advice {
            writeln!(out, "- {line}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::policy::PolicyKind;
    use crate::logic::runner::run_batch;
    use chrono::TimeZone;

    fn sample() -> (MissionPlan, Vec<MissionRun>) {
        let plan = MissionPlan::from_tokens("leo", 2, 30, "easy", None).unwrap();
        let runs = run_batch(&plan, &[1, 2], 1, PolicyKind::Cautious).unwrap();
        (plan, runs)
    }

    fn stamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap()
    }

    #[test]
    fn json_report_carries_summary_and_runs() {
        let (_, runs) = sample();
        let mut buf = Vec::new();
        generate_json_report(&mut buf, &runs, stamp()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["summary"]["runs"], 2);
        assert_eq!(value["runs"].as_array().map(Vec::len), Some(2));
        assert_eq!(value["runs"][0]["policy"], "cautious");
        assert!(value["generated_at"].as_str().unwrap().starts_with("2026-03-14T09:30:00"));
    }

    #[test]
    fn markdown_report_has_a_row_per_run() {
        let (plan, runs) = sample();
        let mut buf = Vec::new();
        generate_markdown_report(&mut buf, &plan, &runs, stamp()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("# Habitat Mission Results"));
        assert!(text.contains("Low Earth Orbit (LEO) • 30 Days • 2 Crew"));
        assert!(text.contains("_Generated 2026-03-14 09:30:00 UTC_"));
        assert_eq!(
            text.lines()
                .filter(|l| l.starts_with("| 1 ") || l.starts_with("| 2 "))
                .count(),
            2
        );
        assert!(text.contains("## Recommendations (seed 1)"));
    }

    #[test]
    fn console_report_lists_stories_when_verbose() {
        colored::control::set_override(false);
        let (plan, runs) = sample();
        let mut quiet = Vec::new();
        generate_console_report(&mut quiet, &plan, &runs, false, Duration::from_millis(5)).unwrap();
        let mut loud = Vec::new();
        generate_console_report(&mut loud, &plan, &runs, true, Duration::from_millis(5)).unwrap();
        let quiet = String::from_utf8(quiet).unwrap();
        let loud = String::from_utf8(loud).unwrap();
        assert!(quiet.contains("Runs: 2"));
        assert!(loud.contains(&runs[0].debrief.crew[0].story));
        assert!(loud.len() > quiet.len());
    }
}
