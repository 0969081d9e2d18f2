//! Run command implementation.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use benchpress_bench::workout::{plan, run_plan};
use benchpress_bench::{DEPTH_2Q, DeviceTranspile, GATE_COUNT_2Q, Report, ScenarioOutcome};

use super::common::{format_seconds, load_config};

/// Overrides for one run, layered on top of the configuration.
#[derive(Debug, Default)]
pub struct RunArgs {
    pub filter: Option<String>,
    pub rounds: Option<usize>,
    pub warmup: Option<usize>,
    pub opt_level: Option<u8>,
    pub backend: Option<String>,
    pub qubits: u32,
    pub json: Option<PathBuf>,
}

/// Execute the run command.
///
/// Returns `false` when any scenario failed.
pub fn execute(config: Option<&Path>, args: &RunArgs) -> Result<bool> {
    let mut config = load_config(config)?;
    if let Some(backend) = &args.backend {
        config.backend.clone_from(backend);
    }
    if let Some(level) = args.opt_level {
        config.options.optimization_level = level;
    }
    if let Some(rounds) = args.rounds {
        config.benchmark.rounds = rounds;
    }
    if let Some(warmup) = args.warmup {
        config.benchmark.warmup_rounds = warmup;
    }
    config.validate()?;

    let level = config.optimization_level();
    let suite = DeviceTranspile::new(config)?.with_num_qubits(args.qubits);

    println!(
        "{} Device transpile on {} (level {}, {} qubits)",
        style("→").cyan().bold(),
        style(suite.target()).yellow(),
        level,
        args.qubits
    );

    let plan = plan(&suite, args.filter.as_deref())?;
    if plan.is_empty() {
        anyhow::bail!(
            "No scenarios match filter '{}'",
            args.filter.as_deref().unwrap_or_default()
        );
    }

    let pb = ProgressBar::new(plan.len() as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
        )?
        .progress_chars("#>-"),
    );
    let outcomes = run_plan(&suite, &plan, |outcome| {
        pb.set_message(outcome.name().to_string());
        pb.inc(1);
    });
    pb.finish_and_clear();

    print_outcomes(&outcomes);

    let report = Report::new(suite.target().name(), level, outcomes);
    if let Some(path) = &args.json {
        report
            .write_json(path)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        println!("\n  Report: {}", style(path.display()).green());
    }

    Ok(!report.has_failures())
}

fn print_outcomes(outcomes: &[ScenarioOutcome]) {
    println!();
    println!(
        "  {:<34} {:>12} {:>12} {:>7} {:>14} {:>9}",
        style("Scenario").bold(),
        style("Mean").bold(),
        style("Stddev").bold(),
        style("Rounds").bold(),
        style(GATE_COUNT_2Q).bold(),
        style(DEPTH_2Q).bold()
    );
    println!("  {}", "─".repeat(93));

    for outcome in outcomes {
        match outcome {
            ScenarioOutcome::Passed(record) => {
                let metric = |key: &str| {
                    record
                        .metric_u64(key)
                        .map_or_else(|| "-".to_string(), |v| v.to_string())
                };
                println!(
                    "  {:<34} {:>12} {:>12} {:>7} {:>14} {:>9}",
                    record.name,
                    format_seconds(record.stats.mean),
                    format_seconds(record.stats.stddev),
                    record.stats.rounds,
                    metric(GATE_COUNT_2Q),
                    metric(DEPTH_2Q)
                );
            }
            ScenarioOutcome::Failed { name, error } => {
                println!("  {:<34} {}", style(name).red(), style(error).red());
            }
            ScenarioOutcome::Skipped { name, reason } => {
                println!("  {:<34} {}", style(name).yellow(), style(reason).yellow());
            }
        }
    }

    let failed = outcomes.iter().filter(|o| o.is_failure()).count();
    let passed = outcomes.iter().filter(|o| o.record().is_some()).count();
    let skipped = outcomes.len() - failed - passed;
    println!();
    println!(
        "  {} passed, {} failed, {} skipped",
        style(passed).green(),
        if failed > 0 {
            style(failed).red()
        } else {
            style(failed).dim()
        },
        style(skipped).yellow()
    );
}
