//! Mortgage Scenarios CLI
//!
//! Loads a JSON configuration, simulates every scenario it expands into and
//! prints a comparison, then exports the cheapest schedule and the scenario
//! comparison as CSV.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use mortgage_scenarios::loan::{load_config, loader::DEFAULT_CONFIG_PATH};
use mortgage_scenarios::report::{self, PayoffSummary, RankBy};
use mortgage_scenarios::{ScenarioResult, ScenarioRunner};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RankMetric {
    /// Total interest over the life of the loan
    Lifetime,
    /// Interest paid inside the analysis window
    Window,
}

impl From<RankMetric> for RankBy {
    fn from(metric: RankMetric) -> Self {
        match metric {
            RankMetric::Lifetime => RankBy::LifetimeInterest,
            RankMetric::Window => RankBy::WindowInterest,
        }
    }
}

/// Compare mortgage futures under uncertain rate changes and overpayments
#[derive(Parser)]
#[command(name = "mortgage_scenarios", version, about)]
struct Cli {
    /// Scenario configuration (JSON)
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Directory for CSV exports
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,

    /// Metric used to pick the cheapest scenario
    #[arg(long, value_enum, default_value_t = RankMetric::Lifetime)]
    rank_by: RankMetric,

    /// Skip writing CSV files
    #[arg(long)]
    no_export: bool,

    /// Print results as JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Narrate rate changes and overpayments for every scenario
    #[arg(short, long)]
    verbose: bool,
}

fn print_table(results: &[ScenarioResult], rank_by: RankBy) {
    let name_width = results.iter().map(|r| r.name.len()).max().unwrap_or(8).max(8);

    println!(
        "{:<w$} {:>14} {:>14} {:>16} {:>16}  {}",
        "Scenario", "Window Int", "Window Princ", "Bal @ Win End", "Lifetime Int", "Payoff",
        w = name_width
    );
    println!("{}", "-".repeat(name_width + 64 + 30));

    for result in results {
        let payoff = match PayoffSummary::from_result(result) {
            Some(summary) => summary.to_string(),
            None => format!("NOT PAID OFF after {} months", result.months_simulated),
        };
        println!(
            "{:<w$} {:>14.2} {:>14.2} {:>16.2} {:>16.2}  {}",
            result.name,
            result.window_interest,
            result.window_principal,
            result.balance_at_window_end,
            result.lifetime_interest,
            payoff,
            w = name_width
        );
    }

    if let Some(best) = report::cheapest(results, rank_by) {
        println!();
        println!("Cheapest ({:?}): {}", rank_by, best.name);
        println!("  Initial payment:   ${:.2}", best.initial_payment);
        println!("  Lifetime interest: ${:.2}", best.lifetime_interest);
        println!("  Total paid:        ${:.2}", best.total_paid);
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    let config = load_config(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;

    let runner = ScenarioRunner::with_schedule().verbose(cli.verbose);
    let results = runner.run(&config)?;
    let rank_by = RankBy::from(cli.rank_by);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        println!(
            "Loan: ${:.2} at {}% over {} years, window M{}-{}, {} scenario(s)\n",
            config.loan.principal,
            config.loan.start_rate,
            config.loan.years,
            config.window.window_start_month,
            config.window.window_end_month,
            results.len()
        );
        print_table(&results, rank_by);
    }

    if !cli.no_export {
        let summary = report::export_reports(&results, &cli.output_dir)
            .with_context(|| format!("Failed to export reports to {}", cli.output_dir.display()))?;
        for path in summary.schedule_path.iter().chain(summary.comparison_path.iter()) {
            eprintln!("Saved {}", path.display());
        }
    }

    let incomplete = results.iter().filter(|r| !r.is_complete()).count();
    if incomplete > 0 {
        anyhow::bail!("{} scenario(s) were not paid off within the safety bound", incomplete);
    }

    Ok(())
}
