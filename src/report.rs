//! Ranking, payoff summaries and CSV exports of scenario results
//!
//! Writes `mortgage_schedule.csv` (full ledger of the cheapest scenario) and
//! `scenario_comparison.csv` (every scenario's ledger over the months where
//! their rate paths differ).

use std::collections::BTreeMap;
use std::fmt;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::ReportError;
use crate::projection::{MonthlyRecord, ScenarioResult};

pub const SCHEDULE_FILE_NAME: &str = "mortgage_schedule.csv";
pub const COMPARISON_FILE_NAME: &str = "scenario_comparison.csv";

/// Column headers of an exported ledger
pub const SCHEDULE_HEADERS: [&str; 11] = [
    "Month",
    "Rate (%)",
    "Start Balance",
    "Monthly Payment",
    "Interest Paid",
    "Principal Paid",
    "Overpayment",
    "End Balance",
    "Cumulative Interest",
    "Cumulative Principal",
    "Total Paid To Date",
];

/// Metric used to order scenarios, cheapest first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankBy {
    LifetimeInterest,
    WindowInterest,
}

impl RankBy {
    fn key(&self, result: &ScenarioResult) -> f64 {
        match self {
            RankBy::LifetimeInterest => result.lifetime_interest,
            RankBy::WindowInterest => result.window_interest,
        }
    }
}

/// Results ordered cheapest first; ties keep expansion order
pub fn rank(results: &[ScenarioResult], by: RankBy) -> Vec<&ScenarioResult> {
    let mut ranked: Vec<&ScenarioResult> = results.iter().collect();
    ranked.sort_by(|a, b| by.key(a).total_cmp(&by.key(b)));
    ranked
}

/// Cheapest scenario, the earliest one on ties
pub fn cheapest(results: &[ScenarioResult], by: RankBy) -> Option<&ScenarioResult> {
    results.iter().min_by(|a, b| by.key(a).total_cmp(&by.key(b)))
}

/// Payoff time and time saved against the original term
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PayoffSummary {
    pub payoff_month: u32,
    pub months_saved: u32,
}

impl PayoffSummary {
    /// `None` if the scenario was never paid off
    pub fn from_result(result: &ScenarioResult) -> Option<Self> {
        result.payoff_month().map(|payoff_month| Self {
            payoff_month,
            months_saved: result.months_saved(),
        })
    }

    /// Whole years and remaining months until payoff
    pub fn payoff_time(&self) -> (u32, u32) {
        (self.payoff_month / 12, self.payoff_month % 12)
    }

    pub fn time_saved(&self) -> (u32, u32) {
        (self.months_saved / 12, self.months_saved % 12)
    }
}

impl fmt::Display for PayoffSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (years, months) = self.payoff_time();
        write!(f, "paid off in {} years, {} months", years, months)?;
        if self.months_saved > 0 {
            let (saved_years, saved_months) = self.time_saved();
            write!(f, " ({} years, {} months early)", saved_years, saved_months)?;
        }
        Ok(())
    }
}

/// First and last month in which the scenarios' effective rates disagree
///
/// Only scenarios carrying a schedule take part. A month present in one
/// schedule and missing from another (earlier payoff) is not a difference.
pub fn differing_period(results: &[ScenarioResult]) -> Option<(u32, u32)> {
    let mut rate_range: BTreeMap<u32, (f64, f64)> = BTreeMap::new();

    for row in results.iter().filter_map(|r| r.schedule.as_ref()).flatten() {
        rate_range
            .entry(row.month)
            .and_modify(|(low, high)| {
                *low = low.min(row.rate);
                *high = high.max(row.rate);
            })
            .or_insert((row.rate, row.rate));
    }

    let mut differing = rate_range
        .iter()
        .filter(|(_, (low, high))| low != high)
        .map(|(month, _)| *month);
    let first = differing.next()?;
    let last = differing.last().unwrap_or(first);
    Some((first, last))
}

fn record_fields(row: &MonthlyRecord) -> [String; 11] {
    [
        row.month.to_string(),
        row.rate.to_string(),
        format!("{:.2}", row.start_balance),
        format!("{:.2}", row.payment),
        format!("{:.2}", row.interest),
        format!("{:.2}", row.principal),
        format!("{:.2}", row.overpayment),
        format!("{:.2}", row.end_balance),
        format!("{:.2}", row.cumulative_interest),
        format!("{:.2}", row.cumulative_principal),
        format!("{:.2}", row.cumulative_paid),
    ]
}

/// Write one scenario's ledger as CSV
pub fn write_schedule_csv<W: Write>(writer: W, rows: &[MonthlyRecord]) -> Result<(), ReportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(SCHEDULE_HEADERS)?;
    for row in rows {
        wtr.write_record(record_fields(row))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write every scenario's ledger over `period` (inclusive) as one long CSV
pub fn write_comparison_csv<W: Write>(
    writer: W,
    results: &[ScenarioResult],
    period: (u32, u32),
) -> Result<(), ReportError> {
    let (first, last) = period;
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = vec!["Scenario"];
    header.extend(SCHEDULE_HEADERS);
    wtr.write_record(&header)?;

    for result in results {
        let Some(rows) = result.schedule.as_ref() else {
            continue;
        };
        for row in rows.iter().filter(|row| (first..=last).contains(&row.month)) {
            let mut record = vec![result.name.clone()];
            record.extend(record_fields(row));
            wtr.write_record(&record)?;
        }
    }
    wtr.flush()?;
    Ok(())
}

/// Files written by [`export_reports`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportSummary {
    pub schedule_path: Option<PathBuf>,
    pub comparison_path: Option<PathBuf>,
    pub differing_period: Option<(u32, u32)>,
}

/// Export the cheapest scenario's schedule and the scenario comparison into `output_dir`
pub fn export_reports(results: &[ScenarioResult], output_dir: &Path) -> Result<ExportSummary, ReportError> {
    let mut summary = ExportSummary::default();
    if results.is_empty() {
        log::info!("No results to export");
        return Ok(summary);
    }

    fs::create_dir_all(output_dir)?;

    if let Some(rows) = cheapest(results, RankBy::LifetimeInterest).and_then(|r| r.schedule.as_ref()) {
        let path = output_dir.join(SCHEDULE_FILE_NAME);
        write_schedule_csv(File::create(&path)?, rows)?;
        log::info!("Schedule saved to {}", path.display());
        summary.schedule_path = Some(path);
    }

    match differing_period(results) {
        Some(period) => {
            let path = output_dir.join(COMPARISON_FILE_NAME);
            write_comparison_csv(File::create(&path)?, results, period)?;
            log::info!(
                "Differing period: month {} to {}; comparison saved to {}",
                period.0,
                period.1,
                path.display()
            );
            summary.comparison_path = Some(path);
            summary.differing_period = Some(period);
        }
        None => log::info!("No rate differences between scenarios, skipping comparison"),
    }

    Ok(summary)
}
