//! Scenario expansion and batch simulation
//!
//! A configuration may declare a rate change as a list of alternative rates.
//! Each list multiplies the number of futures: `expand` turns the
//! configuration into every branch-free combination, and `ScenarioRunner`
//! simulates them in parallel while keeping the expansion order.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Error};
use crate::loan::{
    AnalysisWindow, LoanDetails, OverpaymentEvent, RateSpec, ResolvedRateChange, ScenarioConfiguration,
};
use crate::projection::{
    AmortizationEngine, LogObserver, NoopObserver, PayoffStatus, ScenarioResult, SimulationConfig,
};

/// Name of the root scenario; branches append ` -> {rate}% @ M{month}`
pub const BASE_SCENARIO_NAME: &str = "Scenario";

/// Fully determined scenario: every rate change carries exactly one rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedScenario {
    /// Path label built from the chosen alternatives
    pub name: String,

    pub loan: LoanDetails,

    pub rate_changes: Vec<ResolvedRateChange>,

    pub overpayments: Vec<OverpaymentEvent>,

    pub window: AnalysisWindow,
}

impl ResolvedScenario {
    /// Scenario with no events and the default window
    pub fn new(name: impl Into<String>, loan: LoanDetails) -> Self {
        Self {
            name: name.into(),
            loan,
            rate_changes: Vec::new(),
            overpayments: Vec::new(),
            window: AnalysisWindow::default(),
        }
    }

    pub fn with_rate_change(mut self, month: u32, new_rate: f64) -> Self {
        self.rate_changes.push(ResolvedRateChange { month, new_rate });
        self
    }

    pub fn with_overpayment(mut self, month: u32, amount: f64) -> Self {
        self.overpayments.push(OverpaymentEvent::new(month, amount));
        self
    }

    pub fn with_window(mut self, window: AnalysisWindow) -> Self {
        self.window = window;
        self
    }

    /// Copy of this scenario taking one alternative of a branching rate change
    fn branch(&self, month: u32, new_rate: f64) -> Self {
        let mut branch = self.clone().with_rate_change(month, new_rate);
        branch.name.push_str(&format!(" -> {}% @ M{}", new_rate, month));
        branch
    }
}

/// Expand a configuration into its branch-free scenarios
///
/// Rate changes are processed in configuration order. A scalar rate is
/// appended to every scenario built so far; a list of k alternatives replaces
/// each scenario with k copies, one per alternative. The result holds the
/// product of all list lengths (one scenario when nothing branches), ordered
/// with earlier events varying slowest. An empty alternatives list yields no
/// scenarios; `ScenarioConfiguration::validate` rejects it.
pub fn expand(config: &ScenarioConfiguration) -> Vec<ResolvedScenario> {
    let base = ResolvedScenario {
        name: BASE_SCENARIO_NAME.to_string(),
        loan: config.loan,
        rate_changes: Vec::with_capacity(config.rate_changes.len()),
        overpayments: config.overpayments.clone(),
        window: config.window,
    };

    config
        .rate_changes
        .iter()
        .fold(vec![base], |scenarios, event| match &event.new_rate {
            RateSpec::Scalar(rate) => scenarios
                .into_iter()
                .map(|scenario| scenario.with_rate_change(event.month, *rate))
                .collect(),
            RateSpec::Alternatives(rates) => scenarios
                .iter()
                .flat_map(|scenario| rates.iter().map(move |&rate| scenario.branch(event.month, rate)))
                .collect(),
        })
}

/// Batch runner: validate, expand and simulate every scenario of a configuration
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::with_schedule();
/// let results = runner.run(&config)?;
/// for result in &results {
///     println!("{}: {:.2}", result.name, result.lifetime_interest);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    engine: AmortizationEngine,

    /// Narrate each run through `log`
    verbose: bool,
}

impl ScenarioRunner {
    /// Runner with default settings (no schedules)
    pub fn new() -> Self {
        Self::default()
    }

    /// Runner that records the full monthly ledger of every scenario
    pub fn with_schedule() -> Self {
        Self::with_config(SimulationConfig::with_schedule(true))
    }

    pub fn with_config(config: SimulationConfig) -> Self {
        Self {
            engine: AmortizationEngine::new(config),
            verbose: false,
        }
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Validate and expand `config`, then simulate every scenario
    ///
    /// Scenarios that hit the safety bound are kept and flagged through their
    /// `status`; use [`ScenarioRunner::run_checked`] to treat them as errors.
    pub fn run(&self, config: &ScenarioConfiguration) -> Result<Vec<ScenarioResult>, ConfigError> {
        config.validate()?;
        let scenarios = expand(config);
        log::info!("Expanded configuration into {} scenario(s)", scenarios.len());
        Ok(self.run_scenarios(scenarios))
    }

    /// Like `run`, but fails on the first scenario that was not paid off
    pub fn run_checked(&self, config: &ScenarioConfiguration) -> Result<Vec<ScenarioResult>, Error> {
        let results = self.run(config)?;
        results
            .into_iter()
            .map(|result| result.into_checked().map_err(Error::from))
            .collect()
    }

    /// Simulate resolved scenarios in parallel; results keep the input order
    pub fn run_scenarios(&self, scenarios: Vec<ResolvedScenario>) -> Vec<ScenarioResult> {
        scenarios
            .into_par_iter()
            .map(|scenario| self.run_one(scenario))
            .collect()
    }

    /// Simulate a single scenario
    pub fn run_one(&self, scenario: ResolvedScenario) -> ScenarioResult {
        let result = if self.verbose {
            self.engine.simulate_observed(scenario, &mut LogObserver::new())
        } else {
            self.engine.simulate_observed(scenario, &mut NoopObserver)
        };

        if let PayoffStatus::SafetyBoundExceeded { months, remaining_balance } = result.status {
            log::warn!(
                "Scenario '{}' not paid off within {} months ({:.2} outstanding)",
                result.name, months, remaining_balance
            );
        }
        result
    }
}
