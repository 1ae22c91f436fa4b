//! Core amortization engine for month-by-month loan simulation

use std::collections::BTreeMap;

use crate::loan::{AnalysisWindow, MAX_LOAN_YEARS};
use crate::scenario::ResolvedScenario;
use super::observer::{NoopObserver, SimulationObserver};
use super::payment::monthly_rate;
use super::schedule::{round2, MonthlyRecord, PayoffStatus, ScenarioResult};
use super::state::SimulationState;

/// Balance at or below which the loan counts as repaid
pub const PAYOFF_EPSILON: f64 = 0.01;

/// Runs longer than this multiple of the original term are reported as anomalies
pub const SAFETY_TERM_MULTIPLE: u32 = 2;

/// Configuration for a simulation run
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Whether to record the full monthly ledger
    pub include_schedule: bool,

    /// Payoff threshold
    pub payoff_epsilon: f64,

    /// Override the month limit (default: twice the original term)
    pub max_months: Option<u32>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            include_schedule: false,
            payoff_epsilon: PAYOFF_EPSILON,
            max_months: None,
        }
    }
}

impl SimulationConfig {
    pub fn with_schedule(include_schedule: bool) -> Self {
        Self {
            include_schedule,
            ..Self::default()
        }
    }
}

/// Amounts moved in one month, before rounding
#[derive(Debug, Clone, Copy)]
struct MonthFlows {
    start_balance: f64,
    payment: f64,
    interest: f64,
    principal: f64,
    overpayment: f64,
}

/// Main amortization engine
#[derive(Debug, Clone, Default)]
pub struct AmortizationEngine {
    config: SimulationConfig,
}

impl AmortizationEngine {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    /// Run one scenario to payoff
    pub fn simulate(&self, scenario: ResolvedScenario) -> ScenarioResult {
        self.simulate_observed(scenario, &mut NoopObserver)
    }

    /// Run one scenario to payoff, reporting events to `observer`
    pub fn simulate_observed(
        &self,
        scenario: ResolvedScenario,
        observer: &mut dyn SimulationObserver,
    ) -> ScenarioResult {
        let ResolvedScenario { name, loan, rate_changes, overpayments, window } = scenario;

        // Later entries for the same month win
        let rate_changes: BTreeMap<u32, f64> =
            rate_changes.iter().map(|event| (event.month, event.new_rate)).collect();
        let overpayments: BTreeMap<u32, f64> =
            overpayments.iter().map(|event| (event.month, event.amount)).collect();

        let mut state = SimulationState::from_loan(&loan);
        let initial_payment = state.monthly_payment;
        let max_months = self
            .config
            .max_months
            .unwrap_or_else(|| state.term_months.saturating_mul(SAFETY_TERM_MULTIPLE));
        let mut schedule = if self.config.include_schedule {
            Some(Vec::with_capacity(state.term_months.min(MAX_LOAN_YEARS * 12) as usize))
        } else {
            None
        };

        observer.on_start(&name, &loan, initial_payment, &window);

        let status = loop {
            if state.month >= max_months {
                observer.on_safety_bound(state.month, state.balance);
                break PayoffStatus::SafetyBoundExceeded {
                    months: state.month,
                    remaining_balance: state.balance,
                };
            }

            state.advance_month();
            let flows = self.simulate_month(&mut state, &rate_changes, &overpayments, &window, observer);

            if let Some(rows) = schedule.as_mut() {
                rows.push(Self::record(&state, &flows));
            }

            if state.balance <= self.config.payoff_epsilon {
                observer.on_payoff(state.month);
                break PayoffStatus::PaidOff { month: state.month };
            }
        };

        match status {
            // Payoff dominates the window-end snapshot
            PayoffStatus::PaidOff { month } if month <= window.window_end_month => {
                state.balance_at_window_end = 0.0;
            }
            PayoffStatus::SafetyBoundExceeded { months, remaining_balance }
                if months < window.window_end_month =>
            {
                state.balance_at_window_end = remaining_balance;
            }
            _ => {}
        }

        ScenarioResult {
            name,
            window_interest: state.window_interest,
            window_principal: state.window_principal,
            balance_at_window_end: state.balance_at_window_end,
            lifetime_interest: state.cumulative_interest,
            lifetime_principal: state.cumulative_principal,
            total_paid: state.cumulative_paid,
            initial_payment,
            planned_months: state.term_months,
            months_simulated: state.month,
            status,
            schedule,
        }
    }

    /// Apply one month: rate reset, interest, overpayment, regular payment, window totals
    fn simulate_month(
        &self,
        state: &mut SimulationState,
        rate_changes: &BTreeMap<u32, f64>,
        overpayments: &BTreeMap<u32, f64>,
        window: &AnalysisWindow,
        observer: &mut dyn SimulationObserver,
    ) -> MonthFlows {
        let month = state.month;
        let start_balance = state.balance;

        if let Some(&new_rate) = rate_changes.get(&month) {
            let old_rate = state.rate;
            state.reset_rate(new_rate);
            observer.on_rate_change(month, old_rate, new_rate, state.monthly_payment);
        }

        // Interest accrues on the opening balance, before any payment
        let interest = state.balance * monthly_rate(state.rate);

        let mut overpayment = 0.0;
        if let Some(&amount) = overpayments.get(&month) {
            overpayment = amount.min(state.balance);
            state.balance -= overpayment;
            observer.on_overpayment(month, overpayment);
        }

        // If the overpayment cleared the loan only this month's interest is due
        let mut principal = 0.0;
        if state.balance > 0.0 {
            principal = (state.monthly_payment - interest).min(state.balance);
            state.balance -= principal;
        }
        let payment = interest + principal + overpayment;

        state.cumulative_interest += interest;
        state.cumulative_principal += principal + overpayment;
        state.cumulative_paid += payment;

        if window.contains(month) {
            state.window_interest += interest;
            state.window_principal += principal + overpayment;
            if month == window.window_end_month {
                state.balance_at_window_end = state.balance;
            }
        }

        MonthFlows {
            start_balance,
            payment,
            interest,
            principal: principal + overpayment,
            overpayment,
        }
    }

    /// Ledger row for the month just simulated
    fn record(state: &SimulationState, flows: &MonthFlows) -> MonthlyRecord {
        MonthlyRecord {
            month: state.month,
            rate: state.rate,
            start_balance: round2(flows.start_balance),
            payment: round2(flows.payment),
            interest: round2(flows.interest),
            principal: round2(flows.principal),
            overpayment: round2(flows.overpayment),
            end_balance: round2(state.balance.max(0.0)),
            cumulative_interest: round2(state.cumulative_interest),
            cumulative_principal: round2(state.cumulative_principal),
            cumulative_paid: round2(state.cumulative_paid),
        }
    }
}

/// Simulate a resolved scenario with default settings
pub fn simulate(scenario: ResolvedScenario, include_schedule: bool) -> ScenarioResult {
    AmortizationEngine::new(SimulationConfig::with_schedule(include_schedule)).simulate(scenario)
}

/// Simulate a resolved scenario with default settings, reporting events to `observer`
pub fn simulate_observed(
    scenario: ResolvedScenario,
    include_schedule: bool,
    observer: &mut dyn SimulationObserver,
) -> ScenarioResult {
    AmortizationEngine::new(SimulationConfig::with_schedule(include_schedule))
        .simulate_observed(scenario, observer)
}
