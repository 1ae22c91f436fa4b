//! Progress hooks for a simulation run
//!
//! The engine reports notable events (rate resets, overpayments, payoff) to a
//! caller-supplied observer instead of printing them.

use crate::loan::{AnalysisWindow, LoanDetails};

/// Receives events as a scenario is simulated. All methods default to no-ops.
pub trait SimulationObserver {
    fn on_start(&mut self, _scenario: &str, _loan: &LoanDetails, _initial_payment: f64, _window: &AnalysisWindow) {}

    fn on_rate_change(&mut self, _month: u32, _old_rate: f64, _new_rate: f64, _new_payment: f64) {}

    fn on_overpayment(&mut self, _month: u32, _amount: f64) {}

    fn on_payoff(&mut self, _month: u32) {}

    fn on_safety_bound(&mut self, _months: u32, _remaining_balance: f64) {}
}

/// Observer that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl SimulationObserver for NoopObserver {}

/// Narrates a run through the `log` facade
#[derive(Debug, Clone, Default)]
pub struct LogObserver {
    scenario: String,
}

impl LogObserver {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SimulationObserver for LogObserver {
    fn on_start(&mut self, scenario: &str, loan: &LoanDetails, initial_payment: f64, window: &AnalysisWindow) {
        self.scenario = scenario.to_string();
        log::info!(
            "[{}] Start rate {}%, payment {:.2}, window M{}-{}",
            self.scenario,
            loan.start_rate,
            initial_payment,
            window.window_start_month,
            window.window_end_month
        );
    }

    fn on_rate_change(&mut self, month: u32, old_rate: f64, new_rate: f64, new_payment: f64) {
        log::info!(
            "[{}] Month {}: rate change {}% -> {}%, new payment {:.2}",
            self.scenario, month, old_rate, new_rate, new_payment
        );
    }

    fn on_overpayment(&mut self, month: u32, amount: f64) {
        log::info!("[{}] Month {}: overpayment of {:.2}", self.scenario, month, amount);
    }

    fn on_payoff(&mut self, month: u32) {
        log::debug!("[{}] Paid off in month {}", self.scenario, month);
    }

    fn on_safety_bound(&mut self, months: u32, remaining_balance: f64) {
        log::warn!(
            "[{}] Not paid off after {} months, {:.2} outstanding",
            self.scenario, months, remaining_balance
        );
    }
}

/// Event captured by [`EventLog`]
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationEvent {
    Started { scenario: String, initial_payment: f64 },
    RateChanged { month: u32, old_rate: f64, new_rate: f64, new_payment: f64 },
    Overpaid { month: u32, amount: f64 },
    PaidOff { month: u32 },
    SafetyBoundExceeded { months: u32, remaining_balance: f64 },
}

/// Observer that records every event in order
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    pub events: Vec<SimulationEvent>,
}

impl SimulationObserver for EventLog {
    fn on_start(&mut self, scenario: &str, _loan: &LoanDetails, initial_payment: f64, _window: &AnalysisWindow) {
        self.events.push(SimulationEvent::Started {
            scenario: scenario.to_string(),
            initial_payment,
        });
    }

    fn on_rate_change(&mut self, month: u32, old_rate: f64, new_rate: f64, new_payment: f64) {
        self.events.push(SimulationEvent::RateChanged { month, old_rate, new_rate, new_payment });
    }

    fn on_overpayment(&mut self, month: u32, amount: f64) {
        self.events.push(SimulationEvent::Overpaid { month, amount });
    }

    fn on_payoff(&mut self, month: u32) {
        self.events.push(SimulationEvent::PaidOff { month });
    }

    fn on_safety_bound(&mut self, months: u32, remaining_balance: f64) {
        self.events.push(SimulationEvent::SafetyBoundExceeded { months, remaining_balance });
    }
}
