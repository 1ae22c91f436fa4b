//! Simulation output structures: monthly ledger rows and per-scenario results

use serde::{Deserialize, Serialize};

use crate::error::SimulationError;

/// Round to cents for reporting
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// A single month of the amortization ledger (amounts rounded to cents)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRecord {
    pub month: u32,

    /// Annual rate in percent in effect this month
    pub rate: f64,

    pub start_balance: f64,

    /// Cash paid this month: regular payment plus any overpayment
    pub payment: f64,

    pub interest: f64,

    /// Principal repaid this month, overpayment included
    pub principal: f64,

    pub overpayment: f64,
    pub end_balance: f64,

    pub cumulative_interest: f64,
    pub cumulative_principal: f64,
    pub cumulative_paid: f64,
}

/// How a simulation run ended
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PayoffStatus {
    /// Balance reached zero in `month`
    PaidOff { month: u32 },

    /// Balance still outstanding when the month limit was hit
    SafetyBoundExceeded { months: u32, remaining_balance: f64 },
}

/// Summary metrics for one resolved scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub name: String,

    pub window_interest: f64,
    pub window_principal: f64,

    /// Closing balance at the window end month, zero if paid off by then
    pub balance_at_window_end: f64,

    pub lifetime_interest: f64,
    pub lifetime_principal: f64,
    pub total_paid: f64,

    /// Regular payment at origination
    pub initial_payment: f64,

    /// Months in the original term
    pub planned_months: u32,

    pub months_simulated: u32,

    pub status: PayoffStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Vec<MonthlyRecord>>,
}

impl ScenarioResult {
    /// True if the loan was paid off
    pub fn is_complete(&self) -> bool {
        matches!(self.status, PayoffStatus::PaidOff { .. })
    }

    pub fn payoff_month(&self) -> Option<u32> {
        match self.status {
            PayoffStatus::PaidOff { month } => Some(month),
            PayoffStatus::SafetyBoundExceeded { .. } => None,
        }
    }

    /// Months by which payoff beat the original term (zero if on time, late or unpaid)
    pub fn months_saved(&self) -> u32 {
        self.payoff_month()
            .map(|month| self.planned_months.saturating_sub(month))
            .unwrap_or(0)
    }

    /// Turn an incomplete run into an error
    pub fn into_checked(self) -> Result<Self, SimulationError> {
        match self.status {
            PayoffStatus::PaidOff { .. } => Ok(self),
            PayoffStatus::SafetyBoundExceeded { months, remaining_balance } => {
                Err(SimulationError::SafetyBoundExceeded {
                    scenario: self.name,
                    months,
                    remaining_balance,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result_with(status: PayoffStatus) -> ScenarioResult {
        ScenarioResult {
            name: "Scenario".to_string(),
            window_interest: 0.0,
            window_principal: 0.0,
            balance_at_window_end: 0.0,
            lifetime_interest: 0.0,
            lifetime_principal: 0.0,
            total_paid: 0.0,
            initial_payment: 0.0,
            planned_months: 360,
            months_simulated: 0,
            status,
            schedule: None,
        }
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(599.5505), 599.55);
        assert_eq!(round2(99.546), 99.55);
        assert_eq!(round2(-0.004), -0.0);
    }

    #[test]
    fn test_months_saved() {
        assert_eq!(result_with(PayoffStatus::PaidOff { month: 300 }).months_saved(), 60);
        assert_eq!(result_with(PayoffStatus::PaidOff { month: 360 }).months_saved(), 0);
        let unpaid = PayoffStatus::SafetyBoundExceeded { months: 720, remaining_balance: 10.0 };
        assert_eq!(result_with(unpaid).months_saved(), 0);
    }

    #[test]
    fn test_into_checked() {
        assert!(result_with(PayoffStatus::PaidOff { month: 360 }).into_checked().is_ok());

        let unpaid = PayoffStatus::SafetyBoundExceeded { months: 720, remaining_balance: 10.0 };
        let err = result_with(unpaid).into_checked().unwrap_err();
        assert!(err.to_string().contains("720 months"));
    }

    #[test]
    fn test_schedule_omitted_from_json_when_absent() {
        let json = serde_json::to_value(result_with(PayoffStatus::PaidOff { month: 12 })).unwrap();
        assert!(json.get("schedule").is_none());
        assert_eq!(json["status"]["status"], "paid_off");
        assert_eq!(json["status"]["month"], 12);
    }
}
