//! Mutable simulation state for a single scenario run

use crate::loan::LoanDetails;
use super::payment::monthly_payment;

/// State of the loan at a point in time during simulation
#[derive(Debug, Clone)]
pub struct SimulationState {
    /// Current month (1-indexed, 0 before the first month)
    pub month: u32,

    /// Months in the original term
    pub term_months: u32,

    /// Outstanding balance
    pub balance: f64,

    /// Annual rate in percent currently in effect
    pub rate: f64,

    /// Regular payment, recomputed on every rate change
    pub monthly_payment: f64,

    pub cumulative_interest: f64,
    pub cumulative_principal: f64,
    pub cumulative_paid: f64,

    pub window_interest: f64,
    pub window_principal: f64,

    /// Closing balance captured at the window end month
    pub balance_at_window_end: f64,
}

impl SimulationState {
    /// Initialize state at origination
    pub fn from_loan(loan: &LoanDetails) -> Self {
        let term_months = loan.term_months();
        Self {
            month: 0,
            term_months,
            balance: loan.principal,
            rate: loan.start_rate,
            monthly_payment: monthly_payment(loan.principal, loan.start_rate, term_months as i64),
            cumulative_interest: 0.0,
            cumulative_principal: 0.0,
            cumulative_paid: 0.0,
            window_interest: 0.0,
            window_principal: 0.0,
            balance_at_window_end: 0.0,
        }
    }

    /// Advance to next month
    pub fn advance_month(&mut self) {
        self.month += 1;
    }

    /// Payments left in the original term, counting the current month
    pub fn remaining_months(&self) -> i64 {
        self.term_months as i64 - (self.month as i64 - 1)
    }

    /// Switch to a new rate and re-amortize the current balance over the remaining term
    pub fn reset_rate(&mut self, new_rate: f64) {
        self.rate = new_rate;
        self.monthly_payment = monthly_payment(self.balance, new_rate, self.remaining_months());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_from_loan() {
        let state = SimulationState::from_loan(&LoanDetails::new(100_000.0, 6.0, 30));
        assert_eq!(state.month, 0);
        assert_eq!(state.term_months, 360);
        assert_abs_diff_eq!(state.monthly_payment, 599.55, epsilon = 0.005);
    }

    #[test]
    fn test_remaining_months_counts_current_month() {
        let mut state = SimulationState::from_loan(&LoanDetails::new(100_000.0, 6.0, 30));
        for _ in 0..13 {
            state.advance_month();
        }
        assert_eq!(state.remaining_months(), 348);
    }

    #[test]
    fn test_reset_rate_past_term_forces_payoff() {
        let mut state = SimulationState::from_loan(&LoanDetails::new(100_000.0, 6.0, 1));
        state.month = 13;
        state.balance = 250.0;
        state.reset_rate(5.0);
        assert_eq!(state.remaining_months(), 0);
        assert_eq!(state.monthly_payment, 250.0);
    }
}
