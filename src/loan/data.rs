//! Loan and scenario configuration structures matching the JSON config format

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Longest loan term accepted by `ScenarioConfiguration::validate`
pub const MAX_LOAN_YEARS: u32 = 100;

fn default_window_start() -> u32 {
    1
}

fn default_window_end() -> u32 {
    12
}

/// Terms of the loan at origination
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanDetails {
    /// Amount borrowed
    pub principal: f64,

    /// Annual interest rate in percent (6.0 = 6%)
    pub start_rate: f64,

    /// Original term in years
    pub years: u32,
}

impl LoanDetails {
    pub fn new(principal: f64, start_rate: f64, years: u32) -> Self {
        Self { principal, start_rate, years }
    }

    /// Number of monthly payments in the original term
    pub fn term_months(&self) -> u32 {
        self.years.saturating_mul(12)
    }
}

/// New rate for a rate change event: one value, or a set of alternative futures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RateSpec {
    Scalar(f64),
    Alternatives(Vec<f64>),
}

impl RateSpec {
    /// Number of scenarios this event fans out into
    pub fn branch_count(&self) -> usize {
        match self {
            RateSpec::Scalar(_) => 1,
            RateSpec::Alternatives(rates) => rates.len(),
        }
    }

    fn rates(&self) -> &[f64] {
        match self {
            RateSpec::Scalar(rate) => std::slice::from_ref(rate),
            RateSpec::Alternatives(rates) => rates,
        }
    }
}

impl From<f64> for RateSpec {
    fn from(rate: f64) -> Self {
        RateSpec::Scalar(rate)
    }
}

impl From<Vec<f64>> for RateSpec {
    fn from(rates: Vec<f64>) -> Self {
        RateSpec::Alternatives(rates)
    }
}

/// Rate change as written in the configuration (possibly branching)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateChangeEvent {
    /// Month (1-based) in which the new rate takes effect
    pub month: u32,

    pub new_rate: RateSpec,
}

impl RateChangeEvent {
    pub fn new(month: u32, new_rate: impl Into<RateSpec>) -> Self {
        Self { month, new_rate: new_rate.into() }
    }
}

/// Rate change with exactly one resolved rate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedRateChange {
    pub month: u32,
    pub new_rate: f64,
}

/// One-time extra principal payment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverpaymentEvent {
    pub month: u32,
    pub amount: f64,
}

impl OverpaymentEvent {
    pub fn new(month: u32, amount: f64) -> Self {
        Self { month, amount }
    }
}

/// Inclusive month range for the secondary interest/principal aggregate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisWindow {
    #[serde(default = "default_window_start")]
    pub window_start_month: u32,

    #[serde(default = "default_window_end")]
    pub window_end_month: u32,
}

impl AnalysisWindow {
    pub fn new(window_start_month: u32, window_end_month: u32) -> Self {
        Self { window_start_month, window_end_month }
    }

    pub fn contains(&self, month: u32) -> bool {
        (self.window_start_month..=self.window_end_month).contains(&month)
    }
}

impl Default for AnalysisWindow {
    fn default() -> Self {
        Self {
            window_start_month: default_window_start(),
            window_end_month: default_window_end(),
        }
    }
}

/// Raw scenario configuration, before branching rate changes are expanded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfiguration {
    #[serde(rename = "base_loan", alias = "loan_details")]
    pub loan: LoanDetails,

    #[serde(default)]
    pub rate_changes: Vec<RateChangeEvent>,

    #[serde(default)]
    pub overpayments: Vec<OverpaymentEvent>,

    #[serde(default, rename = "analysis_settings")]
    pub window: AnalysisWindow,
}

impl ScenarioConfiguration {
    /// Configuration with no events and the default 12-month window
    pub fn new(loan: LoanDetails) -> Self {
        Self {
            loan,
            rate_changes: Vec::new(),
            overpayments: Vec::new(),
            window: AnalysisWindow::default(),
        }
    }

    pub fn with_rate_change(mut self, event: RateChangeEvent) -> Self {
        self.rate_changes.push(event);
        self
    }

    pub fn with_overpayment(mut self, event: OverpaymentEvent) -> Self {
        self.overpayments.push(event);
        self
    }

    pub fn with_window(mut self, window: AnalysisWindow) -> Self {
        self.window = window;
        self
    }

    /// Number of scenarios `expand` will produce
    pub fn scenario_count(&self) -> usize {
        self.rate_changes
            .iter()
            .map(|event| event.new_rate.branch_count())
            .product()
    }

    /// Reject configurations the engine cannot simulate meaningfully
    pub fn validate(&self) -> Result<(), ConfigError> {
        let loan = &self.loan;
        if !loan.principal.is_finite() || loan.principal <= 0.0 {
            return Err(ConfigError::invalid("base_loan.principal", "must be positive"));
        }
        if !loan.start_rate.is_finite() || loan.start_rate < 0.0 {
            return Err(ConfigError::invalid("base_loan.start_rate", "must be a non-negative percentage"));
        }
        if loan.years == 0 {
            return Err(ConfigError::invalid("base_loan.years", "must be at least 1"));
        }
        if loan.years > MAX_LOAN_YEARS {
            return Err(ConfigError::invalid(
                "base_loan.years",
                format!("must not exceed {}", MAX_LOAN_YEARS),
            ));
        }

        for (idx, event) in self.rate_changes.iter().enumerate() {
            let field = format!("rate_changes[{}]", idx);
            if event.month == 0 {
                return Err(ConfigError::invalid(format!("{}.month", field), "months are 1-based"));
            }
            let rates = event.new_rate.rates();
            if rates.is_empty() {
                return Err(ConfigError::invalid(format!("{}.new_rate", field), "alternatives list is empty"));
            }
            if let Some(bad) = rates.iter().find(|r| !r.is_finite() || **r < 0.0) {
                return Err(ConfigError::invalid(
                    format!("{}.new_rate", field),
                    format!("{} is not a non-negative percentage", bad),
                ));
            }
        }

        for (idx, event) in self.overpayments.iter().enumerate() {
            let field = format!("overpayments[{}]", idx);
            if event.month == 0 {
                return Err(ConfigError::invalid(format!("{}.month", field), "months are 1-based"));
            }
            if !event.amount.is_finite() || event.amount < 0.0 {
                return Err(ConfigError::invalid(format!("{}.amount", field), "must be non-negative"));
            }
        }

        let window = &self.window;
        if window.window_start_month == 0 {
            return Err(ConfigError::invalid("analysis_settings.window_start_month", "months are 1-based"));
        }
        if window.window_end_month < window.window_start_month {
            return Err(ConfigError::invalid(
                "analysis_settings.window_end_month",
                "must not be before window_start_month",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> ScenarioConfiguration {
        ScenarioConfiguration::new(LoanDetails::new(100_000.0, 6.0, 30))
    }

    #[test]
    fn test_term_months() {
        assert_eq!(LoanDetails::new(1.0, 0.0, 25).term_months(), 300);
    }

    #[test]
    fn test_window_contains_is_inclusive() {
        let window = AnalysisWindow::new(13, 24);
        assert!(!window.contains(12));
        assert!(window.contains(13));
        assert!(window.contains(24));
        assert!(!window.contains(25));
    }

    #[test]
    fn test_scenario_count_is_product_of_branches() {
        let config = base_config()
            .with_rate_change(RateChangeEvent::new(13, vec![3.8, 4.2, 5.0]))
            .with_rate_change(RateChangeEvent::new(25, 4.0))
            .with_rate_change(RateChangeEvent::new(37, vec![3.0, 6.0]));
        assert_eq!(config.scenario_count(), 6);
        assert_eq!(base_config().scenario_count(), 1);
    }

    #[test]
    fn test_validate_accepts_base_config() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_loan() {
        let mut config = base_config();
        config.loan.principal = 0.0;
        assert!(config.validate().is_err());

        let mut config = base_config();
        config.loan.years = 0;
        assert!(config.validate().is_err());

        let mut config = base_config();
        config.loan.start_rate = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_oversized_term() {
        let mut config = base_config();
        config.loan.years = MAX_LOAN_YEARS;
        assert!(config.validate().is_ok());

        config.loan.years = 400_000_000;
        let err = config.validate().unwrap_err();
        assert!(matches!(
            &err,
            ConfigError::InvalidInput { field, .. } if field == "base_loan.years"
        ));
    }

    #[test]
    fn test_term_months_saturates() {
        assert_eq!(LoanDetails::new(1.0, 0.0, u32::MAX).term_months(), u32::MAX);
    }

    #[test]
    fn test_validate_rejects_empty_alternatives() {
        let config = base_config().with_rate_change(RateChangeEvent::new(13, Vec::<f64>::new()));
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("rate_changes[0].new_rate"));
    }

    #[test]
    fn test_validate_rejects_month_zero_and_inverted_window() {
        let config = base_config().with_overpayment(OverpaymentEvent::new(0, 100.0));
        assert!(config.validate().is_err());

        let config = base_config().with_window(AnalysisWindow::new(24, 12));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deserialize_scalar_and_list_rates() {
        let json = r#"{
            "base_loan": {"principal": 425000, "start_rate": 4.3, "years": 30},
            "rate_changes": [
                {"month": 13, "new_rate": 4.0},
                {"month": 25, "new_rate": [3.8, 4.5]}
            ]
        }"#;
        let config: ScenarioConfiguration = serde_json::from_str(json).unwrap();
        assert_eq!(config.rate_changes[0].new_rate, RateSpec::Scalar(4.0));
        assert_eq!(config.rate_changes[1].new_rate, RateSpec::Alternatives(vec![3.8, 4.5]));
        assert_eq!(config.window, AnalysisWindow::default());
        assert!(config.overpayments.is_empty());
    }

    #[test]
    fn test_deserialize_legacy_loan_details_key() {
        let json = r#"{
            "loan_details": {"principal": 1000, "start_rate": 0, "years": 1},
            "analysis_settings": {"window_end_month": 6}
        }"#;
        let config: ScenarioConfiguration = serde_json::from_str(json).unwrap();
        assert_eq!(config.loan.years, 1);
        assert_eq!(config.window, AnalysisWindow::new(1, 6));
    }
}
