//! Mortgage Scenarios - month-by-month amortization under branching future events
//!
//! This library provides:
//! - Scenario expansion of rate changes declared as sets of alternative rates
//! - Amortization simulation with mid-term rate resets and lump-sum overpayments
//! - Window-bounded interest/principal aggregates for comparing scenarios
//! - Ranking and CSV export of scenario results

pub mod error;
pub mod loan;
pub mod projection;
pub mod report;
pub mod scenario;

// Re-export commonly used types
pub use error::{ConfigError, Error, ReportError, SimulationError};
pub use loan::{AnalysisWindow, LoanDetails, OverpaymentEvent, RateChangeEvent, RateSpec, ScenarioConfiguration};
pub use projection::{simulate, AmortizationEngine, MonthlyRecord, PayoffStatus, ScenarioResult, SimulationConfig};
pub use scenario::{expand, ResolvedScenario, ScenarioRunner};
