//! Loan data structures and configuration loading

mod data;
pub mod loader;

pub use data::{
    AnalysisWindow, LoanDetails, OverpaymentEvent, RateChangeEvent, RateSpec, ResolvedRateChange,
    ScenarioConfiguration, MAX_LOAN_YEARS,
};
pub use loader::{load_config, load_config_from_reader, parse_config};
