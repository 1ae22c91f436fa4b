//! Error types for configuration, simulation and reporting

use thiserror::Error;

/// Invalid or unreadable scenario configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid input: {field} ({reason})")]
    InvalidInput { field: String, reason: String },

    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ConfigError {
    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// A scenario that did not behave like a normal amortizing loan
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error(
        "Scenario '{scenario}' not paid off within {months} months (remaining balance {remaining_balance:.2})"
    )]
    SafetyBoundExceeded {
        scenario: String,
        months: u32,
        remaining_balance: f64,
    },
}

/// Failures while writing result exports
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Umbrella error for batch runs
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Simulation(#[from] SimulationError),

    #[error(transparent)]
    Report(#[from] ReportError),
}
