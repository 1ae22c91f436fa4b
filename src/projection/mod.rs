//! Amortization engine for single-scenario simulations

mod state;
mod engine;
mod schedule;
pub mod observer;
pub mod payment;

pub use state::SimulationState;
pub use engine::{
    simulate, simulate_observed, AmortizationEngine, SimulationConfig, PAYOFF_EPSILON, SAFETY_TERM_MULTIPLE,
};
pub use schedule::{MonthlyRecord, PayoffStatus, ScenarioResult};
pub use observer::{EventLog, LogObserver, NoopObserver, SimulationEvent, SimulationObserver};
pub use payment::monthly_payment;
