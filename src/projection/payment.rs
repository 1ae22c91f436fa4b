//! Level payment for a fully amortizing loan
//!
//! M = P * i(1 + i)^n / ((1 + i)^n - 1), with i the monthly rate and n the
//! number of remaining payments.

/// Convert an annual percentage rate to a monthly decimal rate (6.0 -> 0.005)
pub fn monthly_rate(annual_rate_pct: f64) -> f64 {
    annual_rate_pct / 100.0 / 12.0
}

/// Monthly payment that retires `principal` over `remaining_months` payments
///
/// # Arguments
/// * `principal` - Outstanding balance
/// * `annual_rate_pct` - Annual rate in percent
/// * `remaining_months` - Payments left; zero or negative forces full payoff
///
/// # Returns
/// * The level payment; the outstanding principal when no payments remain,
///   straight-line repayment when the rate is zero
pub fn monthly_payment(principal: f64, annual_rate_pct: f64, remaining_months: i64) -> f64 {
    if remaining_months <= 0 {
        return principal;
    }

    let n = remaining_months as f64;
    if annual_rate_pct == 0.0 {
        return principal / n;
    }

    let i = monthly_rate(annual_rate_pct);
    let growth = (1.0 + i).powf(n);
    principal * (i * growth) / (growth - 1.0)
}
