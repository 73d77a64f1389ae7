//! Closed-form loan math for a single loan
//!
//! Payment sizing uses a simple `annual / 12` monthly rate, while balance
//! projection and payoff solving use the geometric monthly equivalent
//! `(1 + annual)^(1/12) - 1`. Both conventions are load-bearing.

mod engine;
mod snapshot;

pub use engine::{
    compute_amortization_rate_for_fixed_term, compute_full_payoff_time, compute_monthly_payment,
    compute_remaining_balance, monthly_effective_rate, PayoffTime, RATE_EPSILON,
};
pub use snapshot::{elapsed_years_between, loan_snapshot, LoanSnapshot};
