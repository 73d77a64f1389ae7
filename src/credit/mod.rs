//! Loans, their rate segments, and scenario-wide obligation

mod aggregate;
mod data;
mod schedule;

pub use aggregate::{combine_rates, ConsolidatedObligation, ObligationInterval};
pub use data::{Amortization, BankLoan, CreditScenarioValues, GracePeriod, LoanParameters};
pub use schedule::{build_credit_rate_schedule, RateSegment, SegmentTag};
