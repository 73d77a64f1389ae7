//! Payment sizing, balance projection and payoff solving for one loan

use crate::error::{PlanError, PlanResult};
use serde::{Deserialize, Serialize};

/// Rates below this magnitude fall back to linear arithmetic
pub const RATE_EPSILON: f64 = 1e-12;

/// Slack absorbed before rounding solved month counts up
const MONTH_ROUNDING_SLACK: f64 = 1e-9;

/// Time needed to bring a loan balance to zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoffTime {
    /// False when the payment never covers the monthly interest
    pub can_be_paid_off: bool,

    /// Whole years until payoff
    pub years: u32,

    /// Remaining months after `years`
    pub months: u32,

    /// Payoff horizon rounded up to the next whole year
    pub years_rounded_up: u32,

    /// Total months until payoff, grace periods included
    pub total_months: u32,
}

impl PayoffTime {
    /// Result for a loan that is never repaid
    pub fn not_payable() -> Self {
        Self {
            can_be_paid_off: false,
            years: 0,
            months: 0,
            years_rounded_up: 0,
            total_months: 0,
        }
    }

    pub fn from_total_months(total_months: u32) -> Self {
        Self {
            can_be_paid_off: true,
            years: total_months / 12,
            months: total_months % 12,
            years_rounded_up: (total_months + 11) / 12,
            total_months,
        }
    }

    /// Payoff horizon in fractional years
    pub fn fractional_years(&self) -> f64 {
        self.total_months as f64 / 12.0
    }
}

/// Geometric monthly equivalent of an effective annual rate given in percent
pub fn monthly_effective_rate(effective_annual_rate_percent: f64) -> f64 {
    (1.0 + effective_annual_rate_percent / 100.0).powf(1.0 / 12.0) - 1.0
}

/// Number of whole months in a span of years
fn whole_months(years: f64) -> i32 {
    (12.0 * years).round() as i32
}

/// Calculate the level monthly payment of a loan
///
/// During a payment-free period the unpaid interest capitalizes at the full
/// effective annual rate, so the payment is sized on the grown principal.
/// Sizing uses the simple monthly rate `annual / 12`, not the geometric one.
///
/// # Arguments
/// * `principal` - Original loan amount
/// * `effective_annual_rate_percent` - Effective annual interest rate (e.g., 3.7 for 3.7%)
/// * `amortization_rate_percent` - Share of principal repaid per year (e.g., 2.0 for 2%)
/// * `deferred_payment_years` - Length of the payment-free period
pub fn compute_monthly_payment(
    principal: f64,
    effective_annual_rate_percent: f64,
    amortization_rate_percent: f64,
    deferred_payment_years: f64,
) -> f64 {
    let adjusted_principal = if deferred_payment_years > 0.0 {
        principal * (1.0 + effective_annual_rate_percent / 100.0).powf(deferred_payment_years)
    } else {
        principal
    };

    adjusted_principal
        * (effective_annual_rate_percent / 100.0 / 12.0 + amortization_rate_percent / 100.0 / 12.0)
}

/// Principal after `deferred_payment_years` of capitalizing interest at rate `r`
fn capitalized_principal(principal: f64, r: f64, deferred_payment_years: f64) -> f64 {
    principal * (1.0 + r).powi(whole_months(deferred_payment_years))
}

/// Annuity balance after `months` payments, before flooring
fn annuity_balance(balance: f64, monthly_payment: f64, r: f64, months: i32) -> f64 {
    if r.abs() < RATE_EPSILON {
        return balance - monthly_payment * months as f64;
    }

    let growth = (1.0 + r).powi(months);
    balance * growth - monthly_payment * (growth - 1.0) / r
}

/// Calculate the outstanding balance after `elapsed_years`
///
/// Three phases are walked in order:
/// 1. Payment-free: the balance compounds monthly with no payments
/// 2. Interest-only: the balance stays at the capitalized principal
/// 3. Amortizing: standard annuity projection, floored at zero
pub fn compute_remaining_balance(
    principal: f64,
    monthly_payment: f64,
    effective_annual_rate_percent: f64,
    elapsed_years: f64,
    deferred_payment_years: f64,
    interest_only_years: f64,
) -> f64 {
    let r = monthly_effective_rate(effective_annual_rate_percent);
    let elapsed_years = elapsed_years.max(0.0);

    if elapsed_years <= deferred_payment_years {
        return principal * (1.0 + r).powi(whole_months(elapsed_years));
    }

    let capitalized = capitalized_principal(principal, r, deferred_payment_years);

    if elapsed_years <= deferred_payment_years + interest_only_years {
        return capitalized;
    }

    let months = whole_months(elapsed_years - deferred_payment_years - interest_only_years);
    annuity_balance(capitalized, monthly_payment, r, months).max(0.0)
}

/// Solve the amortization rate that repays a loan within a fixed term
///
/// The amortizing window is `term_years` minus both grace periods. The
/// returned rate, fed into [`compute_monthly_payment`], yields the annuity
/// payment that clears the balance exactly at the end of the term under the
/// geometric balance projection.
///
/// # Returns
/// * Amortization rate in percent per year
/// * `PlanError::InvalidAmortizingDuration` if no time is left to amortize
pub fn compute_amortization_rate_for_fixed_term(
    effective_annual_rate_percent: f64,
    term_years: f64,
    deferred_payment_years: f64,
    interest_only_years: f64,
) -> PlanResult<f64> {
    let amortizing_years = term_years - deferred_payment_years - interest_only_years;
    if amortizing_years <= 0.0 || amortizing_years.is_nan() {
        return Err(PlanError::InvalidAmortizingDuration {
            years: amortizing_years,
        });
    }

    let annual_rate = effective_annual_rate_percent / 100.0;
    if annual_rate.abs() < RATE_EPSILON {
        return Ok(100.0 / amortizing_years);
    }

    let r = monthly_effective_rate(effective_annual_rate_percent);
    let months = 12.0 * amortizing_years;
    let annuity_factor = r / (1.0 - (1.0 + r).powf(-months));

    Ok((annuity_factor - annual_rate / 12.0) * 12.0 * 100.0)
}

/// Calculate how long it takes to repay a loan completely
///
/// Reports `can_be_paid_off = false` instead of failing when the payment does
/// not cover the monthly interest on the capitalized principal, or when the
/// rate is negative. The solved amortizing months are added to the grace
/// months and rounded up to whole months.
pub fn compute_full_payoff_time(
    principal: f64,
    monthly_payment: f64,
    effective_annual_rate_percent: f64,
    interest_only_years: f64,
    deferred_payment_years: f64,
) -> PayoffTime {
    let r = monthly_effective_rate(effective_annual_rate_percent);
    let adjusted_principal = capitalized_principal(principal, r, deferred_payment_years);

    if r < 0.0 || monthly_payment < adjusted_principal * r {
        return PayoffTime::not_payable();
    }

    let amortizing_months = if adjusted_principal <= 0.0 {
        0.0
    } else if r.abs() < RATE_EPSILON {
        if monthly_payment <= 0.0 {
            return PayoffTime::not_payable();
        }
        adjusted_principal / monthly_payment
    } else {
        // Payment equal to the interest keeps the balance flat forever
        let principal_share = monthly_payment - adjusted_principal * r;
        if principal_share <= 0.0 {
            return PayoffTime::not_payable();
        }
        (monthly_payment / principal_share).ln() / (1.0 + r).ln()
    };

    let grace_months = 12.0 * (interest_only_years + deferred_payment_years);
    let total_months = (amortizing_months + grace_months - MONTH_ROUNDING_SLACK).ceil();
    if !total_months.is_finite() {
        return PayoffTime::not_payable();
    }

    PayoffTime::from_total_months(total_months.max(0.0) as u32)
}
