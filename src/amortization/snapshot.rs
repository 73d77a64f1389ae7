//! Point-in-time figures for a single loan

use crate::credit::LoanParameters;
use crate::error::PlanResult;
use crate::liquidity::MonthKey;
use serde::{Deserialize, Serialize};

use super::engine::{
    compute_full_payoff_time, compute_monthly_payment, compute_remaining_balance,
    monthly_effective_rate, PayoffTime,
};

/// State of a loan after some years of repayment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanSnapshot {
    pub elapsed_years: f64,
    pub amortization_rate_percent: f64,
    pub monthly_payment: f64,
    pub interest_only_payment: f64,
    pub remaining_balance: f64,

    /// Sum of all payments made so far
    pub total_paid: f64,

    /// Interest paid or capitalized so far, floored at zero
    pub interest_paid: f64,

    pub payoff: PayoffTime,
}

/// Years between two month keys
pub fn elapsed_years_between(from: &MonthKey, to: &MonthKey) -> f64 {
    to.months_since(from) as f64 / 12.0
}

/// Evaluate a loan `elapsed_years` after it started
pub fn loan_snapshot(loan: &LoanParameters, elapsed_years: f64) -> PlanResult<LoanSnapshot> {
    let elapsed_years = elapsed_years.max(0.0);
    let deferred_years = loan.grace_period.payment_free_years();
    let interest_only_years = loan.grace_period.interest_only_years();

    let amortization_rate_percent = loan.amortization_rate_percent()?;
    let monthly_payment = compute_monthly_payment(
        loan.principal,
        loan.effective_annual_rate,
        amortization_rate_percent,
        deferred_years,
    );
    let interest_only_payment = loan.interest_only_payment();

    let remaining_balance = compute_remaining_balance(
        loan.principal,
        monthly_payment,
        loan.effective_annual_rate,
        elapsed_years,
        deferred_years,
        interest_only_years,
    );

    let total_paid = payments_made(
        loan,
        monthly_payment,
        interest_only_payment,
        elapsed_years,
    );

    let payoff = compute_full_payoff_time(
        loan.principal,
        monthly_payment,
        loan.effective_annual_rate,
        interest_only_years,
        deferred_years,
    );

    Ok(LoanSnapshot {
        elapsed_years,
        amortization_rate_percent,
        monthly_payment,
        interest_only_payment,
        remaining_balance,
        total_paid,
        interest_paid: (total_paid + remaining_balance - loan.principal).max(0.0),
        payoff,
    })
}

/// Sum of installments up to `elapsed_years`; the final installment only
/// clears what is left
fn payments_made(
    loan: &LoanParameters,
    monthly_payment: f64,
    interest_only_payment: f64,
    elapsed_years: f64,
) -> f64 {
    let months = |years: f64| (12.0 * years).round() as u32;
    let elapsed_months = months(elapsed_years);
    let deferred_months = months(loan.grace_period.payment_free_years());
    let interest_only_months = months(loan.grace_period.interest_only_years());

    let interest_only_paid = elapsed_months
        .saturating_sub(deferred_months)
        .min(interest_only_months) as f64
        * interest_only_payment;

    let r = monthly_effective_rate(loan.effective_annual_rate);
    let mut balance = loan.principal * (1.0 + r).powi(deferred_months as i32);
    let mut amortizing_paid = 0.0;

    for _ in 0..elapsed_months.saturating_sub(deferred_months + interest_only_months) {
        if balance <= 0.0 {
            break;
        }
        let due = balance * (1.0 + r);
        let installment = monthly_payment.min(due);
        balance = due - installment;
        amortizing_paid += installment;
    }

    interest_only_paid + amortizing_paid
}
