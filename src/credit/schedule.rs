//! Rate segments of a single loan

use crate::amortization::{compute_full_payoff_time, compute_monthly_payment};
use crate::error::{PlanError, PlanResult};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::data::LoanParameters;

/// Purpose of a rate segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SegmentTag {
    PaymentFree,
    InterestOnly,
    Amortizing,
    ExternalBank,
}

/// A span of years over which a constant monthly payment applies
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateSegment {
    pub start_year: f64,
    pub end_year: f64,
    pub monthly_rate: f64,
    pub tag: SegmentTag,
}

impl RateSegment {
    pub fn new(start_year: f64, end_year: f64, monthly_rate: f64, tag: SegmentTag) -> Self {
        Self {
            start_year,
            end_year,
            monthly_rate,
            tag,
        }
    }

    pub fn duration_years(&self) -> f64 {
        self.end_year - self.start_year
    }

    /// Cut the segment off at `horizon_years`
    ///
    /// Returns `None` when the segment starts at or after the horizon.
    pub fn capped_at(&self, horizon_years: f64) -> Option<Self> {
        if self.start_year >= horizon_years {
            return None;
        }
        Some(Self {
            end_year: self.end_year.min(horizon_years),
            ..*self
        })
    }
}

/// Turn loan parameters into ordered, contiguous rate segments
///
/// Produces an optional grace segment (payment-free at rate 0, or
/// interest-only at the interest payment) followed by the amortizing segment
/// running until the loan is paid off.
///
/// # Returns
/// * `PlanError::NotRepayable` if the full payment never clears the balance
pub fn build_credit_rate_schedule(loan: &LoanParameters) -> PlanResult<Vec<RateSegment>> {
    let deferred_years = loan.grace_period.payment_free_years();
    let interest_only_years = loan.grace_period.interest_only_years();

    let amortization_rate = loan.amortization_rate_percent()?;
    let monthly_payment = compute_monthly_payment(
        loan.principal,
        loan.effective_annual_rate,
        amortization_rate,
        deferred_years,
    );

    let payoff = compute_full_payoff_time(
        loan.principal,
        monthly_payment,
        loan.effective_annual_rate,
        interest_only_years,
        deferred_years,
    );
    if !payoff.can_be_paid_off {
        warn!(
            "loan '{}' of {:.2} is never repaid at {:.2}/month",
            loan.name, loan.principal, monthly_payment
        );
        return Err(PlanError::NotRepayable {
            principal: loan.principal,
            monthly_payment,
        });
    }

    let mut segments = Vec::with_capacity(2);

    if deferred_years > 0.0 {
        segments.push(RateSegment::new(
            0.0,
            deferred_years,
            0.0,
            SegmentTag::PaymentFree,
        ));
    } else if interest_only_years > 0.0 {
        segments.push(RateSegment::new(
            0.0,
            interest_only_years,
            loan.interest_only_payment(),
            SegmentTag::InterestOnly,
        ));
    }

    let amortizing_start = deferred_years.max(interest_only_years);
    let payoff_year = payoff.fractional_years();
    if payoff_year > amortizing_start {
        segments.push(RateSegment::new(
            amortizing_start,
            payoff_year,
            monthly_payment,
            SegmentTag::Amortizing,
        ));
    }

    debug!(
        "loan '{}': {} segments, paid off after {} months",
        loan.name,
        segments.len(),
        payoff.total_months
    );

    Ok(segments)
}
