//! Loan and credit scenario data structures

use crate::amortization::{
    compute_amortization_rate_for_fixed_term, compute_full_payoff_time, compute_monthly_payment,
    PayoffTime,
};
use crate::error::PlanResult;
use log::debug;
use serde::{Deserialize, Serialize};

use super::aggregate::{combine_rates, ConsolidatedObligation};
use super::schedule::{build_credit_rate_schedule, RateSegment, SegmentTag};

/// Grace mechanism at the start of a loan
///
/// A loan has at most one: either no payments at all (interest capitalizes)
/// or interest-only payments (balance stays flat).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "years", rename_all = "camelCase")]
pub enum GracePeriod {
    #[default]
    None,
    PaymentFree(f64),
    InterestOnly(f64),
}

impl GracePeriod {
    /// Build from two independent durations
    ///
    /// A positive payment-free period takes precedence and forces the
    /// interest-only period to zero.
    pub fn new(payment_free_years: f64, interest_only_years: f64) -> Self {
        if payment_free_years > 0.0 {
            GracePeriod::PaymentFree(payment_free_years)
        } else if interest_only_years > 0.0 {
            GracePeriod::InterestOnly(interest_only_years)
        } else {
            GracePeriod::None
        }
    }

    pub fn payment_free_years(&self) -> f64 {
        match self {
            GracePeriod::PaymentFree(years) => years.max(0.0),
            _ => 0.0,
        }
    }

    pub fn interest_only_years(&self) -> f64 {
        match self {
            GracePeriod::InterestOnly(years) => years.max(0.0),
            _ => 0.0,
        }
    }

    /// Length of whichever grace window is active
    pub fn years(&self) -> f64 {
        self.payment_free_years().max(self.interest_only_years())
    }
}

/// How the principal is repaid once amortization starts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Amortization {
    /// Share of principal repaid per year, in percent
    #[serde(rename = "ratePercent")]
    Rate(f64),
    /// Total loan term in years, grace period included
    #[serde(rename = "termYears")]
    FixedTerm(f64),
}

/// User-entered parameters of one loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanParameters {
    #[serde(default)]
    pub name: String,

    /// Original loan amount
    pub principal: f64,

    /// Effective annual interest rate in percent
    pub effective_annual_rate: f64,

    pub amortization: Amortization,

    #[serde(default)]
    pub grace_period: GracePeriod,

    /// Years the loan's terms are fixed for; segments are cut off here
    /// when the loan is part of a credit scenario
    #[serde(default)]
    pub commitment_years: Option<f64>,
}

impl LoanParameters {
    pub fn new(principal: f64, effective_annual_rate: f64, amortization: Amortization) -> Self {
        Self {
            name: String::new(),
            principal,
            effective_annual_rate,
            amortization,
            grace_period: GracePeriod::None,
            commitment_years: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_grace_period(mut self, grace_period: GracePeriod) -> Self {
        self.grace_period = grace_period;
        self
    }

    pub fn with_commitment_years(mut self, years: f64) -> Self {
        self.commitment_years = Some(years);
        self
    }

    /// Amortization rate in percent, solved from the term if needed
    pub fn amortization_rate_percent(&self) -> PlanResult<f64> {
        match self.amortization {
            Amortization::Rate(rate) => Ok(rate),
            Amortization::FixedTerm(term_years) => compute_amortization_rate_for_fixed_term(
                self.effective_annual_rate,
                term_years,
                self.grace_period.payment_free_years(),
                self.grace_period.interest_only_years(),
            ),
        }
    }

    /// Full payment once amortization starts
    pub fn monthly_payment(&self) -> PlanResult<f64> {
        Ok(compute_monthly_payment(
            self.principal,
            self.effective_annual_rate,
            self.amortization_rate_percent()?,
            self.grace_period.payment_free_years(),
        ))
    }

    /// Payment during an interest-only window
    pub fn interest_only_payment(&self) -> f64 {
        compute_monthly_payment(self.principal, self.effective_annual_rate, 0.0, 0.0)
    }

    pub fn payoff_time(&self) -> PlanResult<PayoffTime> {
        Ok(compute_full_payoff_time(
            self.principal,
            self.monthly_payment()?,
            self.effective_annual_rate,
            self.grace_period.interest_only_years(),
            self.grace_period.payment_free_years(),
        ))
    }
}

/// The primary bank loan of a credit scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankLoan {
    pub principal: f64,

    /// Effective annual interest rate in percent
    pub effective_annual_rate: f64,

    /// Amortization rate in percent
    pub amortization_rate: f64,

    /// Fixed-rate period in years (Zinsbindung)
    pub fixed_rate_years: f64,
}

impl BankLoan {
    pub fn monthly_payment(&self) -> f64 {
        compute_monthly_payment(
            self.principal,
            self.effective_annual_rate,
            self.amortization_rate,
            0.0,
        )
    }

    /// Obligation of the bank loan over its fixed-rate period
    pub fn rate_segment(&self) -> RateSegment {
        RateSegment::new(
            0.0,
            self.fixed_rate_years,
            self.monthly_payment(),
            SegmentTag::ExternalBank,
        )
    }
}

/// All loans of one named credit scenario
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditScenarioValues {
    #[serde(default)]
    pub bank_loan: Option<BankLoan>,

    #[serde(default)]
    pub loans: Vec<LoanParameters>,
}

impl CreditScenarioValues {
    /// Bank segment plus every loan's schedule capped at its commitment horizon
    pub fn rate_segments(&self) -> PlanResult<Vec<RateSegment>> {
        let mut segments: Vec<RateSegment> = self
            .bank_loan
            .iter()
            .map(BankLoan::rate_segment)
            .collect();

        for loan in &self.loans {
            let schedule = build_credit_rate_schedule(loan)?;
            match loan.commitment_years {
                Some(horizon) => {
                    segments.extend(schedule.iter().filter_map(|s| s.capped_at(horizon)))
                }
                None => segments.extend(schedule),
            }
        }

        debug!(
            "credit scenario: {} loans -> {} rate segments",
            self.loans.len(),
            segments.len()
        );

        Ok(segments)
    }

    /// Total monthly obligation of the scenario as a step function
    pub fn consolidated_obligation(&self) -> PlanResult<ConsolidatedObligation> {
        Ok(combine_rates(&self.rate_segments()?))
    }
}
