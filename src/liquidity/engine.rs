//! Monthly cash-flow simulation of a liquidity plan

use crate::credit::{ConsolidatedObligation, CreditScenarioValues};
use crate::error::PlanResult;
use log::debug;
use serde::{Deserialize, Serialize};

use super::items::{ItemType, LiquidityItem};
use super::month::{build_month_sequence, MonthKey};
use super::results::{MonthlyResult, SimulationResult};
use super::state::SimulationState;

/// One complete liquidity plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiquidityScenarioValues {
    pub start_capital: f64,

    pub start_month: MonthKey,

    /// Number of months to simulate (at least 1)
    pub horizon_months: u32,

    /// Credit scenario whose obligation is deducted every month
    #[serde(default)]
    pub linked_credit_scenario_id: Option<String>,

    #[serde(default)]
    pub items: Vec<LiquidityItem>,
}

impl LiquidityScenarioValues {
    pub fn new(start_capital: f64, start_month: MonthKey, horizon_months: u32) -> Self {
        Self {
            start_capital,
            start_month,
            horizon_months,
            linked_credit_scenario_id: None,
            items: Vec::new(),
        }
    }

    pub fn with_item(mut self, item: LiquidityItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn linked_to(mut self, credit_scenario_id: impl Into<String>) -> Self {
        self.linked_credit_scenario_id = Some(credit_scenario_id.into());
        self
    }

    /// Linked credit scenario id, treating an empty id as no link
    pub fn linked_credit_id(&self) -> Option<&str> {
        self.linked_credit_scenario_id
            .as_deref()
            .filter(|id| !id.is_empty())
    }
}

/// Credit obligation due in the `month_index`-th simulated month (0-based)
///
/// The month maps to the fractional year `month_index / 12 + 1`; an interval
/// applies when `start_year < year <= end_year`.
pub fn monthly_credit_obligation(month_index: u32, obligation: &ConsolidatedObligation) -> f64 {
    let year = month_index as f64 / 12.0 + 1.0;
    obligation
        .intervals()
        .iter()
        .filter(|i| i.start_year < year && year <= i.end_year)
        .map(|i| i.total_rate)
        .sum()
}

/// Simulates liquidity plans against a fixed credit obligation
#[derive(Debug, Clone, Default)]
pub struct LiquiditySimulator {
    obligation: ConsolidatedObligation,
}

impl LiquiditySimulator {
    pub fn new(obligation: ConsolidatedObligation) -> Self {
        Self { obligation }
    }

    /// Simulator whose credit obligation is zero in every month
    pub fn without_credit() -> Self {
        Self::default()
    }

    /// Derive the obligation from a linked credit scenario, if any
    pub fn from_credit_scenario(linked: Option<&CreditScenarioValues>) -> PlanResult<Self> {
        match linked {
            Some(credit) => Ok(Self::new(credit.consolidated_obligation()?)),
            None => Ok(Self::without_credit()),
        }
    }

    pub fn obligation(&self) -> &ConsolidatedObligation {
        &self.obligation
    }

    /// Walk the plan's horizon month by month
    pub fn simulate(&self, values: &LiquidityScenarioValues) -> SimulationResult {
        let months = build_month_sequence(values.start_month, values.horizon_months);
        debug!(
            "simulating {} months with {} items and {} obligation intervals",
            months.len(),
            values.items.len(),
            self.obligation.intervals().len()
        );

        let mut result = SimulationResult::with_capacity(months.len());
        let mut state = SimulationState::from_values(values);

        for month in months {
            let row = self.calculate_month(&values.items, month, &state);
            state.advance_month(row.net);
            result.add_row(row);
        }

        result
    }

    /// Calculate cash flows for a single month
    fn calculate_month(
        &self,
        items: &[LiquidityItem],
        month: MonthKey,
        state: &SimulationState,
    ) -> MonthlyResult {
        let mut income = 0.0;
        let mut expense = 0.0;

        for item in items {
            if let Some(amount) = item.amount_in_month(&month) {
                match item.item_type {
                    ItemType::Income => income += amount,
                    ItemType::Expense => expense += amount,
                }
            }
        }

        let credit_rate = monthly_credit_obligation(state.month_index, &self.obligation).max(0.0);
        let net = income - expense - credit_rate;

        MonthlyResult {
            month,
            income,
            expense,
            credit_rate,
            net,
            capital_end: state.capital + net,
        }
    }
}

/// Simulate a plan, deriving the credit obligation from the linked scenario
pub fn simulate(
    values: &LiquidityScenarioValues,
    linked_credit: Option<&CreditScenarioValues>,
) -> PlanResult<SimulationResult> {
    Ok(LiquiditySimulator::from_credit_scenario(linked_credit)?.simulate(values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credit::{combine_rates, Amortization, BankLoan, LoanParameters, RateSegment, SegmentTag};
    use crate::liquidity::{Frequency, ItemOverride};
    use approx::assert_relative_eq;

    fn key(s: &str) -> MonthKey {
        s.parse().unwrap()
    }

    fn single_segment(start: f64, end: f64, rate: f64) -> ConsolidatedObligation {
        combine_rates(&[RateSegment::new(start, end, rate, SegmentTag::Amortizing)])
    }

    #[test]
    fn test_obligation_boundary_follows_year_rule() {
        // year = index / 12 + 1, active while 0 < year <= 10
        let obligation = single_segment(0.0, 10.0, 100.0);
        assert_eq!(monthly_credit_obligation(0, &obligation), 100.0);
        assert_eq!(monthly_credit_obligation(108, &obligation), 100.0);
        assert_eq!(monthly_credit_obligation(109, &obligation), 0.0);
        assert_eq!(monthly_credit_obligation(119, &obligation), 0.0);
        assert_eq!(monthly_credit_obligation(120, &obligation), 0.0);
    }

    #[test]
    fn test_obligation_excludes_interval_start() {
        // year 3 (index 24) belongs to (0, 3], not (3, 5]
        let obligation = combine_rates(&[
            RateSegment::new(0.0, 3.0, 100.0, SegmentTag::InterestOnly),
            RateSegment::new(3.0, 5.0, 400.0, SegmentTag::Amortizing),
        ]);
        assert_eq!(monthly_credit_obligation(24, &obligation), 100.0);
        assert_eq!(monthly_credit_obligation(25, &obligation), 400.0);
        assert_eq!(monthly_credit_obligation(48, &obligation), 400.0);
        assert_eq!(monthly_credit_obligation(49, &obligation), 0.0);
    }

    #[test]
    fn test_empty_plan_keeps_capital() {
        let values = LiquidityScenarioValues::new(10_000.0, key("2026-01"), 24);
        let result = simulate(&values, None).unwrap();

        assert_eq!(result.rows.len(), 24);
        assert!(result.rows.iter().all(|r| r.capital_end == 10_000.0));
        assert_eq!(result.rows[23].month, key("2027-12"));
    }

    #[test]
    fn test_capital_carried_forward_and_may_go_negative() {
        let values = LiquidityScenarioValues::new(1000.0, key("2026-01"), 4)
            .with_item(LiquidityItem::new("salary", ItemType::Income, 500.0, Frequency::Monthly, key("2026-01")))
            .with_item(LiquidityItem::new("rent", ItemType::Expense, 900.0, Frequency::Monthly, key("2026-01")))
            .with_item(
                LiquidityItem::new("car", ItemType::Expense, 2000.0, Frequency::Once, key("2026-02"))
                    .with_override(key("2026-02"), ItemOverride::amount(1500.0)),
            );

        let result = LiquiditySimulator::without_credit().simulate(&values);
        let capital: Vec<f64> = result.rows.iter().map(|r| r.capital_end).collect();
        assert_eq!(capital, vec![600.0, -1300.0, -1700.0, -2100.0]);

        let february = &result.rows[1];
        assert_eq!(february.income, 500.0);
        assert_eq!(february.expense, 2400.0);
        assert_eq!(february.net, -1900.0);
    }

    #[test]
    fn test_linked_credit_deducted() {
        let credit = CreditScenarioValues {
            bank_loan: Some(BankLoan {
                principal: 300_000.0,
                effective_annual_rate: 3.7,
                amortization_rate: 2.0,
                fixed_rate_years: 10.0,
            }),
            loans: vec![LoanParameters::new(12_000.0, 0.0, Amortization::Rate(50.0))],
        };
        let values = LiquidityScenarioValues::new(50_000.0, key("2026-01"), 36);

        let result = simulate(&values, Some(&credit)).unwrap();

        // Second loan pays 500/month while year <= 2, i.e. up to index 12
        assert_relative_eq!(result.rows[0].credit_rate, 1925.0, epsilon = 1e-9);
        assert_relative_eq!(result.rows[12].credit_rate, 1925.0, epsilon = 1e-9);
        assert_relative_eq!(result.rows[13].credit_rate, 1425.0, epsilon = 1e-9);
        assert_relative_eq!(
            result.rows[35].capital_end,
            50_000.0 - result.rows.iter().map(|r| r.credit_rate).sum::<f64>(),
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_empty_link_id_is_no_link() {
        let values = LiquidityScenarioValues::new(0.0, key("2026-01"), 1).linked_to("");
        assert_eq!(values.linked_credit_id(), None);
        assert_eq!(values.clone().linked_to("base").linked_credit_id(), Some("base"));
    }
}
