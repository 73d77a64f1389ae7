//! Simulation output structures

use crate::error::PlanResult;
use serde::{Deserialize, Serialize};
use std::io::Write;

use super::month::MonthKey;

/// A single simulated month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyResult {
    pub month: MonthKey,
    pub income: f64,
    pub expense: f64,
    pub credit_rate: f64,

    /// `income - expense - credit_rate`
    pub net: f64,

    /// Cumulative capital after this month
    pub capital_end: f64,
}

/// Complete simulation result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    /// Liquidity scenario the rows belong to, when run by id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenario_id: Option<String>,

    pub rows: Vec<MonthlyResult>,
}

impl SimulationResult {
    pub fn with_capacity(months: usize) -> Self {
        Self {
            scenario_id: None,
            rows: Vec::with_capacity(months),
        }
    }

    pub fn with_scenario_id(mut self, scenario_id: impl Into<String>) -> Self {
        self.scenario_id = Some(scenario_id.into());
        self
    }

    pub fn add_row(&mut self, row: MonthlyResult) {
        self.rows.push(row);
    }

    /// Get summary statistics
    pub fn summary(&self) -> SimulationSummary {
        let total_income: f64 = self.rows.iter().map(|r| r.income).sum();
        let total_expense: f64 = self.rows.iter().map(|r| r.expense).sum();
        let total_credit: f64 = self.rows.iter().map(|r| r.credit_rate).sum();

        let final_capital = self.rows.last().map(|r| r.capital_end).unwrap_or(0.0);

        let lowest = self
            .rows
            .iter()
            .min_by(|a, b| a.capital_end.total_cmp(&b.capital_end));

        SimulationSummary {
            total_months: self.rows.len() as u32,
            total_income,
            total_expense,
            total_credit,
            final_capital,
            min_capital: lowest.map(|r| r.capital_end).unwrap_or(0.0),
            min_capital_month: lowest.map(|r| r.month),
            first_negative_month: self
                .rows
                .iter()
                .find(|r| r.capital_end < 0.0)
                .map(|r| r.month),
        }
    }

    /// Write one CSV row per simulated month
    pub fn write_csv<W: Write>(&self, writer: W) -> PlanResult<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for row in &self.rows {
            csv_writer.serialize(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}

/// Summary statistics for a simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationSummary {
    pub total_months: u32,
    pub total_income: f64,
    pub total_expense: f64,
    pub total_credit: f64,
    pub final_capital: f64,
    pub min_capital: f64,
    pub min_capital_month: Option<MonthKey>,
    pub first_negative_month: Option<MonthKey>,
}
