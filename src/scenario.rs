//! Scenario runner for liquidity plans
//!
//! Holds a loaded plan and resolves each liquidity scenario's linked credit
//! scenario by id before simulating. Scenarios are independent, so a whole
//! plan can be simulated in parallel.

use crate::credit::{ConsolidatedObligation, CreditScenarioValues};
use crate::error::{PlanError, PlanResult};
use crate::liquidity::{simulate, LiquidityScenarioValues, SimulationResult};
use crate::loader::{load_plan, PlanFile};
use log::warn;
use rayon::prelude::*;
use std::path::Path;

/// Pre-loaded scenario runner
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::from_path("plan.json")?;
///
/// for (id, result) in runner.run_all() {
///     println!("{}: {:.2}", id, result?.summary().final_capital);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    plan: PlanFile,
}

impl ScenarioRunner {
    pub fn new(plan: PlanFile) -> Self {
        Self { plan }
    }

    /// Create runner by loading a JSON plan file
    pub fn from_path<P: AsRef<Path>>(path: P) -> PlanResult<Self> {
        Ok(Self::new(load_plan(path)?))
    }

    pub fn plan(&self) -> &PlanFile {
        &self.plan
    }

    pub fn plan_mut(&mut self) -> &mut PlanFile {
        &mut self.plan
    }

    pub fn credit_scenario(&self, id: &str) -> PlanResult<&CreditScenarioValues> {
        self.plan
            .credit_scenarios
            .get(id)
            .ok_or_else(|| PlanError::unknown_scenario(id))
    }

    pub fn liquidity_scenario(&self, id: &str) -> PlanResult<&LiquidityScenarioValues> {
        self.plan
            .liquidity_scenarios
            .get(id)
            .ok_or_else(|| PlanError::unknown_scenario(id))
    }

    /// Consolidated obligation of a credit scenario, for rate-over-time display
    pub fn credit_obligation(&self, id: &str) -> PlanResult<ConsolidatedObligation> {
        self.credit_scenario(id)?.consolidated_obligation()
    }

    /// Simulate plan values against whichever credit scenario they link to
    pub fn run_values(&self, values: &LiquidityScenarioValues) -> PlanResult<SimulationResult> {
        let linked = match values.linked_credit_id() {
            Some(id) => Some(self.credit_scenario(id).map_err(|e| {
                warn!("linked credit scenario '{}' not found", id);
                e
            })?),
            None => None,
        };
        simulate(values, linked)
    }

    /// Simulate one liquidity scenario by id
    pub fn run(&self, id: &str) -> PlanResult<SimulationResult> {
        let values = self.liquidity_scenario(id)?;
        Ok(self.run_values(values)?.with_scenario_id(id))
    }

    /// Simulate every liquidity scenario in parallel, ordered by id
    pub fn run_all(&self) -> Vec<(String, PlanResult<SimulationResult>)> {
        let ids: Vec<&String> = self.plan.liquidity_scenarios.keys().collect();
        ids.par_iter()
            .map(|id| ((*id).clone(), self.run(id)))
            .collect()
    }
}
