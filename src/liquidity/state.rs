//! Running state carried from one simulated month to the next

use super::engine::LiquidityScenarioValues;

/// Capital position at a point in the simulation
#[derive(Debug, Clone)]
pub struct SimulationState {
    /// 0-based index of the month being simulated
    pub month_index: u32,

    /// Capital at the end of the last simulated month
    pub capital: f64,
}

impl SimulationState {
    /// Initialize state before the first simulated month
    pub fn from_values(values: &LiquidityScenarioValues) -> Self {
        Self {
            month_index: 0,
            capital: values.start_capital,
        }
    }

    /// Book the month's net flow and move on to the next month
    ///
    /// Capital is not clamped and may go negative.
    pub fn advance_month(&mut self, net: f64) {
        self.capital += net;
        self.month_index += 1;
    }
}
