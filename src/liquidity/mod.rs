//! Month-by-month liquidity simulation

mod engine;
mod items;
mod month;
mod results;
mod state;

pub use engine::{monthly_credit_obligation, simulate, LiquidityScenarioValues, LiquiditySimulator};
pub use items::{item_active_in_month, Frequency, ItemOverride, ItemType, LiquidityItem};
pub use month::{build_month_sequence, MonthKey, MAX_HORIZON_MONTHS};
pub use results::{MonthlyResult, SimulationResult, SimulationSummary};
pub use state::SimulationState;
