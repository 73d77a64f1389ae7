//! Liquidity Plan - Loan amortization and monthly cash-flow planning
//!
//! This library provides:
//! - Closed-form loan math (payment sizing, balance projection, payoff solving)
//! - Grace periods (payment-free or interest-only) per loan
//! - Rate segments per loan and a consolidated obligation across loans
//! - Month-by-month liquidity simulation with recurring and overridden items
//! - Multi-scenario runs over a JSON plan file

pub mod error;
pub mod amortization;
pub mod credit;
pub mod liquidity;
pub mod loader;
pub mod scenario;

// Re-export commonly used types
pub use error::{PlanError, PlanResult};
pub use amortization::{LoanSnapshot, PayoffTime};
pub use credit::{Amortization, BankLoan, CreditScenarioValues, GracePeriod, LoanParameters, RateSegment};
pub use liquidity::{LiquidityItem, LiquidityScenarioValues, LiquiditySimulator, MonthKey, MonthlyResult, SimulationResult};
pub use loader::PlanFile;
pub use scenario::ScenarioRunner;
