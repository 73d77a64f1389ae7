//! Error types for loan and liquidity calculations

use thiserror::Error;

/// Result alias used throughout the crate
pub type PlanResult<T> = Result<T, PlanError>;

/// Errors raised by the calculation core and its plain-data loaders
#[derive(Error, Debug)]
pub enum PlanError {
    /// Fixed-term solving left no time to amortize after the grace period
    #[error("Amortizing duration must be positive, got {years} years")]
    InvalidAmortizingDuration { years: f64 },

    /// Payment never brings the balance to zero, so no schedule end exists
    #[error("Loan of {principal:.2} cannot be repaid with a monthly payment of {monthly_payment:.2}")]
    NotRepayable { principal: f64, monthly_payment: f64 },

    /// Month key not in "YYYY-MM" form
    #[error("Invalid month key: {0}. Use YYYY-MM.")]
    InvalidMonthKey(String),

    /// Input value outside its meaningful range
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    /// Liquidity plan references a credit scenario that does not exist
    #[error("Unknown scenario: {id}")]
    UnknownScenario { id: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl PlanError {
    /// Creates an invalid input error
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Creates an unknown scenario error
    pub fn unknown_scenario(id: impl Into<String>) -> Self {
        Self::UnknownScenario { id: id.into() }
    }
}
