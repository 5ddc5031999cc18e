use thiserror::Error;

/// Every way an analytics calculation can decline to produce a result.
///
/// None of these are fatal: callers degrade to "no result for this sub-feature".
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    #[error("Not enough data to perform calculation: need {required} records, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("Reference price must be positive, got {0}")]
    InvalidPrice(f64),

    #[error("Investment amount must be positive and finite, got {0}")]
    InvalidInvestment(f64),

    #[error("Forecast horizon of {requested} days is not supported (available: {available})")]
    InvalidHorizon { requested: usize, available: usize },

    #[error("Forecast model backend unavailable: {0}")]
    ModelUnavailable(String),

    #[error("An unexpected error occurred during analytics calculation: {0}")]
    InternalComputation(String),
}
