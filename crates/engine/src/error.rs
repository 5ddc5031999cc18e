use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] configuration::ConfigError),

    #[error("No price data on or after {0}")]
    NoDataInRange(NaiveDate),

    #[error("The price series is empty")]
    EmptySeries,

    #[error("Analytics error: {0}")]
    Analytics(#[from] analytics::AnalyticsError),
}
