//! # SimVestor Forecaster
//!
//! Short-horizon price projection. Two candidate regressors are trained on a
//! chronological 80/20 split of the causal feature rows built by `ml-features`; the
//! one with the lower holdout mean squared error projects the series forward.
//!
//! The regressors come from `smartcore`, behind the default `smartcore` feature.
//! Without it the engine still builds and reports `ModelUnavailable`.

pub mod engine;
pub mod models;
pub mod result;
pub mod scaler;

pub use engine::ForecastEngine;
pub use models::CandidateModel;
pub use result::{ForecastResult, ModelScore};
pub use scaler::MinMaxScaler;
