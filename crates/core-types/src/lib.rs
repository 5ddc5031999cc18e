//! # SimVestor Core Types
//!
//! The foundational data model shared by every other crate in the workspace.
//!
//! - `PriceBar`: one trading day of OHLCV data.
//! - `PriceSeries`: a validated, immutable, date-ordered run of `PriceBar`s. It is
//!   built once at the input boundary and only ever read afterwards.
//! - `DataQualityReport`: a summary of what validation noticed about a series.

pub mod error;
pub mod series;

// Re-export the core types to provide a clean public API.
pub use error::CoreError;
pub use series::{AnomalyKind, BarAnomaly, DataQualityReport, PriceBar, PriceSeries};
