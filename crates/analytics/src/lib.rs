//! # SimVestor Analytics
//!
//! This crate turns a `PriceSeries` and an investment amount into the numbers a
//! simulated investment is judged by.
//!
//! ## Architectural Principles
//!
//! - **Pure Logic:** No I/O, no shared state. Every calculator is a plain struct holding
//!   its settings, and every call is a function of its arguments.
//! - **Degrade, Don't Abort:** Failures are typed (`AnalyticsError`) and recoverable.
//!   The indicator and insight paths never fail at all.
//!
//! ## Public API
//!
//! - `ReturnCalculator` / `ReturnResult`: realized return, volatility, drawdown.
//! - `IndicatorEngine` / `IndicatorSet`: MA, RSI, Bollinger, volume and momentum snapshot.
//! - `InsightGenerator` / `Insight`: the rule ladder over the two results above.
//! - `rolling`: causal window helpers, shared with the forecast features.
//! - `AnalyticsError`: the error taxonomy used across the workspace.

// Declare the modules that constitute this crate.
pub mod error;
pub mod indicators;
pub mod insights;
pub mod report;
pub mod returns;
pub mod rolling;

// Re-export the key components to create a clean, public-facing API.
pub use error::AnalyticsError;
pub use indicators::{IndicatorEngine, IndicatorSet};
pub use insights::{Insight, InsightGenerator, InsightKind};
pub use report::ReturnResult;
pub use returns::{ReturnCalculator, annualized_return_pct};
