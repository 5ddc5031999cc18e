//! # SimVestor ML Features
//!
//! Builds the causal feature frame the forecaster trains on: a short moving average,
//! a long moving average and RSI per row, next to the close price the models predict.
//!
//! Every feature at row `t` is computed from closes at or before `t`. Leading rows
//! whose windows are not yet full hold nulls and are dropped by [`usable_rows`].

use analytics::rolling;
use anyhow::{Context, Result};
use core_types::PriceSeries;
use ndarray::Array2;
use polars::prelude::*;

/// The prediction target.
pub const TARGET_COLUMN: &str = "close";

/// Model inputs, in matrix column order.
pub const FEATURE_COLUMNS: [&str; 3] = ["ma_short", "ma_long", "rsi"];

/// Window lengths for the three feature columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureWindows {
    pub short_ma: usize,
    pub long_ma: usize,
    pub rsi: usize,
}

impl Default for FeatureWindows {
    fn default() -> Self {
        Self {
            short_ma: 7,
            long_ma: 21,
            rsi: 14,
        }
    }
}

impl FeatureWindows {
    /// Leading rows that can never be complete.
    pub fn warmup_rows(&self) -> usize {
        self.short_ma
            .saturating_sub(1)
            .max(self.long_ma.saturating_sub(1))
            .max(self.rsi)
    }
}

/// Generates the full feature frame, one row per record, nulls included.
pub fn generate_features(series: &PriceSeries, windows: &FeatureWindows) -> Result<DataFrame> {
    let closes = series.closes();

    let ma_short = rolling::sma(&closes, windows.short_ma)
        .with_context(|| format!("short moving average ({})", windows.short_ma))?;
    let ma_long = rolling::sma(&closes, windows.long_ma)
        .with_context(|| format!("long moving average ({})", windows.long_ma))?;
    let rsi = rolling::rsi(&closes, windows.rsi);

    let df = DataFrame::new(vec![
        Series::new(TARGET_COLUMN, closes),
        Series::new(FEATURE_COLUMNS[0], ma_short),
        Series::new(FEATURE_COLUMNS[1], ma_long),
        Series::new(FEATURE_COLUMNS[2], rsi),
    ])?;

    tracing::debug!(shape = ?df.shape(), "Generated feature frame");
    Ok(df)
}

/// Drops every row with an undefined feature. Row order is preserved.
pub fn usable_rows(df: &DataFrame) -> Result<DataFrame> {
    let usable = df.drop_nulls::<&str>(None)?;
    tracing::debug!(
        before = df.height(),
        after = usable.height(),
        "Dropped undefined feature rows"
    );
    Ok(usable)
}

/// Splits a null-free frame into the feature matrix and the target vector.
pub fn to_arrays(df: &DataFrame) -> Result<(Array2<f64>, Vec<f64>)> {
    let x: Array2<f64> = df
        .select(FEATURE_COLUMNS)?
        .to_ndarray::<Float64Type>(IndexOrder::C)?;
    let y: Vec<f64> = df
        .column(TARGET_COLUMN)?
        .f64()?
        .into_no_null_iter()
        .collect();

    anyhow::ensure!(
        x.nrows() == y.len(),
        "feature rows ({}) and targets ({}) differ",
        x.nrows(),
        y.len()
    );
    Ok((x, y))
}
