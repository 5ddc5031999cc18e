//! Causal window helpers shared by the indicator snapshot and the forecast features.
//!
//! Every `Vec<Option<f64>>` returned here is index-aligned with its input. `None`
//! means the window is not yet full at that index; nothing ever looks ahead.

use crate::error::AnalyticsError;
use ta::Next;
use ta::indicators::SimpleMovingAverage as Sma;

/// Simple moving average over the trailing `period` values.
pub fn sma(values: &[f64], period: usize) -> Result<Vec<Option<f64>>, AnalyticsError> {
    let mut sma = Sma::new(period).map_err(|e| {
        AnalyticsError::InternalComputation(format!("Failed to initialize SMA({period}): {e:?}"))
    })?;

    Ok(values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let value = sma.next(*v);
            (i + 1 >= period).then_some(value)
        })
        .collect())
}

/// Sample (n-1) standard deviation over the trailing `period` values.
pub fn rolling_std(values: &[f64], period: usize) -> Vec<Option<f64>> {
    (0..values.len())
        .map(|i| {
            if period < 2 || i + 1 < period {
                return None;
            }
            sample_std_dev(&values[i + 1 - period..=i])
        })
        .collect()
}

/// Relative Strength Index from the simple mean of gains and losses over the last
/// `period` price changes.
///
/// The first value is available at index `period`. A window with no losses saturates
/// at 100; a window with no movement at all is neutral (50).
pub fn rsi(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; closes.len()];
    if period == 0 {
        return out;
    }

    for i in period..closes.len() {
        let (mut gains, mut losses) = (0.0, 0.0);
        for w in closes[i - period..=i].windows(2) {
            let delta = w[1] - w[0];
            if delta > 0.0 {
                gains += delta;
            } else {
                losses -= delta;
            }
        }
        let avg_gain = gains / period as f64;
        let avg_loss = losses / period as f64;

        out[i] = Some(rsi_from_averages(avg_gain, avg_loss));
    }

    out
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        // RS -> infinity; no movement at all has no direction.
        return if avg_gain == 0.0 { 50.0 } else { 100.0 };
    }
    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample (n-1) standard deviation; `None` for fewer than two observations.
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mean = mean(values)?;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
        / (values.len() - 1) as f64;
    Some(variance.sqrt())
}

/// The last element, if that element is defined.
pub fn last_defined(values: &[Option<f64>]) -> Option<f64> {
    values.last().copied().flatten()
}
