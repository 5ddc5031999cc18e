use crate::rolling;
use core_types::PriceSeries;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const RSI_PERIOD: usize = 14;
const BOLLINGER_PERIOD: usize = 20;
const BOLLINGER_STD_DEV: f64 = 2.0;
const VOLUME_PERIOD: usize = 20;
const MOMENTUM_SHORT: usize = 20;
const MOMENTUM_LONG: usize = 50;

/// A snapshot of technical indicators as of the last record of a series.
///
/// Window-based values are `None` when the series is shorter than the window; treat
/// that as "insufficient history", never as zero. The derived ratios carry neutral
/// defaults instead (0 for distances and momentum, 1 for the volume ratio).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    pub current_price: Option<f64>,

    // Trend
    pub ma_20: Option<f64>,
    pub ma_50: Option<f64>,
    pub ma_200: Option<f64>,
    pub price_vs_ma20: f64,
    pub price_vs_ma50: f64,
    pub price_vs_ma200: f64,

    // Momentum
    pub rsi: Option<f64>,
    pub price_change_20d: f64,
    pub price_change_50d: f64,

    // Volatility
    pub bb_upper: Option<f64>,
    pub bb_lower: Option<f64>,
    pub bb_width: Option<f64>,

    // Volume
    pub current_volume: Option<f64>,
    pub avg_volume: Option<f64>,
    pub volume_ratio: f64,
}

impl IndicatorSet {
    /// The set computed from an empty series.
    pub fn empty() -> Self {
        Self {
            current_price: None,
            ma_20: None,
            ma_50: None,
            ma_200: None,
            price_vs_ma20: 0.0,
            price_vs_ma50: 0.0,
            price_vs_ma200: 0.0,
            rsi: None,
            price_change_20d: 0.0,
            price_change_50d: 0.0,
            bb_upper: None,
            bb_lower: None,
            bb_width: None,
            current_volume: None,
            avg_volume: None,
            volume_ratio: 1.0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.current_price.is_none()
    }

    /// The defined indicators by name. Empty for an empty set.
    pub fn to_map(&self) -> BTreeMap<&'static str, f64> {
        if self.is_empty() {
            return BTreeMap::new();
        }

        let optional = [
            ("current_price", self.current_price),
            ("MA_20", self.ma_20),
            ("MA_50", self.ma_50),
            ("MA_200", self.ma_200),
            ("RSI", self.rsi),
            ("BB_upper", self.bb_upper),
            ("BB_lower", self.bb_lower),
            ("BB_width", self.bb_width),
            ("current_volume", self.current_volume),
            ("avg_volume", self.avg_volume),
        ];
        let defaulted = [
            ("price_vs_ma20", self.price_vs_ma20),
            ("price_vs_ma50", self.price_vs_ma50),
            ("price_vs_ma200", self.price_vs_ma200),
            ("price_change_20d", self.price_change_20d),
            ("price_change_50d", self.price_change_50d),
            ("volume_ratio", self.volume_ratio),
        ];

        optional
            .into_iter()
            .filter_map(|(name, value)| value.map(|v| (name, v)))
            .chain(defaulted)
            .collect()
    }
}

impl Default for IndicatorSet {
    fn default() -> Self {
        Self::empty()
    }
}

/// Computes the [`IndicatorSet`] snapshot. Never fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct IndicatorEngine;

impl IndicatorEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn compute(&self, series: &PriceSeries) -> IndicatorSet {
        let closes = series.closes();
        let Some(&current_price) = closes.last() else {
            tracing::debug!("Empty series, no indicators");
            return IndicatorSet::empty();
        };

        let ma_20 = trailing_mean(&closes, 20);
        let ma_50 = trailing_mean(&closes, 50);
        let ma_200 = trailing_mean(&closes, 200);

        let rsi = rolling::last_defined(&rolling::rsi(&closes, RSI_PERIOD));

        let (bb_upper, bb_lower, bb_width) = bollinger(&closes, ma_20);

        let current_volume = series.last().and_then(|b| b.volume);
        let avg_volume = series
            .volumes()
            .and_then(|volumes| trailing_mean(&volumes, VOLUME_PERIOD));
        let volume_ratio = match (current_volume, avg_volume) {
            (Some(current), Some(avg)) if avg > 0.0 => current / avg,
            _ => 1.0,
        };

        let set = IndicatorSet {
            current_price: Some(current_price),
            ma_20,
            ma_50,
            ma_200,
            price_vs_ma20: distance_pct(current_price, ma_20),
            price_vs_ma50: distance_pct(current_price, ma_50),
            price_vs_ma200: distance_pct(current_price, ma_200),
            rsi,
            price_change_20d: momentum_pct(&closes, MOMENTUM_SHORT),
            price_change_50d: momentum_pct(&closes, MOMENTUM_LONG),
            bb_upper,
            bb_lower,
            bb_width,
            current_volume,
            avg_volume,
            volume_ratio,
        };

        tracing::debug!(records = closes.len(), rsi = ?set.rsi, ma_20 = ?set.ma_20, "Computed indicators");
        set
    }
}

/// Mean of the last `period` values, if there are that many.
fn trailing_mean(values: &[f64], period: usize) -> Option<f64> {
    match rolling::sma(values, period) {
        Ok(sma) => rolling::last_defined(&sma),
        Err(e) => {
            tracing::warn!(error = %e, period, "Moving average unavailable");
            None
        }
    }
}

fn bollinger(closes: &[f64], ma_20: Option<f64>) -> (Option<f64>, Option<f64>, Option<f64>) {
    let std_20 = rolling::last_defined(&rolling::rolling_std(closes, BOLLINGER_PERIOD));
    match (ma_20, std_20) {
        (Some(mid), Some(std)) => {
            let upper = mid + BOLLINGER_STD_DEV * std;
            let lower = mid - BOLLINGER_STD_DEV * std;
            (Some(upper), Some(lower), Some(upper - lower))
        }
        _ => (None, None, None),
    }
}

/// Percent distance of `price` from a moving average; 0 when the average is missing or zero.
fn distance_pct(price: f64, ma: Option<f64>) -> f64 {
    match ma {
        Some(ma) if ma != 0.0 => (price - ma) / ma * 100.0,
        _ => 0.0,
    }
}

/// Percent change from the close `lookback` records ago to the last close.
fn momentum_pct(closes: &[f64], lookback: usize) -> f64 {
    if closes.len() < lookback + 1 {
        return 0.0;
    }
    let current = closes[closes.len() - 1];
    let past = closes[closes.len() - 1 - lookback];
    if past == 0.0 {
        return 0.0;
    }
    (current - past) / past * 100.0
}
