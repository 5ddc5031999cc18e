use chrono::NaiveDate;
use serde::Deserialize;

/// The root configuration structure for the entire application.
///
/// Every section is optional in the TOML file; a missing section or key falls back
/// to the defaults below.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub simulation: SimulationSettings,
    pub returns: ReturnSettings,
    pub insights: InsightThresholds,
    pub forecast: ForecastSettings,
}

/// Parameters for a single simulation run. CLI flags override these.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// The amount invested on the first trading day.
    pub investment_amount: f64,
    /// Investment start date. `None` means the start of the supplied history.
    pub start_date: Option<NaiveDate>,
    /// Free-form sector label used by the insight rules (e.g., "Technology").
    pub sector: Option<String>,
    /// Forecast horizon in calendar days. `0` disables the forecast.
    pub days_ahead: usize,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            investment_amount: 10_000.0,
            start_date: None,
            sector: None,
            days_ahead: 30,
        }
    }
}

/// Parameters for the realized return and risk calculation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReturnSettings {
    /// Annualization factor for daily volatility.
    pub trading_days_per_year: f64,
}

impl Default for ReturnSettings {
    fn default() -> Self {
        Self {
            trading_days_per_year: 252.0,
        }
    }
}

/// Thresholds for the rule-based insight ladder. Percentages are in percent units.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct InsightThresholds {
    pub strong_return_pct: f64,
    pub good_return_pct: f64,
    pub high_volatility_pct: f64,
    pub moderate_volatility_pct: f64,
    pub rsi_overbought: f64,
    pub rsi_oversold: f64,
    /// Distance from the 20-day MA, in percent, that counts as trending.
    pub trend_band_pct: f64,
    /// Max drawdown (negative) below which a warning is emitted.
    pub drawdown_warning_pct: f64,
}

impl Default for InsightThresholds {
    fn default() -> Self {
        Self {
            strong_return_pct: 20.0,
            good_return_pct: 10.0,
            high_volatility_pct: 40.0,
            moderate_volatility_pct: 25.0,
            rsi_overbought: 70.0,
            rsi_oversold: 30.0,
            trend_band_pct: 5.0,
            drawdown_warning_pct: -30.0,
        }
    }
}

/// Parameters for feature engineering, the holdout split and the candidate models.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ForecastSettings {
    /// Raw records required before a forecast is attempted.
    pub min_history: usize,
    /// Feature rows required after undefined leading rows are dropped.
    pub min_usable_rows: usize,
    pub short_ma_period: usize,
    pub long_ma_period: usize,
    pub rsi_period: usize,
    /// Fraction of usable rows (oldest first) used for training.
    pub train_fraction: f64,
    pub n_trees: u16,
    pub max_depth: Option<u16>,
    /// Seed for the ensemble model. Fixed so forecasts are reproducible.
    pub seed: u64,
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self {
            min_history: 30,
            min_usable_rows: 10,
            short_ma_period: 7,
            long_ma_period: 21,
            rsi_period: 14,
            train_fraction: 0.8,
            n_trees: 50,
            max_depth: None,
            seed: 42,
        }
    }
}
