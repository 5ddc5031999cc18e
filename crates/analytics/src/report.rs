use serde::{Deserialize, Serialize};

/// The realized outcome of holding a position over a price series.
///
/// This struct is the output of the `ReturnCalculator`; it is consumed by the
/// `InsightGenerator` and handed as-is to whatever presents or exports results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnResult {
    // I. Prices and position
    pub initial_price: f64,
    pub final_price: f64,
    pub shares: f64,

    // II. Profitability
    pub initial_investment: f64,
    pub final_value: f64,
    pub total_return: f64,
    pub percent_return: f64,

    // III. Risk
    pub volatility_annualized_pct: f64,
    pub max_drawdown_pct: f64, // <= 0

    // IV. Time
    /// Number of trading days (records) in the series, not calendar days.
    pub days_invested: usize,
}

impl ReturnResult {
    /// True when every numeric field is finite.
    pub fn is_finite(&self) -> bool {
        [
            self.initial_price,
            self.final_price,
            self.shares,
            self.initial_investment,
            self.final_value,
            self.total_return,
            self.percent_return,
            self.volatility_annualized_pct,
            self.max_drawdown_pct,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}
