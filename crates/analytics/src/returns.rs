use crate::error::AnalyticsError;
use crate::report::ReturnResult;
use crate::rolling;
use configuration::ReturnSettings;
use core_types::PriceSeries;

/// A stateless calculator for the realized return and risk of a buy-and-hold position.
#[derive(Debug, Clone, Default)]
pub struct ReturnCalculator {
    settings: ReturnSettings,
}

impl ReturnCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: ReturnSettings) -> Self {
        Self { settings }
    }

    /// The main entry point: buys `investment_amount` worth of shares at the first close
    /// and values them at the last close.
    ///
    /// # Errors
    ///
    /// * `InsufficientData` - fewer than two records, so no daily change exists.
    /// * `InvalidPrice` - the first close is not positive.
    /// * `InvalidInvestment` - the amount is not a positive, finite number.
    pub fn compute(
        &self,
        series: &PriceSeries,
        investment_amount: f64,
    ) -> Result<ReturnResult, AnalyticsError> {
        let closes = series.closes();
        if closes.len() < 2 {
            return Err(AnalyticsError::InsufficientData {
                required: 2,
                actual: closes.len(),
            });
        }
        if !investment_amount.is_finite() || investment_amount <= 0.0 {
            return Err(AnalyticsError::InvalidInvestment(investment_amount));
        }

        let initial_price = closes[0];
        let final_price = closes[closes.len() - 1];
        if initial_price <= 0.0 {
            return Err(AnalyticsError::InvalidPrice(initial_price));
        }

        let shares = investment_amount / initial_price;
        let final_value = shares * final_price;

        let daily = daily_returns(&closes);
        let volatility_annualized_pct = self.annualized_volatility_pct(&daily);
        let max_drawdown_pct = max_drawdown_pct(&daily);

        let result = ReturnResult {
            initial_price,
            final_price,
            shares,
            initial_investment: investment_amount,
            final_value,
            total_return: final_value - investment_amount,
            percent_return: (final_value / investment_amount - 1.0) * 100.0,
            volatility_annualized_pct,
            max_drawdown_pct,
            days_invested: closes.len(),
        };

        // A zero close mid-series turns the next daily return into inf/NaN.
        if !result.is_finite() {
            tracing::error!(?result, "Return calculation produced non-finite values");
            return Err(AnalyticsError::InternalComputation(
                "non-finite value in return metrics".to_string(),
            ));
        }

        tracing::debug!(
            percent_return = result.percent_return,
            volatility = result.volatility_annualized_pct,
            max_drawdown = result.max_drawdown_pct,
            days = result.days_invested,
            "Computed returns"
        );
        Ok(result)
    }

    /// Sample standard deviation of daily returns, annualized, in percent.
    fn annualized_volatility_pct(&self, daily: &[f64]) -> f64 {
        match rolling::sample_std_dev(daily) {
            Some(std_dev) => std_dev * self.settings.trading_days_per_year.sqrt() * 100.0,
            None => 0.0,
        }
    }
}

/// Simple returns `close[t] / close[t-1] - 1`; one shorter than the input.
fn daily_returns(closes: &[f64]) -> Vec<f64> {
    closes.windows(2).map(|w| w[1] / w[0] - 1.0).collect()
}

/// Worst peak-to-trough decline of the compounded return curve, in percent (<= 0).
fn max_drawdown_pct(daily: &[f64]) -> f64 {
    let mut cumulative = 1.0;
    let mut peak = f64::MIN;
    let mut worst: f64 = 0.0;

    for r in daily {
        cumulative *= 1.0 + r;
        if cumulative > peak {
            peak = cumulative;
        }
        let drawdown = (cumulative - peak) / peak;
        worst = worst.min(drawdown);
    }

    worst * 100.0
}

/// Compounds a total percent return into an annual rate over `calendar_days`.
///
/// Returns 0 for an empty period.
pub fn annualized_return_pct(percent_return: f64, calendar_days: i64) -> f64 {
    if calendar_days <= 0 {
        return 0.0;
    }
    ((1.0 + percent_return / 100.0).powf(365.0 / calendar_days as f64) - 1.0) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Days, NaiveDate};

    fn series(closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        PriceSeries::from_closes(
            closes
                .iter()
                .enumerate()
                .map(|(i, c)| (start + Days::new(i as u64), *c)),
        )
        .unwrap()
    }

    #[test]
    fn single_record_is_insufficient() {
        let err = ReturnCalculator::new()
            .compute(&series(&[100.0]), 1000.0)
            .unwrap_err();
        assert_eq!(
            err,
            AnalyticsError::InsufficientData {
                required: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn zero_first_close_is_invalid_price() {
        let err = ReturnCalculator::new()
            .compute(&series(&[0.0, 10.0]), 1000.0)
            .unwrap_err();
        assert_eq!(err, AnalyticsError::InvalidPrice(0.0));
    }

    #[test]
    fn zero_investment_is_rejected() {
        let err = ReturnCalculator::new()
            .compute(&series(&[10.0, 11.0]), 0.0)
            .unwrap_err();
        assert_eq!(err, AnalyticsError::InvalidInvestment(0.0));
    }

    #[test]
    fn two_records_have_zero_volatility() {
        let result = ReturnCalculator::new()
            .compute(&series(&[10.0, 12.0]), 100.0)
            .unwrap();
        assert_eq!(result.volatility_annualized_pct, 0.0);
        assert!((result.percent_return - 20.0).abs() < 1e-9);
        assert!((result.total_return - 20.0).abs() < 1e-9);
    }

    #[test]
    fn drawdown_measures_peak_to_trough() {
        // Peak 120, trough 90 => -25%.
        let result = ReturnCalculator::new()
            .compute(&series(&[100.0, 120.0, 90.0, 110.0]), 1000.0)
            .unwrap();
        assert!((result.max_drawdown_pct + 25.0).abs() < 1e-9);
    }

    #[test]
    fn running_peak_starts_at_first_compounded_value() {
        // The curve is [0.8, 0.6]; the first daily move sets the peak.
        let result = ReturnCalculator::new()
            .compute(&series(&[100.0, 80.0, 60.0]), 1000.0)
            .unwrap();
        assert!((result.max_drawdown_pct + 25.0).abs() < 1e-9);
    }

    #[test]
    fn volatility_uses_sample_std_dev() {
        // Daily returns: +10%, -10%. Sample std = sqrt(0.02) = 0.141421...
        let result = ReturnCalculator::new()
            .compute(&series(&[100.0, 110.0, 99.0]), 1000.0)
            .unwrap();
        let expected = 0.02f64.sqrt() * 252f64.sqrt() * 100.0;
        assert!((result.volatility_annualized_pct - expected).abs() < 1e-9);
    }

    #[test]
    fn annualizes_over_calendar_days() {
        assert_eq!(annualized_return_pct(50.0, 0), 0.0);
        assert!((annualized_return_pct(10.0, 365) - 10.0).abs() < 1e-9);
        // 21% over two years is 10% a year.
        assert!((annualized_return_pct(21.0, 730) - 10.0).abs() < 1e-9);
    }
}
