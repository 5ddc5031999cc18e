use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Holdout score of one candidate that fitted successfully.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelScore {
    pub model_name: String,
    pub mean_squared_error: f64,
}

/// A forward price projection from the model that scored best on the holdout.
///
/// `predicted_dates` and `predicted_prices` are index-aligned and of equal length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub predicted_dates: Vec<NaiveDate>,
    pub predicted_prices: Vec<f64>,
    pub model_name: String,
    pub mean_squared_error: f64,
    /// `1 - rmse / mean(test targets)`. Negative when the error exceeds the mean price.
    pub accuracy_score: f64,
    /// Every candidate that produced a finite score, in evaluation order.
    pub candidates: Vec<ModelScore>,
}

impl ForecastResult {
    pub fn len(&self) -> usize {
        self.predicted_prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicted_prices.is_empty()
    }

    /// `(date, price)` pairs in date order.
    pub fn points(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.predicted_dates
            .iter()
            .copied()
            .zip(self.predicted_prices.iter().copied())
    }
}
