#[cfg(feature = "smartcore")]
use crate::models::CandidateModel;
use crate::result::ForecastResult;
#[cfg(feature = "smartcore")]
use crate::result::ModelScore;
use analytics::AnalyticsError;
#[cfg(feature = "smartcore")]
use chrono::Days;
use chrono::NaiveDate;
use configuration::ForecastSettings;
use core_types::PriceSeries;
use ml_features::FeatureWindows;
use ndarray::Array2;

/// Trains both candidates on a chronological holdout split and projects the winner
/// forward.
///
/// The projection feeds the last `days_ahead` observed feature rows to the model as
/// stand-ins for the unknown future rows. It is a known modeling limitation: the
/// forecast is a re-reading of recent history, not a simulation of it. A horizon longer
/// than the usable history is shortened to every usable row.
#[derive(Debug, Clone, Default)]
pub struct ForecastEngine {
    settings: ForecastSettings,
}

/// The usable feature rows of a series, split point included.
#[derive(Debug)]
struct Dataset {
    features: Array2<f64>,
    targets: Vec<f64>,
    split: usize,
    /// Projected points: `days_ahead`, capped at the usable rows.
    horizon: usize,
    last_date: NaiveDate,
}

impl ForecastEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: ForecastSettings) -> Self {
        Self { settings }
    }

    /// Returns `None` whenever no forecast can be produced. Expected shortfalls (too
    /// little history, an unsupported horizon, no backend) are logged at debug level;
    /// anything else is logged as an error.
    pub fn forecast(&self, series: &PriceSeries, days_ahead: usize) -> Option<ForecastResult> {
        match self.try_forecast(series, days_ahead) {
            Ok(result) => Some(result),
            Err(
                e @ (AnalyticsError::InsufficientData { .. }
                | AnalyticsError::InvalidHorizon { .. }
                | AnalyticsError::ModelUnavailable(_)),
            ) => {
                tracing::debug!(error = %e, days_ahead, "No forecast");
                None
            }
            Err(e) => {
                tracing::error!(error = %e, days_ahead, "Forecast failed");
                None
            }
        }
    }

    /// # Errors
    ///
    /// * `InsufficientData` - fewer than `min_history` records or `min_usable_rows` rows.
    /// * `InvalidHorizon` - `days_ahead` is zero.
    /// * `ModelUnavailable` - built without the `smartcore` feature.
    /// * `InternalComputation` - no candidate produced a finite score, or the
    ///   projection is not finite.
    pub fn try_forecast(
        &self,
        series: &PriceSeries,
        days_ahead: usize,
    ) -> Result<ForecastResult, AnalyticsError> {
        let dataset = self.prepare(series, days_ahead)?;

        #[cfg(not(feature = "smartcore"))]
        {
            tracing::debug!(
                shape = ?dataset.features.dim(),
                targets = dataset.targets.len(),
                train = dataset.split,
                horizon = dataset.horizon,
                last_date = %dataset.last_date,
                "Forecast dataset ready, but no regressor backend"
            );
            Err(AnalyticsError::ModelUnavailable(
                "built without the `smartcore` feature".to_string(),
            ))
        }

        #[cfg(feature = "smartcore")]
        {
            self.fit_and_project(&dataset)
        }
    }

    fn windows(&self) -> FeatureWindows {
        FeatureWindows {
            short_ma: self.settings.short_ma_period,
            long_ma: self.settings.long_ma_period,
            rsi: self.settings.rsi_period,
        }
    }

    fn prepare(&self, series: &PriceSeries, days_ahead: usize) -> Result<Dataset, AnalyticsError> {
        let Some(last_date) = series.last_date() else {
            return Err(AnalyticsError::InsufficientData {
                required: self.settings.min_history,
                actual: 0,
            });
        };
        if series.len() < self.settings.min_history {
            return Err(AnalyticsError::InsufficientData {
                required: self.settings.min_history,
                actual: series.len(),
            });
        }

        let (features, targets) = ml_features::generate_features(series, &self.windows())
            .and_then(|df| ml_features::usable_rows(&df))
            .and_then(|df| ml_features::to_arrays(&df))
            .map_err(|e| AnalyticsError::InternalComputation(format!("{e:#}")))?;

        let rows = targets.len();
        if rows < self.settings.min_usable_rows {
            return Err(AnalyticsError::InsufficientData {
                required: self.settings.min_usable_rows,
                actual: rows,
            });
        }
        if days_ahead == 0 {
            return Err(AnalyticsError::InvalidHorizon {
                requested: days_ahead,
                available: rows,
            });
        }
        let horizon = days_ahead.min(rows);
        if horizon < days_ahead {
            tracing::debug!(days_ahead, horizon, "Horizon capped at the usable rows");
        }

        let split = (rows as f64 * self.settings.train_fraction) as usize;
        if split == 0 || split >= rows {
            return Err(AnalyticsError::InternalComputation(format!(
                "a {} split of {rows} rows leaves an empty partition",
                self.settings.train_fraction
            )));
        }

        tracing::debug!(rows, train = split, test = rows - split, "Prepared forecast dataset");
        Ok(Dataset {
            features,
            targets,
            split,
            horizon,
            last_date,
        })
    }

    #[cfg(feature = "smartcore")]
    fn fit_and_project(&self, dataset: &Dataset) -> Result<ForecastResult, AnalyticsError> {
        use crate::models::{Regressor, to_dense};
        use crate::scaler::MinMaxScaler;
        use ndarray::s;

        let split = dataset.split;
        let rows = dataset.targets.len();
        let horizon = dataset.horizon;

        // Scaling statistics come from the training partition only.
        let mut scaler = MinMaxScaler::new();
        scaler.fit(dataset.features.slice(s![..split, ..]))?;
        let x_train = to_dense(scaler.transform(dataset.features.slice(s![..split, ..]))?.view())?;
        let x_test = to_dense(scaler.transform(dataset.features.slice(s![split.., ..]))?.view())?;
        let x_future =
            to_dense(scaler.transform(dataset.features.slice(s![rows - horizon.., ..]))?.view())?;

        let y_train = dataset.targets[..split].to_vec();
        let y_test = dataset.targets[split..].to_vec();

        let evaluate = |model: CandidateModel| -> Result<(Regressor, f64), AnalyticsError> {
            let regressor = Regressor::fit(model, &x_train, &y_train, &self.settings)?;
            let predicted = regressor.predict(&x_test)?;
            let mse = smartcore::metrics::mean_squared_error(&y_test, &predicted);
            Ok((regressor, mse))
        };

        let (linear, forest) = rayon::join(
            || evaluate(CandidateModel::LinearRegression),
            || evaluate(CandidateModel::RandomForest),
        );

        let mut fitted = Vec::with_capacity(CandidateModel::ALL.len());
        for (model, outcome) in CandidateModel::ALL.into_iter().zip([linear, forest]) {
            match outcome {
                Ok((regressor, mse)) if mse.is_finite() => {
                    tracing::debug!(model = model.name(), mse, "Scored candidate");
                    fitted.push((model, regressor, mse));
                }
                Ok((_, mse)) => {
                    tracing::warn!(model = model.name(), mse, "Dropping candidate with non-finite score");
                }
                Err(e) => {
                    tracing::warn!(model = model.name(), error = %e, "Dropping candidate");
                }
            }
        }

        let candidates: Vec<ModelScore> = fitted
            .iter()
            .map(|(model, _, mse)| ModelScore {
                model_name: model.name().to_string(),
                mean_squared_error: *mse,
            })
            .collect();
        let best = select_best(&candidates).ok_or_else(|| {
            AnalyticsError::InternalComputation("no candidate model could be scored".to_string())
        })?;
        let (model, regressor, mse) = &fitted[best];

        let predicted_prices = regressor.predict(&x_future)?;
        if predicted_prices.len() != horizon || predicted_prices.iter().any(|p| !p.is_finite()) {
            return Err(AnalyticsError::InternalComputation(format!(
                "{model} produced an invalid projection"
            )));
        }

        let test_mean = analytics::rolling::mean(&y_test).unwrap_or(0.0);
        if test_mean == 0.0 {
            return Err(AnalyticsError::InternalComputation(
                "mean test price is zero; accuracy is undefined".to_string(),
            ));
        }
        let accuracy_score = 1.0 - mse.sqrt() / test_mean;

        let result = ForecastResult {
            predicted_dates: future_dates(dataset.last_date, horizon)?,
            predicted_prices,
            model_name: model.name().to_string(),
            mean_squared_error: *mse,
            accuracy_score,
            candidates,
        };

        tracing::info!(
            model = %result.model_name,
            mse = result.mean_squared_error,
            accuracy = result.accuracy_score,
            horizon,
            "Forecast complete"
        );
        Ok(result)
    }
}

/// Index of the lowest score. Ties keep the earlier candidate.
#[cfg(feature = "smartcore")]
fn select_best(scores: &[ModelScore]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, score) in scores.iter().enumerate() {
        match best {
            Some(b) if score.mean_squared_error >= scores[b].mean_squared_error => {}
            _ => best = Some(i),
        }
    }
    best
}

/// `count` consecutive calendar days after `last`. Weekends are not skipped.
#[cfg(feature = "smartcore")]
fn future_dates(last: NaiveDate, count: usize) -> Result<Vec<NaiveDate>, AnalyticsError> {
    (1..=count as u64)
        .map(|i| {
            last.checked_add_days(Days::new(i)).ok_or_else(|| {
                AnalyticsError::InternalComputation(format!("date overflow after {last}"))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;

    fn series(len: u64) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        PriceSeries::from_closes(
            (0..len).map(|i| (start + Days::new(i), 100.0 + (i as f64 * 0.5).sin())),
        )
        .unwrap()
    }

    #[cfg(feature = "smartcore")]
    fn score(name: &str, mse: f64) -> ModelScore {
        ModelScore {
            model_name: name.to_string(),
            mean_squared_error: mse,
        }
    }

    #[cfg(feature = "smartcore")]
    #[test]
    fn lower_error_wins() {
        let scores = [score("Linear Regression", 4.0), score("Random Forest", 1.5)];
        assert_eq!(select_best(&scores), Some(1));
    }

    #[cfg(feature = "smartcore")]
    #[test]
    fn ties_keep_the_first_candidate() {
        let scores = [score("Linear Regression", 2.0), score("Random Forest", 2.0)];
        assert_eq!(select_best(&scores), Some(0));
        assert_eq!(select_best(&[]), None);
    }

    #[cfg(feature = "smartcore")]
    #[test]
    fn dates_are_consecutive_calendar_days() {
        // 2024-03-01 is a Friday; the weekend is included.
        let last = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let dates = future_dates(last, 3).unwrap();
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
                NaiveDate::from_ymd_opt(2024, 3, 3).unwrap(),
                NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            ]
        );
    }

    #[test]
    fn short_history_is_insufficient() {
        let engine = ForecastEngine::new();
        let short = series(29);

        assert_eq!(
            engine.prepare(&short, 5).unwrap_err(),
            AnalyticsError::InsufficientData {
                required: 30,
                actual: 29
            }
        );
        assert!(engine.forecast(&short, 5).is_none());
    }

    #[test]
    fn zero_horizon_is_invalid() {
        assert_eq!(
            ForecastEngine::new().prepare(&series(30), 0).unwrap_err(),
            AnalyticsError::InvalidHorizon {
                requested: 0,
                available: 10
            }
        );
    }

    #[test]
    fn long_horizon_is_capped_at_the_usable_rows() {
        let engine = ForecastEngine::new();

        let dataset = engine.prepare(&series(30), 11).unwrap();
        assert_eq!(dataset.horizon, 10);
        assert_eq!(dataset.split, 8);
        assert_eq!(dataset.features.dim(), (10, 3));

        let dataset = engine.prepare(&series(45), 30).unwrap();
        assert_eq!(dataset.horizon, 25);
        assert_eq!(engine.prepare(&series(45), 7).unwrap().horizon, 7);
    }
}
