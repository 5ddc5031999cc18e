#![cfg(feature = "smartcore")]

use chrono::{Days, NaiveDate};
use configuration::ForecastSettings;
use core_types::PriceSeries;
use forecaster::{CandidateModel, ForecastEngine};

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

fn closes_to_series(closes: &[f64]) -> PriceSeries {
    PriceSeries::from_closes(
        closes
            .iter()
            .enumerate()
            .map(|(i, c)| (start() + Days::new(i as u64), *c)),
    )
    .unwrap()
}

fn sinusoid(len: usize) -> Vec<f64> {
    (0..len)
        .map(|i| 100.0 + 10.0 * (i as f64 * 2.0 * std::f64::consts::PI / 10.0).sin())
        .collect()
}

#[test]
fn fewer_than_thirty_records_give_no_forecast() {
    let engine = ForecastEngine::new();
    assert!(engine.forecast(&closes_to_series(&sinusoid(29)), 7).is_none());
    assert!(engine.forecast(&PriceSeries::default(), 7).is_none());
}

#[test]
fn thirty_sinusoidal_records_forecast_seven_days() {
    // Given: exactly 30 records, which leaves 10 usable feature rows
    let series = closes_to_series(&sinusoid(30));

    // When: forecasting a week ahead
    let result = ForecastEngine::new().forecast(&series, 7).unwrap();

    // Then: 7 aligned points on consecutive days after the last record
    assert_eq!(result.len(), 7);
    assert_eq!(result.predicted_dates.len(), result.predicted_prices.len());
    assert_eq!(result.predicted_dates[0], start() + Days::new(30));
    for pair in result.predicted_dates.windows(2) {
        assert!(pair[0] < pair[1]);
        assert_eq!(pair[1] - pair[0], chrono::Duration::days(1));
    }
    assert!(result.predicted_prices.iter().all(|p| p.is_finite()));
}

#[test]
fn horizon_longer_than_usable_rows_still_forecasts() {
    // Given: 45 records, which leave 25 usable feature rows
    let series = closes_to_series(&sinusoid(45));

    // When: asking for the default 30 day horizon
    let result = ForecastEngine::new().try_forecast(&series, 30).unwrap();

    // Then: every usable row is projected, with one date per price
    assert_eq!(result.len(), 25);
    assert_eq!(result.predicted_dates.len(), result.predicted_prices.len());
    assert_eq!(result.predicted_dates[0], start() + Days::new(45));
    assert_eq!(result.predicted_dates[24], start() + Days::new(69));
}

#[test]
fn zero_horizon_gives_no_forecast() {
    assert!(ForecastEngine::new().forecast(&closes_to_series(&sinusoid(40)), 0).is_none());
}

#[test]
fn winner_has_the_lowest_holdout_error() {
    let closes: Vec<f64> = sinusoid(80)
        .iter()
        .enumerate()
        .map(|(i, c)| c + i as f64 * 0.3)
        .collect();
    let result = ForecastEngine::new()
        .forecast(&closes_to_series(&closes), 10)
        .unwrap();

    assert!(!result.candidates.is_empty());
    let best = result
        .candidates
        .iter()
        .map(|c| c.mean_squared_error)
        .fold(f64::INFINITY, f64::min);
    assert_eq!(result.mean_squared_error, best);

    let names: Vec<&str> = CandidateModel::ALL.iter().map(|m| m.name()).collect();
    assert!(names.contains(&result.model_name.as_str()));
}

#[test]
fn accuracy_is_derived_from_the_test_partition() {
    let closes = sinusoid(30);
    let result = ForecastEngine::new()
        .forecast(&closes_to_series(&closes), 3)
        .unwrap();

    // 10 usable rows (indices 20..30); the last 2 form the test partition.
    let test_mean = (closes[28] + closes[29]) / 2.0;
    let expected = 1.0 - result.mean_squared_error.sqrt() / test_mean;
    assert!((result.accuracy_score - expected).abs() < 1e-12);
}

#[test]
fn accuracy_goes_negative_when_the_test_partition_collapses() {
    // Given: a steady history whose last four closes crash to 1.0
    let mut closes: Vec<f64> = (0..36).map(|i| 100.0 + (i as f64 * 0.5).sin()).collect();
    closes.extend([1.0; 4]);

    // When: the test partition is exactly those four rows
    let result = ForecastEngine::new()
        .forecast(&closes_to_series(&closes), 4)
        .unwrap();

    // Then: the error dwarfs the mean test price and the score is reported as-is
    let expected = 1.0 - result.mean_squared_error.sqrt() / 1.0;
    assert!(result.accuracy_score < 0.0);
    assert!((result.accuracy_score - expected).abs() < 1e-9);
}

#[test]
fn seeded_forecasts_are_reproducible() {
    let series = closes_to_series(&sinusoid(60));
    let engine = ForecastEngine::new();

    let a = engine.forecast(&series, 14).unwrap();
    let b = engine.forecast(&series, 14).unwrap();
    assert_eq!(a, b);
}

#[test]
fn settings_control_the_history_requirement() {
    let settings = ForecastSettings {
        min_history: 60,
        ..ForecastSettings::default()
    };
    let series = closes_to_series(&sinusoid(40));

    assert!(ForecastEngine::new().forecast(&series, 5).is_some());
    assert!(ForecastEngine::with_settings(settings).forecast(&series, 5).is_none());
}

#[test]
fn result_serializes_with_iso_dates() {
    let result = ForecastEngine::new()
        .forecast(&closes_to_series(&sinusoid(30)), 2)
        .unwrap();
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["predicted_dates"][0], "2024-01-31");
    assert_eq!(json["predicted_prices"].as_array().unwrap().len(), 2);
}
