//! # SimVestor Engine
//!
//! Wires the calculators into a single simulation run: one price history and one
//! set of `SimulationSettings` in, one `SimulationReport` out.
//!
//! Only the realized return is required. Every other sub-feature degrades on its own:
//! indicators fall back to neutral values, insights to a single fallback message, and
//! the forecast to `None`.

use analytics::{
    IndicatorEngine, IndicatorSet, Insight, InsightGenerator, ReturnCalculator, ReturnResult,
    annualized_return_pct,
};
use chrono::NaiveDate;
use configuration::{Config, SimulationSettings};
use core_types::{DataQualityReport, PriceSeries};
use forecaster::{ForecastEngine, ForecastResult};
use serde::{Deserialize, Serialize};

pub mod error;

pub use error::EngineError;

/// Everything one simulation run produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub sector: Option<String>,
    pub returns: ReturnResult,
    /// Compounded over calendar days between the first and last record.
    pub annualized_return_pct: f64,
    pub indicators: IndicatorSet,
    pub insights: Vec<Insight>,
    pub forecast: Option<ForecastResult>,
    pub data_quality: DataQualityReport,
}

/// The orchestrator for simulation runs. Holds no state beyond its calculators.
#[derive(Debug, Clone)]
pub struct SimulationEngine {
    config: Config,
    returns: ReturnCalculator,
    indicators: IndicatorEngine,
    insights: InsightGenerator,
    forecaster: ForecastEngine,
}

impl SimulationEngine {
    /// Validates `config` and builds every calculator from it.
    pub fn new(config: Config) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self {
            returns: ReturnCalculator::with_settings(config.returns.clone()),
            indicators: IndicatorEngine::new(),
            insights: InsightGenerator::with_thresholds(config.insights.clone()),
            forecaster: ForecastEngine::with_settings(config.forecast.clone()),
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs a simulation with the configured `[simulation]` settings.
    pub fn run(&self, history: &PriceSeries) -> Result<SimulationReport, EngineError> {
        self.run_with(&self.config.simulation, history)
    }

    /// Runs a simulation over the part of `history` on or after `request.start_date`.
    ///
    /// # Errors
    ///
    /// * `EmptySeries` / `NoDataInRange` - nothing to invest in.
    /// * `Analytics` - the realized return could not be computed.
    pub fn run_with(
        &self,
        request: &SimulationSettings,
        history: &PriceSeries,
    ) -> Result<SimulationReport, EngineError> {
        let series = match request.start_date {
            Some(start) => {
                let window = history.since(start);
                if window.is_empty() {
                    return Err(EngineError::NoDataInRange(start));
                }
                window
            }
            None => history.clone(),
        };
        let (Some(start_date), Some(end_date)) = (series.first_date(), series.last_date()) else {
            return Err(EngineError::EmptySeries);
        };

        tracing::info!(
            %start_date,
            %end_date,
            records = series.len(),
            amount = request.investment_amount,
            "Starting simulation"
        );

        let data_quality = series.quality_report();
        for warning in &data_quality.warnings {
            tracing::warn!(%warning, "Data quality");
        }

        let returns = self.returns.compute(&series, request.investment_amount)?;
        let annualized_return_pct =
            annualized_return_pct(returns.percent_return, series.calendar_span_days());

        let indicators = self.indicators.compute(&series);
        let insights = self
            .insights
            .generate(&returns, &indicators, request.sector.as_deref());

        let forecast = if request.days_ahead > 0 {
            self.forecaster.forecast(&series, request.days_ahead)
        } else {
            None
        };

        tracing::info!(
            percent_return = returns.percent_return,
            insights = insights.len(),
            forecast = forecast.is_some(),
            "Simulation complete"
        );

        Ok(SimulationReport {
            start_date,
            end_date,
            sector: request.sector.clone(),
            returns,
            annualized_return_pct,
            indicators,
            insights,
            forecast,
            data_quality,
        })
    }
}
