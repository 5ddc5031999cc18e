use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use error::ConfigError;
pub use settings::{
    Config, ForecastSettings, InsightThresholds, ReturnSettings, SimulationSettings,
};

/// Default file name looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "simvestor";

/// Loads the application configuration.
///
/// With `path = None` the builder looks for an optional `simvestor.toml` in the working
/// directory; if it is absent, every setting takes its default. With an explicit path the
/// file must exist. The result is validated before it is returned.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let source = match path {
        Some(path) => config::File::from(path).required(true),
        None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };

    let builder = config::Config::builder().add_source(source).build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    tracing::debug!(?config, "Configuration loaded");
    Ok(config)
}

impl Config {
    /// Rejects settings the analytics components cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sim = &self.simulation;
        if !sim.investment_amount.is_finite() || sim.investment_amount <= 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "simulation.investment_amount must be positive, got {}",
                sim.investment_amount
            )));
        }

        if !(self.returns.trading_days_per_year > 0.0) {
            return Err(ConfigError::ValidationError(
                "returns.trading_days_per_year must be positive".to_string(),
            ));
        }

        let insights = &self.insights;
        if insights.good_return_pct > insights.strong_return_pct {
            return Err(ConfigError::ValidationError(
                "insights.good_return_pct cannot exceed insights.strong_return_pct".to_string(),
            ));
        }
        if insights.moderate_volatility_pct > insights.high_volatility_pct {
            return Err(ConfigError::ValidationError(
                "insights.moderate_volatility_pct cannot exceed insights.high_volatility_pct"
                    .to_string(),
            ));
        }
        if insights.rsi_oversold >= insights.rsi_overbought {
            return Err(ConfigError::ValidationError(
                "insights.rsi_oversold must be below insights.rsi_overbought".to_string(),
            ));
        }

        let forecast = &self.forecast;
        if !(forecast.train_fraction > 0.0 && forecast.train_fraction < 1.0) {
            return Err(ConfigError::ValidationError(format!(
                "forecast.train_fraction must be in (0, 1), got {}",
                forecast.train_fraction
            )));
        }
        if forecast.short_ma_period == 0 || forecast.long_ma_period == 0 || forecast.rsi_period == 0
        {
            return Err(ConfigError::ValidationError(
                "forecast indicator periods cannot be zero".to_string(),
            ));
        }
        if forecast.n_trees == 0 {
            return Err(ConfigError::ValidationError(
                "forecast.n_trees cannot be zero".to_string(),
            ));
        }
        if forecast.min_usable_rows < 2 {
            return Err(ConfigError::ValidationError(
                "forecast.min_usable_rows must leave room for a train and a test row".to_string(),
            ));
        }

        Ok(())
    }
}
