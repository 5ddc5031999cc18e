use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Table};
use configuration::{Config, SimulationSettings, load_config};
use core_types::PriceSeries;
use engine::{SimulationEngine, SimulationReport};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// The main entry point for the SimVestor simulator.
fn main() -> Result<()> {
    // A local .env may set RUST_LOG; it is optional.
    dotenvy::dotenv().ok();

    // Logs go to stderr so `--json` output stays machine-readable.
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate(args) => handle_simulate(args)?,
    }

    Ok(())
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Simulates a historical buy-and-hold investment and projects it forward.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one simulation over a daily price history.
    Simulate(SimulateArgs),
}

#[derive(Parser)]
struct SimulateArgs {
    /// JSON array of daily bars: `{"date", "open", "high", "low", "close", "volume"}`.
    #[arg(long)]
    prices: PathBuf,

    /// TOML settings file. Defaults to `simvestor.toml` when present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// The amount invested on the first trading day.
    #[arg(long)]
    amount: Option<f64>,

    /// Investment start date (format: YYYY-MM-DD).
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Sector label for the insight rules (e.g., "Technology").
    #[arg(long)]
    sector: Option<String>,

    /// Forecast horizon in days; 0 disables the forecast.
    #[arg(long)]
    days_ahead: Option<usize>,

    /// Print the full report as JSON instead of tables.
    #[arg(long)]
    json: bool,
}

impl SimulateArgs {
    /// The configured `[simulation]` section with every given flag applied on top.
    fn settings(&self, config: &Config) -> SimulationSettings {
        let mut settings = config.simulation.clone();
        if let Some(amount) = self.amount {
            settings.investment_amount = amount;
        }
        if let Some(start) = self.start {
            settings.start_date = Some(start);
        }
        if let Some(sector) = &self.sector {
            settings.sector = Some(sector.clone());
        }
        if let Some(days_ahead) = self.days_ahead {
            settings.days_ahead = days_ahead;
        }
        settings
    }
}

// ==============================================================================
// Simulate Command Logic
// ==============================================================================

fn handle_simulate(args: SimulateArgs) -> Result<()> {
    let config = load_config(args.config.as_deref()).context("Failed to load configuration")?;
    let history = read_prices(&args.prices)?;

    let engine = SimulationEngine::new(config)?;
    let settings = args.settings(engine.config());
    let report = engine
        .run_with(&settings, &history)
        .context("Simulation failed")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn read_prices(path: &Path) -> Result<PriceSeries> {
    let file = File::open(path).with_context(|| format!("Failed to open price file {path:?}"))?;
    let series: PriceSeries = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse price file {path:?}"))?;
    tracing::debug!(records = series.len(), "Loaded price history");
    Ok(series)
}

fn print_report(report: &SimulationReport) {
    let r = &report.returns;
    println!(
        "\nSimulation {} -> {}{}",
        report.start_date,
        report.end_date,
        report
            .sector
            .as_deref()
            .map(|s| format!(" ({s})"))
            .unwrap_or_default()
    );

    let mut table = new_table(vec!["Metric", "Value"]);
    table.add_row(vec![Cell::new("Initial Price"), Cell::new(format!("{:.2}", r.initial_price))]);
    table.add_row(vec![Cell::new("Final Price"), Cell::new(format!("{:.2}", r.final_price))]);
    table.add_row(vec![Cell::new("Shares"), Cell::new(format!("{:.4}", r.shares))]);
    table.add_row(vec![Cell::new("Invested"), Cell::new(format!("{:.2}", r.initial_investment))]);
    table.add_row(vec![Cell::new("Final Value"), Cell::new(format!("{:.2}", r.final_value))]);
    table.add_row(vec![Cell::new("Total Return"), Cell::new(format!("{:+.2}", r.total_return))]);
    table.add_row(vec![Cell::new("Return"), Cell::new(format!("{:+.2}%", r.percent_return))]);
    table.add_row(vec![
        Cell::new("Annualized Return"),
        Cell::new(format!("{:+.2}%", report.annualized_return_pct)),
    ]);
    table.add_row(vec![
        Cell::new("Volatility (annualized)"),
        Cell::new(format!("{:.2}%", r.volatility_annualized_pct)),
    ]);
    table.add_row(vec![Cell::new("Max Drawdown"), Cell::new(format!("{:.2}%", r.max_drawdown_pct))]);
    table.add_row(vec![Cell::new("Trading Days"), Cell::new(r.days_invested)]);
    println!("{table}");

    let indicators = report.indicators.to_map();
    if !indicators.is_empty() {
        let mut table = new_table(vec!["Indicator", "Value"]);
        for (name, value) in indicators {
            table.add_row(vec![Cell::new(name), Cell::new(format!("{value:.2}"))]);
        }
        println!("\nTechnical Indicators\n{table}");
    }

    println!("\nInsights");
    for insight in &report.insights {
        println!("  - {insight}");
    }

    match &report.forecast {
        Some(forecast) => {
            println!(
                "\nForecast ({}, MSE {:.4}, accuracy {:.1}%)",
                forecast.model_name,
                forecast.mean_squared_error,
                forecast.accuracy_score * 100.0
            );
            let mut table = new_table(vec!["Date", "Predicted Close"]);
            for (date, price) in forecast.points() {
                table.add_row(vec![Cell::new(date), Cell::new(format!("{price:.2}"))]);
            }
            println!("{table}");
            println!("  Note: projections reuse the most recent feature rows as future inputs.");
        }
        None => println!("\nForecast unavailable for this history."),
    }

    if !report.data_quality.is_clean() {
        println!("\nData Quality");
        for warning in &report.data_quality.warnings {
            println!("  ! {warning}");
        }
    }
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(header);
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn args(prices: PathBuf) -> SimulateArgs {
        SimulateArgs {
            prices,
            config: None,
            amount: None,
            start: None,
            sector: None,
            days_ahead: None,
            json: false,
        }
    }

    #[test]
    fn flags_override_configured_settings() {
        let mut a = args(PathBuf::from("prices.json"));
        a.amount = Some(2_500.0);
        a.days_ahead = Some(0);
        a.sector = Some("Healthcare".to_string());

        let settings = a.settings(&Config::default());
        assert_eq!(settings.investment_amount, 2_500.0);
        assert_eq!(settings.days_ahead, 0);
        assert_eq!(settings.sector.as_deref(), Some("Healthcare"));
        assert_eq!(settings.start_date, None);
    }

    #[test]
    fn missing_flags_keep_configured_settings() {
        let settings = args(PathBuf::from("prices.json")).settings(&Config::default());
        assert_eq!(settings, SimulationSettings::default());
    }

    #[test]
    fn reads_a_json_price_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"date": "2024-01-02", "open": 10.0, "high": 11.0, "low": 9.5, "close": 10.5, "volume": 1000}},
                {{"date": "2024-01-03", "open": 10.5, "high": 12.0, "low": 10.0, "close": 11.5}}
            ]"#
        )
        .unwrap();

        let series = read_prices(file.path()).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.closes(), vec![10.5, 11.5]);
        assert!(!series.has_volume());
    }

    #[test]
    fn rejects_unordered_price_files() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"date": "2024-01-03", "open": 1.0, "high": 1.0, "low": 1.0, "close": 1.0}},
                {{"date": "2024-01-02", "open": 1.0, "high": 1.0, "low": 1.0, "close": 1.0}}
            ]"#
        )
        .unwrap();
        assert!(read_prices(file.path()).is_err());
    }
}
