mod config;
mod engine;
mod models;
mod types;

use std::fs;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use config::AnalyticsConfig;
use engine::{evaluate, AnalyticsReport};
use models::{ExponentialRegression, Forecaster, HoltWinters, LinearRegression};
use types::PriceRecord;

#[derive(Parser)]
#[command(name = "bazaar-analytics")]
#[command(version = "0.1.0")]
#[command(about = "Price-history analytics for a marketplace price tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "analytics.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every model over a price history file and emit a JSON report
    Analyze {
        /// JSON file with `{timestamp, buy_price, sell_price}` records
        #[arg(short, long)]
        input: String,

        /// Write the report here instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Score a forecasting model against held-out history
    Backtest {
        /// JSON file with `{timestamp, buy_price, sell_price}` records
        #[arg(short, long)]
        input: String,

        /// Model to score: linear, exponential or holt-winters
        #[arg(short, long, default_value = "linear")]
        model: String,

        /// Trailing samples to hold out (defaults to the configured horizon)
        #[arg(long)]
        horizon: Option<usize>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = AnalyticsConfig::load_or_default(&cli.config)?;

    match cli.command {
        Commands::Analyze { input, output } => {
            run_analyze(&input, output.as_deref(), &config)?;
        }
        Commands::Backtest { input, model, horizon } => {
            run_backtest(&input, &model, horizon, &config)?;
        }
    }

    Ok(())
}

fn load_records(path: &str) -> Result<Vec<PriceRecord>> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("Failed to read history file: {path}"))?;
    let records: Vec<PriceRecord> =
        serde_json::from_str(&raw).with_context(|| format!("Failed to parse history: {path}"))?;
    info!("Loaded {} price records from {path}", records.len());
    Ok(records)
}

fn run_analyze(input: &str, output: Option<&str>, config: &AnalyticsConfig) -> Result<()> {
    let records = load_records(input)?;
    let report = AnalyticsReport::build(&records, config);

    if let (Some(first), Some(last)) = (
        report.buy.first().and_then(|p| p.time()),
        report.buy.last().and_then(|p| p.time()),
    ) {
        info!("History range: {first} to {last}");
    }

    let json = serde_json::to_string_pretty(&report)?;
    match output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("Failed to write report: {path}"))?;
            info!("Report written to {path}");
        }
        None => println!("{json}"),
    }

    if let Some(recommended) = report.summary.recommended {
        info!(
            "Recommended buy: {:.2} | Recommended sell: {:.2}",
            recommended.buy, recommended.sell
        );
    }
    Ok(())
}

fn run_backtest(
    input: &str,
    model_name: &str,
    horizon: Option<usize>,
    config: &AnalyticsConfig,
) -> Result<()> {
    let records = load_records(input)?;
    let buy = types::buy_series(&records);
    let horizon = horizon.unwrap_or(config.backtest.horizon);

    let model: Box<dyn Forecaster> = match model_name {
        "linear" => Box::new(LinearRegression),
        "exponential" => Box::new(ExponentialRegression),
        "holt-winters" => Box::new(HoltWinters {
            alpha: config.holt_winters.alpha,
            beta: config.holt_winters.beta,
            gamma: config.holt_winters.gamma,
            season_length: config.holt_winters.season_length,
        }),
        other => bail!("Unknown model '{other}', expected linear, exponential or holt-winters"),
    };

    let score = evaluate(model.as_ref(), &buy, horizon);
    info!(
        "{} backtest over {} held-out samples: mean error {:.2}% ({} scored)",
        model.name(),
        horizon,
        score.mean_percent_error,
        score.sample_count
    );
    Ok(())
}
