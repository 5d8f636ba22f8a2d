//! Folio CLI - Command line interface for portfolio risk analytics.
//!
//! Reads portfolio snapshots and prints JSON responses for the dashboard
//! backend. Logs go to stderr; control them with `RUST_LOG`.

use anyhow::Context;
use clap::{Parser, Subcommand};
use folio_risk::{
    build_return_series, correlation_pairs, max_drawdown, ApiResponse, PortfolioSnapshot,
    RiskConfig, RiskSummary,
};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Folio risk CLI - correlation, volatility and drawdown analytics")]
#[command(version)]
struct Cli {
    /// Config file (defaults to FOLIO_RISK_CONFIG or the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the full risk report for a snapshot
    Metrics {
        /// Snapshot JSON file
        #[arg(short, long)]
        snapshot: PathBuf,
        /// Annual risk-free rate (overrides config)
        #[arg(long)]
        risk_free_rate: Option<f64>,
    },
    /// Correlation matrix and ranked pairs for a snapshot
    Correlation {
        /// Snapshot JSON file
        #[arg(short, long)]
        snapshot: PathBuf,
    },
    /// Formatted risk card values for a snapshot
    Summary {
        /// Snapshot JSON file
        #[arg(short, long)]
        snapshot: PathBuf,
        /// Annual risk-free rate (overrides config)
        #[arg(long)]
        risk_free_rate: Option<f64>,
    },
    /// Daily returns of a price series
    Returns {
        /// Comma-separated prices, oldest first
        #[arg(short, long, value_delimiter = ',', num_args = 1.., allow_negative_numbers = true)]
        prices: Vec<f64>,
    },
    /// Maximum drawdown of a price series
    Drawdown {
        /// Comma-separated prices, oldest first
        #[arg(short, long, value_delimiter = ',', num_args = 1.., allow_negative_numbers = true)]
        prices: Vec<f64>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Metrics {
            snapshot,
            risk_free_rate,
        } => handle_metrics(cli.config.as_deref(), &snapshot, risk_free_rate),
        Commands::Correlation { snapshot } => handle_correlation(cli.config.as_deref(), &snapshot),
        Commands::Summary {
            snapshot,
            risk_free_rate,
        } => handle_summary(cli.config.as_deref(), &snapshot, risk_free_rate),
        Commands::Returns { prices } => Ok(json!({ "returns": build_return_series(&prices) })),
        Commands::Drawdown { prices } => Ok(json!({ "max_drawdown": max_drawdown(&prices) })),
    };

    let (response, code) = match result {
        Ok(data) => (ApiResponse::ok(data), ExitCode::SUCCESS),
        Err(e) => {
            tracing::error!("{:#}", e);
            (ApiResponse::<Value>::err(format!("{:#}", e)), ExitCode::FAILURE)
        }
    };

    match serde_json::to_string_pretty(&response) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("failed to serialize response: {}", e);
            return ExitCode::FAILURE;
        }
    }

    code
}

fn load_config(path: Option<&Path>, risk_free_rate: Option<f64>) -> anyhow::Result<RiskConfig> {
    let config = RiskConfig::resolve(path, risk_free_rate).with_context(|| match path {
        Some(path) => format!("loading config {}", path.display()),
        None => "loading default config".to_string(),
    })?;

    tracing::debug!("Using config: {:?}", config);
    Ok(config)
}

fn load_snapshot(path: &Path) -> anyhow::Result<PortfolioSnapshot> {
    let snapshot = PortfolioSnapshot::load(path)
        .with_context(|| format!("loading snapshot {}", path.display()))?;
    tracing::info!(
        "Loaded snapshot with {} holdings (as of {:?})",
        snapshot.holdings.len(),
        snapshot.as_of
    );
    Ok(snapshot)
}

fn handle_metrics(
    config: Option<&Path>,
    snapshot: &Path,
    risk_free_rate: Option<f64>,
) -> anyhow::Result<Value> {
    let config = load_config(config, risk_free_rate)?;
    let snapshot = load_snapshot(snapshot)?;

    let metrics = snapshot.risk_metrics(&config);
    metrics
        .correlation_matrix
        .validate(config.correlation_tolerance)?;

    Ok(json!({
        "as_of": snapshot.as_of,
        "metrics": metrics,
    }))
}

fn handle_correlation(config: Option<&Path>, snapshot: &Path) -> anyhow::Result<Value> {
    let config = load_config(config, None)?;
    let snapshot = load_snapshot(snapshot)?;

    let matrix = folio_risk::correlation_matrix(&snapshot.assets());
    matrix.validate(config.correlation_tolerance)?;

    Ok(json!({
        "matrix": matrix,
        "pairs": correlation_pairs(&matrix),
    }))
}

fn handle_summary(
    config: Option<&Path>,
    snapshot: &Path,
    risk_free_rate: Option<f64>,
) -> anyhow::Result<Value> {
    let config = load_config(config, risk_free_rate)?;
    let snapshot = load_snapshot(snapshot)?;

    let metrics = snapshot.risk_metrics(&config);
    Ok(json!({
        "as_of": snapshot.as_of,
        "summary": RiskSummary::from_metrics(&metrics),
    }))
}
