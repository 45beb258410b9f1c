//! Volab - GARCH-Family Volatility Research Pipeline
//!
//! Command-line entry point: runs the per-ticker analysis pipeline or
//! generates a synthetic GARCH series for estimator validation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use volab::adapters::fs_report::FsReportSink;
use volab::adapters::yahoo::YahooPriceSource;
use volab::application::run_pipeline;
use volab::config::{load_config, Config};
use volab::domain::volatility::simulate::{simulate_garch, SimulatedGarch};

#[derive(Parser)]
#[command(name = "volab", about = "Volatility model fitting and comparison for crypto returns")]
struct App {
    /// Enable info-level logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug-level logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the full analysis pipeline over the configured tickers
    Run(RunCmd),
    /// Write a synthetic GARCH(1,1) return series to stdout
    Simulate(SimulateCmd),
}

#[derive(Parser)]
struct RunCmd {
    /// Path to the TOML config file; defaults apply if absent
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,
}

#[derive(Parser)]
struct SimulateCmd {
    /// Number of returns to generate
    #[arg(short, long, default_value_t = 1000)]
    n: usize,

    /// RNG seed
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let app = App::parse();
    init_logging(app.verbose, app.debug);

    match app.command {
        Command::Run(cmd) => run_command(cmd).await,
        Command::Simulate(cmd) => simulate_command(cmd),
    }
}

fn init_logging(verbose: bool, debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::new("warn")
    };

    fmt().with_env_filter(filter).init();
}

async fn run_command(cmd: RunCmd) -> Result<()> {
    let config = if cmd.config.exists() {
        load_config(&cmd.config).context("Failed to load configuration")?
    } else {
        tracing::warn!(path = %cmd.config.display(), "config file not found, using defaults");
        Config::default()
    };

    let source = YahooPriceSource::new().context("Failed to create price source")?;
    let sink = FsReportSink::new(&config.output.results_dir)
        .context("Failed to create results directory")?;

    let results = run_pipeline(&config, &source, &sink).await;

    let failed: Vec<&str> = results
        .iter()
        .filter(|(_, r)| r.is_err())
        .map(|(t, _)| t.as_str())
        .collect();

    println!("Processed {} tickers, {} failed", results.len(), failed.len());
    for (ticker, outcome) in &results {
        match outcome {
            Ok(report) => println!(
                "  {ticker}: best model {} over {} returns",
                report.best_model, report.n_returns
            ),
            Err(e) => println!("  {ticker}: FAILED ({e})"),
        }
    }

    if failed.len() == results.len() {
        anyhow::bail!("every ticker failed");
    }
    Ok(())
}

fn simulate_command(cmd: SimulateCmd) -> Result<()> {
    let params = SimulatedGarch::crypto_like();
    let returns = simulate_garch(&params, cmd.n, cmd.seed);

    println!("return");
    for r in returns {
        println!("{r:.8e}");
    }
    Ok(())
}
