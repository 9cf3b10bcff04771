use analytics::{BacktestResult, ResultReporter, TradeSummary};
use anyhow::{Context, Result};
use backtester::{run_backtest, simulate};
use clap::{Parser, Subcommand};
use comfy_table::Table;
use configuration::{BacktestConfig, BacktestOverrides, load_config};
use core_types::Signal;
use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;
use std::path::PathBuf;

mod logging;
mod prices;

/// The main entry point for the crossover backtesting application.
#[tokio::main]
async fn main() -> Result<()> {
    // A .env file may carry CROSSOVER_* overrides; it is optional.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref()).context("Failed to load configuration")?;
    let _log_guard = logging::init(&config.logging)?;

    // Execute the appropriate command
    match cli.command {
        Commands::Backtest(args) => handle_backtest(args, config.backtest),
        Commands::Batch(args) => handle_batch(args, config.backtest).await,
        Commands::Sma(args) => handle_sma(args),
        Commands::Signal(args) => handle_signal(args, config.backtest),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Backtests a simple-moving-average crossover strategy on historical closes.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML configuration file (defaults to ./config.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one backtest and print its result.
    Backtest(BacktestArgs),
    /// Run independent backtests over several price files concurrently.
    Batch(BatchArgs),
    /// Print the closes alongside their simple moving average.
    Sma(SmaArgs),
    /// Classify crossover signals and report the latest one.
    Signal(SignalArgs),
}

#[derive(Parser)]
struct BacktestArgs {
    /// CSV file with a date column and a close column.
    #[arg(long)]
    prices: PathBuf,

    #[command(flatten)]
    overrides: BacktestOverrides,

    /// Print a trade table and summary instead of JSON.
    #[arg(long)]
    table: bool,
}

#[derive(Parser)]
struct BatchArgs {
    /// One CSV file per ticker.
    #[arg(long, num_args = 1.., required = true)]
    prices: Vec<PathBuf>,

    #[command(flatten)]
    overrides: BacktestOverrides,
}

#[derive(Parser)]
struct SmaArgs {
    #[arg(long)]
    prices: PathBuf,

    /// SMA window, in bars.
    #[arg(long)]
    window: usize,
}

#[derive(Parser)]
struct SignalArgs {
    #[arg(long)]
    prices: PathBuf,

    /// Short SMA window, in bars.
    #[arg(long)]
    short_window: Option<usize>,

    /// Long SMA window, in bars.
    #[arg(long)]
    long_window: Option<usize>,
}

// ==============================================================================
// Command Logic
// ==============================================================================

fn handle_backtest(args: BacktestArgs, mut config: BacktestConfig) -> Result<()> {
    args.overrides.apply(&mut config);
    let ticker = prices::ticker_for(&args.prices);
    let points = prices::load_prices(&args.prices)?;
    tracing::info!(%ticker, bars = points.len(), ?config, "Starting backtest");

    if !args.table {
        let result = run_backtest(&points, &config);
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let reporter = ResultReporter::new();
    let (result, summary) = match simulate(&points, &config) {
        Ok(outcome) => (
            reporter.report(outcome.final_balance, &outcome.events),
            Some(reporter.summarize(outcome.initial_balance, outcome.final_balance, &outcome.events)),
        ),
        // Short series and rejected inputs are packaged exactly as in JSON mode.
        Err(_) => (run_backtest(&points, &config), None),
    };
    println!("{}", render_table(&ticker, &result, summary.as_ref()));
    Ok(())
}

/// Runs one isolated backtest per file on the blocking pool.
async fn handle_batch(args: BatchArgs, mut config: BacktestConfig) -> Result<()> {
    args.overrides.apply(&mut config);

    let progress_bar = ProgressBar::new(args.prices.len() as u64);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")?
            .progress_chars("#>-"),
    );

    let tasks: Vec<_> = args
        .prices
        .into_iter()
        .map(|path| {
            let config = config.clone();
            let pb_clone = progress_bar.clone();

            tokio::task::spawn_blocking(move || {
                let ticker = prices::ticker_for(&path);
                pb_clone.set_message(format!("Backtesting {}...", ticker));
                let points = prices::load_prices(&path)?;
                let result = run_backtest(&points, &config);
                pb_clone.inc(1);
                Ok::<(String, BacktestResult), anyhow::Error>((ticker, result))
            })
        })
        .collect();

    // Wait for all concurrent tasks to complete
    let results = join_all(tasks).await;
    progress_bar.finish_with_message("Batch complete!");

    let mut by_ticker = BTreeMap::new();
    for result in results {
        match result {
            Ok(Ok((ticker, result))) => {
                by_ticker.insert(ticker, result);
            }
            Ok(Err(e)) => tracing::error!(error = %format!("{:#}", e), "Skipping price file"),
            Err(e) => tracing::error!(error = %e, "A backtest task failed"),
        }
    }

    println!("{}", serde_json::to_string_pretty(&by_ticker)?);
    Ok(())
}

fn handle_sma(args: SmaArgs) -> Result<()> {
    let points = prices::load_prices(&args.prices)?;
    let rows = strategies::sma_table(&points, args.window)?;
    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}

fn handle_signal(args: SignalArgs, config: BacktestConfig) -> Result<()> {
    let ticker = prices::ticker_for(&args.prices);
    let points = prices::load_prices(&args.prices)?;
    let closes: Vec<_> = points.iter().map(|p| p.close).collect();

    let short_window = args.short_window.unwrap_or(config.short_window);
    let long_window = args.long_window.unwrap_or(config.long_window);
    let signals = strategies::classify_closes(&closes, short_window, long_window)?;

    let count = |wanted: Signal| signals.iter().filter(|s| **s == wanted).count();
    let report = serde_json::json!({
        "ticker": ticker,
        "short_window": short_window,
        "long_window": long_window,
        "last_signal": strategies::last_signal(&signals),
        "buy_count": count(Signal::Buy),
        "sell_count": count(Signal::Sell),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn render_table(ticker: &str, result: &BacktestResult, summary: Option<&TradeSummary>) -> String {
    let mut trades = Table::new();
    trades.set_header(vec!["#", "Trade"]);
    for (i, trade) in result.trades.iter().enumerate() {
        trades.add_row(vec![(i + 1).to_string(), trade.clone()]);
    }

    let mut out = format!(
        "{}: {:?}, final balance {:.2}\n{}",
        ticker, result.status, result.final_balance, trades
    );
    if let Some(reason) = &result.reason {
        out.push_str(&format!("\nreason: {}", reason));
    }
    if let Some(summary) = summary {
        let win_rate = summary
            .win_rate_pct
            .map(|pct| format!("{}%", pct))
            .unwrap_or_else(|| "n/a".to_string());
        out.push_str(&format!(
            "\nround trips: {} (won {}, lost {}), win rate {}, return {}%, target updates {}",
            summary.round_trips,
            summary.winning_trades,
            summary.losing_trades,
            win_rate,
            summary.total_return_pct,
            summary.target_updates
        ));
    }
    out
}
