use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use serde::Serialize;
use stockecho::clock::SystemClock;
use stockecho::config::{default_config_path, ResolvedConfig};
use stockecho::duration::format_duration;
use stockecho::format::{error_summary, format_report};
use stockecho::market_data::providers::BoerseFrankfurtSource;
use stockecho::market_data::MarketDataService;
use stockecho::models::{ChartSeries, Holding, Report};
use stockecho::storage::{HoldingsStore, JsonFileHoldingsStore};
use stockecho::update::{TradingDays, UpdateService};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "stockecho")]
#[command(about = "Portfolio performance and chart data for exchange-traded holdings")]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value_os_t = default_config_path())]
    config: PathBuf,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Refresh market data and print the portfolio report and chart series
    Report {
        /// Print a two-line summary instead of JSON
        #[arg(long)]
        summary: bool,
    },
    /// Print the current (or given) trading day and the one before it
    TradingDay {
        /// Resolve this date instead of now (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Manage holdings
    Holdings {
        #[command(subcommand)]
        command: HoldingsCommand,
    },
    /// Show current configuration
    Config,
}

#[derive(Subcommand)]
enum HoldingsCommand {
    /// List all holdings
    List,
    /// Add a holding, replacing any existing one with the same ISIN
    Add {
        isin: String,
        shares: Decimal,
        /// Purchase price per share
        price: Decimal,
    },
    /// Remove a holding
    Remove { isin: String },
    /// Remove all holdings
    Clear,
}

#[derive(Serialize)]
struct ReportOutput<'a> {
    days: TradingDays,
    report: &'a Report,
    chart: &'a ChartSeries,
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true);
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(layer.json())
            .init();
    } else {
        tracing_subscriber::registry().with(filter).with(layer).init();
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("Failed to serialize output")?
    );
    Ok(())
}

fn update_service(
    config: &ResolvedConfig,
    holdings: Arc<dyn HoldingsStore>,
) -> Result<UpdateService> {
    let source = BoerseFrankfurtSource::with_timeout(config.market_data.request_timeout)?
        .with_base_url(config.market_data.base_url.as_str())
        .with_mic(config.market_data.mic.as_str());
    let market_data = Arc::new(MarketDataService::new(Arc::new(source)));

    Ok(UpdateService::new(holdings, market_data)
        .with_session(config.session.clone())
        .with_chart_window_days(config.chart_window_days))
}

async fn run_holdings(store: &dyn HoldingsStore, command: HoldingsCommand) -> Result<()> {
    match command {
        HoldingsCommand::List => print_json(&store.all_holdings().await?),
        HoldingsCommand::Add {
            isin,
            shares,
            price,
        } => {
            let holding = Holding::new(isin.trim().to_uppercase(), shares, price);
            store.save_holding(&holding).await?;
            print_json(&holding)
        }
        HoldingsCommand::Remove { isin } => {
            let isin = isin.trim().to_uppercase();
            if store.remove_holding(&isin).await? {
                println!("Removed {isin}");
            } else {
                println!("No holding for {isin}");
            }
            Ok(())
        }
        HoldingsCommand::Clear => {
            store.clear().await?;
            println!("Removed all holdings");
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    let config = ResolvedConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config: {}", cli.config.display()))?;
    let store = Arc::new(JsonFileHoldingsStore::new(&config.data_dir));

    match cli.command {
        Command::Report { summary } => {
            let service = update_service(&config, store)?;
            let outcome = service.refresh().await?;
            match outcome.result {
                Ok(update) if summary => println!("{}", format_report(&update.report)),
                Ok(update) => print_json(&ReportOutput {
                    days: outcome.days,
                    report: &update.report,
                    chart: &update.chart,
                })?,
                Err(errors) => {
                    eprintln!("Portfolio data rejected: {}", error_summary(&errors));
                    for error in errors.iter() {
                        eprintln!("  - {error}");
                    }
                    std::process::exit(1);
                }
            }
        }
        Command::TradingDay { date } => {
            let current = match date {
                Some(date) => config.session.resolve(date)?,
                None => config.session.current_trading_day(&SystemClock)?,
            };
            let previous = config.session.previous_trading_day(current)?;
            print_json(&TradingDays { current, previous })?;
        }
        Command::Holdings { command } => run_holdings(store.as_ref(), command).await?,
        Command::Config => {
            println!("Config file: {}", cli.config.display());
            println!("Data directory: {}", config.data_dir.display());
            println!("Holdings file: {}", store.holdings_file().display());
            println!(
                "Market data: {} (mic {})",
                config.market_data.base_url, config.market_data.mic
            );
            println!(
                "Request timeout: {}",
                format_duration(config.market_data.request_timeout)
            );
            println!(
                "Session: {} opening at {:02}:00",
                config.session.timezone, config.session.open_hour
            );
            let years: Vec<String> = config
                .session
                .calendar
                .years()
                .map(|y| y.to_string())
                .collect();
            println!("Holiday calendars: {}", years.join(", "));
            println!("Chart window: {} days", config.chart_window_days);
        }
    }

    Ok(())
}
