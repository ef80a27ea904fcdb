use analytics::{AnalyticsEngine, DashboardOverview, TradeFilter};
use anyhow::Context;
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use configuration::{Config, LogFormat};
use dataset::TradeTable;
use std::net::SocketAddr;
use std::path::PathBuf;
use web_server::AppState;

/// The main entry point for the backtest dashboard.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A .env file is optional; it only supplies DASHBOARD__* overrides.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = configuration::load_config_from(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    if let Some(format) = cli.log_format {
        config.logging.format = format;
    }

    // Keep the guard alive so buffered file logs are flushed on exit.
    let _log_guard = web_server::telemetry::init_tracing(&config.logging)?;

    let table = load_table(&config)?;

    match cli.command {
        Commands::Serve(args) => handle_serve(args, config, table).await,
        Commands::Report(args) => handle_report(args, &config, &table),
        Commands::Options => {
            handle_options(&table);
            Ok(())
        }
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Analytics dashboard for backtested leveraged BTC trading.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file. Missing files fall back to defaults.
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    /// Overrides the configured console log format.
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the dashboard's JSON API.
    Serve(ServeArgs),
    /// Print the monthly returns and indicators for one selection.
    Report(ReportArgs),
    /// List the exchanges, leverages and date range found in the trade log.
    Options,
}

#[derive(Parser)]
struct ServeArgs {
    /// Listen address, overriding `server.host` and `server.port`.
    #[arg(long)]
    addr: Option<SocketAddr>,
}

#[derive(Parser)]
struct ReportArgs {
    /// The exchange to report on (defaults to `dashboard.default_exchange`).
    #[arg(long)]
    exchange: Option<String>,

    /// The leverage to report on (defaults to `dashboard.default_leverage`).
    #[arg(long)]
    leverage: Option<u32>,

    /// First day of the window, inclusive (format: YYYY-MM-DD).
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Last day of the window, inclusive (format: YYYY-MM-DD).
    #[arg(long)]
    to: Option<NaiveDate>,
}

// ==============================================================================
// Startup
// ==============================================================================

/// The trade log is read exactly once; a schema problem stops the process here.
fn load_table(config: &Config) -> anyhow::Result<TradeTable> {
    dataset::load_csv(&config.data.path).map_err(|e| {
        tracing::error!(error = %e, path = %config.data.path.display(), "Trade log rejected.");
        anyhow::Error::new(e).context(format!(
            "Failed to load trade log {}",
            config.data.path.display()
        ))
    })
}

// ==============================================================================
// Command Logic
// ==============================================================================

async fn handle_serve(args: ServeArgs, config: Config, table: TradeTable) -> anyhow::Result<()> {
    let addr = args.addr.unwrap_or_else(|| config.server.socket_addr());
    let state = AppState {
        table,
        defaults: config.dashboard,
    };
    web_server::run_server(addr, state).await
}

fn handle_report(args: ReportArgs, config: &Config, table: &TradeTable) -> anyhow::Result<()> {
    let exchange = args
        .exchange
        .unwrap_or_else(|| config.dashboard.default_exchange.clone());
    let leverage = args.leverage.unwrap_or(config.dashboard.default_leverage);
    let start = args
        .from
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|ts| ts.and_utc())
        .unwrap_or(DateTime::<Utc>::MIN_UTC);
    let end = args
        .to
        .and_then(|d| d.and_hms_nano_opt(23, 59, 59, 999_999_999))
        .map(|ts| ts.and_utc())
        .unwrap_or(DateTime::<Utc>::MAX_UTC);

    if !table.contains_exchange(&exchange) {
        tracing::warn!(%exchange, known = ?table.exchanges(), "Exchange does not appear in the trade log.");
    }

    let filter = TradeFilter::new(exchange, leverage, start, end);
    let view = filter.apply(table);
    tracing::info!(exchange = %filter.exchange, leverage, trades = view.len(), "Selection filtered.");

    let overview = AnalyticsEngine::new()
        .overview(&view)
        .context("Failed to aggregate the selection")?;
    print_overview(&overview);
    Ok(())
}

fn print_overview(overview: &DashboardOverview) {
    let Some(returns) = &overview.returns else {
        println!("No trades match the selection.");
        return;
    };

    let mut monthly = Table::new();
    monthly
        .load_preset(UTF8_FULL)
        .set_header(vec!["Month", "Entry balance", "Exit balance", "Return"]);
    for month in &overview.monthly {
        monthly.add_row(vec![
            Cell::new(month.month),
            Cell::new(month.entry),
            Cell::new(month.exit),
            Cell::new(analytics::format_pct(month.return_pct)),
        ]);
    }
    println!("{monthly}");

    let mut indicators = Table::new();
    indicators
        .load_preset(UTF8_FULL)
        .set_header(vec!["Strategy Returns", "Market Returns", "Strategy vs. Market Returns"])
        .add_row(vec![
            &returns.strategy_returns,
            &returns.market_returns,
            &returns.strategy_vs_market,
        ]);
    println!("{indicators}");
}

fn handle_options(table: &TradeTable) {
    let mut options = Table::new();
    options.load_preset(UTF8_FULL).set_header(vec!["Exchange", "From", "To"]);
    for exchange in table.exchanges() {
        if let Some(bounds) = table.date_bounds(Some(&exchange)) {
            options.add_row(vec![
                exchange,
                bounds.start.to_rfc3339(),
                bounds.end.to_rfc3339(),
            ]);
        }
    }
    println!("{options}");

    let leverages: Vec<String> = table.leverages().iter().map(u32::to_string).collect();
    println!("Leverages: {}", leverages.join(", "));
}
