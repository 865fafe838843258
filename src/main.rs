use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tokio_util::sync::CancellationToken;

use poly_leaderboard::config::AppConfig;
use poly_leaderboard::ingestion::FetchConfig;
use poly_leaderboard::models::leaderboard::profile_url;
use poly_leaderboard::models::{short_wallet, LeaderboardEntry};
use poly_leaderboard::polymarket::{DataClient, GammaClient};
use poly_leaderboard::{analyze_market, AnalysisReport, AnalysisRequest};

#[derive(Parser)]
#[command(name = "poly-leaderboard")]
#[command(about = "Realized P&L leaderboard for a single Polymarket market", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch large trades for a market and rank wallets by realized P&L
    Analyze {
        /// Market condition ID (0x...)
        condition_id: String,
        /// Minimum cash value (size × price) of trades to include
        #[arg(long)]
        min_value: Option<Decimal>,
        /// Assumed winning outcome: a, b, yes, no, or an outcome label
        #[arg(long)]
        resolution: Option<String>,
        /// Rows per table
        #[arg(long)]
        top: Option<usize>,
        /// Print the full report as JSON instead of tables
        #[arg(long)]
        json: bool,
        /// Also write the JSON report to this path
        #[arg(long)]
        export: Option<PathBuf>,
        /// Print Prometheus metrics after the run
        #[arg(long)]
        print_metrics: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = AppConfig::from_env()?;

    match cli.command {
        Commands::Analyze {
            condition_id,
            min_value,
            resolution,
            top,
            json,
            export,
            print_metrics,
        } => {
            let metrics_handle = if print_metrics {
                Some(poly_leaderboard::metrics::init_metrics()?)
            } else {
                None
            };

            let http = reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(config.page_timeout_secs))
                .build()?;
            let data_client = DataClient::with_base_url(http.clone(), &config.data_api_url);
            let gamma_client = GammaClient::with_base_url(http, &config.gamma_api_url);

            let request = AnalysisRequest {
                market_id: condition_id,
                min_trade_value: min_value.unwrap_or(config.min_trade_value),
                resolution_override: resolution,
            };

            let cancel = CancellationToken::new();
            let ctrl_c_cancel = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::warn!("Interrupted, stopping fetch");
                    ctrl_c_cancel.cancel();
                }
            });

            let report = analyze_market(
                &request,
                &data_client,
                &gamma_client,
                FetchConfig::from(&config),
                &cancel,
            )
            .await?;

            if let Some(path) = export {
                std::fs::write(&path, serde_json::to_string_pretty(&report)?)?;
                tracing::info!(path = %path.display(), "Report exported");
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report, top.unwrap_or(config.top_n), config.sample_trades_limit);
            }

            if let Some(handle) = metrics_handle {
                println!("{}", handle.render());
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let registry = tracing_subscriber::registry().with(filter);
    if std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json")) {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr)).init();
    }
}

// ---------------------------------------------------------------------------
// Text rendering
// ---------------------------------------------------------------------------

fn print_report(report: &AnalysisReport, top: usize, sample_limit: usize) {
    let board = &report.leaderboard;
    let summary = &board.summary;

    println!(
        "Market: {}",
        report.market.question.as_deref().unwrap_or("Unknown")
    );
    println!("Condition ID: {}", report.market.id);
    println!(
        "Settled as: {} ({:?})",
        report.winning_label, report.settlement.source
    );
    if !report.is_complete() {
        println!(
            "WARNING: trade history is incomplete ({:?}); figures cover only what was fetched",
            report.fetch.status
        );
    }
    println!();

    println!("Summary");
    println!("  Time span:        {:.1} days", summary.time_span_days);
    println!("  Trades analyzed:  {}", summary.trades_analyzed);
    println!(
        "  Wallets (>= ${}): {}",
        report.fetch.min_cash_value.normalize(),
        summary.wallets
    );
    if let Some(volume) = report.market.volume {
        println!("  Market volume:    ${:.0}", volume);
    }
    println!(
        "  Winners / losers: {} / {}",
        summary.winners, summary.losers
    );
    println!("  Net P&L:          ${:.2}", summary.net_pnl);
    println!();

    println!("By total gain (P&L)");
    print_entries(board.by_pnl().iter().take(top));
    println!();

    println!("By total spent");
    print_entries(board.by_spent().into_iter().take(top));
    println!();

    println!("Sample trades");
    println!(
        "{:<10} {:>14} {:>14} {:<5} {:<10} {:<17} {:<24}  {}",
        "Price", "Size", "Value ($)", "Side", "Outcome", "Date", "Trader", "Profile"
    );
    for trade in board.sample_trades().into_iter().take(sample_limit) {
        let trader = trade
            .display_name
            .clone()
            .unwrap_or_else(|| format!("{}...", short_wallet(&trade.wallet)));
        println!(
            "{:<10.4} {:>14.0} {:>14.2} {:<5} {:<10} {:<17} {:<24}  {}",
            trade.price,
            trade.size,
            trade.cash_value(),
            trade.side.to_string(),
            truncate(&trade.outcome_label, 10),
            trade.timestamp.format("%Y-%m-%d %H:%M").to_string(),
            truncate(&trader, 24),
            profile_url(&trade.wallet),
        );
    }
}

fn print_entries<'a>(entries: impl Iterator<Item = &'a LeaderboardEntry>) {
    println!(
        "{:<5} {:<24} {:>14} {:>10} {:>14} {:>14} {:>12} {:>8}  {}",
        "Rank",
        "User",
        "P&L ($)",
        "Avg Price",
        "Spent ($)",
        "Received ($)",
        "Shares",
        "Trades",
        "Profile"
    );
    for (i, entry) in entries.enumerate() {
        println!(
            "{:<5} {:<24} {:>14.2} {:>10.4} {:>14.2} {:>14.2} {:>12.0} {:>8}  {}",
            i + 1,
            truncate(&entry.label(), 24),
            entry.pnl,
            entry.avg_purchase_price,
            entry.total_spent,
            entry.total_received,
            entry.final_shares,
            entry.trade_count,
            entry.profile_url(),
        );
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        s.chars().take(max.saturating_sub(1)).chain(std::iter::once('…')).collect()
    }
}
