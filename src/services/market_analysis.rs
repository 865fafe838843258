use rust_decimal::Decimal;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::errors::AppError;
use crate::ingestion::{FetchConfig, FetchStats, TradeFetcher};
use crate::intelligence::{
    parse_override, settle_outcome, Leaderboard, PositionLedger, SettledOutcome,
};
use crate::models::Market;
use crate::polymarket::{GammaClientError, MarketSource, TradeSource};

/// What a caller provides for one analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub market_id: String,
    pub min_trade_value: Decimal,
    /// `a`/`b`, `yes`/`no`, or an outcome label.
    pub resolution_override: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub market: Market,
    /// False when the market endpoint failed and default labels were used.
    pub metadata_available: bool,
    pub settlement: SettledOutcome,
    pub winning_label: String,
    pub fetch: FetchStats,
    pub leaderboard: Leaderboard,
}

impl AnalysisReport {
    /// True when the figures can be shown as exact for the chosen threshold.
    pub fn is_complete(&self) -> bool {
        self.fetch.complete
    }
}

/// Fetch → resolve → fold → rank for one market.
///
/// Resolution is settled before any trades are requested: an unresolved market
/// without an override fails fast with [`AppError::AmbiguousResolution`].
pub async fn analyze_market<T, M>(
    request: &AnalysisRequest,
    trades: T,
    markets: M,
    fetch_config: FetchConfig,
    cancel: &CancellationToken,
) -> Result<AnalysisReport, AppError>
where
    T: TradeSource,
    M: MarketSource,
{
    let market_id = request.market_id.trim();
    if market_id.is_empty() {
        return Err(AppError::Config("market id must not be empty".into()));
    }

    let (market, metadata_available) = match markets.fetch_market(market_id).await {
        Ok(market) => (market, true),
        Err(GammaClientError::NotBinary) => {
            return Err(AppError::UnsupportedMarket {
                market_id: market_id.to_string(),
            });
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                market_id,
                "Market metadata unavailable, assuming Yes/No outcomes with no settlement data"
            );
            (Market::unknown(market_id), false)
        }
    };

    let override_outcome = request
        .resolution_override
        .as_deref()
        .map(|raw| parse_override(raw, &market))
        .transpose()?;
    let settlement = settle_outcome(&market, override_outcome)?;
    let winning_label = market.label(settlement.winner).to_string();

    tracing::info!(
        market_id,
        question = market.question.as_deref().unwrap_or("unknown"),
        winner = %winning_label,
        source = ?settlement.source,
        "Settling against outcome"
    );

    let fetcher = TradeFetcher::new(trades, fetch_config);
    let outcome = fetcher.fetch(&market, request.min_trade_value, cancel).await;
    let (trades, fetch) = outcome.into_parts();

    if !fetch.complete {
        tracing::warn!(
            market_id,
            status = ?fetch.status,
            trades = fetch.trades,
            "Trade set is incomplete; leaderboard figures are a lower bound on activity"
        );
    }

    let ledger = PositionLedger::from_trades(&trades);
    let leaderboard = Leaderboard::build(&ledger, trades, settlement.winner);

    tracing::info!(
        market_id,
        wallets = leaderboard.len(),
        trades = leaderboard.summary.trades_analyzed,
        net_pnl = %leaderboard.summary.net_pnl,
        "Leaderboard built"
    );

    Ok(AnalysisReport {
        market,
        metadata_available,
        settlement,
        winning_label,
        fetch,
        leaderboard,
    })
}
