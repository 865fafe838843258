//! Bounded, filtered pagination over the trades endpoint.
//!
//! The provider stops paginating after roughly 1,000 *matched* records and
//! silently repeats data past that point. Filtering by minimum cash value
//! shrinks the matched set below the wall, and deduplicating on transaction
//! hash detects the repetition when it happens anyway.
//!
//! The result is complete only for trades at or above the threshold, and even
//! then only as far as the provider's wall allows. Callers get an explicit
//! [`FetchStatus`] so a partial set is never presented as exhaustive.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use metrics::{counter, histogram};
use rust_decimal::Decimal;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::config::AppConfig;
use crate::ingestion::normalize::normalize_trade;
use crate::models::{Market, Trade};
use crate::polymarket::{DataClientError, FilterType, TradeQuery, TradeSource};

/// Why the loop stopped on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// The provider returned no records.
    EmptyPage,
    /// Every record on the page had already been seen.
    RepeatedPage,
    /// The page held fewer records than requested.
    ShortPage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum FetchStatus {
    Complete { termination: Termination },
    /// The hard offset ceiling was reached before a natural end.
    PaginationExhausted,
    /// A page failed or timed out. Trades from earlier pages are kept.
    TransportFailed { message: String },
    Cancelled,
}

/// Canonical trade set plus enough bookkeeping to judge how complete it is.
#[derive(Debug, Clone, Serialize)]
pub struct FetchOutcome {
    pub trades: Vec<Trade>,
    pub status: FetchStatus,
    pub pages_requested: u32,
    pub duplicate_records: u64,
    pub malformed_records: u64,
    pub below_threshold_records: u64,
    /// Offset the next page would have been requested at.
    pub final_offset: u32,
    pub min_cash_value: Decimal,
}

impl FetchOutcome {
    pub fn is_complete(&self) -> bool {
        matches!(self.status, FetchStatus::Complete { .. })
    }

    pub fn total_cash_value(&self) -> Decimal {
        self.trades.iter().map(Trade::cash_value).sum()
    }

    /// Split the trade set from the bookkeeping that describes it.
    pub fn into_parts(self) -> (Vec<Trade>, FetchStats) {
        let stats = FetchStats {
            complete: self.is_complete(),
            trades: self.trades.len(),
            status: self.status,
            pages_requested: self.pages_requested,
            duplicate_records: self.duplicate_records,
            malformed_records: self.malformed_records,
            below_threshold_records: self.below_threshold_records,
            final_offset: self.final_offset,
            min_cash_value: self.min_cash_value,
        };
        (self.trades, stats)
    }
}

/// [`FetchOutcome`] without the trades, for reporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchStats {
    pub complete: bool,
    pub trades: usize,
    pub status: FetchStatus,
    pub pages_requested: u32,
    pub duplicate_records: u64,
    pub malformed_records: u64,
    pub below_threshold_records: u64,
    pub final_offset: u32,
    pub min_cash_value: Decimal,
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub page_size: u32,
    pub max_offset: u32,
    pub page_timeout: Duration,
    pub page_delay: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for FetchConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            page_size: config.page_size,
            max_offset: config.max_offset,
            page_timeout: Duration::from_secs(config.page_timeout_secs),
            page_delay: Duration::from_millis(config.page_delay_ms),
        }
    }
}

pub struct TradeFetcher<S> {
    source: S,
    config: FetchConfig,
}

impl<S: TradeSource> TradeFetcher<S> {
    pub fn new(source: S, config: FetchConfig) -> Self {
        Self { source, config }
    }

    /// Fetch every trade in `market` whose cash value is at least
    /// `min_cash_value`, deduplicated on transaction hash.
    pub async fn fetch(
        &self,
        market: &Market,
        min_cash_value: Decimal,
        cancel: &CancellationToken,
    ) -> FetchOutcome {
        let page_size = self.config.page_size.max(1);
        let filter = (min_cash_value > Decimal::ZERO).then_some((FilterType::Cash, min_cash_value));

        let mut seen: HashSet<String> = HashSet::new();
        // Every transaction hash the provider has shown, valid record or not.
        let mut observed: HashSet<String> = HashSet::new();
        let mut outcome = FetchOutcome {
            trades: Vec::new(),
            status: FetchStatus::PaginationExhausted,
            pages_requested: 0,
            duplicate_records: 0,
            malformed_records: 0,
            below_threshold_records: 0,
            final_offset: 0,
            min_cash_value,
        };

        tracing::info!(
            market_id = %market.id,
            min_cash_value = %min_cash_value,
            page_size,
            max_offset = self.config.max_offset,
            "Fetching trades"
        );

        let mut offset = 0u32;
        while offset < self.config.max_offset {
            if cancel.is_cancelled() {
                outcome.status = FetchStatus::Cancelled;
                break;
            }
            if offset > 0 && !self.config.page_delay.is_zero() {
                tokio::time::sleep(self.config.page_delay).await;
            }

            let query = TradeQuery {
                market: market.id.clone(),
                limit: page_size,
                offset,
                filter,
            };

            outcome.pages_requested += 1;
            counter!("trade_pages_requested").increment(1);
            let started = Instant::now();

            let page = tokio::select! {
                _ = cancel.cancelled() => {
                    outcome.status = FetchStatus::Cancelled;
                    break;
                }
                result = tokio::time::timeout(
                    self.config.page_timeout,
                    self.source.fetch_trades(&query),
                ) => result,
            };
            histogram!("trade_page_latency_seconds").record(started.elapsed().as_secs_f64());

            let records = match page {
                Ok(Ok(records)) => records,
                Ok(Err(e)) => {
                    counter!("trade_page_failures").increment(1);
                    tracing::warn!(
                        error = %e,
                        market_id = %market.id,
                        offset,
                        kept = outcome.trades.len(),
                        "Trade page failed, returning partial set"
                    );
                    outcome.status = FetchStatus::TransportFailed {
                        message: e.to_string(),
                    };
                    break;
                }
                Err(_) => {
                    counter!("trade_page_failures").increment(1);
                    tracing::warn!(
                        market_id = %market.id,
                        offset,
                        timeout = ?self.config.page_timeout,
                        kept = outcome.trades.len(),
                        "Trade page timed out, returning partial set"
                    );
                    let e = DataClientError::Timeout(self.config.page_timeout);
                    outcome.status = FetchStatus::TransportFailed {
                        message: format!("page at offset {offset}: {e}"),
                    };
                    break;
                }
            };

            if records.is_empty() {
                outcome.status = FetchStatus::Complete {
                    termination: Termination::EmptyPage,
                };
                break;
            }

            let page_len = records.len();
            let (mut fresh, mut duplicates, mut malformed, mut below) = (0u64, 0u64, 0u64, 0u64);
            let mut unseen_hashes = 0u64;

            for raw in records {
                if let Some(hash) = raw_transaction_hash(&raw) {
                    if observed.insert(hash) {
                        unseen_hashes += 1;
                    }
                }
                let trade = match normalize_trade(raw, market) {
                    Ok(t) => t,
                    Err(e) => {
                        tracing::debug!(error = %e, offset, "Skipping malformed trade record");
                        malformed += 1;
                        continue;
                    }
                };
                if !seen.insert(trade.transaction_hash.clone()) {
                    duplicates += 1;
                    continue;
                }
                fresh += 1;
                if trade.cash_value() < min_cash_value {
                    below += 1;
                    continue;
                }
                tracing::trace!(%trade, "Accepted");
                outcome.trades.push(trade);
            }

            outcome.duplicate_records += duplicates;
            outcome.malformed_records += malformed;
            outcome.below_threshold_records += below;
            counter!("trade_records_accepted").increment(fresh - below);
            counter!("trade_records_duplicate").increment(duplicates);
            counter!("trade_records_malformed").increment(malformed);

            tracing::debug!(
                market_id = %market.id,
                page = outcome.pages_requested,
                offset,
                new = fresh,
                unseen_hashes,
                duplicates,
                malformed,
                total = outcome.trades.len(),
                "Trade page processed"
            );

            offset = offset.saturating_add(page_size);
            outcome.final_offset = offset;

            if unseen_hashes == 0 {
                tracing::debug!(offset, "No new transaction hashes, provider is repeating data");
                outcome.status = FetchStatus::Complete {
                    termination: Termination::RepeatedPage,
                };
                break;
            }
            if page_len < page_size as usize {
                outcome.status = FetchStatus::Complete {
                    termination: Termination::ShortPage,
                };
                break;
            }
        }

        if outcome.status == FetchStatus::PaginationExhausted {
            tracing::warn!(
                market_id = %market.id,
                max_offset = self.config.max_offset,
                trades = outcome.trades.len(),
                "Offset ceiling reached, result may be incomplete"
            );
        } else {
            tracing::info!(
                market_id = %market.id,
                trades = outcome.trades.len(),
                pages = outcome.pages_requested,
                duplicates = outcome.duplicate_records,
                malformed = outcome.malformed_records,
                status = ?outcome.status,
                "Trade fetch finished"
            );
        }

        outcome
    }
}

/// Dedup key of a raw record, read before validation so rejected records
/// still count as new data.
fn raw_transaction_hash(raw: &serde_json::Value) -> Option<String> {
    raw.get("transactionHash")
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
