use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::json;

use poly_leaderboard::ingestion::FetchConfig;
use poly_leaderboard::models::{Market, Outcome, Side, Trade};
use poly_leaderboard::polymarket::{
    DataClientError, GammaClientError, MarketSource, TradeQuery, TradeSource,
};

pub const MARKET_ID: &str = "0xmarket_test_001";

/// Decimal from a literal like "0.07".
#[allow(dead_code)]
pub fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).expect("valid decimal literal")
}

/// Fetch settings with no politeness delay so tests run fast.
#[allow(dead_code)]
pub fn fetch_config(page_size: u32, max_offset: u32) -> FetchConfig {
    FetchConfig {
        page_size,
        max_offset,
        page_timeout: Duration::from_secs(5),
        page_delay: Duration::ZERO,
    }
}

/// Provider-shaped JSON record.
#[allow(dead_code)]
pub fn raw_trade(
    wallet: &str,
    side: Side,
    outcome: Outcome,
    size: &str,
    price: &str,
    hash: &str,
    ts: i64,
) -> serde_json::Value {
    json!({
        "proxyWallet": wallet,
        "side": side.to_string(),
        "conditionId": MARKET_ID,
        "size": size,
        "price": price,
        "timestamp": ts,
        "outcome": if outcome == Outcome::A { "Yes" } else { "No" },
        "outcomeIndex": outcome.index(),
        "transactionHash": hash
    })
}

/// Validated trade, for driving the ledger directly.
#[allow(dead_code)]
pub fn make_trade(
    wallet: &str,
    side: Side,
    outcome: Outcome,
    size: &str,
    price: &str,
    hash: &str,
    ts: i64,
) -> Trade {
    Trade {
        market_id: MARKET_ID.into(),
        wallet: wallet.into(),
        side,
        outcome,
        outcome_label: if outcome == Outcome::A { "Yes".into() } else { "No".into() },
        size: dec(size),
        price: dec(price),
        transaction_hash: hash.into(),
        timestamp: DateTime::<Utc>::from_timestamp(ts, 0).expect("valid timestamp"),
        display_name: None,
    }
}

/// `n` distinct trades with cash values spread between 1 and several thousand.
#[allow(dead_code)]
pub fn generated_records(n: usize) -> Vec<serde_json::Value> {
    (0..n)
        .map(|i| {
            let side = if i % 3 == 0 { Side::Sell } else { Side::Buy };
            let outcome = if i % 2 == 0 { Outcome::A } else { Outcome::B };
            let size = ((i % 50) + 1) * 100;
            let price = format!("0.{:02}", (i % 97) + 1);
            raw_trade(
                &format!("0xwallet_{}", i % 17),
                side,
                outcome,
                &size.to_string(),
                &price,
                &format!("0xhash_{i}"),
                1_735_689_600 + i as i64,
            )
        })
        .collect()
}

#[allow(dead_code)]
pub fn cash_value(record: &serde_json::Value) -> Decimal {
    let size = dec(record["size"].as_str().unwrap_or("0"));
    let price = dec(record["price"].as_str().unwrap_or("0"));
    size * price
}

/// Imitates the trades endpoint: applies the CASH filter, then serves
/// limit/offset pages, but never past `wall` matched records. Requests past
/// the wall get the last page before it again.
#[allow(dead_code)]
pub struct WalledProvider {
    pub records: Vec<serde_json::Value>,
    pub wall: usize,
    pub calls: AtomicU32,
}

#[allow(dead_code)]
impl WalledProvider {
    pub fn new(records: Vec<serde_json::Value>, wall: usize) -> Self {
        Self {
            records,
            wall,
            calls: AtomicU32::new(0),
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TradeSource for WalledProvider {
    async fn fetch_trades(
        &self,
        query: &TradeQuery,
    ) -> Result<Vec<serde_json::Value>, DataClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let matched: Vec<&serde_json::Value> = self
            .records
            .iter()
            .filter(|r| match &query.filter {
                Some((_, min)) => cash_value(r) >= *min,
                None => true,
            })
            .collect();

        let limit = query.limit as usize;
        let visible = matched.len().min(self.wall);
        let mut offset = query.offset as usize;
        if offset >= self.wall && visible == self.wall {
            offset = self.wall.saturating_sub(limit);
        }

        Ok(matched
            .into_iter()
            .take(visible)
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }
}

/// Returns the same full page forever.
#[allow(dead_code)]
pub struct RepeatingProvider {
    pub page: Vec<serde_json::Value>,
    pub calls: AtomicU32,
}

#[async_trait]
impl TradeSource for RepeatingProvider {
    async fn fetch_trades(
        &self,
        _query: &TradeQuery,
    ) -> Result<Vec<serde_json::Value>, DataClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.page.clone())
    }
}

/// Serves `ok_pages` pages from `records`, then fails every request.
#[allow(dead_code)]
pub struct FailingProvider {
    pub records: Vec<serde_json::Value>,
    pub ok_pages: u32,
    pub calls: AtomicU32,
}

#[async_trait]
impl TradeSource for FailingProvider {
    async fn fetch_trades(
        &self,
        query: &TradeQuery,
    ) -> Result<Vec<serde_json::Value>, DataClientError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call >= self.ok_pages {
            return Err(DataClientError::Unexpected("502 Bad Gateway".into()));
        }
        Ok(self
            .records
            .iter()
            .skip(query.offset as usize)
            .take(query.limit as usize)
            .cloned()
            .collect())
    }
}

/// Never answers within any reasonable timeout.
#[allow(dead_code)]
pub struct StalledProvider;

#[async_trait]
impl TradeSource for StalledProvider {
    async fn fetch_trades(
        &self,
        _query: &TradeQuery,
    ) -> Result<Vec<serde_json::Value>, DataClientError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(Vec::new())
    }
}

/// Market endpoint stand-in; `None` behaves like an unreachable endpoint.
#[allow(dead_code)]
pub struct StaticMarket(pub Option<Market>);

#[async_trait]
impl MarketSource for StaticMarket {
    async fn fetch_market(&self, condition_id: &str) -> Result<Market, GammaClientError> {
        self.0
            .clone()
            .ok_or_else(|| GammaClientError::NotFound(condition_id.to_string()))
    }
}

/// A market whose final prices are `[a, b]`.
#[allow(dead_code)]
pub fn market_with_prices(prices: Option<[&str; 2]>) -> Market {
    Market {
        id: MARKET_ID.into(),
        question: Some("Will the test pass?".into()),
        outcomes: ["Yes".into(), "No".into()],
        final_prices: prices.map(|[a, b]| [dec(a), dec(b)]),
        closed: prices.is_some(),
        volume: Some(dec("250000")),
    }
}
