mod common;

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tokio_util::sync::CancellationToken;

use poly_leaderboard::ingestion::{FetchStatus, Termination, TradeFetcher};
use poly_leaderboard::models::{Market, Outcome, Side};
use poly_leaderboard::polymarket::{DataClientError, FilterType, TradeQuery, TradeSource};

use common::{
    cash_value, dec, fetch_config, generated_records, raw_trade, FailingProvider,
    RepeatingProvider, StalledProvider, WalledProvider, MARKET_ID,
};

fn market() -> Market {
    Market::unknown(MARKET_ID)
}

/// Captures every query it receives and serves nothing.
#[derive(Default)]
struct RecordingProvider {
    queries: Mutex<Vec<TradeQuery>>,
    records: Vec<serde_json::Value>,
}

#[async_trait]
impl TradeSource for RecordingProvider {
    async fn fetch_trades(
        &self,
        query: &TradeQuery,
    ) -> Result<Vec<serde_json::Value>, DataClientError> {
        self.queries.lock().unwrap().push(query.clone());
        Ok(self
            .records
            .iter()
            .skip(query.offset as usize)
            .take(query.limit as usize)
            .cloned()
            .collect())
    }
}

#[tokio::test]
async fn test_offset_wall_truncates_unfiltered_history() {
    let provider = WalledProvider::new(generated_records(3000), 1000);
    let fetcher = TradeFetcher::new(&provider, fetch_config(250, 10_000));

    let outcome = fetcher
        .fetch(&market(), Decimal::ZERO, &CancellationToken::new())
        .await;

    // Only the first 1,000 matched records are reachable; the repeat is detected.
    assert_eq!(outcome.trades.len(), 1000);
    assert_eq!(
        outcome.status,
        FetchStatus::Complete {
            termination: Termination::RepeatedPage
        }
    );
    assert_eq!(outcome.duplicate_records, 250);
    assert_eq!(provider.calls(), 5);
}

#[tokio::test]
async fn test_cash_filter_recovers_every_large_trade_behind_the_wall() {
    let records = generated_records(3000);
    let threshold = dec("2000");
    let expected = records.iter().filter(|r| cash_value(r) >= threshold).count();
    assert!(expected > 0 && expected < 1000, "fixture must fit under the wall");

    let provider = WalledProvider::new(records, 1000);
    let fetcher = TradeFetcher::new(&provider, fetch_config(250, 10_000));
    let outcome = fetcher
        .fetch(&market(), threshold, &CancellationToken::new())
        .await;

    assert_eq!(outcome.trades.len(), expected);
    assert!(outcome.trades.iter().all(|t| t.cash_value() >= threshold));
    assert!(outcome.is_complete());
}

#[tokio::test]
async fn test_fetch_is_idempotent() {
    let provider = WalledProvider::new(generated_records(1500), 1000);
    let fetcher = TradeFetcher::new(&provider, fetch_config(100, 10_000));
    let cancel = CancellationToken::new();

    let first = fetcher.fetch(&market(), dec("500"), &cancel).await;
    let second = fetcher.fetch(&market(), dec("500"), &cancel).await;

    assert_eq!(first.trades.len(), second.trades.len());
    assert_eq!(first.total_cash_value(), second.total_cash_value());
    assert_eq!(first.status, second.status);
}

#[tokio::test]
async fn test_endless_repeating_page_terminates() {
    let page: Vec<serde_json::Value> = (0..10)
        .map(|i| {
            raw_trade(
                "0xloop",
                Side::Buy,
                Outcome::A,
                "100",
                "0.5",
                &format!("0xloop_{i}"),
                1_735_689_600,
            )
        })
        .collect();
    let provider = RepeatingProvider {
        page,
        calls: AtomicU32::new(0),
    };
    let fetcher = TradeFetcher::new(&provider, fetch_config(10, 10_000));

    let outcome = fetcher
        .fetch(&market(), Decimal::ZERO, &CancellationToken::new())
        .await;

    assert_eq!(outcome.trades.len(), 10);
    assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    assert_eq!(
        outcome.status,
        FetchStatus::Complete {
            termination: Termination::RepeatedPage
        }
    );
}

#[tokio::test]
async fn test_request_count_never_exceeds_ceiling() {
    // Every page is new and full, so only the ceiling can stop the loop.
    struct FreshForever(AtomicU32);

    #[async_trait]
    impl TradeSource for FreshForever {
        async fn fetch_trades(
            &self,
            query: &TradeQuery,
        ) -> Result<Vec<serde_json::Value>, DataClientError> {
            let call = self.0.fetch_add(1, Ordering::SeqCst);
            Ok((0..query.limit)
                .map(|i| {
                    raw_trade(
                        "0xw",
                        Side::Sell,
                        Outcome::B,
                        "10",
                        "0.5",
                        &format!("0x{call}_{i}"),
                        1_735_689_600,
                    )
                })
                .collect())
        }
    }

    let provider = FreshForever(AtomicU32::new(0));
    let fetcher = TradeFetcher::new(&provider, fetch_config(100, 1_000));
    let outcome = fetcher
        .fetch(&market(), Decimal::ZERO, &CancellationToken::new())
        .await;

    assert_eq!(provider.0.load(Ordering::SeqCst), 10);
    assert_eq!(outcome.status, FetchStatus::PaginationExhausted);
    assert!(!outcome.is_complete());
    assert_eq!(outcome.final_offset, 1_000);
}

#[tokio::test]
async fn test_transport_failure_keeps_partial_set() {
    let provider = FailingProvider {
        records: generated_records(25),
        ok_pages: 2,
        calls: AtomicU32::new(0),
    };
    let fetcher = TradeFetcher::new(&provider, fetch_config(10, 10_000));
    let outcome = fetcher
        .fetch(&market(), Decimal::ZERO, &CancellationToken::new())
        .await;

    assert_eq!(outcome.trades.len(), 20);
    assert!(matches!(outcome.status, FetchStatus::TransportFailed { .. }));
    assert!(!outcome.is_complete());
}

#[tokio::test]
async fn test_fully_malformed_page_does_not_stop_pagination() {
    let mut records = generated_records(30);
    for record in &mut records[10..20] {
        record["side"] = serde_json::json!("MERGE");
    }
    let provider = FailingProvider {
        records,
        ok_pages: 100,
        calls: AtomicU32::new(0),
    };
    let fetcher = TradeFetcher::new(&provider, fetch_config(10, 10_000));
    let outcome = fetcher
        .fetch(&market(), Decimal::ZERO, &CancellationToken::new())
        .await;

    assert_eq!(outcome.malformed_records, 10);
    assert_eq!(outcome.trades.len(), 20);
    assert_eq!(provider.calls.load(Ordering::SeqCst), 4);
    assert_eq!(
        outcome.status,
        FetchStatus::Complete {
            termination: Termination::EmptyPage
        }
    );
}

#[tokio::test]
async fn test_transport_failure_on_first_page_is_empty_with_error() {
    let provider = FailingProvider {
        records: generated_records(25),
        ok_pages: 0,
        calls: AtomicU32::new(0),
    };
    let fetcher = TradeFetcher::new(&provider, fetch_config(10, 10_000));
    let outcome = fetcher
        .fetch(&market(), Decimal::ZERO, &CancellationToken::new())
        .await;

    assert!(outcome.trades.is_empty());
    match outcome.status {
        FetchStatus::TransportFailed { message } => assert!(message.contains("502")),
        other => panic!("expected transport failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_page_timeout_fails_the_page() {
    let mut config = fetch_config(10, 10_000);
    config.page_timeout = Duration::from_millis(50);
    let fetcher = TradeFetcher::new(StalledProvider, config);

    let outcome = fetcher
        .fetch(&market(), Decimal::ZERO, &CancellationToken::new())
        .await;

    assert_eq!(outcome.pages_requested, 1);
    match outcome.status {
        FetchStatus::TransportFailed { message } => assert!(message.contains("timed out")),
        other => panic!("expected timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn test_cancellation_interrupts_in_flight_request() {
    let fetcher = TradeFetcher::new(StalledProvider, fetch_config(10, 10_000));
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let outcome = fetcher.fetch(&market(), Decimal::ZERO, &cancel).await;

    assert_eq!(outcome.status, FetchStatus::Cancelled);
    assert!(outcome.trades.is_empty());
}

#[tokio::test]
async fn test_queries_carry_cash_filter_and_advance_by_page_size() {
    let provider = RecordingProvider {
        records: generated_records(25),
        ..Default::default()
    };
    let fetcher = TradeFetcher::new(&provider, fetch_config(10, 10_000));
    fetcher
        .fetch(&market(), Decimal::ONE, &CancellationToken::new())
        .await;

    let queries = provider.queries.lock().unwrap();
    let offsets: Vec<u32> = queries.iter().map(|q| q.offset).collect();
    assert_eq!(offsets, vec![0, 10, 20]);
    let filter = Some((FilterType::Cash, Decimal::ONE));
    assert!(queries
        .iter()
        .all(|q| q.market == MARKET_ID && q.limit == 10 && q.filter == filter));
}

#[tokio::test]
async fn test_zero_threshold_sends_no_filter() {
    let provider = RecordingProvider::default();
    let fetcher = TradeFetcher::new(&provider, fetch_config(10, 10_000));
    let outcome = fetcher
        .fetch(&market(), Decimal::ZERO, &CancellationToken::new())
        .await;

    let queries = provider.queries.lock().unwrap();
    assert_eq!(queries.len(), 1);
    assert!(queries[0].filter.is_none());
    assert_eq!(
        outcome.status,
        FetchStatus::Complete {
            termination: Termination::EmptyPage
        }
    );
}
