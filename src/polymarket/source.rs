//! Provider boundaries the analysis depends on.
//!
//! The HTTP clients implement these; tests drive the fetch loop and the
//! analysis service with in-memory implementations.

use async_trait::async_trait;

use super::data_client::DataClientError;
use super::gamma_client::GammaClientError;
use super::types::TradeQuery;
use crate::models::Market;

/// One page of raw trade records for a query. An empty page means the
/// provider has nothing at that offset.
#[async_trait]
pub trait TradeSource: Send + Sync {
    async fn fetch_trades(
        &self,
        query: &TradeQuery,
    ) -> Result<Vec<serde_json::Value>, DataClientError>;
}

/// Market metadata, already normalized to the internal representation.
#[async_trait]
pub trait MarketSource: Send + Sync {
    async fn fetch_market(&self, condition_id: &str) -> Result<Market, GammaClientError>;
}

#[async_trait]
impl<T: TradeSource + ?Sized> TradeSource for &T {
    async fn fetch_trades(
        &self,
        query: &TradeQuery,
    ) -> Result<Vec<serde_json::Value>, DataClientError> {
        (**self).fetch_trades(query).await
    }
}

#[async_trait]
impl<T: MarketSource + ?Sized> MarketSource for &T {
    async fn fetch_market(&self, condition_id: &str) -> Result<Market, GammaClientError> {
        (**self).fetch_market(condition_id).await
    }
}
