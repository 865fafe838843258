use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;

use super::source::MarketSource;
use super::types::GammaMarket;
use crate::models::Market;

#[derive(Debug, Error)]
pub enum GammaClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("market {0} not found")]
    NotFound(String),

    #[error("market does not have exactly two outcomes")]
    NotBinary,

    #[error("unexpected response: {0}")]
    Unexpected(String),
}

#[derive(Debug, Clone)]
pub struct GammaClient {
    http: Client,
    base_url: String,
}

impl GammaClient {
    pub fn with_base_url(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Look up a single market by condition ID.
    pub async fn get_market_by_condition_id(
        &self,
        condition_id: &str,
    ) -> Result<GammaMarket, GammaClientError> {
        let url = format!("{}/markets", self.base_url);
        let resp = self
            .http
            .get(&url)
            .query(&[("condition_ids", condition_id)])
            .send()
            .await?
            .error_for_status()?;

        let markets: Vec<GammaMarket> = resp.json().await?;
        markets
            .into_iter()
            .find(|m| m.condition_id.eq_ignore_ascii_case(condition_id))
            .ok_or_else(|| GammaClientError::NotFound(condition_id.to_string()))
    }
}

#[async_trait]
impl MarketSource for GammaClient {
    async fn fetch_market(&self, condition_id: &str) -> Result<Market, GammaClientError> {
        let gamma = self.get_market_by_condition_id(condition_id).await?;
        gamma.into_market().ok_or(GammaClientError::NotBinary)
    }
}
