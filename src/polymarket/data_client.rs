use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;

use super::source::TradeSource;
use super::types::TradeQuery;

#[derive(Debug, Error)]
pub enum DataClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("unexpected response: {0}")]
    Unexpected(String),
}

#[derive(Debug, Clone)]
pub struct DataClient {
    http: Client,
    base_url: String,
}

impl DataClient {
    pub fn with_base_url(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Fetch one page of trades for a market. Records are returned undecoded so
    /// a single bad record can be rejected without losing the page.
    pub async fn get_trades(
        &self,
        query: &TradeQuery,
    ) -> Result<Vec<serde_json::Value>, DataClientError> {
        let url = format!("{}/trades", self.base_url);
        tracing::debug!(
            market = %query.market,
            offset = query.offset,
            limit = query.limit,
            "Requesting trades page"
        );

        let resp = self
            .http
            .get(&url)
            .query(&query.to_params())
            .send()
            .await?
            .error_for_status()?;

        let body: serde_json::Value = resp.json().await?;
        match body {
            serde_json::Value::Array(records) => Ok(records),
            serde_json::Value::Null => Ok(Vec::new()),
            other => Err(DataClientError::Unexpected(format!(
                "expected a JSON array of trades, got {}",
                json_kind(&other)
            ))),
        }
    }
}

#[async_trait]
impl TradeSource for DataClient {
    async fn fetch_trades(
        &self,
        query: &TradeQuery,
    ) -> Result<Vec<serde_json::Value>, DataClientError> {
        self.get_trades(query).await
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
