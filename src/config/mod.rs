use rust_decimal::Decimal;
use std::env;

use crate::errors::AppError;

const DEFAULT_DATA_API_URL: &str = "https://data-api.polymarket.com";
const DEFAULT_GAMMA_API_URL: &str = "https://gamma-api.polymarket.com";

/// Largest page the trades endpoint will serve per request.
pub const MAX_PAGE_SIZE: u32 = 1_000;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_api_url: String,
    pub gamma_api_url: String,

    // Fetch loop
    pub page_size: u32,
    /// Hard offset ceiling: no page is requested at or past this offset.
    pub max_offset: u32,
    pub page_timeout_secs: u64,
    /// Pause between page requests.
    pub page_delay_ms: u64,

    // Analysis defaults (overridable per invocation)
    pub min_trade_value: Decimal,
    pub top_n: usize,
    pub sample_trades_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_api_url: DEFAULT_DATA_API_URL.into(),
            gamma_api_url: DEFAULT_GAMMA_API_URL.into(),
            page_size: 500,
            max_offset: 10_000,
            page_timeout_secs: 30,
            page_delay_ms: 100,
            min_trade_value: Decimal::from(1_000),
            top_n: 50,
            sample_trades_limit: 50,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();

        let config = Self {
            data_api_url: env::var("POLYMARKET_DATA_API_URL")
                .unwrap_or_else(|_| defaults.data_api_url.clone()),
            gamma_api_url: env::var("POLYMARKET_GAMMA_API_URL")
                .unwrap_or_else(|_| defaults.gamma_api_url.clone()),

            page_size: parse_var("FETCH_PAGE_SIZE", defaults.page_size)?,
            max_offset: parse_var("FETCH_MAX_OFFSET", defaults.max_offset)?,
            page_timeout_secs: parse_var("FETCH_PAGE_TIMEOUT_SECS", defaults.page_timeout_secs)?,
            page_delay_ms: parse_var("FETCH_PAGE_DELAY_MS", defaults.page_delay_ms)?,

            min_trade_value: parse_var("MIN_TRADE_VALUE", defaults.min_trade_value)?,
            top_n: parse_var("LEADERBOARD_TOP_N", defaults.top_n)?,
            sample_trades_limit: parse_var("SAMPLE_TRADES_LIMIT", defaults.sample_trades_limit)?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the fetch loop cannot honour.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(AppError::Config(format!(
                "FETCH_PAGE_SIZE must be within 1..={MAX_PAGE_SIZE}, got {}",
                self.page_size
            )));
        }
        if self.max_offset < self.page_size {
            return Err(AppError::Config(format!(
                "FETCH_MAX_OFFSET ({}) must be at least FETCH_PAGE_SIZE ({})",
                self.max_offset, self.page_size
            )));
        }
        if self.page_timeout_secs == 0 {
            return Err(AppError::Config("FETCH_PAGE_TIMEOUT_SECS must be positive".into()));
        }
        if self.min_trade_value.is_sign_negative() {
            return Err(AppError::Config("MIN_TRADE_VALUE must not be negative".into()));
        }
        Ok(())
    }
}

fn parse_var<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{key} is invalid: {e}")),
        _ => Ok(default),
    }
}
