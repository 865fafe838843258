use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::errors::MalformedRecord;
use crate::models::{Market, Outcome, Side, Trade};
use crate::polymarket::ApiTrade;

/// Decode and validate one raw provider record against the market it was
/// requested for.
pub fn normalize_trade(raw: serde_json::Value, market: &Market) -> Result<Trade, MalformedRecord> {
    let api: ApiTrade =
        serde_json::from_value(raw).map_err(|e| MalformedRecord::Undecodable(e.to_string()))?;
    validate_trade(api, market)
}

pub fn validate_trade(api: ApiTrade, market: &Market) -> Result<Trade, MalformedRecord> {
    let transaction_hash = non_empty(api.transaction_hash.as_deref())
        .ok_or(MalformedRecord::MissingField("transactionHash"))?;
    let wallet = non_empty(api.proxy_wallet.as_deref())
        .ok_or(MalformedRecord::MissingField("proxyWallet"))?;

    let side_raw = api.side.as_deref().ok_or(MalformedRecord::MissingField("side"))?;
    let side =
        Side::from_api_str(side_raw).ok_or_else(|| MalformedRecord::InvalidSide(side_raw.into()))?;

    let size = api.size.ok_or(MalformedRecord::MissingField("size"))?;
    if size.is_sign_negative() && !size.is_zero() {
        return Err(MalformedRecord::NegativeSize(size.to_string()));
    }

    let price = api.price.ok_or(MalformedRecord::MissingField("price"))?;
    if price < Decimal::ZERO || price > Decimal::ONE {
        return Err(MalformedRecord::PriceOutOfRange(price.to_string()));
    }

    let outcome = resolve_outcome(&api, market)?;
    let outcome_label = api
        .outcome
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| market.label(outcome))
        .to_string();

    let timestamp = match api.timestamp.as_ref() {
        Some(ts) => parse_trade_timestamp(ts)
            .ok_or_else(|| MalformedRecord::InvalidTimestamp(ts.to_string()))?,
        None => return Err(MalformedRecord::MissingField("timestamp")),
    };

    let market_id = non_empty(api.condition_id.as_deref()).unwrap_or_else(|| market.id.clone());
    let display_name = api.display_name();

    Ok(Trade {
        market_id,
        wallet,
        side,
        outcome,
        outcome_label,
        size,
        price,
        transaction_hash,
        timestamp,
        display_name,
    })
}

/// `outcomeIndex` wins when present; otherwise match the label against the
/// market's two outcomes.
fn resolve_outcome(api: &ApiTrade, market: &Market) -> Result<Outcome, MalformedRecord> {
    if let Some(index) = api.outcome_index() {
        return Outcome::from_index(index)
            .ok_or_else(|| MalformedRecord::UnknownOutcome(format!("index {index}")));
    }

    let label = api
        .outcome
        .as_deref()
        .ok_or(MalformedRecord::MissingField("outcome"))?;
    market
        .outcome_for_label(label)
        .ok_or_else(|| MalformedRecord::UnknownOutcome(label.to_string()))
}

fn non_empty(s: Option<&str>) -> Option<String> {
    s.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

/// Seconds or milliseconds (> 1e12) since the epoch, as number or string, or RFC 3339.
pub fn parse_trade_timestamp(ts: &serde_json::Value) -> Option<DateTime<Utc>> {
    match ts {
        serde_json::Value::Number(n) => from_epoch(n.as_i64()?),
        serde_json::Value::String(s) => {
            if let Ok(secs) = s.trim().parse::<i64>() {
                return from_epoch(secs);
            }
            DateTime::parse_from_rfc3339(s.trim())
                .ok()
                .map(|dt| dt.with_timezone(&Utc))
        }
        _ => None,
    }
}

fn from_epoch(value: i64) -> Option<DateTime<Utc>> {
    if value > 1_000_000_000_000 {
        DateTime::from_timestamp(value / 1000, ((value % 1000) * 1_000_000) as u32)
    } else {
        DateTime::from_timestamp(value, 0)
    }
}
