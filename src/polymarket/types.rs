use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::Market;

// ---------------------------------------------------------------------------
// Trade (Data API — REST)
// ---------------------------------------------------------------------------

/// Raw record from `GET /trades`. Every field is optional so one bad record
/// can be rejected on its own instead of failing the whole page.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiTrade {
    #[serde(default)]
    pub proxy_wallet: Option<String>,
    #[serde(default)]
    pub side: Option<String>,
    #[serde(default)]
    pub asset: Option<String>,
    #[serde(default)]
    pub condition_id: Option<String>,
    #[serde(default)]
    pub size: Option<Decimal>,
    #[serde(default)]
    pub price: Option<Decimal>,
    /// UNIX seconds or milliseconds, as a number or a string.
    #[serde(default)]
    pub timestamp: Option<serde_json::Value>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub outcome: Option<String>,
    #[serde(default)]
    pub outcome_index: Option<serde_json::Value>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub pseudonym: Option<String>,
    #[serde(default)]
    pub transaction_hash: Option<String>,
}

impl ApiTrade {
    /// `outcomeIndex` as an integer; the API has sent both `1` and `"1"`.
    pub fn outcome_index(&self) -> Option<u64> {
        match self.outcome_index.as_ref()? {
            serde_json::Value::Number(n) => n.as_u64(),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Non-empty `name`, else non-empty `pseudonym`.
    pub fn display_name(&self) -> Option<String> {
        [self.name.as_deref(), self.pseudonym.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|s| !s.is_empty())
            .map(str::to_string)
    }
}

/// Cash-value filter understood by the trades endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterType {
    Cash,
}

impl FilterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterType::Cash => "CASH",
        }
    }
}

/// One page request against the trades endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeQuery {
    pub market: String,
    pub limit: u32,
    pub offset: u32,
    /// `None` requests every trade regardless of size.
    pub filter: Option<(FilterType, Decimal)>,
}

impl TradeQuery {
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("market", self.market.clone()),
            ("limit", self.limit.to_string()),
            ("offset", self.offset.to_string()),
        ];
        if let Some((filter_type, amount)) = &self.filter {
            params.push(("filterType", filter_type.as_str().to_string()));
            params.push(("filterAmount", amount.normalize().to_string()));
        }
        params
    }
}

// ---------------------------------------------------------------------------
// Market (Gamma API)
// ---------------------------------------------------------------------------

/// A list field the Gamma API sends either as a JSON array or as a string
/// holding a JSON-encoded array, e.g. `"[\"1\", \"0\"]"`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum EncodedList {
    List(Vec<serde_json::Value>),
    Encoded(String),
}

impl EncodedList {
    /// Decode into the element list; an undecodable string yields an empty list.
    pub fn values(&self) -> Vec<serde_json::Value> {
        match self {
            EncodedList::List(values) => values.clone(),
            EncodedList::Encoded(raw) => {
                serde_json::from_str::<Vec<serde_json::Value>>(raw).unwrap_or_default()
            }
        }
    }

    /// Exactly two elements, each rendered as text.
    pub fn as_pair(&self) -> Option<[String; 2]> {
        let values = self.values();
        if values.len() != 2 {
            return None;
        }
        let text = |v: &serde_json::Value| match v {
            serde_json::Value::String(s) => Some(s.trim().to_string()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        };
        Some([text(&values[0])?, text(&values[1])?])
    }

    /// Exactly two numeric elements.
    pub fn as_decimal_pair(&self) -> Option<[Decimal; 2]> {
        let [a, b] = self.as_pair()?;
        Some([parse_decimal(&a)?, parse_decimal(&b)?])
    }
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GammaMarket {
    pub condition_id: String,
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    /// Outcome labels, e.g. ["Yes","No"] or ["G2 Esports","Karmine Corp"].
    #[serde(default)]
    pub outcomes: Option<EncodedList>,
    /// Final or current prices per outcome, e.g. ["1","0"].
    #[serde(default)]
    pub outcome_prices: Option<EncodedList>,
    #[serde(default)]
    pub closed: Option<bool>,
    #[serde(default)]
    pub volume: Option<serde_json::Value>,
}

impl GammaMarket {
    /// Normalize wire encodings into the internal market. Returns `None` when
    /// the market does not have exactly two outcomes.
    pub fn into_market(self) -> Option<Market> {
        let outcomes = match &self.outcomes {
            Some(list) => list.as_pair()?,
            None => ["Yes".to_string(), "No".to_string()],
        };
        let final_prices = self.outcome_prices.as_ref().and_then(EncodedList::as_decimal_pair);
        let volume = self.volume.as_ref().and_then(|v| match v {
            serde_json::Value::Number(n) => parse_decimal(&n.to_string()),
            serde_json::Value::String(s) => parse_decimal(s.trim()),
            _ => None,
        });

        Some(Market {
            id: self.condition_id,
            question: self.question,
            outcomes,
            final_prices,
            closed: self.closed.unwrap_or(false),
            volume,
        })
    }
}
