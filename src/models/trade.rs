use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{short_wallet, Outcome, Side};

/// A single validated fill from the trades endpoint.
///
/// `transaction_hash` is the dedup key: two records carrying the same hash are
/// the same economic event and only the first one seen is kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub market_id: String,
    /// Proxy wallet of the economic actor.
    pub wallet: String,
    pub side: Side,
    pub outcome: Outcome,
    /// Outcome label as the provider reported it, e.g. "Yes".
    pub outcome_label: String,
    pub size: Decimal,
    pub price: Decimal,
    pub transaction_hash: String,
    pub timestamp: DateTime<Utc>,
    /// Provider display name (`name`, falling back to `pseudonym`).
    pub display_name: Option<String>,
}

impl Trade {
    /// Cash value of the fill: size × price.
    pub fn cash_value(&self) -> Decimal {
        self.size * self.price
    }
}

impl fmt::Display for Trade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Trade: wallet={} side={} outcome={} size={} price={} value={}",
            short_wallet(&self.wallet),
            self.side,
            self.outcome_label,
            self.size,
            self.price,
            self.cash_value(),
        )
    }
}
