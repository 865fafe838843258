use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::short_wallet;

/// One ranked wallet. Derived per resolution assumption, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub wallet: String,
    pub display_name: Option<String>,
    /// settled shares − spent + received. Fees are not modelled.
    pub pnl: Decimal,
    pub total_spent: Decimal,
    pub total_received: Decimal,
    /// Signed balance of the winning outcome.
    pub final_shares: Decimal,
    pub trade_count: u32,
    pub avg_purchase_price: Decimal,
    pub roi_pct: Decimal,
    pub total_volume: Decimal,
    pub first_trade_at: Option<DateTime<Utc>>,
}

impl LeaderboardEntry {
    /// Name to show in tables: display name, else a shortened wallet.
    pub fn label(&self) -> String {
        match self.display_name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("{}...", short_wallet(&self.wallet)),
        }
    }

    pub fn profile_url(&self) -> String {
        profile_url(&self.wallet)
    }
}

pub fn profile_url(wallet: &str) -> String {
    format!("https://polymarket.com/@{wallet}?tab=activity")
}

/// Aggregate figures over the whole leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardSummary {
    pub trades_analyzed: usize,
    pub wallets: usize,
    pub winners: usize,
    pub losers: usize,
    pub winners_pnl: Decimal,
    pub losers_pnl: Decimal,
    pub net_pnl: Decimal,
    pub total_settled_shares: Decimal,
    pub total_spent: Decimal,
    pub total_received: Decimal,
    pub time_span_days: Decimal,
}

impl LeaderboardSummary {
    /// Σ settled shares − Σ spent + Σ received. Equals `net_pnl` by construction
    /// of the per-wallet formula; exposed so callers can check it.
    pub fn settlement_identity(&self) -> Decimal {
        self.total_settled_shares - self.total_spent + self.total_received
    }
}
