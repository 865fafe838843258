use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Outcome;

/// Running per-wallet state built by the position ledger.
///
/// Share balances are signed: a negative balance is a net short (a liability
/// that settles at the same magnitude), never clamped to zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletPosition {
    pub wallet: String,
    pub shares_a: Decimal,
    pub shares_b: Decimal,
    /// Cash paid on BUY fills.
    pub total_spent: Decimal,
    /// Cash received on SELL fills.
    pub total_received: Decimal,
    /// Gross shares acquired on BUY fills, used for the average purchase price.
    pub shares_bought: Decimal,
    pub trade_count: u32,
    pub first_trade_at: Option<DateTime<Utc>>,
    /// Transaction hash of the earliest trade, paired with `first_trade_at`.
    pub first_trade_hash: Option<String>,
    pub display_name: Option<String>,
}

impl WalletPosition {
    pub fn new(wallet: impl Into<String>) -> Self {
        Self {
            wallet: wallet.into(),
            shares_a: Decimal::ZERO,
            shares_b: Decimal::ZERO,
            total_spent: Decimal::ZERO,
            total_received: Decimal::ZERO,
            shares_bought: Decimal::ZERO,
            trade_count: 0,
            first_trade_at: None,
            first_trade_hash: None,
            display_name: None,
        }
    }

    pub fn shares(&self, outcome: Outcome) -> Decimal {
        match outcome {
            Outcome::A => self.shares_a,
            Outcome::B => self.shares_b,
        }
    }

    pub fn shares_mut(&mut self, outcome: Outcome) -> &mut Decimal {
        match outcome {
            Outcome::A => &mut self.shares_a,
            Outcome::B => &mut self.shares_b,
        }
    }
}
