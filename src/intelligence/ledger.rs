use std::collections::HashMap;

use crate::models::{Side, Trade, WalletPosition};

/// Per-wallet positions folded from a canonical trade set.
///
/// The fold is purely additive, so the final state does not depend on the
/// order trades are applied in. Balances are never clamped: selling shares a
/// wallet never bought leaves it net short.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionLedger {
    positions: HashMap<String, WalletPosition>,
}

impl PositionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_trades<'a>(trades: impl IntoIterator<Item = &'a Trade>) -> Self {
        let mut ledger = Self::new();
        for trade in trades {
            ledger.apply(trade);
        }
        ledger
    }

    pub fn apply(&mut self, trade: &Trade) {
        let position = self
            .positions
            .entry(trade.wallet.clone())
            .or_insert_with(|| WalletPosition::new(trade.wallet.clone()));

        let cash = trade.cash_value();
        match trade.side {
            Side::Buy => {
                *position.shares_mut(trade.outcome) += trade.size;
                position.total_spent += cash;
                position.shares_bought += trade.size;
            }
            Side::Sell => {
                *position.shares_mut(trade.outcome) -= trade.size;
                position.total_received += cash;
            }
        }
        position.trade_count += 1;

        // Identity comes from the earliest trade, (timestamp, hash) ordered, so
        // it is the same whatever order trades arrive in.
        let is_earliest = match (&position.first_trade_at, &position.first_trade_hash) {
            (Some(at), Some(hash)) => {
                (trade.timestamp, trade.transaction_hash.as_str()) < (*at, hash.as_str())
            }
            _ => true,
        };
        if is_earliest {
            position.first_trade_at = Some(trade.timestamp);
            position.first_trade_hash = Some(trade.transaction_hash.clone());
            position.display_name = trade.display_name.clone();
        }
    }

    pub fn get(&self, wallet: &str) -> Option<&WalletPosition> {
        self.positions.get(wallet)
    }

    pub fn positions(&self) -> impl Iterator<Item = &WalletPosition> {
        self.positions.values()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
