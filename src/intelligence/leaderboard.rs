use std::cmp::Ordering;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::intelligence::ledger::PositionLedger;
use crate::models::{LeaderboardEntry, LeaderboardSummary, Outcome, Trade, WalletPosition};

const SECONDS_PER_DAY: i64 = 86_400;

/// Settle one wallet against the winning outcome.
///
/// Each winning share redeems for 1; a short winning balance is a liability of
/// the same size. The losing outcome settles at 0.
pub fn settle_position(position: &WalletPosition, winner: Outcome) -> LeaderboardEntry {
    let final_shares = position.shares(winner);
    let pnl = final_shares - position.total_spent + position.total_received;

    let avg_purchase_price = if position.shares_bought > Decimal::ZERO {
        position.total_spent / position.shares_bought
    } else {
        Decimal::ZERO
    };
    let roi_pct = if position.total_spent > Decimal::ZERO {
        pnl / position.total_spent * Decimal::ONE_HUNDRED
    } else {
        Decimal::ZERO
    };

    LeaderboardEntry {
        wallet: position.wallet.clone(),
        display_name: position.display_name.clone(),
        pnl,
        total_spent: position.total_spent,
        total_received: position.total_received,
        final_shares,
        trade_count: position.trade_count,
        avg_purchase_price,
        roi_pct,
        total_volume: position.total_spent + position.total_received,
        first_trade_at: position.first_trade_at,
    }
}

/// Settled entries plus the trade sample they were computed from. Every view
/// reads the same computed data.
#[derive(Debug, Clone, Serialize)]
pub struct Leaderboard {
    pub winner: Outcome,
    /// Sorted by P&L descending, wallet ascending.
    entries: Vec<LeaderboardEntry>,
    trades: Vec<Trade>,
    pub summary: LeaderboardSummary,
}

impl Leaderboard {
    pub fn build(ledger: &PositionLedger, trades: Vec<Trade>, winner: Outcome) -> Self {
        let mut entries: Vec<LeaderboardEntry> = ledger
            .positions()
            .map(|p| settle_position(p, winner))
            .collect();
        entries.sort_by(by_pnl);

        let summary = summarize(&entries, &trades);
        metrics::gauge!("leaderboard_wallets").set(entries.len() as f64);

        Self {
            winner,
            entries,
            trades,
            summary,
        }
    }

    /// Ranked by P&L, best first.
    pub fn by_pnl(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    /// Ranked by cash spent, largest first.
    pub fn by_spent(&self) -> Vec<&LeaderboardEntry> {
        let mut view: Vec<&LeaderboardEntry> = self.entries.iter().collect();
        view.sort_by(|a, b| by_spent(a, b));
        view
    }

    /// Canonical trades, largest cash value first.
    pub fn sample_trades(&self) -> Vec<&Trade> {
        let mut view: Vec<&Trade> = self.trades.iter().collect();
        view.sort_by(|a, b| {
            b.cash_value()
                .cmp(&a.cash_value())
                .then_with(|| a.transaction_hash.cmp(&b.transaction_hash))
        });
        view
    }

    pub fn entry(&self, wallet: &str) -> Option<&LeaderboardEntry> {
        self.entries.iter().find(|e| e.wallet == wallet)
    }

    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn by_pnl(a: &LeaderboardEntry, b: &LeaderboardEntry) -> Ordering {
    b.pnl.cmp(&a.pnl).then_with(|| a.wallet.cmp(&b.wallet))
}

fn by_spent(a: &LeaderboardEntry, b: &LeaderboardEntry) -> Ordering {
    b.total_spent
        .cmp(&a.total_spent)
        .then_with(|| a.wallet.cmp(&b.wallet))
}

fn summarize(entries: &[LeaderboardEntry], trades: &[Trade]) -> LeaderboardSummary {
    let winners: Vec<&LeaderboardEntry> =
        entries.iter().filter(|e| e.pnl > Decimal::ZERO).collect();
    let losers: Vec<&LeaderboardEntry> =
        entries.iter().filter(|e| e.pnl < Decimal::ZERO).collect();

    let winners_pnl = winners.iter().map(|e| e.pnl).sum::<Decimal>();
    let losers_pnl = losers.iter().map(|e| e.pnl).sum::<Decimal>();

    let time_span_days = match (
        trades.iter().map(|t| t.timestamp).min(),
        trades.iter().map(|t| t.timestamp).max(),
    ) {
        (Some(first), Some(last)) => {
            Decimal::from((last - first).num_seconds()) / Decimal::from(SECONDS_PER_DAY)
        }
        _ => Decimal::ZERO,
    };

    LeaderboardSummary {
        trades_analyzed: trades.len(),
        wallets: entries.len(),
        winners: winners.len(),
        losers: losers.len(),
        winners_pnl,
        losers_pnl,
        net_pnl: entries.iter().map(|e| e.pnl).sum(),
        total_settled_shares: entries.iter().map(|e| e.final_shares).sum(),
        total_spent: entries.iter().map(|e| e.total_spent).sum(),
        total_received: entries.iter().map(|e| e.total_received).sum(),
        time_span_days,
    }
}
