pub mod leaderboard;
pub mod market;
pub mod position;
pub mod trade;

pub use leaderboard::{LeaderboardEntry, LeaderboardSummary};
pub use market::{Market, Resolution};
pub use position::WalletPosition;
pub use trade::Trade;

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Side
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn from_api_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "BUY" | "0" => Some(Side::Buy),
            "SELL" | "1" => Some(Side::Sell),
            _ => None,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

// ---------------------------------------------------------------------------
// Outcome — which of the two binary legs a share belongs to
// ---------------------------------------------------------------------------

/// Position of an outcome within the market's two-element label list.
/// `A` is the first label (usually "Yes"), `B` the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Outcome {
    A,
    B,
}

impl Outcome {
    pub fn from_index(index: u64) -> Option<Self> {
        match index {
            0 => Some(Outcome::A),
            1 => Some(Outcome::B),
            _ => None,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Outcome::A => 0,
            Outcome::B => 1,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::A => write!(f, "A"),
            Outcome::B => write!(f, "B"),
        }
    }
}

/// First ten characters of a wallet address, for table columns and logs.
pub fn short_wallet(wallet: &str) -> String {
    wallet.chars().take(10).collect()
}
