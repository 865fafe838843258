use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::Outcome;

/// A binary market as seen by one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Market {
    /// Condition ID.
    pub id: String,
    pub question: Option<String>,
    /// Exactly two outcome labels, index 0 is outcome A.
    pub outcomes: [String; 2],
    /// Normalized final prices, if the provider reported any.
    pub final_prices: Option<[Decimal; 2]>,
    pub closed: bool,
    pub volume: Option<Decimal>,
}

impl Market {
    /// Fallback used when no metadata could be fetched: Yes/No labels, no prices.
    pub fn unknown(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            question: None,
            outcomes: ["Yes".into(), "No".into()],
            final_prices: None,
            closed: false,
            volume: None,
        }
    }

    pub fn label(&self, outcome: Outcome) -> &str {
        &self.outcomes[outcome.index()]
    }

    /// Case-insensitive lookup of a label.
    pub fn outcome_for_label(&self, label: &str) -> Option<Outcome> {
        let label = label.trim();
        if label.eq_ignore_ascii_case(&self.outcomes[0]) {
            Some(Outcome::A)
        } else if label.eq_ignore_ascii_case(&self.outcomes[1]) {
            Some(Outcome::B)
        } else {
            None
        }
    }
}

/// Which side settled at $1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    OutcomeA,
    OutcomeB,
    Unresolved,
}

impl Resolution {
    pub fn winner(&self) -> Option<Outcome> {
        match self {
            Resolution::OutcomeA => Some(Outcome::A),
            Resolution::OutcomeB => Some(Outcome::B),
            Resolution::Unresolved => None,
        }
    }
}

impl From<Outcome> for Resolution {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::A => Resolution::OutcomeA,
            Outcome::B => Resolution::OutcomeB,
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::OutcomeA => write!(f, "outcome_a"),
            Resolution::OutcomeB => write!(f, "outcome_b"),
            Resolution::Unresolved => write!(f, "unresolved"),
        }
    }
}
