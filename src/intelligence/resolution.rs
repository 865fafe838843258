use rust_decimal::Decimal;
use serde::Serialize;

use crate::errors::AppError;
use crate::models::{Market, Outcome, Resolution};

/// Where the winning outcome used for settlement came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionSource {
    /// Read off the provider's final prices.
    Detected,
    /// Supplied by the caller.
    Override,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SettledOutcome {
    pub winner: Outcome,
    pub source: ResolutionSource,
    /// What the final prices said, independent of any override.
    pub detected: Resolution,
}

/// Map a degenerate final price pair to its winner.
///
/// Only `[1, 0]` and `[0, 1]` count as settled. Anything else (an open market
/// trading at `[0.5, 0.5]`, a half-written `[1, 1]`) is `Unresolved`.
pub fn detect_resolution(final_prices: Option<&[Decimal; 2]>) -> Resolution {
    let Some([a, b]) = final_prices else {
        return Resolution::Unresolved;
    };

    match (*a == Decimal::ONE, *b == Decimal::ONE) {
        (true, false) if b.is_zero() => Resolution::OutcomeA,
        (false, true) if a.is_zero() => Resolution::OutcomeB,
        _ => Resolution::Unresolved,
    }
}

/// Parse a caller-supplied outcome: `a`/`b`, `yes`/`no`, or one of the
/// market's own labels (case-insensitive).
pub fn parse_override(raw: &str, market: &Market) -> Result<Outcome, AppError> {
    let trimmed = raw.trim();
    if let Some(outcome) = market.outcome_for_label(trimmed) {
        return Ok(outcome);
    }
    match trimmed.to_lowercase().as_str() {
        "a" | "yes" | "outcome_a" => Ok(Outcome::A),
        "b" | "no" | "outcome_b" => Ok(Outcome::B),
        _ => Err(AppError::InvalidOverride(format!(
            "`{trimmed}` is neither A/B nor one of {:?}",
            market.outcomes
        ))),
    }
}

/// Pick the outcome to settle against. An explicit override always wins;
/// without one, the market must have settled or this is an error.
pub fn settle_outcome(
    market: &Market,
    override_outcome: Option<Outcome>,
) -> Result<SettledOutcome, AppError> {
    let detected = detect_resolution(market.final_prices.as_ref());

    match (override_outcome, detected.winner()) {
        (Some(winner), detected_winner) => {
            if let Some(detected_winner) = detected_winner.filter(|d| *d != winner) {
                tracing::warn!(
                    market_id = %market.id,
                    detected = market.label(detected_winner),
                    assumed = market.label(winner),
                    "Override contradicts the provider's final prices"
                );
            }
            Ok(SettledOutcome {
                winner,
                source: ResolutionSource::Override,
                detected,
            })
        }
        (None, Some(winner)) => Ok(SettledOutcome {
            winner,
            source: ResolutionSource::Detected,
            detected,
        }),
        (None, None) => Err(AppError::AmbiguousResolution {
            market_id: market.id.clone(),
        }),
    }
}
