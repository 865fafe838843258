use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Market {market_id} has no determinable resolution; supply an explicit outcome")]
    AmbiguousResolution { market_id: String },

    #[error("Market {market_id} is not a two-outcome market")]
    UnsupportedMarket { market_id: String },

    #[error("Invalid resolution override: {0}")]
    InvalidOverride(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Why a single provider record was rejected. Rejected records are counted
/// and skipped; they never abort a fetch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedRecord {
    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("unknown side `{0}`")]
    InvalidSide(String),

    #[error("outcome `{0}` does not belong to this market")]
    UnknownOutcome(String),

    #[error("price {0} outside [0, 1]")]
    PriceOutOfRange(String),

    #[error("negative size {0}")]
    NegativeSize(String),

    #[error("unparseable timestamp `{0}`")]
    InvalidTimestamp(String),

    #[error("undecodable record: {0}")]
    Undecodable(String),
}
