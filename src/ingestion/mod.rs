pub mod normalize;
pub mod trade_fetcher;

pub use normalize::{normalize_trade, parse_trade_timestamp};
pub use trade_fetcher::{
    FetchConfig, FetchOutcome, FetchStats, FetchStatus, Termination, TradeFetcher,
};
