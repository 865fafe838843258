pub mod leaderboard;
pub mod ledger;
pub mod resolution;

pub use leaderboard::{settle_position, Leaderboard};
pub use ledger::PositionLedger;
pub use resolution::{
    detect_resolution, parse_override, settle_outcome, ResolutionSource, SettledOutcome,
};
