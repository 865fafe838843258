pub mod market_analysis;

pub use market_analysis::{analyze_market, AnalysisReport, AnalysisRequest};
