pub mod config;
pub mod errors;
pub mod ingestion;
pub mod intelligence;
pub mod metrics;
pub mod models;
pub mod polymarket;
pub mod services;

pub use config::AppConfig;
pub use errors::AppError;
pub use services::{analyze_market, AnalysisReport, AnalysisRequest};
