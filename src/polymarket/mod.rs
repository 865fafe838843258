pub mod data_client;
pub mod gamma_client;
pub mod source;
pub mod types;

pub use data_client::{DataClient, DataClientError};
pub use gamma_client::{GammaClient, GammaClientError};
pub use source::{MarketSource, TradeSource};
pub use types::{ApiTrade, EncodedList, FilterType, GammaMarket, TradeQuery};
