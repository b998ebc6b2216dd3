#[cfg(feature = "market_data")]
pub mod providers;
mod service;
mod source;

pub use service::MarketDataService;
pub use source::{HistorySource, NoopSource};
