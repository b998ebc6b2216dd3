mod history;
mod holding;
mod report;

pub use history::{History, HistoryDataPoint, MarketDataMap};
pub use holding::Holding;
pub use report::{ChartSeries, Report};
