use anyhow::Result;
use chrono::NaiveDate;

use crate::models::History;

/// A remote service that returns daily close-price history.
#[async_trait::async_trait]
pub trait HistorySource: Send + Sync {
    /// Price history for `isin` between `min_date` and `max_date`, inclusive.
    async fn fetch_history(
        &self,
        isin: &str,
        min_date: NaiveDate,
        max_date: NaiveDate,
    ) -> Result<History>;

    fn name(&self) -> &str;
}

/// Returns empty history for every request.
pub struct NoopSource;

#[async_trait::async_trait]
impl HistorySource for NoopSource {
    async fn fetch_history(
        &self,
        isin: &str,
        _min_date: NaiveDate,
        _max_date: NaiveDate,
    ) -> Result<History> {
        Ok(History::new(isin, Vec::new()))
    }

    fn name(&self) -> &str {
        "noop"
    }
}
