use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use futures::future::try_join_all;
use tracing::{debug, info, warn};

use super::HistorySource;
use crate::models::MarketDataMap;

/// Assembles [`MarketDataMap`]s by querying a [`HistorySource`] once per identifier.
pub struct MarketDataService {
    source: Arc<dyn HistorySource>,
}

impl MarketDataService {
    pub fn new(source: Arc<dyn HistorySource>) -> Self {
        Self { source }
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// History for a single trading day.
    pub async fn fetch_day(&self, isins: &[String], day: NaiveDate) -> Result<MarketDataMap> {
        self.fetch_range(isins, day, day).await
    }

    /// History for every identifier between `min_date` and `max_date`.
    ///
    /// Requests run concurrently. Any failed request fails the whole batch.
    pub async fn fetch_range(
        &self,
        isins: &[String],
        min_date: NaiveDate,
        max_date: NaiveDate,
    ) -> Result<MarketDataMap> {
        if isins.is_empty() {
            debug!("no identifiers requested, skipping fetch");
            return Ok(MarketDataMap::new());
        }

        let requests = isins.iter().map(|isin| async move {
            let history = self
                .source
                .fetch_history(isin, min_date, max_date)
                .await
                .with_context(|| {
                    format!(
                        "Failed to fetch history for {isin} from {} ({min_date} to {max_date})",
                        self.source.name()
                    )
                })?;
            if history.isin != *isin {
                warn!(
                    requested = %isin,
                    returned = %history.isin,
                    "history returned for a different identifier"
                );
            }
            Ok::<_, anyhow::Error>((isin.clone(), history))
        });

        let entries = try_join_all(requests).await?;
        let points: usize = entries.iter().map(|(_, h)| h.data.len()).sum();
        info!(
            source = %self.source.name(),
            identifiers = entries.len(),
            points,
            min_date = %min_date,
            max_date = %max_date,
            "fetched price history"
        );

        Ok(entries.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::NoopSource;

    #[tokio::test]
    async fn test_empty_request_returns_empty_map() -> Result<()> {
        let service = MarketDataService::new(Arc::new(NoopSource));
        let day = NaiveDate::from_ymd_opt(2020, 9, 11).unwrap();

        let data = service.fetch_day(&[], day).await?;
        assert!(data.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_keys_by_requested_identifier() -> Result<()> {
        let service = MarketDataService::new(Arc::new(NoopSource));
        let day = NaiveDate::from_ymd_opt(2020, 9, 11).unwrap();

        let data = service
            .fetch_day(&["A".to_string(), "B".to_string()], day)
            .await?;
        assert_eq!(data.keys().collect::<Vec<_>>(), vec!["A", "B"]);
        assert!(data["A"].data.is_empty());
        Ok(())
    }
}
