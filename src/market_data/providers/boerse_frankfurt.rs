//! Börse Frankfurt price-history source.
//!
//! The public data API returns daily OHLC history for an ISIN on a given
//! market (`mic`). Xetra (`XETR`) is used unless configured otherwise.

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use reqwest::Client;
use tracing::debug;

use crate::market_data::HistorySource;
use crate::models::History;

pub const DEFAULT_BASE_URL: &str = "https://api.boerse-frankfurt.de/data";
pub const DEFAULT_MIC: &str = "XETR";

const PRICE_HISTORY_PATH: &str = "/price_history";
/// Upper bound on points per response; covers two years of trading days.
const PAGE_LIMIT: u32 = 505;

/// Fetches price history from the Börse Frankfurt data API.
#[derive(Debug, Clone)]
pub struct BoerseFrankfurtSource {
    client: Client,
    base_url: String,
    mic: String,
}

impl BoerseFrankfurtSource {
    pub fn new() -> Self {
        Self::with_client(Client::new())
    }

    /// Creates a source whose requests give up after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            mic: DEFAULT_MIC.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_mic(mut self, mic: impl Into<String>) -> Self {
        self.mic = mic.into().to_uppercase();
        self
    }

    fn price_history_url(&self) -> String {
        format!("{}{PRICE_HISTORY_PATH}", self.base_url)
    }
}

impl Default for BoerseFrankfurtSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl HistorySource for BoerseFrankfurtSource {
    async fn fetch_history(
        &self,
        isin: &str,
        min_date: NaiveDate,
        max_date: NaiveDate,
    ) -> Result<History> {
        let url = self.price_history_url();
        debug!(isin, %min_date, %max_date, mic = %self.mic, "requesting price history");

        let limit = PAGE_LIMIT.to_string();
        let min_date = min_date.format("%Y-%m-%d").to_string();
        let max_date = max_date.format("%Y-%m-%d").to_string();

        let history = self
            .client
            .get(&url)
            .query(&[
                ("offset", "0"),
                ("limit", limit.as_str()),
                ("mic", self.mic.as_str()),
                ("isin", isin),
                ("minDate", min_date.as_str()),
                ("maxDate", max_date.as_str()),
            ])
            .send()
            .await
            .with_context(|| format!("Request to {url} failed"))?
            .error_for_status()?
            .json::<History>()
            .await
            .with_context(|| format!("Failed to parse price history for {isin}"))?;

        Ok(history)
    }

    fn name(&self) -> &str {
        "boerse-frankfurt"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_endpoint() {
        let source = BoerseFrankfurtSource::new();
        assert_eq!(
            source.price_history_url(),
            "https://api.boerse-frankfurt.de/data/price_history"
        );
        assert_eq!(source.mic, "XETR");
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let source = BoerseFrankfurtSource::new()
            .with_base_url("http://localhost:8080/")
            .with_mic("xfra");
        assert_eq!(source.price_history_url(), "http://localhost:8080/price_history");
        assert_eq!(source.mic, "XFRA");
    }

    #[test]
    fn test_provider_name() {
        assert_eq!(BoerseFrankfurtSource::default().name(), "boerse-frankfurt");
    }
}
