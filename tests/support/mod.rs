#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use stockecho::market_data::HistorySource;
use stockecho::models::{History, HistoryDataPoint, Holding};
use stockecho::storage::{HoldingsStore, MemoryHoldingsStore};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// History source backed by a fixed set of close prices.
#[derive(Debug, Default)]
pub struct MockHistorySource {
    closes: HashMap<String, Vec<HistoryDataPoint>>,
    fail_on_fetch: bool,
    fetch_count: AtomicUsize,
}

impl MockHistorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_close(mut self, isin: &str, date: NaiveDate, close: Decimal) -> Self {
        self.closes
            .entry(isin.to_string())
            .or_default()
            .push(HistoryDataPoint::close_only(date.format("%Y-%m-%d").to_string(), close));
        self
    }

    pub fn fail_on_fetch(mut self) -> Self {
        self.fail_on_fetch = true;
        self
    }

    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HistorySource for MockHistorySource {
    async fn fetch_history(
        &self,
        isin: &str,
        min_date: NaiveDate,
        max_date: NaiveDate,
    ) -> Result<History> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_on_fetch {
            anyhow::bail!("mock fetch failure");
        }

        let min = min_date.format("%Y-%m-%d").to_string();
        let max = max_date.format("%Y-%m-%d").to_string();
        let data = self
            .closes
            .get(isin)
            .map(|points| {
                points
                    .iter()
                    .filter(|p| p.date >= min && p.date <= max)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(History::new(isin, data))
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// In-memory holdings store that counts full reads.
#[derive(Default)]
pub struct CountingHoldingsStore {
    inner: MemoryHoldingsStore,
    reads: AtomicUsize,
}

impl CountingHoldingsStore {
    pub fn with_holdings(holdings: Vec<Holding>) -> Self {
        Self {
            inner: MemoryHoldingsStore::with_holdings(holdings),
            reads: AtomicUsize::new(0),
        }
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HoldingsStore for CountingHoldingsStore {
    async fn all_holdings(&self) -> Result<Vec<Holding>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.all_holdings().await
    }

    async fn save_holding(&self, holding: &Holding) -> Result<()> {
        self.inner.save_holding(holding).await
    }

    async fn remove_holding(&self, isin: &str) -> Result<bool> {
        self.inner.remove_holding(isin).await
    }

    async fn clear(&self) -> Result<()> {
        self.inner.clear().await
    }
}

/// Holdings store whose reads always fail.
pub struct FailingHoldingsStore;

#[async_trait]
impl HoldingsStore for FailingHoldingsStore {
    async fn all_holdings(&self) -> Result<Vec<Holding>> {
        anyhow::bail!("holdings unavailable")
    }

    async fn save_holding(&self, _holding: &Holding) -> Result<()> {
        anyhow::bail!("holdings unavailable")
    }

    async fn remove_holding(&self, _isin: &str) -> Result<bool> {
        anyhow::bail!("holdings unavailable")
    }

    async fn clear(&self) -> Result<()> {
        anyhow::bail!("holdings unavailable")
    }
}
