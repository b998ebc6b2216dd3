//! In-memory holdings store for tests and embedding.

use anyhow::Result;
use tokio::sync::Mutex;

use super::{upsert, HoldingsStore};
use crate::models::Holding;

#[derive(Default)]
pub struct MemoryHoldingsStore {
    holdings: Mutex<Vec<Holding>>,
}

impl MemoryHoldingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_holdings(holdings: Vec<Holding>) -> Self {
        Self {
            holdings: Mutex::new(holdings),
        }
    }
}

#[async_trait::async_trait]
impl HoldingsStore for MemoryHoldingsStore {
    async fn all_holdings(&self) -> Result<Vec<Holding>> {
        Ok(self.holdings.lock().await.clone())
    }

    async fn save_holding(&self, holding: &Holding) -> Result<()> {
        let mut holdings = self.holdings.lock().await;
        upsert(&mut holdings, holding);
        Ok(())
    }

    async fn remove_holding(&self, isin: &str) -> Result<bool> {
        let mut holdings = self.holdings.lock().await;
        let before = holdings.len();
        holdings.retain(|h| h.isin != isin);
        Ok(holdings.len() != before)
    }

    async fn clear(&self) -> Result<()> {
        self.holdings.lock().await.clear();
        Ok(())
    }
}
