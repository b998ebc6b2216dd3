mod json_file;
mod memory;

pub use json_file::JsonFileHoldingsStore;
pub use memory::MemoryHoldingsStore;

use anyhow::{bail, Result};
use rust_decimal::Decimal;

use crate::models::Holding;

/// Persistence for the portfolio's holdings.
///
/// Calculations always read the full set; there is no incremental update
/// path on the read side.
#[async_trait::async_trait]
pub trait HoldingsStore: Send + Sync {
    async fn all_holdings(&self) -> Result<Vec<Holding>>;

    /// Inserts `holding`, replacing any existing holding with the same identifier.
    async fn save_holding(&self, holding: &Holding) -> Result<()>;

    /// Returns whether a holding was removed.
    async fn remove_holding(&self, isin: &str) -> Result<bool>;

    async fn clear(&self) -> Result<()>;
}

/// Rejects holdings the calculators cannot interpret.
///
/// Zero share counts are accepted here; they are a calculation-time error.
pub fn validate_holdings(holdings: &[Holding]) -> Result<()> {
    let mut seen = std::collections::HashSet::new();
    for holding in holdings {
        if holding.isin.trim().is_empty() {
            bail!("Holding has an empty identifier");
        }
        if holding.purchase_price < Decimal::ZERO {
            bail!(
                "Holding {} has a negative purchase price: {}",
                holding.isin,
                holding.purchase_price
            );
        }
        if !seen.insert(holding.isin.as_str()) {
            bail!("Duplicate holding identifier: {}", holding.isin);
        }
    }
    Ok(())
}

/// Replaces the holding with the same identifier, or appends.
pub(crate) fn upsert(holdings: &mut Vec<Holding>, holding: &Holding) {
    match holdings.iter_mut().find(|h| h.isin == holding.isin) {
        Some(existing) => *existing = holding.clone(),
        None => holdings.push(holding.clone()),
    }
}
