use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::fs;
use tracing::debug;

use super::{upsert, validate_holdings, HoldingsStore};
use crate::models::Holding;

const HOLDINGS_FILE: &str = "holdings.json";

/// Holdings persisted as a JSON array in `{data_dir}/holdings.json`.
///
/// A missing file is an empty portfolio.
#[derive(Debug, Clone)]
pub struct JsonFileHoldingsStore {
    base_path: PathBuf,
}

impl JsonFileHoldingsStore {
    pub fn new(base_path: impl AsRef<Path>) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    pub fn holdings_file(&self) -> PathBuf {
        self.base_path.join(HOLDINGS_FILE)
    }

    async fn read_holdings(&self) -> Result<Vec<Holding>> {
        let path = self.holdings_file();
        let holdings: Vec<Holding> = match fs::read_to_string(&path).await {
            Ok(content) if content.trim().is_empty() => Vec::new(),
            Ok(content) => serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse holdings from {}", path.display()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read holdings file {}", path.display()))
            }
        };

        validate_holdings(&holdings)
            .with_context(|| format!("Invalid holdings in {}", path.display()))?;
        debug!(path = %path.display(), count = holdings.len(), "loaded holdings");
        Ok(holdings)
    }

    async fn write_holdings(&self, holdings: &[Holding]) -> Result<()> {
        let path = self.holdings_file();
        fs::create_dir_all(&self.base_path)
            .await
            .context("Failed to create data directory")?;
        let content =
            serde_json::to_string_pretty(holdings).context("Failed to serialize holdings")?;
        fs::write(&path, content)
            .await
            .with_context(|| format!("Failed to write holdings file {}", path.display()))?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl HoldingsStore for JsonFileHoldingsStore {
    async fn all_holdings(&self) -> Result<Vec<Holding>> {
        self.read_holdings().await
    }

    async fn save_holding(&self, holding: &Holding) -> Result<()> {
        let mut holdings = self.read_holdings().await?;
        upsert(&mut holdings, holding);
        validate_holdings(&holdings)?;
        self.write_holdings(&holdings).await
    }

    async fn remove_holding(&self, isin: &str) -> Result<bool> {
        let mut holdings = self.read_holdings().await?;
        let before = holdings.len();
        holdings.retain(|h| h.isin != isin);
        if holdings.len() == before {
            return Ok(false);
        }
        self.write_holdings(&holdings).await?;
        Ok(true)
    }

    async fn clear(&self) -> Result<()> {
        match fs::remove_file(self.holdings_file()).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).context("Failed to remove holdings file"),
        }
    }
}
