//! Portfolio value per trading day over a historical window.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tracing::debug;

use super::performance::usable_shares;
use super::{CalculationError, CalculationResult};
use crate::models::{ChartSeries, History, Holding, MarketDataMap};
use crate::validation::{collect_all, NonEmpty};

/// Computes the share-weighted portfolio value for every date in `window`.
///
/// Each snapshot in the window is weighted by its holding's share count;
/// weighted closes are summed per date and returned oldest first. Holdings
/// without data in the window do not contribute.
pub fn calculate(holdings: &[Holding], window: &MarketDataMap) -> CalculationResult<ChartSeries> {
    if holdings.is_empty() {
        return Err(NonEmpty::new(CalculationError::EmptyHoldings));
    }
    if window.is_empty() {
        return Err(NonEmpty::new(CalculationError::ZeroCloseValue { isin: None }));
    }

    let weighted = collect_all(window.iter().map(|(isin, history)| {
        weigh_history(holdings, isin, history).map_err(NonEmpty::new)
    }))?;

    let mut by_date: BTreeMap<&str, Decimal> = BTreeMap::new();
    for (date, value) in weighted.into_iter().flatten() {
        let total = by_date.entry(date).or_insert(Decimal::ZERO);
        *total = total
            .checked_add(value)
            .ok_or_else(|| NonEmpty::new(CalculationError::Overflow { isin: None }))?;
    }

    debug!(
        snapshots = window.len(),
        dates = by_date.len(),
        "aggregated chart series"
    );

    Ok(ChartSeries::new(by_date.into_values().collect()))
}

/// Multiplies every close in `history` by the holding's share count.
fn weigh_history<'a>(
    holdings: &[Holding],
    isin: &str,
    history: &'a History,
) -> Result<Vec<(&'a str, Decimal)>, CalculationError> {
    let shares = shares_for(holdings, isin)?;
    history
        .data
        .iter()
        .map(|point| {
            point
                .close
                .checked_mul(shares)
                .map(|value| (point.date.as_str(), value))
                .ok_or_else(|| CalculationError::overflow_in(isin))
        })
        .collect()
}

fn shares_for(holdings: &[Holding], isin: &str) -> Result<Decimal, CalculationError> {
    let holding = holdings
        .iter()
        .find(|holding| holding.isin == isin)
        .ok_or_else(|| CalculationError::identifier_not_found(isin))?;
    usable_shares(holding)
}
