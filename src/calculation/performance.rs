//! Performance report: change since the previous trading day and since purchase.

use rust_decimal::Decimal;
use tracing::debug;

use super::{CalculationError, CalculationResult};
use crate::models::{Holding, MarketDataMap, Report};
use crate::validation::{collect_all, zip3, NonEmpty};

/// Share-weighted values of a holding whose inputs all passed validation.
#[derive(Debug, Clone, Copy)]
struct ValuedHolding {
    today: Decimal,
    yesterday: Decimal,
    on_buy: Decimal,
}

#[derive(Debug, Default)]
struct Totals {
    today: Decimal,
    yesterday: Decimal,
    on_buy: Decimal,
}

/// Computes the performance report for `holdings`.
///
/// `today` and `yesterday` must each hold a single-day snapshot per
/// identifier. Every holding is checked for a usable share count and for one
/// non-zero close price on both days; all failures are returned together.
/// Values beyond the decimal range are reported as `Overflow`.
pub fn calculate(
    holdings: &[Holding],
    today: &MarketDataMap,
    yesterday: &MarketDataMap,
) -> CalculationResult<Report> {
    if holdings.is_empty() {
        return Err(NonEmpty::new(CalculationError::EmptyHoldings));
    }

    let result = collect_all(
        holdings
            .iter()
            .map(|holding| validate_holding(holding, today, yesterday)),
    )
    .and_then(|valued| build_report(&valued).map_err(NonEmpty::new));

    if let Err(errors) = &result {
        debug!(errors = errors.len(), "performance calculation rejected");
    }
    result
}

fn validate_holding(
    holding: &Holding,
    today: &MarketDataMap,
    yesterday: &MarketDataMap,
) -> CalculationResult<ValuedHolding> {
    zip3(
        usable_shares(holding),
        single_close(today, &holding.isin),
        single_close(yesterday, &holding.isin),
        |shares, today_close, yesterday_close| (shares, today_close, yesterday_close),
    )
    .and_then(|(shares, today_close, yesterday_close)| {
        value_holding(holding, shares, today_close, yesterday_close).map_err(NonEmpty::new)
    })
}

/// Share counts are used as a multiplier and as a divisor downstream.
pub(crate) fn usable_shares(holding: &Holding) -> Result<Decimal, CalculationError> {
    if holding.shares.is_zero() {
        Err(CalculationError::zero_shares(&holding.isin))
    } else {
        Ok(holding.shares)
    }
}

/// Extracts the one close price of a single-day snapshot.
///
/// Checked in order: identifier present, exactly one point, non-zero close.
fn single_close(data: &MarketDataMap, isin: &str) -> Result<Decimal, CalculationError> {
    let history = data
        .get(isin)
        .ok_or_else(|| CalculationError::identifier_not_found(isin))?;
    match history.data.as_slice() {
        [] => Err(CalculationError::no_close_value(isin)),
        [point] if point.close.is_zero() => Err(CalculationError::zero_close_value(isin)),
        [point] => Ok(point.close),
        _ => Err(CalculationError::too_many_close_values(isin)),
    }
}

fn value_holding(
    holding: &Holding,
    shares: Decimal,
    today_close: Decimal,
    yesterday_close: Decimal,
) -> Result<ValuedHolding, CalculationError> {
    let overflow = || CalculationError::overflow_in(&holding.isin);
    Ok(ValuedHolding {
        today: shares.checked_mul(today_close).ok_or_else(overflow)?,
        yesterday: shares.checked_mul(yesterday_close).ok_or_else(overflow)?,
        on_buy: holding.value_on_buy().ok_or_else(overflow)?,
    })
}

fn portfolio_overflow() -> CalculationError {
    CalculationError::Overflow { isin: None }
}

fn build_report(valued: &[ValuedHolding]) -> Result<Report, CalculationError> {
    let totals = valued
        .iter()
        .try_fold(Totals::default(), |acc, holding| {
            Some(Totals {
                today: acc.today.checked_add(holding.today)?,
                yesterday: acc.yesterday.checked_add(holding.yesterday)?,
                on_buy: acc.on_buy.checked_add(holding.on_buy)?,
            })
        })
        .ok_or_else(portfolio_overflow)?;

    debug!(
        total_today = %totals.today,
        total_yesterday = %totals.yesterday,
        total_on_buy = %totals.on_buy,
        holdings = valued.len(),
        "aggregated portfolio totals"
    );

    Ok(Report::rounded(
        percent_change(totals.today, totals.yesterday)?,
        difference(totals.today, totals.yesterday)?,
        percent_change(totals.today, totals.on_buy)?,
        difference(totals.today, totals.on_buy)?,
    ))
}

fn difference(current: Decimal, base: Decimal) -> Result<Decimal, CalculationError> {
    current.checked_sub(base).ok_or_else(portfolio_overflow)
}

/// `current / base * 100 - 100`; zero when `base` is zero.
fn percent_change(current: Decimal, base: Decimal) -> Result<Decimal, CalculationError> {
    if base.is_zero() {
        return Ok(Decimal::ZERO);
    }
    current
        .checked_div(base)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .and_then(|percent| percent.checked_sub(Decimal::ONE_HUNDRED))
        .ok_or_else(portfolio_overflow)
}
