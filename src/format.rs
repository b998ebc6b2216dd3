use rust_decimal::{Decimal, RoundingStrategy};

use crate::calculation::CalculationError;
use crate::models::Report;
use crate::validation::NonEmpty;

/// Currency symbol used for absolute figures.
pub const CURRENCY_SYMBOL: &str = "€";

/// Compact description of a failed calculation, e.g.
/// `"ZeroShares (A), IdentifierNotFound (B)"`.
pub fn error_summary(errors: &NonEmpty<CalculationError>) -> String {
    errors
        .iter()
        .map(|error| match error.isin() {
            Some(isin) => format!("{} ({isin})", error.name()),
            None => error.name().to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Renders `value` with exactly two decimal places.
fn fixed_2dp(value: Decimal) -> String {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded.to_string()
}

fn signed(value: Decimal) -> String {
    let rendered = fixed_2dp(value);
    if value > Decimal::ZERO {
        format!("+{rendered}")
    } else {
        rendered
    }
}

pub fn percent_string(value: Decimal) -> String {
    format!("{}%", signed(value))
}

pub fn currency_string(value: Decimal) -> String {
    format!("{}{CURRENCY_SYMBOL}", signed(value))
}

/// Two-line summary: today's change and the change since purchase.
pub fn format_report(report: &Report) -> String {
    format!(
        "Today: {} ({})\nTotal: {} ({})",
        percent_string(report.percent_today),
        currency_string(report.absolute_today),
        percent_string(report.percent_total),
        currency_string(report.absolute_total),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_summary_keeps_order() {
        let mut errors = NonEmpty::new(CalculationError::zero_shares("A"));
        errors.push(CalculationError::identifier_not_found("B"));
        errors.push(CalculationError::EmptyHoldings);
        assert_eq!(
            error_summary(&errors),
            "ZeroShares (A), IdentifierNotFound (B), EmptyHoldings"
        );
    }

    #[test]
    fn test_percent_string_pads_and_signs() {
        assert_eq!(percent_string(dec!(100)), "+100.00%");
        assert_eq!(percent_string(dec!(-9.09)), "-9.09%");
        assert_eq!(percent_string(dec!(0)), "0.00%");
    }

    #[test]
    fn test_currency_string_rounds_half_up() {
        assert_eq!(currency_string(dec!(60.005)), "+60.01€");
        assert_eq!(currency_string(dec!(-8)), "-8.00€");
    }

    #[test]
    fn test_format_report() {
        let report = Report::rounded(dec!(100), dec!(60), dec!(-1.5), dec!(-3));
        assert_eq!(
            format_report(&report),
            "Today: +100.00% (+60.00€)\nTotal: -1.50% (-3.00€)"
        );
    }
}
