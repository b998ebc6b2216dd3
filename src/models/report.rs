use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Portfolio performance since the previous trading day and since purchase.
///
/// Every figure is rounded to two decimal places (half away from zero).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Percent change against the previous trading day's close.
    pub percent_today: Decimal,
    /// Currency change against the previous trading day's close.
    pub absolute_today: Decimal,
    /// Percent change against the purchase value.
    pub percent_total: Decimal,
    /// Currency change against the purchase value.
    pub absolute_total: Decimal,
}

impl Report {
    pub const DECIMAL_PLACES: u32 = 2;

    /// Builds a report, rounding every figure.
    pub fn rounded(
        percent_today: Decimal,
        absolute_today: Decimal,
        percent_total: Decimal,
        absolute_total: Decimal,
    ) -> Self {
        Self {
            percent_today: round(percent_today),
            absolute_today: round(absolute_today),
            percent_total: round(percent_total),
            absolute_total: round(absolute_total),
        }
    }
}

fn round(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(Report::DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Aggregated portfolio value per trading day, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChartSeries(Vec<Decimal>);

impl ChartSeries {
    pub fn new(values: Vec<Decimal>) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[Decimal] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_values(self) -> Vec<Decimal> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_report_rounds_half_up() {
        let report = Report::rounded(dec!(1.005), dec!(-1.005), dec!(2.004), dec!(33.3333));
        assert_eq!(report.percent_today, dec!(1.01));
        assert_eq!(report.absolute_today, dec!(-1.01));
        assert_eq!(report.percent_total, dec!(2.00));
        assert_eq!(report.absolute_total, dec!(33.33));
    }

    #[test]
    fn test_chart_series_serializes_as_list() {
        let series = ChartSeries::new(vec![dec!(10), dec!(12.5)]);
        assert_eq!(serde_json::to_string(&series).unwrap(), r#"["10","12.5"]"#);
    }
}
