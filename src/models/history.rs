use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Price history for one security over a date range, as delivered by the
/// market-data service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct History {
    pub isin: String,
    pub data: Vec<HistoryDataPoint>,
    #[serde(default)]
    pub total_count: i64,
    #[serde(default)]
    pub traded_in_percent: bool,
}

/// One trading day of price history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryDataPoint {
    /// Trading date, `YYYY-MM-DD`.
    pub date: String,
    pub open: Decimal,
    pub close: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    #[serde(default)]
    pub turnover_pieces: i64,
    #[serde(default)]
    pub turnover_euro: Decimal,
}

/// Price history keyed by identifier.
///
/// Ordered so that iteration (and therefore error reporting) is stable.
pub type MarketDataMap = BTreeMap<String, History>;

impl History {
    pub fn new(isin: impl Into<String>, data: Vec<HistoryDataPoint>) -> Self {
        let total_count = data.len() as i64;
        Self {
            isin: isin.into(),
            data,
            total_count,
            traded_in_percent: false,
        }
    }
}

impl HistoryDataPoint {
    /// A point carrying only a close price; the other fields are zero.
    pub fn close_only(date: impl Into<String>, close: Decimal) -> Self {
        Self {
            date: date.into(),
            open: Decimal::ZERO,
            close,
            high: Decimal::ZERO,
            low: Decimal::ZERO,
            turnover_pieces: 0,
            turnover_euro: Decimal::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const SAMPLE_RESPONSE: &str = r#"{
        "isin": "IE00B3VVMM84",
        "data": [
            {
                "date": "2020-09-11",
                "open": 51.02,
                "close": 51.3,
                "high": 51.48,
                "low": 50.9,
                "turnoverPieces": 12034,
                "turnoverEuro": 615988.12
            }
        ],
        "totalCount": 1,
        "tradedInPercent": false
    }"#;

    #[test]
    fn test_parse_price_history_response() {
        let history: History = serde_json::from_str(SAMPLE_RESPONSE).unwrap();
        assert_eq!(history.isin, "IE00B3VVMM84");
        assert_eq!(history.total_count, 1);
        assert!(!history.traded_in_percent);
        assert_eq!(history.data.len(), 1);

        let point = &history.data[0];
        assert_eq!(point.date, "2020-09-11");
        assert_eq!(point.close, dec!(51.3));
        assert_eq!(point.turnover_pieces, 12034);
        assert_eq!(point.turnover_euro, dec!(615988.12));
    }

    #[test]
    fn test_parse_empty_history() {
        let history: History =
            serde_json::from_str(r#"{"isin":"A","data":[],"totalCount":0,"tradedInPercent":false}"#)
                .unwrap();
        assert!(history.data.is_empty());
    }
}
