use thiserror::Error;

/// Reasons a holding's contribution could not be computed.
///
/// Per-holding failures carry the identifier of the holding (or market-data
/// snapshot) they belong to. `EmptyHoldings` and the window-wide
/// `ZeroCloseValue` concern the whole input and carry none.
#[derive(Error, Debug, Clone, PartialEq, Eq, Hash)]
pub enum CalculationError {
    #[error("no holdings configured")]
    EmptyHoldings,

    #[error("no market data for {isin}")]
    IdentifierNotFound { isin: String },

    #[error("{isin} has zero shares")]
    ZeroShares { isin: String },

    #[error("more than one close value for {isin} on a single trading day")]
    TooManyCloseValues { isin: String },

    #[error("no close value for {isin}")]
    NoCloseValue { isin: String },

    #[error("close value is zero{}", for_holding(.isin))]
    ZeroCloseValue { isin: Option<String> },

    /// A value exceeded the decimal range while aggregating.
    #[error("value out of range{}", for_holding(.isin))]
    Overflow { isin: Option<String> },
}

fn for_holding(isin: &Option<String>) -> String {
    isin.as_deref()
        .map(|isin| format!(" for {isin}"))
        .unwrap_or_default()
}

impl CalculationError {
    /// Variant name, used for compact user-facing summaries.
    pub fn name(&self) -> &'static str {
        match self {
            CalculationError::EmptyHoldings => "EmptyHoldings",
            CalculationError::IdentifierNotFound { .. } => "IdentifierNotFound",
            CalculationError::ZeroShares { .. } => "ZeroShares",
            CalculationError::TooManyCloseValues { .. } => "TooManyCloseValues",
            CalculationError::NoCloseValue { .. } => "NoCloseValue",
            CalculationError::ZeroCloseValue { .. } => "ZeroCloseValue",
            CalculationError::Overflow { .. } => "Overflow",
        }
    }

    /// Identifier of the holding the error belongs to, if any.
    pub fn isin(&self) -> Option<&str> {
        match self {
            CalculationError::EmptyHoldings => None,
            CalculationError::IdentifierNotFound { isin }
            | CalculationError::ZeroShares { isin }
            | CalculationError::TooManyCloseValues { isin }
            | CalculationError::NoCloseValue { isin } => Some(isin.as_str()),
            CalculationError::ZeroCloseValue { isin } | CalculationError::Overflow { isin } => {
                isin.as_deref()
            }
        }
    }

    pub fn identifier_not_found(isin: &str) -> Self {
        CalculationError::IdentifierNotFound {
            isin: isin.to_string(),
        }
    }

    pub fn zero_shares(isin: &str) -> Self {
        CalculationError::ZeroShares {
            isin: isin.to_string(),
        }
    }

    pub fn too_many_close_values(isin: &str) -> Self {
        CalculationError::TooManyCloseValues {
            isin: isin.to_string(),
        }
    }

    pub fn no_close_value(isin: &str) -> Self {
        CalculationError::NoCloseValue {
            isin: isin.to_string(),
        }
    }

    pub fn zero_close_value(isin: &str) -> Self {
        CalculationError::ZeroCloseValue {
            isin: Some(isin.to_string()),
        }
    }

    pub fn overflow_in(isin: &str) -> Self {
        CalculationError::Overflow {
            isin: Some(isin.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_holding() {
        assert_eq!(
            CalculationError::zero_shares("IE00B3VVMM84").to_string(),
            "IE00B3VVMM84 has zero shares"
        );
        assert_eq!(
            CalculationError::zero_close_value("A").to_string(),
            "close value is zero for A"
        );
        assert_eq!(
            CalculationError::ZeroCloseValue { isin: None }.to_string(),
            "close value is zero"
        );
        assert_eq!(CalculationError::no_close_value("A").name(), "NoCloseValue");
    }

    #[test]
    fn test_isin_accessor() {
        assert_eq!(CalculationError::too_many_close_values("B").isin(), Some("B"));
        assert_eq!(CalculationError::overflow_in("C").isin(), Some("C"));
        assert_eq!(CalculationError::Overflow { isin: None }.isin(), None);
        assert_eq!(CalculationError::EmptyHoldings.isin(), None);
    }
}
