use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One portfolio line item.
///
/// `shares` may legitimately be stored as zero (e.g. a position that was sold
/// but not yet removed); the calculators reject it as a divisor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holding {
    pub isin: String,
    pub shares: Decimal,
    /// Price paid per share.
    pub purchase_price: Decimal,
}

impl Holding {
    pub fn new(isin: impl Into<String>, shares: Decimal, purchase_price: Decimal) -> Self {
        Self {
            isin: isin.into(),
            shares,
            purchase_price,
        }
    }

    /// Value of the position at purchase time; `None` if it exceeds the decimal range.
    pub fn value_on_buy(&self) -> Option<Decimal> {
        self.shares.checked_mul(self.purchase_price)
    }
}
