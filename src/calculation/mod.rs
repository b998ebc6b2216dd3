//! Validation and aggregation of holdings against market data.
//!
//! Both calculators are pure: they never perform IO and never panic on bad
//! data. Every problem is reported as a [`CalculationError`] and all problems
//! across all holdings are returned together.

pub mod chart;
mod error;
pub mod performance;

pub use error::CalculationError;

use crate::validation::Validated;

/// Result of a calculation: the value or every error that prevented it.
pub type CalculationResult<T> = Validated<T, CalculationError>;
