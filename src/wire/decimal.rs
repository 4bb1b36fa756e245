//! Arbitrary precision decimals travel as plain strings: invariant digits,
//! `.` as the decimal point, optional leading `-`, no grouping separators.
//!
//! Two read paths exist on purpose. [`try_from_wire_string`] reports
//! malformed input and is what every money-bearing field uses.
//! [`from_wire_string`] substitutes zero instead and is reserved for
//! advisory values (scores, hints) where a bad value must not abort decoding.

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecimalParseError {
    #[error("Decimal value is empty")]
    Empty,
    #[error("`{input}` is not a valid decimal")]
    Invalid { input: String },
}

pub fn to_wire_string(value: Decimal) -> String {
    value.to_string()
}

/// Strict parse. Surrounding whitespace is ignored, exponent notation is
/// accepted, and values that would need rounding to fit are rejected.
pub fn try_from_wire_string(value: &str) -> Result<Decimal, DecimalParseError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(DecimalParseError::Empty);
    }
    Decimal::from_str_exact(value)
        .or_else(|err| {
            if value.contains(['e', 'E']) {
                Decimal::from_scientific(value)
            } else {
                Err(err)
            }
        })
        .map_err(|_| DecimalParseError::Invalid {
            input: value.to_string(),
        })
}

/// Permissive parse: empty or malformed input reads as zero.
pub fn from_wire_string(value: &str) -> Decimal {
    match try_from_wire_string(value) {
        Ok(decimal) => decimal,
        Err(DecimalParseError::Empty) => Decimal::ZERO,
        Err(err) => {
            warn!(%err, "substituting zero for malformed decimal");
            Decimal::ZERO
        }
    }
}
