//! Fixed-point money: `units + nanos / 1e9` in a named currency.
//!
//! Conversion in both directions is exact. Amounts that would need more than
//! nine fractional digits are refused rather than rounded, and wire values
//! whose `units` and `nanos` disagree in sign are refused rather than
//! normalized.

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const NANOS_SCALE: u32 = 9;
pub const NANOS_PER_UNIT: i32 = 1_000_000_000;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Currency code must not be blank")]
    BlankCurrency,
    #[error("{amount} has more than 9 fractional digits and cannot be encoded exactly")]
    TooPrecise { amount: Decimal },
    #[error("{amount} does not fit into int64 units")]
    UnitsOutOfRange { amount: Decimal },
    #[error("Nanos {nanos} is outside the open range (-1e9, 1e9)")]
    NanosOutOfRange { nanos: Decimal },
    #[error("Inconsistent sign: units {units} but nanos {nanos}")]
    InconsistentSign { units: i64, nanos: i32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    pub currency_code: String,
    pub units: i64,
    pub nanos: i32,
}

impl Money {
    pub fn encode(currency_code: impl Into<String>, amount: Decimal) -> Result<Self, MoneyError> {
        let currency_code = currency_code.into();
        if currency_code.trim().is_empty() {
            return Err(MoneyError::BlankCurrency);
        }

        let amount = exact_nanos(amount)?;
        if amount.is_zero() {
            return Ok(Self {
                currency_code,
                units: 0,
                nanos: 0,
            });
        }

        let whole = amount.trunc();
        let units = whole
            .to_i64()
            .ok_or(MoneyError::UnitsOutOfRange { amount })?;
        // exact: at most nine fractional digits remain
        let scaled = ((amount - whole) * Decimal::from(NANOS_PER_UNIT)).trunc();
        let nanos = scaled
            .to_i32()
            .filter(|nanos| nanos_in_range(*nanos))
            .ok_or(MoneyError::NanosOutOfRange { nanos: scaled })?;

        Ok(Self {
            currency_code,
            units,
            nanos,
        })
    }

    pub fn decode(&self) -> Result<Decimal, MoneyError> {
        if self.currency_code.trim().is_empty() {
            return Err(MoneyError::BlankCurrency);
        }
        if !nanos_in_range(self.nanos) {
            return Err(MoneyError::NanosOutOfRange {
                nanos: Decimal::from(self.nanos),
            });
        }
        if (self.units > 0 && self.nanos < 0) || (self.units < 0 && self.nanos > 0) {
            return Err(MoneyError::InconsistentSign {
                units: self.units,
                nanos: self.nanos,
            });
        }
        if self.units == 0 && self.nanos == 0 {
            return Ok(Decimal::ZERO);
        }

        let nanos = Decimal::new(i64::from(self.nanos), NANOS_SCALE);
        Ok((Decimal::from(self.units) + nanos).normalize())
    }
}

fn nanos_in_range(nanos: i32) -> bool {
    -NANOS_PER_UNIT < nanos && nanos < NANOS_PER_UNIT
}

/// Strips trailing zeros and makes sure nothing beyond the ninth fractional
/// digit would be lost.
fn exact_nanos(amount: Decimal) -> Result<Decimal, MoneyError> {
    let normalized = amount.normalize();
    if normalized.scale() <= NANOS_SCALE {
        return Ok(normalized);
    }
    let truncated = normalized.round_dp_with_strategy(NANOS_SCALE, RoundingStrategy::ToZero);
    if truncated != normalized {
        return Err(MoneyError::TooPrecise { amount });
    }
    Ok(truncated)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    use super::*;

    fn money(units: i64, nanos: i32) -> Money {
        Money {
            currency_code: "NDS".to_string(),
            units,
            nanos,
        }
    }

    #[test]
    fn encode_exact_amounts() {
        assert_eq!(Money::encode("NDS", dec!(100.5)).unwrap(), money(100, 500_000_000));
        assert_eq!(Money::encode("NDS", dec!(-1.25)).unwrap(), money(-1, -250_000_000));
        assert_eq!(Money::encode("NDS", dec!(-0.5)).unwrap(), money(0, -500_000_000));
        assert_eq!(Money::encode("NDS", dec!(0.000000001)).unwrap(), money(0, 1));
        assert_eq!(Money::encode("NDS", dec!(0.00)).unwrap(), money(0, 0));
        assert_eq!(Money::encode("NDS", dec!(42)).unwrap(), money(42, 0));
    }

    #[test]
    fn encode_accepts_trailing_zeros_beyond_nanos() {
        assert_eq!(
            Money::encode("NDS", dec!(1.2300000000)).unwrap(),
            money(1, 230_000_000)
        );
    }

    #[test]
    fn encode_rejects_lossy_amounts() {
        assert_eq!(
            Money::encode("NDS", dec!(0.0000000001)),
            Err(MoneyError::TooPrecise {
                amount: dec!(0.0000000001)
            })
        );
        assert!(matches!(
            Money::encode("NDS", dec!(10000000000000000000)),
            Err(MoneyError::UnitsOutOfRange { .. })
        ));
        assert_eq!(Money::encode("  ", dec!(1)), Err(MoneyError::BlankCurrency));
    }

    #[test]
    fn decode_exact_amounts() {
        assert_eq!(money(-1, -250_000_000).decode(), Ok(dec!(-1.25)));
        assert_eq!(money(100, 500_000_000).decode(), Ok(dec!(100.5)));
        assert_eq!(money(0, -1).decode(), Ok(dec!(-0.000000001)));
        assert_eq!(money(0, 0).decode(), Ok(Decimal::ZERO));
        assert_eq!(
            money(i64::MAX, 999_999_999).decode(),
            Ok(dec!(9223372036854775807.999999999))
        );
    }

    #[test]
    fn decode_rejects_malformed_values() {
        assert_eq!(
            money(1, -5).decode(),
            Err(MoneyError::InconsistentSign {
                units: 1,
                nanos: -5
            })
        );
        assert_eq!(
            money(-1, 5).decode(),
            Err(MoneyError::InconsistentSign {
                units: -1,
                nanos: 5
            })
        );
        assert!(matches!(
            money(0, 1_000_000_000).decode(),
            Err(MoneyError::NanosOutOfRange { .. })
        ));
        assert!(matches!(
            money(0, -1_000_000_000).decode(),
            Err(MoneyError::NanosOutOfRange { .. })
        ));
        let blank = Money {
            currency_code: String::new(),
            units: 1,
            nanos: 0,
        };
        assert_eq!(blank.decode(), Err(MoneyError::BlankCurrency));
    }

    proptest! {
        #[test]
        fn nine_digit_amounts_round_trip(
            raw in (i64::MIN as i128 * 1_000_000_000 + 1)..=(i64::MAX as i128 * 1_000_000_000)
        ) {
            let amount = Decimal::from_i128_with_scale(raw, NANOS_SCALE);
            let encoded = Money::encode("X", amount).unwrap();
            prop_assert!(encoded.units == 0 || encoded.nanos == 0
                || encoded.units.signum() == i64::from(encoded.nanos.signum()));
            prop_assert_eq!(encoded.decode().unwrap(), amount);
        }
    }
}
