//! Transport-shaped DTOs and the codecs that convert them to and from the
//! domain types.
//!
//! Encoding (`From<&Domain> for Wire`) never fails. Decoding
//! (`TryFrom<Wire> for Domain`) fails with [`WireError`] on malformed input,
//! while unknown enum tokens degrade to their fallback variant.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::{asset::AssetIdError, event::EventError, identity::IdentityError, policy::PolicyError};

#[cfg(test)]
pub(crate) mod arbitrary;
pub mod asset;
pub mod audit;
pub mod context;
pub mod decimal;
pub mod event;
pub mod identity;
pub mod money;
pub mod policy;
pub mod result;
pub mod token;
pub mod transaction;
pub mod v3;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WireError {
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error(transparent)]
    AssetId(#[from] AssetIdError),
    #[error(transparent)]
    Event(#[from] EventError),
    #[error(transparent)]
    Policy(#[from] PolicyError),
    #[error(transparent)]
    Decimal(#[from] decimal::DecimalParseError),
    #[error(transparent)]
    Money(#[from] money::MoneyError),
    #[error("Timestamp {millis}ms is outside the supported range")]
    TimestampOutOfRange { millis: i64 },
    #[error("Field `{field}` must not be empty")]
    EmptyField { field: &'static str },
}

pub fn to_unix_millis(timestamp: DateTime<Utc>) -> i64 {
    timestamp.timestamp_millis()
}

pub fn from_unix_millis(millis: i64) -> Result<DateTime<Utc>, WireError> {
    DateTime::from_timestamp_millis(millis).ok_or(WireError::TimestampOutOfRange { millis })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn millis_round_trip() {
        for millis in [0, 1_700_000_000_123, -86_400_001] {
            assert_eq!(to_unix_millis(from_unix_millis(millis).unwrap()), millis);
        }
        assert_eq!(
            from_unix_millis(i64::MAX),
            Err(WireError::TimestampOutOfRange { millis: i64::MAX })
        );
    }
}
