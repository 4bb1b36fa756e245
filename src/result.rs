use std::{collections::BTreeMap, error::Error as StdError, fmt, sync::Arc};

use rust_decimal::Decimal;
use thiserror::Error;

use crate::wire::decimal::to_wire_string;

/// Well-known values for [`NdsError::code`].
pub mod error_codes {
    pub const ASSET_NOT_FOUND: &str = "ASSET_NOT_FOUND";
    pub const INSUFFICIENT_BALANCE: &str = "INSUFFICIENT_BALANCE";
    pub const EXCEEDS_LIMIT: &str = "EXCEEDS_LIMIT";
    pub const ASSET_ALREADY_EXISTS: &str = "ASSET_ALREADY_EXISTS";

    pub const IDENTITY_NOT_FOUND: &str = "IDENTITY_NOT_FOUND";
    pub const INVALID_IDENTITY: &str = "INVALID_IDENTITY";
    pub const PERMISSION_DENIED: &str = "PERMISSION_DENIED";

    pub const TRANSACTION_FAILED: &str = "TRANSACTION_FAILED";
    pub const TRANSACTION_TIMEOUT: &str = "TRANSACTION_TIMEOUT";
    pub const TRANSACTION_CONFLICT: &str = "TRANSACTION_CONFLICT";
    pub const INVALID_AMOUNT: &str = "INVALID_AMOUNT";

    pub const EVENT_NOT_FOUND: &str = "EVENT_NOT_FOUND";
    pub const INVALID_EVENT: &str = "INVALID_EVENT";
    pub const REPLAY_FAILED: &str = "REPLAY_FAILED";

    pub const PROJECTION_NOT_FOUND: &str = "PROJECTION_NOT_FOUND";
    pub const PROJECTION_ALREADY_EXISTS: &str = "PROJECTION_ALREADY_EXISTS";

    pub const SYSTEM_ERROR: &str = "SYSTEM_ERROR";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
    pub const SERVICE_UNAVAILABLE: &str = "SERVICE_UNAVAILABLE";
    pub const UNKNOWN: &str = "UNKNOWN";
    pub const INVALID_ARGUMENT: &str = "INVALID_ARGUMENT";
    pub const OPERATION_CANCELLED: &str = "OPERATION_CANCELLED";
}

/// Value stored in [`NdsError::details`]. On the wire every scalar is
/// rendered to its string form and read back as [`Scalar::Text`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scalar {
    Text(String),
    Int(i64),
    Decimal(Decimal),
    Bool(bool),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Text(text) => f.write_str(text),
            Scalar::Int(value) => write!(f, "{value}"),
            Scalar::Decimal(value) => f.write_str(&to_wire_string(*value)),
            Scalar::Bool(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Scalar::Int(value.into())
    }
}

impl From<Decimal> for Scalar {
    fn from(value: Decimal) -> Self {
        Scalar::Decimal(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

/// Domain-level failure carried as data (insufficient balance, not found,
/// conflict, timeout). Contract violations never end up here; they are the
/// `Err` side of the constructor or codec that detected them.
#[derive(Debug, Clone, Error)]
#[error("[{code}] {message}")]
pub struct NdsError {
    code: String,
    message: String,
    details: BTreeMap<String, Scalar>,
    #[source]
    cause: Option<Arc<dyn StdError + Send + Sync>>,
}

impl NdsError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: BTreeMap::new(),
            cause: None,
        }
    }

    pub fn with_details(mut self, details: BTreeMap<String, Scalar>) -> Self {
        self.details = details;
        self
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    pub fn with_cause(mut self, cause: impl StdError + Send + Sync + 'static) -> Self {
        self.cause = Some(Arc::new(cause));
        self
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn details(&self) -> &BTreeMap<String, Scalar> {
        &self.details
    }

    pub fn detail(&self, key: &str) -> Option<&Scalar> {
        self.details.get(key)
    }

    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.cause.as_deref()
    }
}

/// The cause is diagnostic only and does not take part in equality.
impl PartialEq for NdsError {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code && self.message == other.message && self.details == other.details
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ResultAccessError {
    #[error("Cannot access data on a failed result")]
    DataOnFailure,
    #[error("Cannot access error on a successful result")]
    ErrorOnSuccess,
}

/// Outcome of a domain operation: either the data or an [`NdsError`], never
/// both. Construct it explicitly with [`NdsResult::success`] or
/// [`NdsResult::failure`].
#[derive(Debug, Clone, PartialEq)]
pub enum NdsResult<T> {
    Success(T),
    Failure(NdsError),
}

impl NdsResult<()> {
    pub fn unit() -> Self {
        NdsResult::Success(())
    }
}

impl<T> NdsResult<T> {
    pub fn success(data: T) -> Self {
        NdsResult::Success(data)
    }

    pub fn failure(error: NdsError) -> Self {
        NdsResult::Failure(error)
    }

    pub fn failure_with(code: impl Into<String>, message: impl Into<String>) -> Self {
        NdsResult::Failure(NdsError::new(code, message))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, NdsResult::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    pub fn data(&self) -> Result<&T, ResultAccessError> {
        match self {
            NdsResult::Success(data) => Ok(data),
            NdsResult::Failure(_) => Err(ResultAccessError::DataOnFailure),
        }
    }

    pub fn error(&self) -> Result<&NdsError, ResultAccessError> {
        match self {
            NdsResult::Success(_) => Err(ResultAccessError::ErrorOnSuccess),
            NdsResult::Failure(error) => Ok(error),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> NdsResult<U> {
        match self {
            NdsResult::Success(data) => NdsResult::Success(f(data)),
            NdsResult::Failure(error) => NdsResult::Failure(error),
        }
    }

    pub fn and_then<U>(self, f: impl FnOnce(T) -> NdsResult<U>) -> NdsResult<U> {
        match self {
            NdsResult::Success(data) => f(data),
            NdsResult::Failure(error) => NdsResult::Failure(error),
        }
    }

    pub fn on_success(self, f: impl FnOnce(&T)) -> Self {
        if let NdsResult::Success(data) = &self {
            f(data);
        }
        self
    }

    pub fn on_failure(self, f: impl FnOnce(&NdsError)) -> Self {
        if let NdsResult::Failure(error) = &self {
            f(error);
        }
        self
    }

    pub fn get_or(self, default: T) -> T {
        match self {
            NdsResult::Success(data) => data,
            NdsResult::Failure(_) => default,
        }
    }

    pub fn fold<R>(self, on_success: impl FnOnce(T) -> R, on_failure: impl FnOnce(NdsError) -> R) -> R {
        match self {
            NdsResult::Success(data) => on_success(data),
            NdsResult::Failure(error) => on_failure(error),
        }
    }

    pub fn into_result(self) -> Result<T, NdsError> {
        match self {
            NdsResult::Success(data) => Ok(data),
            NdsResult::Failure(error) => Err(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn success_and_failure_are_exclusive() {
        let ok = NdsResult::success(42);
        assert!(ok.is_success());
        assert!(!ok.is_failure());
        assert_eq!(ok.data(), Ok(&42));
        assert_eq!(ok.error().unwrap_err(), ResultAccessError::ErrorOnSuccess);

        let failed = NdsResult::<i32>::failure_with("ERROR_CODE", "Error message");
        assert!(failed.is_failure());
        assert_eq!(failed.data().unwrap_err(), ResultAccessError::DataOnFailure);
        let err = failed.error().unwrap();
        assert_eq!(err.code(), "ERROR_CODE");
        assert_eq!(err.message(), "Error message");
        assert_eq!(err.to_string(), "[ERROR_CODE] Error message");
    }

    #[test]
    fn combinators() {
        assert_eq!(NdsResult::success(10).map(|x| x * 2), NdsResult::success(20));

        let mapped = NdsResult::<i32>::failure_with("ERROR", "Something went wrong").map(|x| x * 2);
        assert_eq!(mapped.error().unwrap().code(), "ERROR");

        let chained = NdsResult::success(10).and_then(|x| {
            if x > 5 {
                NdsResult::success(format!("Value is {x}"))
            } else {
                NdsResult::failure_with("TOO_SMALL", "Value too small")
            }
        });
        assert_eq!(chained.data().unwrap(), "Value is 10");

        let describe = |result: NdsResult<i32>| {
            result.fold(|x| format!("Got {x}"), |e| format!("Error: {}", e.code()))
        };
        assert_eq!(describe(NdsResult::success(42)), "Got 42");
        assert_eq!(describe(NdsResult::failure_with("ERROR", "Failed")), "Error: ERROR");

        assert_eq!(NdsResult::failure_with("ERROR", "Failed").get_or(99), 99);
        assert!(NdsResult::<()>::unit().into_result().is_ok());
    }

    #[test]
    fn callbacks_only_fire_on_their_side() {
        let successes = Cell::new(0);
        let failures = Cell::new(0);
        NdsResult::success(1)
            .on_success(|_| successes.set(successes.get() + 1))
            .on_failure(|_| failures.set(failures.get() + 1));
        NdsResult::<i32>::failure_with(error_codes::UNKNOWN, "boom")
            .on_success(|_| successes.set(successes.get() + 1))
            .on_failure(|_| failures.set(failures.get() + 1));
        assert_eq!((successes.get(), failures.get()), (1, 1));
    }

    #[test]
    fn error_details_and_cause() {
        let io = std::io::Error::other("disk on fire");
        let err = NdsError::new(error_codes::SYSTEM_ERROR, "write failed")
            .with_detail("attempt", 3)
            .with_detail("amount", dec!(1.50))
            .with_detail("retry", true)
            .with_cause(io);
        assert_eq!(err.detail("attempt"), Some(&Scalar::Int(3)));
        assert_eq!(err.detail("amount").unwrap().to_string(), "1.50");
        assert_eq!(err.detail("retry").unwrap().to_string(), "true");
        assert_eq!(err.cause().unwrap().to_string(), "disk on fire");
        assert!(StdError::source(&err).is_some());

        let without_cause = NdsError::new(error_codes::SYSTEM_ERROR, "write failed")
            .with_detail("attempt", 3)
            .with_detail("amount", dec!(1.50))
            .with_detail("retry", true);
        assert_eq!(err, without_cause);
    }
}
