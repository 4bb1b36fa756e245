use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::result::{NdsError, NdsResult, Scalar, error_codes};

const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorWire {
    pub code: String,
    pub message: String,
    #[serde(default)]
    pub details: BTreeMap<String, String>,
}

impl From<&NdsError> for ErrorWire {
    fn from(error: &NdsError) -> Self {
        Self {
            code: error.code().to_string(),
            message: error.message().to_string(),
            details: details_to_wire(error),
        }
    }
}

/// Details come back as [`Scalar::Text`]; the cause is not transmitted.
impl From<ErrorWire> for NdsError {
    fn from(wire: ErrorWire) -> Self {
        NdsError::new(wire.code, wire.message).with_details(details_from_wire(wire.details))
    }
}

pub(crate) fn details_to_wire(error: &NdsError) -> BTreeMap<String, String> {
    error
        .details()
        .iter()
        .map(|(key, value)| (key.clone(), value.to_string()))
        .collect()
}

pub(crate) fn details_from_wire(details: BTreeMap<String, String>) -> BTreeMap<String, Scalar> {
    details
        .into_iter()
        .map(|(key, value)| (key, Scalar::Text(value)))
        .collect()
}

/// Envelope for an [`NdsResult`]. Exactly one of `data` and the `error_*`
/// group is populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultWire<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_details: Option<BTreeMap<String, String>>,
}

impl<T> From<NdsResult<T>> for ResultWire<T> {
    fn from(result: NdsResult<T>) -> Self {
        match result {
            NdsResult::Success(data) => Self {
                success: true,
                data: Some(data),
                error_code: None,
                error_message: None,
                error_details: None,
            },
            NdsResult::Failure(error) => {
                let details = details_to_wire(&error);
                Self {
                    success: false,
                    data: None,
                    error_code: Some(error.code().to_string()),
                    error_message: Some(error.message().to_string()),
                    error_details: (!details.is_empty()).then_some(details),
                }
            }
        }
    }
}

/// A success flag without data, or a failure without a code, decodes as
/// an `UNKNOWN` failure.
impl<T> From<ResultWire<T>> for NdsResult<T> {
    fn from(wire: ResultWire<T>) -> Self {
        if wire.success {
            if let Some(data) = wire.data {
                return NdsResult::success(data);
            }
        }
        let error = match wire.error_code.filter(|code| !code.is_empty()) {
            Some(code) => NdsError::new(code, wire.error_message.unwrap_or_default()),
            None => NdsError::new(error_codes::UNKNOWN, UNKNOWN_ERROR_MESSAGE),
        };
        NdsResult::failure(error.with_details(details_from_wire(wire.error_details.unwrap_or_default())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_round_trip() {
        let wire = ResultWire::from(NdsResult::success("payload".to_string()));
        assert!(wire.success);
        assert_eq!(wire.error_code, None);
        assert_eq!(
            NdsResult::from(wire),
            NdsResult::success("payload".to_string())
        );
    }

    #[test]
    fn failure_round_trip() {
        let error = NdsError::new(error_codes::INSUFFICIENT_BALANCE, "Not enough coins")
            .with_detail("asset", "player:coins")
            .with_detail("missing", 5);
        let wire = ResultWire::<String>::from(NdsResult::failure(error));
        assert!(!wire.success);
        assert_eq!(wire.data, None);
        assert_eq!(wire.error_details.as_ref().unwrap()["missing"], "5");

        let decoded = NdsResult::from(wire);
        let err = decoded.error().unwrap();
        assert_eq!(err.code(), error_codes::INSUFFICIENT_BALANCE);
        assert_eq!(err.message(), "Not enough coins");
        assert_eq!(err.detail("missing"), Some(&Scalar::Text("5".to_string())));
    }

    #[test]
    fn missing_code_decodes_as_unknown() {
        let wire = ResultWire::<i32> {
            success: false,
            data: None,
            error_code: None,
            error_message: Some("ignored".to_string()),
            error_details: None,
        };
        let err = NdsResult::from(wire).into_result().unwrap_err();
        assert_eq!(err.code(), error_codes::UNKNOWN);
        assert_eq!(err.message(), "Unknown error");

        let hollow = ResultWire::<i32> {
            success: true,
            data: None,
            error_code: None,
            error_message: None,
            error_details: None,
        };
        assert_eq!(
            NdsResult::from(hollow).error().unwrap().code(),
            error_codes::UNKNOWN
        );
    }

    #[test]
    fn json_omits_empty_side() {
        let json = serde_json::to_value(ResultWire::from(NdsResult::success(7))).unwrap();
        assert_eq!(json, serde_json::json!({ "success": true, "data": 7 }));

        let failed = ResultWire::<i32>::from(NdsResult::failure_with(error_codes::EVENT_NOT_FOUND, "gone"));
        let json = serde_json::to_value(failed).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "success": false, "error_code": "EVENT_NOT_FOUND", "error_message": "gone" })
        );
    }

    #[test]
    fn error_wire_round_trip() {
        let error = NdsError::new(error_codes::TRANSACTION_CONFLICT, "version mismatch")
            .with_detail("expected", "3");
        assert_eq!(NdsError::from(ErrorWire::from(&error)), error);
    }
}
