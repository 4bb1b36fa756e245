//! Helpers for the v3 transport envelope: structured error status, request
//! context, and opaque byte tokens.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    result::{NdsError, Scalar},
    wire::{
        WireError,
        result::{details_from_wire, details_to_wire},
        token::WireToken,
    },
};

pub const ERROR_CATEGORY_DETAIL: &str = "error_category";
pub const RETRY_AFTER_SECONDS_DETAIL: &str = "retry_after_seconds";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Unspecified,
    Retryable,
    NonRetryable,
}

impl WireToken for ErrorCategory {
    const FALLBACK: Self = ErrorCategory::Unspecified;
    const ALL: &'static [Self] = &[
        ErrorCategory::Unspecified,
        ErrorCategory::Retryable,
        ErrorCategory::NonRetryable,
    ];

    fn token(self) -> &'static str {
        match self {
            ErrorCategory::Unspecified => "ERROR_CATEGORY_UNSPECIFIED",
            ErrorCategory::Retryable => "ERROR_CATEGORY_RETRYABLE",
            ErrorCategory::NonRetryable => "ERROR_CATEGORY_NON_RETRYABLE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorStatus {
    pub code: String,
    pub message: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_after_seconds: Option<i32>,
    #[serde(default)]
    pub details: BTreeMap<String, String>,
}

impl ErrorStatus {
    /// A negative retry hint is treated as absent.
    pub fn from_error(
        error: &NdsError,
        category: ErrorCategory,
        retry_after_seconds: Option<i32>,
    ) -> Self {
        Self {
            code: error.code().to_string(),
            message: error.message().to_string(),
            category: category.token().to_string(),
            retry_after_seconds: retry_after_seconds.filter(|seconds| *seconds >= 0),
            details: details_to_wire(error),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::parse_token(&self.category)
    }
}

/// Category and retry hint are folded into the details so they survive in
/// the domain error, which has no dedicated fields for them.
impl From<ErrorStatus> for NdsError {
    fn from(status: ErrorStatus) -> Self {
        let category = status.category();
        let mut error = NdsError::new(status.code, status.message)
            .with_details(details_from_wire(status.details))
            .with_detail(ERROR_CATEGORY_DETAIL, category.token());
        if let Some(seconds) = status.retry_after_seconds {
            error = error.with_detail(RETRY_AFTER_SECONDS_DETAIL, Scalar::Int(seconds.into()));
        }
        error
    }
}

/// Serialized shape of [`RequestContext`]. Decoding goes through
/// [`RequestContext::new`], so blank ids never make it past serde.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContextWire {
    pub request_id: String,
    pub idempotency_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RequestContextWire", into = "RequestContextWire")]
pub struct RequestContext {
    request_id: String,
    idempotency_key: String,
    correlation_id: Option<Vec<u8>>,
}

impl RequestContext {
    /// An empty correlation id is the same as none.
    pub fn new(
        request_id: impl Into<String>,
        idempotency_key: impl Into<String>,
        correlation_id: Option<Vec<u8>>,
    ) -> Result<Self, WireError> {
        let request_id = request_id.into();
        let idempotency_key = idempotency_key.into();
        if request_id.trim().is_empty() {
            return Err(WireError::EmptyField {
                field: "request_id",
            });
        }
        if idempotency_key.trim().is_empty() {
            return Err(WireError::EmptyField {
                field: "idempotency_key",
            });
        }
        Ok(Self {
            request_id,
            idempotency_key,
            correlation_id: correlation_id.filter(|bytes| !bytes.is_empty()),
        })
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn idempotency_key(&self) -> &str {
        &self.idempotency_key
    }

    pub fn correlation_id(&self) -> Option<&[u8]> {
        self.correlation_id.as_deref()
    }
}

impl TryFrom<RequestContextWire> for RequestContext {
    type Error = WireError;

    fn try_from(wire: RequestContextWire) -> Result<Self, Self::Error> {
        Self::new(wire.request_id, wire.idempotency_key, wire.correlation_id)
    }
}

impl From<RequestContext> for RequestContextWire {
    fn from(ctx: RequestContext) -> Self {
        Self {
            request_id: ctx.request_id,
            idempotency_key: ctx.idempotency_key,
            correlation_id: ctx.correlation_id,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("{kind} must not be empty")]
    Empty { kind: &'static str },
}

macro_rules! opaque_token {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
        pub struct $name(Vec<u8>);

        impl $name {
            pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, TokenError> {
                let bytes = bytes.into();
                if bytes.is_empty() {
                    return Err(TokenError::Empty {
                        kind: stringify!($name),
                    });
                }
                Ok(Self(bytes))
            }

            pub fn as_bytes(&self) -> &[u8] {
                &self.0
            }

            pub fn into_bytes(self) -> Vec<u8> {
                self.0
            }
        }

        impl TryFrom<Vec<u8>> for $name {
            type Error = TokenError;

            fn try_from(bytes: Vec<u8>) -> Result<Self, Self::Error> {
                Self::new(bytes)
            }
        }

        impl From<$name> for Vec<u8> {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

opaque_token!(
    /// Pagination position handed back by the server.
    Cursor
);
opaque_token!(PersonaId);
opaque_token!(
    /// Lets a client pick up an interrupted stream where it left off.
    ResumeToken
);
