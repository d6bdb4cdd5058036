//! Transport-agnostic domain errors.
//!
//! Every failure carries a stable machine-readable code, a human message,
//! and optional field-level detail for validation failures. Inbound
//! adapters decide how codes map onto their transport; driven ports raise
//! their own error enums which services translate into this type.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The request is malformed or fails validation.
    InvalidRequest,
    /// Authentication failed or is missing.
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    Forbidden,
    /// The requested resource does not exist.
    NotFound,
    /// The request conflicts with existing state (duplicate follow, active
    /// session already open, overlapping session interval).
    Conflict,
    /// A required backing service cannot be reached right now.
    ServiceUnavailable,
    /// An unexpected error occurred inside the domain.
    InternalError,
}

/// Raised when an error payload fails its own invariants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ErrorValidationError {
    /// The message was blank after trimming.
    #[error("error message must not be empty")]
    EmptyMessage,
}

/// Domain error payload.
///
/// ## Invariants
/// - `message` is non-empty once trimmed of whitespace.
///
/// # Examples
/// ```
/// use drowse::domain::{Error, ErrorCode};
///
/// let err = Error::not_found("missing");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(try_from = "ErrorWire")]
pub struct Error {
    #[schema(example = "invalid_request")]
    code: ErrorCode,
    #[schema(example = "Something went wrong")]
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

/// Generates one convenience constructor per error code.
macro_rules! code_constructors {
    ($( $(#[$doc:meta])* $name:ident => $code:ident ),* $(,)?) => {
        $(
            $(#[$doc])*
            pub fn $name(message: impl Into<String>) -> Self {
                Self::new(ErrorCode::$code, message)
            }
        )*
    };
}

impl Error {
    /// Build an error, panicking when the message fails validation.
    ///
    /// Messages are compile-time literals or formatted strings in practice;
    /// use [`Error::try_new`] when the message comes from outside.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        match Self::try_new(code, message) {
            Ok(error) => error,
            Err(violation) => panic!("error messages must satisfy validation: {violation}"),
        }
    }

    /// Build an error, validating the message content.
    pub fn try_new(
        code: ErrorCode,
        message: impl Into<String>,
    ) -> Result<Self, ErrorValidationError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(ErrorValidationError::EmptyMessage);
        }
        Ok(Self {
            code,
            message,
            details: None,
        })
    }

    /// Attach structured details, typically field-level validation context.
    ///
    /// # Examples
    /// ```
    /// use drowse::domain::Error;
    /// use serde_json::json;
    ///
    /// let err = Error::invalid_request("bad").with_details(json!({ "field": "bedtime" }));
    /// assert!(err.details().is_some());
    /// ```
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message returned to adapters.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Supplementary error details for adapters.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    code_constructors! {
        /// Convenience constructor for [`ErrorCode::InvalidRequest`].
        invalid_request => InvalidRequest,
        /// Convenience constructor for [`ErrorCode::Unauthorized`].
        unauthorized => Unauthorized,
        /// Convenience constructor for [`ErrorCode::Forbidden`].
        forbidden => Forbidden,
        /// Convenience constructor for [`ErrorCode::NotFound`].
        not_found => NotFound,
        /// Convenience constructor for [`ErrorCode::Conflict`].
        conflict => Conflict,
        /// Convenience constructor for [`ErrorCode::ServiceUnavailable`].
        service_unavailable => ServiceUnavailable,
        /// Convenience constructor for [`ErrorCode::InternalError`].
        internal => InternalError,
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Error {}

/// Deserialisation shape; re-validates the message invariant on the way in.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorWire {
    code: ErrorCode,
    message: String,
    #[serde(default)]
    details: Option<Value>,
}

impl TryFrom<ErrorWire> for Error {
    type Error = ErrorValidationError;

    fn try_from(wire: ErrorWire) -> Result<Self, Self::Error> {
        let mut error = Error::try_new(wire.code, wire.message)?;
        error.details = wire.details;
        Ok(error)
    }
}
