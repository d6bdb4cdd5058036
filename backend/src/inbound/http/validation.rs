//! Shared validation helpers for inbound HTTP adapters.

use chrono::{DateTime, Utc};
use pagination::PageParams;
use serde_json::json;
use uuid::Uuid;

use crate::domain::{Error, FeedWindow};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidUuid,
    InvalidTimestamp,
    InvalidPagination,
    InvalidWindow,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidTimestamp => "invalid_timestamp",
            ErrorCode::InvalidPagination => "invalid_pagination",
            ErrorCode::InvalidWindow => "invalid_window",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: String,
    message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} must be a valid UUID"))
        .with_value(ErrorCode::InvalidUuid, value)
}

pub(crate) fn parse_uuid(value: String, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(&value).map_err(|_| invalid_uuid_error(field, &value))
}

pub(crate) fn invalid_timestamp_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} must be an RFC 3339 timestamp"))
        .with_value(ErrorCode::InvalidTimestamp, value)
}

pub(crate) fn parse_rfc3339_timestamp(
    value: String,
    field: FieldName,
) -> Result<DateTime<Utc>, Error> {
    DateTime::parse_from_rfc3339(&value)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|_| invalid_timestamp_error(field, &value))
}

pub(crate) fn parse_optional_rfc3339_timestamp(
    value: Option<String>,
    field: FieldName,
) -> Result<Option<DateTime<Utc>>, Error> {
    value
        .map(|raw| parse_rfc3339_timestamp(raw, field))
        .transpose()
}

/// Validate an optional limit/offset pair into a page window.
pub(crate) fn parse_page_params(
    limit: Option<i64>,
    offset: Option<i64>,
) -> Result<PageParams, Error> {
    PageParams::from_options(limit, offset).map_err(|err| {
        ValidationError::new("limit/offset", err.to_string())
            .with_code(ErrorCode::InvalidPagination)
    })
}

/// Validate an optional day count into a feed lookback window.
pub(crate) fn parse_feed_window(days: Option<i64>) -> Result<FeedWindow, Error> {
    match days {
        Some(days) => FeedWindow::new(days).map_err(|err| {
            ValidationError::new("days", err.to_string()).with_code(ErrorCode::InvalidWindow)
        }),
        None => Ok(FeedWindow::default()),
    }
}

#[cfg(test)]
mod tests {
    //! Parse helper edge cases.
    use rstest::rstest;

    use super::*;
    use crate::domain::ErrorCode as DomainErrorCode;

    #[rstest]
    fn uuid_parse_reports_field_detail() {
        let err = parse_uuid("nope".to_owned(), FieldName::new("recordId"))
            .expect_err("invalid uuid rejected");
        assert_eq!(err.code(), DomainErrorCode::InvalidRequest);
        let details = err.details().expect("details attached");
        assert_eq!(details["field"], "recordId");
        assert_eq!(details["code"], "invalid_uuid");
    }

    #[rstest]
    fn timestamp_parse_accepts_rfc3339() {
        let parsed = parse_rfc3339_timestamp(
            "2026-03-01T22:00:00Z".to_owned(),
            FieldName::new("bedtime"),
        )
        .expect("valid timestamp");
        assert_eq!(parsed.to_rfc3339(), "2026-03-01T22:00:00+00:00");
    }

    #[rstest]
    #[case("not-a-time")]
    #[case("2026-03-01 22:00")]
    fn timestamp_parse_rejects_other_formats(#[case] raw: &str) {
        let err = parse_rfc3339_timestamp(raw.to_owned(), FieldName::new("bedtime"))
            .expect_err("invalid timestamp rejected");
        let details = err.details().expect("details attached");
        assert_eq!(details["code"], "invalid_timestamp");
    }

    #[rstest]
    fn absent_optional_timestamp_is_none() {
        let parsed = parse_optional_rfc3339_timestamp(None, FieldName::new("wakeTime"))
            .expect("absent value accepted");
        assert_eq!(parsed, None);
    }

    #[rstest]
    #[case(Some(0), None)]
    #[case(Some(101), None)]
    #[case(None, Some(-1))]
    fn page_bounds_are_validation_errors(#[case] limit: Option<i64>, #[case] offset: Option<i64>) {
        let err = parse_page_params(limit, offset).expect_err("bounds enforced");
        let details = err.details().expect("details attached");
        assert_eq!(details["code"], "invalid_pagination");
    }

    #[rstest]
    fn window_defaults_to_a_week() {
        let window = parse_feed_window(None).expect("default window");
        assert_eq!(window.days(), 7);
    }

    #[rstest]
    #[case(0)]
    #[case(31)]
    fn window_bounds_are_validation_errors(#[case] days: i64) {
        let err = parse_feed_window(Some(days)).expect_err("bounds enforced");
        let details = err.details().expect("details attached");
        assert_eq!(details["code"], "invalid_window");
    }
}
