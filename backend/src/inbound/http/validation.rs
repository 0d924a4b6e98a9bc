//! Shared validation helpers for inbound HTTP adapters.

use serde_json::json;

use crate::domain::DomainError;

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidId,
    InvalidFlag,
}

impl ErrorCode {
    const fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidId => "invalid_id",
            Self::InvalidFlag => "invalid_flag",
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

    const fn as_str(self) -> &'static str {
        self.0
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> DomainError {
    let name = field.as_str();
    DomainError::invalid_request(format!("missing required field: {name}")).with_details(json!({
        "field": name,
        "code": ErrorCode::MissingField.as_str(),
    }))
}

fn invalid_id_error(field: FieldName, index: usize, value: &str) -> DomainError {
    let name = field.as_str();
    DomainError::invalid_request(format!("{name} must be a comma-separated list of ids"))
        .with_details(json!({
            "field": name,
            "index": index,
            "value": value,
            "code": ErrorCode::InvalidId.as_str(),
        }))
}

/// Parse a comma-separated list of positive integer identifiers.
///
/// Blank entries (as in `1,,2` or a trailing comma) are skipped; an empty
/// string yields an empty list.
///
/// # Examples
/// ```ignore
/// let ids = parse_id_list("3, 1,", FieldName::new("tags"))?;
/// assert_eq!(ids, [3, 1]);
/// ```
pub(crate) fn parse_id_list(raw: &str, field: FieldName) -> Result<Vec<i64>, DomainError> {
    raw.split(',')
        .map(str::trim)
        .enumerate()
        .filter(|(_, value)| !value.is_empty())
        .map(|(index, value)| {
            value
                .parse::<i64>()
                .ok()
                .filter(|id| *id > 0)
                .ok_or_else(|| invalid_id_error(field, index, value))
        })
        .collect()
}

/// Interpret an optional `0`/`1` style query flag.
pub(crate) fn parse_flag(raw: Option<&str>, field: FieldName) -> Result<bool, DomainError> {
    match raw.map(str::trim) {
        None | Some("" | "0" | "false") => Ok(false),
        Some("1" | "true") => Ok(true),
        Some(other) => {
            let name = field.as_str();
            Err(
                DomainError::invalid_request(format!("{name} must be 0 or 1")).with_details(json!({
                    "field": name,
                    "value": other,
                    "code": ErrorCode::InvalidFlag.as_str(),
                })),
            )
        }
    }
}
