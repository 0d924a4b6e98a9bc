//! HTTP adapter mapping for domain errors.
//!
//! Domain [`DomainError`]s become JSON envelopes with a status derived from their
//! code. Actix extractor failures (malformed JSON, bad query strings, bad path
//! segments, oversized JSON bodies) are rewritten into the same envelope through
//! the handlers at the bottom of this module, so clients only ever see one
//! error shape.

use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use tracing::{error, warn};

use crate::domain::{DomainError, ErrorCode, TRACE_ID_HEADER};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, DomainError>;

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Replace internal error messages and details with a generic payload.
fn redact_if_internal(error: &DomainError) -> DomainError {
    if error.code() != ErrorCode::InternalError {
        return error.clone();
    }
    let redacted = DomainError::internal("Internal server error");
    match error.trace_id() {
        Some(id) => redacted.with_trace_id(id),
        None => redacted,
    }
}

impl ResponseError for DomainError {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!(
                code = ?self.code(),
                message = self.message(),
                trace_id = self.trace_id(),
                "request failed"
            );
        }

        let mut builder = HttpResponse::build(status);
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        builder.json(redact_if_internal(self))
    }
}

impl From<actix_web::Error> for DomainError {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to domain error");
        Self::internal("Internal server error")
    }
}

fn rejected_input(source: &'static str, code: &'static str, message: String) -> DomainError {
    warn!(source, code, %message, "rejected malformed request");
    DomainError::invalid_request(message).with_details(json!({ "field": source, "code": code }))
}

fn extractor_error(source: &'static str, code: &'static str, message: String) -> actix_web::Error {
    rejected_input(source, code, message).into()
}

/// Envelope for a request body rejected by a handler rather than an extractor.
pub(crate) fn body_error(code: &'static str, message: impl Into<String>) -> DomainError {
    rejected_input("body", code, message.into())
}

/// `JsonConfig` error handler producing the domain envelope.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let code = match &err {
        JsonPayloadError::ContentType => "unsupported_content_type",
        JsonPayloadError::OverflowKnownLength { .. } | JsonPayloadError::Overflow { .. } => {
            "payload_too_large"
        }
        JsonPayloadError::Deserialize(_) => "malformed_json",
        _ => "unreadable_body",
    };
    extractor_error("body", code, err.to_string())
}

/// `QueryConfig` error handler producing the domain envelope.
pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    extractor_error("query", "invalid_query", err.to_string())
}

/// `PathConfig` error handler producing the domain envelope.
pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    extractor_error("path", "invalid_path", err.to_string())
}
