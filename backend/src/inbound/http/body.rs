//! Request bodies decoded after authentication.
//!
//! Actix resolves all handler extractors together, so a `web::Json` argument
//! may reject a body before [`AuthenticatedUser`] has resolved its token.
//! Authenticated handlers take [`web::Payload`] and decode it here once the
//! caller is known; anonymous callers always see `401` first.
//!
//! [`AuthenticatedUser`]: super::auth::AuthenticatedUser

use actix_web::{HttpMessage, HttpRequest, web};
use futures_util::StreamExt;
use serde::de::DeserializeOwned;

use crate::domain::DomainError;

use super::error::body_error;

/// Largest accepted JSON body; matches the Actix `JsonConfig` default.
pub const MAX_JSON_BYTES: usize = 2 * 1024 * 1024;

/// Drain `payload`, failing once it grows past `limit` bytes.
///
/// # Errors
///
/// `invalid_request` with `payload_too_large` when the limit is exceeded, or
/// `unreadable_body` when the stream fails.
pub async fn read_limited(mut payload: web::Payload, limit: usize) -> Result<Vec<u8>, DomainError> {
    let mut bytes = Vec::new();
    while let Some(next) = payload.next().await {
        let chunk = next.map_err(|err| body_error("unreadable_body", err.to_string()))?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(body_error(
                "payload_too_large",
                format!("body must be at most {limit} bytes"),
            ));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

fn is_json(req: &HttpRequest) -> bool {
    req.mime_type().ok().flatten().is_some_and(|mime| {
        mime.subtype() == "json" || mime.suffix().is_some_and(|suffix| suffix == "json")
    })
}

/// Decode a JSON body the same way `web::Json` would.
///
/// # Errors
///
/// `invalid_request` labelled `unsupported_content_type`, `payload_too_large`,
/// `unreadable_body` or `malformed_json`.
pub async fn read_json<T: DeserializeOwned>(
    req: &HttpRequest,
    payload: web::Payload,
) -> Result<T, DomainError> {
    if !is_json(req) {
        return Err(body_error(
            "unsupported_content_type",
            "Content type error: expected application/json",
        ));
    }
    let bytes = read_limited(payload, MAX_JSON_BYTES).await?;
    serde_json::from_slice(&bytes).map_err(|err| body_error("malformed_json", err.to_string()))
}
