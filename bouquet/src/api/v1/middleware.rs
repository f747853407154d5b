//! # V1 API Middleware
//!
//! - Bearer token authentication against `BOUQUET_API_KEYS` for every v1
//!   route except the public health and docs routes.
//! - Early rejection of bodies whose declared `Content-Length` exceeds
//!   `BOUQUET_MAX_BODY_BYTES`.
//!
//! Errors use the v1 `ApiResponse` envelope.

use axum::{
    body::Body,
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::api::state::AppState;
use crate::error::BouquetError;

use super::response::{ApiResponse, ErrorCode};

/// Axum middleware that enforces Bearer token authentication for v1 API routes.
///
/// # Behavior
///
/// - If `BOUQUET_API_KEYS` is empty/unset, every request passes. The server
///   logs a warning at startup in that mode.
/// - If the `Authorization: Bearer <token>` header is missing or malformed → 401.
/// - If the token is not in the configured key list → 401.
pub async fn v1_auth_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let keys = &state.config.server.api_keys;
    if keys.is_empty() {
        return next.run(request).await;
    }

    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok());

    let token = match auth_header.and_then(|h| h.strip_prefix("Bearer ")) {
        Some(token) => token,
        None if auth_header.is_some() => {
            return ApiResponse::<()>::error(
                ErrorCode::Unauthorized,
                "Invalid authorization header format. Expected: Bearer <token>",
            )
            .into_response();
        }
        None => {
            return ApiResponse::<()>::error(
                ErrorCode::Unauthorized,
                "Missing authorization header",
            )
            .into_response();
        }
    };

    if keys.iter().any(|key| key == token) {
        next.run(request).await
    } else {
        ApiResponse::<()>::error(ErrorCode::Unauthorized, "Invalid API key").into_response()
    }
}

/// Reject a request whose `Content-Length` is over the configured body limit
/// with `413 payload_too_large`.
///
/// Bodies without a length header are still capped by the
/// `RequestBodyLimitLayer` underneath; the extractors map that overflow to
/// the same error.
pub async fn body_limit_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let limit = state.config.server.max_body_bytes;
    let declared = request
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.parse::<u64>().ok());

    match declared {
        Some(length) if length > limit as u64 => {
            tracing::debug!(length, limit, "Rejected oversized request body");
            BouquetError::PayloadTooLarge(format!(
                "Request body is {length} bytes, the limit is {limit} bytes"
            ))
            .into_response()
        }
        _ => next.run(request).await,
    }
}
