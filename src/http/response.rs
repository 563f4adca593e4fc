//! Response shaping.
//!
//! The upstream body is forwarded with status 200 regardless of the upstream
//! status. The middleware variant wraps it as `{"status": "<body>"}`.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::upstream::UpstreamResponse;

/// Body returned to the in-flight request when the upstream fails.
pub const UPSTREAM_FAILED: &str = "upstream request failed";

/// JSON envelope used by the middleware variant.
#[derive(Debug, Serialize)]
pub struct StatusEnvelope {
    pub status: String,
}

/// Forward the upstream body verbatim.
pub fn raw(upstream: UpstreamResponse) -> Response {
    let content_type = upstream
        .content_type
        .unwrap_or_else(|| HeaderValue::from_static("application/octet-stream"));
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, content_type)],
        upstream.body,
    )
        .into_response()
}

/// Forward the upstream body inside a JSON envelope.
pub fn wrapped(upstream: UpstreamResponse) -> Response {
    let envelope = StatusEnvelope {
        status: String::from_utf8_lossy(&upstream.body).into_owned(),
    };
    (StatusCode::OK, Json(envelope)).into_response()
}

/// Response for the request that observed the failure.
pub fn upstream_failed() -> Response {
    (StatusCode::BAD_GATEWAY, UPSTREAM_FAILED).into_response()
}
