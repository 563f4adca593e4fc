//! Server-span middleware.
//!
//! Wraps `tower_http::trace::TraceLayer` so that every request gets an
//! OpenTelemetry server span, parented on any inbound `traceparent`.

use std::sync::Arc;
use std::time::Duration;

use axum::http::{Request, Response};
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultOnRequest, MakeSpan, OnResponse, TraceLayer};
use tracing::field::Empty;
use tracing::Span;
use tracing_opentelemetry::OpenTelemetrySpanExt;

use crate::http::request::request_id_of;
use crate::upstream::extract_remote_context;

/// Trace layer with server-span naming and status recording.
pub type ServerTraceLayer = TraceLayer<
    SharedClassifier<ServerErrorsAsFailures>,
    MakeServerSpan,
    DefaultOnRequest,
    ServerOnResponse,
>;

/// Build the layer; spans are exported under `name`.
pub fn server_trace_layer(name: &str) -> ServerTraceLayer {
    TraceLayer::new_for_http()
        .make_span_with(MakeServerSpan::new(name))
        .on_response(ServerOnResponse)
}

/// Creates one server span per request.
#[derive(Debug, Clone)]
pub struct MakeServerSpan {
    name: Arc<str>,
}

impl MakeServerSpan {
    pub fn new(name: &str) -> Self {
        Self { name: name.into() }
    }
}

impl<B> MakeSpan<B> for MakeServerSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        let span = tracing::info_span!(
            "request",
            otel.name = %self.name,
            otel.kind = "server",
            otel.status_code = Empty,
            http.request.method = %request.method(),
            url.path = %request.uri().path(),
            request_id = %request_id_of(request),
            http.response.status_code = Empty,
        );
        span.set_parent(extract_remote_context(request.headers()));
        span
    }
}

/// Records the status code on the request span.
#[derive(Debug, Clone, Copy, Default)]
pub struct ServerOnResponse;

impl<B> OnResponse<B> for ServerOnResponse {
    fn on_response(self, response: &Response<B>, latency: Duration, span: &Span) {
        let status = response.status();
        span.record("http.response.status_code", status.as_u16());
        if status.is_server_error() {
            span.record("otel.status_code", "ERROR");
        }
        tracing::debug!(
            parent: span,
            status = status.as_u16(),
            latency_ms = latency.as_millis() as u64,
            "Finished processing request"
        );
    }
}
