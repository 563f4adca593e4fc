//! Route handlers, one per variant.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Response;
use tracing::field::Empty;
use tracing::Instrument;
use tracing_opentelemetry::OpenTelemetrySpanExt;

use crate::http::response;
use crate::http::server::AppState;
use crate::http::variant::Variant;
use crate::upstream::{extract_remote_context, UpstreamError};

/// Client variant: the handler itself is untraced.
pub async fn forward(State(state): State<AppState>) -> Response {
    match state.upstream.fetch().await {
        Ok(upstream) => response::raw(upstream),
        Err(e) => fail(&state, e),
    }
}

/// Handler variant: open a server span around the whole handler.
pub async fn forward_traced(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let route = Variant::Handler.route();
    let span = tracing::info_span!(
        "handler",
        otel.name = route,
        otel.kind = "server",
        http.request.method = "GET",
        http.route = route,
        http.response.status_code = Empty,
    );
    span.set_parent(extract_remote_context(&headers));

    async move {
        let response = match state.upstream.fetch().await {
            Ok(upstream) => response::raw(upstream),
            Err(e) => fail(&state, e),
        };
        tracing::Span::current().record("http.response.status_code", response.status().as_u16());
        response
    }
    .instrument(span)
    .await
}

/// Middleware variant: the trace layer owns the span; body goes out as JSON.
pub async fn forward_json(State(state): State<AppState>) -> Response {
    match state.upstream.fetch().await {
        Ok(upstream) => response::wrapped(upstream),
        Err(e) => fail(&state, e),
    }
}

/// Upstream errors stop the server; the caller sees a bare 502.
fn fail(state: &AppState, error: UpstreamError) -> Response {
    tracing::error!(
        error = %error,
        url = %state.upstream.url(),
        "Upstream call failed, shutting down"
    );
    state.shutdown.fail();
    response::upstream_failed()
}
