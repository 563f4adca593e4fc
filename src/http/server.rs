//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router for the selected variant
//! - Wire up middleware (request ID, optional trace layer)
//! - Bind server to listener
//! - Stop on a signal or on the first upstream failure

use std::future::IntoFuture;
use std::time::Duration;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, oneshot};
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};

use crate::config::ServerConfig;
use crate::http::handlers;
use crate::http::middleware::server_trace_layer;
use crate::http::request::MakeRequestUuidV4;
use crate::http::variant::Variant;
use crate::lifecycle::{Shutdown, ShutdownReason};
use crate::upstream::{UpstreamClient, UpstreamError};

/// Error type for running the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub upstream: UpstreamClient,
    pub shutdown: Shutdown,
}

/// HTTP server for one instrumentation variant.
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
    variant: Variant,
    shutdown: Shutdown,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ServerConfig, variant: Variant, shutdown: Shutdown) -> Result<Self, ServerError> {
        let upstream = UpstreamClient::new(&config.upstream, variant.instruments_client())?;

        let state = AppState {
            upstream,
            shutdown: shutdown.clone(),
        };

        let router = Self::build_router(&config, variant, state);
        Ok(Self {
            router,
            config,
            variant,
            shutdown,
        })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ServerConfig, variant: Variant, state: AppState) -> Router {
        let route = variant.route();
        let router = match variant {
            Variant::Client => Router::new().route(route, get(handlers::forward)),
            Variant::Handler => Router::new().route(route, get(handlers::forward_traced)),
            Variant::Middleware => Router::new()
                .route(route, get(handlers::forward_json))
                .layer(server_trace_layer(&config.tracing.middleware_name)),
        };

        router
            .with_state(state)
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Returns why the server stopped once in-flight requests have drained.
    /// After an upstream failure the drain is bounded by
    /// `listener.failure_drain_ms`; requests still pending then are abandoned.
    pub async fn run(self, listener: TcpListener) -> Result<ShutdownReason, ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            variant = %self.variant,
            route = self.variant.route(),
            upstream = %self.config.upstream.url,
            "HTTP server starting"
        );

        let (reason_tx, reason_rx) = oneshot::channel();
        let mut shutdown_rx = self.shutdown.subscribe();
        let stop = async move {
            let reason = next_reason(&mut shutdown_rx).await;
            let _ = reason_tx.send(reason);
        };

        let drain = Duration::from_millis(self.config.listener.failure_drain_ms);
        let deadline = failure_deadline(self.shutdown.subscribe(), drain);

        let serve = axum::serve(listener, self.router)
            .with_graceful_shutdown(stop)
            .into_future();

        let reason = tokio::select! {
            result = serve => {
                result?;
                reason_rx.await.unwrap_or(ShutdownReason::Signal)
            }
            _ = deadline => {
                tracing::warn!(
                    drain_ms = drain.as_millis() as u64,
                    "Drain deadline elapsed, abandoning in-flight requests"
                );
                ShutdownReason::UpstreamFailure
            }
        };

        tracing::info!(reason = ?reason, "HTTP server stopped");
        Ok(reason)
    }

    /// A handle to the router, for driving it without a listener.
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

/// Resolve `drain` after the first upstream failure; never otherwise.
async fn failure_deadline(mut rx: broadcast::Receiver<ShutdownReason>, drain: Duration) {
    loop {
        match rx.recv().await {
            Ok(ShutdownReason::UpstreamFailure) => break,
            Ok(ShutdownReason::Signal) | Err(broadcast::error::RecvError::Lagged(_)) => continue,
            Err(broadcast::error::RecvError::Closed) => std::future::pending::<()>().await,
        }
    }
    tokio::time::sleep(drain).await;
}

async fn next_reason(rx: &mut broadcast::Receiver<ShutdownReason>) -> ShutdownReason {
    loop {
        match rx.recv().await {
            Ok(reason) => return reason,
            Err(broadcast::error::RecvError::Lagged(_)) => continue,
            Err(broadcast::error::RecvError::Closed) => return ShutdownReason::Signal,
        }
    }
}
