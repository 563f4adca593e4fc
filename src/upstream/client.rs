//! The single outbound call.

use std::time::{Duration, Instant};

use axum::http::{HeaderValue, StatusCode};
use bytes::Bytes;
use tracing::field::Empty;
use tracing::Instrument;

use crate::config::schema::UpstreamConfig;
use crate::observability::metrics;
use crate::upstream::propagation::inject_current_context;

/// Outbound call failures. Every variant is fatal to the process.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("upstream request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("failed to read upstream body: {0}")]
    Body(#[source] reqwest::Error),
}

/// What came back from the upstream, body fully buffered.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

/// GETs one fixed URL.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
    url: String,
    instrumented: bool,
}

impl UpstreamClient {
    /// Build a client. When `instrumented` is set, each call gets its own
    /// client span and carries the trace context to the upstream.
    pub fn new(config: &UpstreamConfig, instrumented: bool) -> Result<Self, UpstreamError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(UpstreamError::Client)?;

        Ok(Self {
            client,
            url: config.url.clone(),
            instrumented,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn is_instrumented(&self) -> bool {
        self.instrumented
    }

    /// Issue the GET and buffer the whole body.
    pub async fn fetch(&self) -> Result<UpstreamResponse, UpstreamError> {
        if !self.instrumented {
            return self.send().await;
        }

        let span = tracing::info_span!(
            "HTTP GET",
            otel.kind = "client",
            otel.status_code = Empty,
            http.request.method = "GET",
            url.full = %self.url,
            http.response.status_code = Empty,
        );
        let result = self.send().instrument(span.clone()).await;
        if result.is_err() {
            span.record("otel.status_code", "ERROR");
        }
        result
    }

    async fn send(&self) -> Result<UpstreamResponse, UpstreamError> {
        let start = Instant::now();

        let mut request = self
            .client
            .get(&self.url)
            .build()
            .map_err(UpstreamError::Request)?;
        if self.instrumented {
            inject_current_context(request.headers_mut());
        }

        let response = match self.client.execute(request).await {
            Ok(response) => response,
            Err(e) => {
                metrics::record_upstream(metrics::STATUS_ERROR, start);
                return Err(UpstreamError::Request(e));
            }
        };

        let status = response.status();
        tracing::Span::current().record("http.response.status_code", status.as_u16());
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .cloned();

        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => {
                metrics::record_upstream(metrics::STATUS_ERROR, start);
                return Err(UpstreamError::Body(e));
            }
        };

        metrics::record_upstream(status.as_str(), start);
        tracing::debug!(
            status = %status,
            bytes = body.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Upstream responded"
        );

        Ok(UpstreamResponse {
            status,
            content_type,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use metrics_util::debugging::{DebugValue, DebuggingRecorder, Snapshotter};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    fn requests_with_status(snapshotter: &Snapshotter, status: &str) -> Option<u64> {
        snapshotter
            .snapshot()
            .into_vec()
            .into_iter()
            .find_map(|(key, _, _, value)| {
                let key = key.key();
                let matches = key.name() == "upstream_requests_total"
                    && key
                        .labels()
                        .any(|label| label.key() == "status" && label.value() == status);
                match (matches, value) {
                    (true, DebugValue::Counter(count)) => Some(count),
                    _ => None,
                }
            })
    }

    async fn serve_once(body: &'static str) -> std::net::SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        });
        addr
    }

    #[test]
    fn test_client_keeps_url_and_mode() {
        let config = UpstreamConfig {
            url: "http://127.0.0.1:1/x".into(),
            timeout_secs: Some(2),
        };
        let client = UpstreamClient::new(&config, true).unwrap();
        assert_eq!(client.url(), "http://127.0.0.1:1/x");
        assert!(client.is_instrumented());
    }

    #[tokio::test]
    async fn test_connection_refused_is_request_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let config = UpstreamConfig {
            url: format!("http://{addr}/"),
            timeout_secs: Some(2),
        };
        let client = UpstreamClient::new(&config, false).unwrap();
        let err = client.fetch().await.unwrap_err();
        assert!(matches!(err, UpstreamError::Request(_)));
    }

    #[tokio::test]
    async fn test_refused_connection_counts_as_error() {
        let recorder = DebuggingRecorder::new();
        let snapshotter = recorder.snapshotter();
        let _guard = ::metrics::set_default_local_recorder(&recorder);

        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let config = UpstreamConfig {
            url: format!("http://{addr}/"),
            timeout_secs: Some(2),
        };
        let client = UpstreamClient::new(&config, false).unwrap();
        assert!(client.fetch().await.is_err());

        assert_eq!(requests_with_status(&snapshotter, "error"), Some(1));
        assert_eq!(requests_with_status(&snapshotter, "200"), None);
    }

    #[tokio::test]
    async fn test_success_counts_by_status_code() {
        let recorder = DebuggingRecorder::new();
        let snapshotter = recorder.snapshotter();
        let _guard = ::metrics::set_default_local_recorder(&recorder);

        let addr = serve_once("kanto").await;
        let config = UpstreamConfig {
            url: format!("http://{addr}/"),
            timeout_secs: Some(2),
        };
        let client = UpstreamClient::new(&config, false).unwrap();
        let response = client.fetch().await.unwrap();

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(&response.body[..], b"kanto");
        assert_eq!(requests_with_status(&snapshotter, "200"), Some(1));
        assert_eq!(requests_with_status(&snapshotter, "error"), None);
    }
}
