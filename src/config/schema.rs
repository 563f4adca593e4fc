//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the server.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Upstream queried by every variant unless overridden.
pub const DEFAULT_UPSTREAM_URL: &str = "http://pokeapi.co/api/v2/pokedex/kanto/";

/// Garbage collection target used when `CUSTOM_GOGC` is unset or unusable.
pub const DEFAULT_GC_PERCENT: i64 = 100;

/// Root configuration for the server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// The single outbound API call.
    pub upstream: UpstreamConfig,

    /// Runtime tuning knobs.
    pub runtime: RuntimeConfig,

    /// OpenTelemetry pipeline settings.
    pub tracing: TracingConfig,

    /// Logging and metrics settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// How long in-flight requests may finish after an upstream failure
    /// before the server stops regardless.
    pub failure_drain_ms: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            failure_drain_ms: 500,
        }
    }
}

/// Outbound call configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Absolute URL fetched on every request.
    pub url: String,

    /// Total request timeout in seconds. `None` waits indefinitely.
    pub timeout_secs: Option<u64>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_UPSTREAM_URL.to_string(),
            timeout_secs: None,
        }
    }
}

/// Runtime tuning.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Collector aggressiveness carried over from `CUSTOM_GOGC`.
    pub gc_percent: i64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            gc_percent: DEFAULT_GC_PERCENT,
        }
    }
}

/// OpenTelemetry export configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TracingConfig {
    /// Install the OTLP pipeline.
    pub enabled: bool,

    /// `service.name` resource attribute.
    pub service_name: String,

    /// Span name used by the middleware variant.
    pub middleware_name: String,

    /// Collector endpoint. Falls back to `OTEL_EXPORTER_OTLP_*` when unset.
    pub endpoint: Option<String>,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            service_name: "ExampleService".to_string(),
            middleware_name: "service-middleware".to_string(),
            endpoint: None,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Human-readable or JSON lines.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
