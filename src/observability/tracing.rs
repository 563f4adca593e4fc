//! Distributed tracing support.
//!
//! # Responsibilities
//! - Build the OTLP/gRPC span exporter and batch pipeline
//! - Install the global tracer provider and text-map propagator
//! - Flush buffered spans when the process stops
//!
//! # Design Decisions
//! - The exporter endpoint falls back to `OTEL_EXPORTER_OTLP_*`
//! - Propagation is W3C Trace Context plus Baggage

use opentelemetry::propagation::TextMapCompositePropagator;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry::{global, KeyValue};
use opentelemetry_otlp::{SpanExporter, WithExportConfig};
use opentelemetry_sdk::propagation::{BaggagePropagator, TraceContextPropagator};
use opentelemetry_sdk::trace::{SdkTracerProvider, Tracer};
use opentelemetry_sdk::Resource;

use crate::config::schema::{RuntimeConfig, TracingConfig};
use crate::runtime::GC_PERCENT_ATTRIBUTE;

/// Error type for tracing pipeline setup.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("failed to build OTLP exporter: {0}")]
    Exporter(#[from] opentelemetry_otlp::ExporterBuildError),
}

/// Owns the tracer provider and flushes it when dropped.
pub struct TelemetryGuard {
    provider: Option<SdkTracerProvider>,
    tracer: Option<Tracer>,
}

impl TelemetryGuard {
    /// A guard with no pipeline behind it.
    pub fn disabled() -> Self {
        Self {
            provider: None,
            tracer: None,
        }
    }

    /// Tracer for the `tracing-opentelemetry` layer, if the pipeline is on.
    pub fn tracer(&self) -> Option<Tracer> {
        self.tracer.clone()
    }

    pub fn is_enabled(&self) -> bool {
        self.provider.is_some()
    }

    /// Flush and shut down the provider now.
    pub fn shutdown(mut self) {
        self.flush();
    }

    fn flush(&mut self) {
        self.tracer = None;
        if let Some(provider) = self.provider.take() {
            if let Err(e) = provider.shutdown() {
                tracing::error!(error = %e, "Failed to shut down tracer provider");
            }
        }
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        self.flush();
    }
}

/// Resource describing this process.
pub fn build_resource(config: &TracingConfig, runtime: &RuntimeConfig) -> Resource {
    Resource::builder()
        .with_service_name(config.service_name.clone())
        .with_attributes([
            KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
            KeyValue::new(GC_PERCENT_ATTRIBUTE, runtime.gc_percent),
        ])
        .build()
}

/// Install the global W3C Trace Context + Baggage propagator.
pub fn install_propagator() {
    global::set_text_map_propagator(TextMapCompositePropagator::new(vec![
        Box::new(TraceContextPropagator::new()),
        Box::new(BaggagePropagator::new()),
    ]));
}

/// Build the export pipeline and register it globally.
///
/// Must be called from within a tokio runtime; the gRPC channel is spawned
/// onto it.
pub fn init_tracer(
    config: &TracingConfig,
    runtime: &RuntimeConfig,
) -> Result<TelemetryGuard, TelemetryError> {
    install_propagator();

    if !config.enabled {
        return Ok(TelemetryGuard::disabled());
    }

    let mut builder = SpanExporter::builder().with_tonic();
    if let Some(endpoint) = &config.endpoint {
        builder = builder.with_endpoint(endpoint.clone());
    }
    let exporter = builder.build()?;

    let provider = SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(build_resource(config, runtime))
        .build();

    global::set_tracer_provider(provider.clone());
    let tracer = provider.tracer(config.service_name.clone());

    Ok(TelemetryGuard {
        provider: Some(provider),
        tracer: Some(tracer),
    })
}
