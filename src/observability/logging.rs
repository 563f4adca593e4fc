//! Structured logging.
//!
//! `RUST_LOG` wins over the configured level. The OpenTelemetry layer, when
//! present, shares the filter with the fmt layer.

use opentelemetry_sdk::trace::Tracer;
use tracing_subscriber::{
    layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError, EnvFilter, Layer,
};

use crate::config::schema::{LogFormat, ObservabilityConfig};

/// Default directives derived from the configured level.
pub fn default_directives(level: &str) -> String {
    format!("traced_upstream={level},tower_http={level}")
}

/// Install the global subscriber.
pub fn init(config: &ObservabilityConfig, tracer: Option<Tracer>) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(&config.log_level)));

    let fmt_layer = match config.log_format {
        LogFormat::Pretty => tracing_subscriber::fmt::layer().boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .boxed(),
    };

    let otel_layer = tracer.map(|tracer| tracing_opentelemetry::layer().with_tracer(tracer));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(otel_layer)
        .try_init()
}
