//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events, fmt layer)
//!     → tracing.rs (spans exported over OTLP/gRPC)
//!     → metrics.rs (upstream counters and latency histogram)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → OpenTelemetry collector
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - `tracing` spans are the single instrumentation API; the OpenTelemetry
//!   layer turns them into exported spans
//! - W3C Trace Context and Baggage are propagated in both directions
//! - The tracer provider is flushed on every exit path through a guard

pub mod logging;
pub mod metrics;
pub mod tracing;

pub use self::tracing::{init_tracer, TelemetryError, TelemetryGuard};
