//! Outbound call subsystem.
//!
//! # Data Flow
//! ```text
//! handler
//!     → client.rs (GET upstream, optional client span)
//!     → propagation.rs (inject traceparent/baggage into request headers)
//!     → upstream API
//!     → client.rs (read body to Bytes, record metrics)
//! ```
//!
//! # Design Decisions
//! - One shared reqwest client; connections are pooled
//! - No retry or backoff: the first error is final
//! - Non-2xx responses are forwarded, not treated as errors

pub mod client;
pub mod propagation;

pub use client::{UpstreamClient, UpstreamError, UpstreamResponse};
pub use propagation::{extract_remote_context, inject_current_context, HeaderExtractor, HeaderInjector};
