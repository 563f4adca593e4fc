//! Tower middleware.

pub mod trace;

pub use trace::{server_trace_layer, MakeServerSpan, ServerOnResponse, ServerTraceLayer};
