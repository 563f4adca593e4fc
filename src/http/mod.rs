//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, per-variant router, graceful shutdown)
//!     → request.rs (x-request-id set and propagated)
//!     → middleware/trace.rs (server span, middleware variant only)
//!     → handlers.rs (server span for the handler variant, upstream call)
//!     → response.rs (raw or JSON-wrapped body)
//!     → Send to client
//! ```

pub mod handlers;
pub mod middleware;
pub mod request;
pub mod response;
pub mod server;
pub mod variant;

pub use request::{MakeRequestUuidV4, X_REQUEST_ID};
pub use server::{AppState, HttpServer, ServerError};
pub use variant::Variant;
