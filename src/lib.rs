//! Traced upstream service library.
//!
//! One route, one outbound GET, three ways of tracing it.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod runtime;
pub mod upstream;

pub use config::ServerConfig;
pub use http::{HttpServer, Variant};
pub use lifecycle::{Shutdown, ShutdownReason};
