//! Instrumentation styles.

use std::fmt;

/// Which part of the request path carries the tracing instrumentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Variant {
    /// Only the outbound client call is traced.
    Client,
    /// The route handler opens its own server span.
    Handler,
    /// A tower layer traces every request before it reaches the handler.
    Middleware,
}

impl Variant {
    /// The single route served by this variant.
    pub fn route(self) -> &'static str {
        match self {
            Variant::Client | Variant::Middleware => "/",
            Variant::Handler => "/health/v2",
        }
    }

    /// Whether the outbound call gets a client span and propagation headers.
    pub fn instruments_client(self) -> bool {
        matches!(self, Variant::Client | Variant::Middleware)
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Variant::Client => "client",
            Variant::Handler => "handler",
            Variant::Middleware => "middleware",
        };
        f.write_str(name)
    }
}
