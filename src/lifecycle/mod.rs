//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger → graceful drain → exit 0
//!
//! Upstream failure (http handlers):
//!     Shutdown::fail → graceful drain → exit 1
//! ```
//!
//! # Design Decisions
//! - One broadcast channel carries the reason for stopping
//! - The first reason sent wins; later ones are ignored by the server

pub mod shutdown;
pub mod signals;

pub use shutdown::{Shutdown, ShutdownReason};
pub use signals::wait_for_signal;
