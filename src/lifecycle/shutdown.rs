//! Shutdown coordination for the server.

use std::process::ExitCode;

use tokio::sync::broadcast;

/// Why the server stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    /// Operator asked us to stop.
    Signal,
    /// The outbound call failed; the process must exit non-zero.
    UpstreamFailure,
}

impl ShutdownReason {
    pub fn is_failure(self) -> bool {
        matches!(self, ShutdownReason::UpstreamFailure)
    }

    /// Process exit code for this reason.
    pub fn exit_code(self) -> ExitCode {
        if self.is_failure() {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        }
    }
}

/// Coordinator for graceful shutdown.
///
/// Provides a broadcast channel that all long-running tasks can subscribe to.
#[derive(Clone)]
pub struct Shutdown {
    /// Broadcast channel sender.
    tx: broadcast::Sender<ShutdownReason>,
}

impl Shutdown {
    /// Create a new shutdown coordinator.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(4);
        Self { tx }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> broadcast::Receiver<ShutdownReason> {
        self.tx.subscribe()
    }

    /// Trigger an orderly shutdown.
    pub fn trigger(&self) {
        let _ = self.tx.send(ShutdownReason::Signal);
    }

    /// Trigger a shutdown caused by an upstream failure.
    pub fn fail(&self) {
        let _ = self.tx.send(ShutdownReason::UpstreamFailure);
    }

    /// Get the number of active subscribers (tasks still running).
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
