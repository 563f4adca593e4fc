//! Runtime tuning.
//!
//! `CUSTOM_GOGC` sets a collector target percentage for deployments of
//! this service. Memory here is reclaimed deterministically, so the value is
//! not applied to a collector. It is validated, logged, and exported as the
//! `process.runtime.gc_percent` resource attribute so traces from every
//! deployment carry the setting they were launched with. Worker threads
//! follow tokio's default of one per available core.

use crate::config::schema::{RuntimeConfig, DEFAULT_GC_PERCENT};

/// Resource attribute key carrying the configured collector target.
pub const GC_PERCENT_ATTRIBUTE: &str = "process.runtime.gc_percent";

/// Interpret a raw `CUSTOM_GOGC` value.
///
/// Missing, unparsable, and zero values all yield [`DEFAULT_GC_PERCENT`].
pub fn gc_percent_from_env(value: Option<&str>) -> i64 {
    match value.map(|v| v.trim().parse::<i64>()) {
        Some(Ok(percent)) if percent != 0 => percent,
        _ => DEFAULT_GC_PERCENT,
    }
}

/// Apply runtime settings.
pub fn tune(config: &RuntimeConfig) {
    let workers = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);

    tracing::info!(
        gc_percent = config.gc_percent,
        worker_threads = workers,
        "Runtime tuned"
    );
}
