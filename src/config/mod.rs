//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → env.rs (PORT, CUSTOM_GOGC, UPSTREAM_URL, OTEL_SERVICE_NAME)
//!     → validation.rs (semantic checks)
//!     → ServerConfig (validated, immutable)
//!     → cloned into each subsystem at startup
//! ```
//!
//! # Design Decisions
//! - All fields have defaults so the server runs with no file at all
//! - Environment wins over the file
//! - Validation separates syntactic (serde) from semantic checks

pub mod env;
pub mod loader;
pub mod schema;
pub mod validation;

pub use env::{apply_env_overrides, apply_overrides};
pub use loader::{load_config, ConfigError};
pub use schema::{
    ListenerConfig, LogFormat, ObservabilityConfig, RuntimeConfig, ServerConfig, TracingConfig,
    UpstreamConfig,
};
pub use validation::{validate_config, ValidationError};
