//! Traced upstream service.
//!
//! A minimal web service that proxies one upstream API call and exports
//! distributed traces over OTLP/gRPC. Three interchangeable variants show
//! where instrumentation can live:
//!
//! ```text
//!                     ┌───────────────────────────────────────────────┐
//!   Client Request    │  ┌────────────┐   ┌─────────┐   ┌──────────┐  │
//!  ───────────────────┼─▶│ trace layer│──▶│ handler │──▶│ upstream │──┼──▶ upstream API
//!                     │  │(middleware)│   │(handler)│   │ (client) │  │
//!   Client Response   │  └────────────┘   └─────────┘   └──────────┘  │
//!  ◀──────────────────┼──────────── body (raw or JSON-wrapped) ◀──────┤
//!                     │                                               │
//!                     │  spans ──▶ batch processor ──▶ OTLP collector │
//!                     └───────────────────────────────────────────────┘
//! ```
//!
//! Any upstream failure stops the server and the process exits with 1.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tokio::net::TcpListener;

use traced_upstream::config::{self, ConfigError, ServerConfig};
use traced_upstream::http::{HttpServer, Variant};
use traced_upstream::lifecycle::{wait_for_signal, Shutdown};
use traced_upstream::observability::{self, logging, metrics};
use traced_upstream::runtime;

#[derive(Parser)]
#[command(name = "traced-upstream")]
#[command(about = "Proxy one upstream call with distributed tracing", long_about = None)]
struct Cli {
    /// Where the tracing instrumentation lives.
    #[arg(short, long, value_enum, env = "VARIANT", default_value_t = Variant::Middleware)]
    variant: Variant,

    /// Optional TOML configuration file.
    #[arg(short, long, env = "TRACED_UPSTREAM_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // File first, then environment, then one validation pass over the result
    let mut config = match &cli.config {
        Some(path) => config::loader::read_config(path)?,
        None => ServerConfig::default(),
    };
    config::apply_env_overrides(&mut config);
    config::validate_config(&config).map_err(ConfigError::Validation)?;

    let telemetry = observability::init_tracer(&config.tracing, &config.runtime)?;
    logging::init(&config.observability, telemetry.tracer())?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        variant = %cli.variant,
        tracing_enabled = telemetry.is_enabled(),
        "traced-upstream starting"
    );

    runtime::tune(&config.runtime);

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        wait_for_signal().await;
        signal_shutdown.trigger();
    });

    let server = HttpServer::new(config, cli.variant, shutdown)?;
    let reason = server.run(listener).await?;

    telemetry.shutdown();
    tracing::info!(reason = ?reason, "Shutdown complete");
    Ok(reason.exit_code())
}
