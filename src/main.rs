//! Assessment backend API server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http (request id, trace, timeout, body limit, CORS, metrics)
//!                        │
//!          ┌─────────────┼──────────────────┬──────────────────────┐
//!          ▼             ▼                  ▼                      ▼
//!        auth          data             blockchain             /health
//!   register/login   /get-all        /balance/{address}      /api-docs
//!   logout, /me     paginate +       (session guard)
//!   (JWT cookie)    filter upstream   JSON-RPC provider
//!          │             │                  │
//!          ▼             ▼                  ▼
//!   in-memory users  public API       Ethereum node
//! ```

use std::path::PathBuf;

use clap::Parser;

use assessment_api::config::load_config;
use assessment_api::lifecycle;
use assessment_api::observability::init_logging;

#[derive(Parser)]
#[command(name = "assessment-api")]
#[command(about = "REST API with cookie sessions, a paginated data proxy and Ethereum balances", long_about = None)]
struct Args {
    /// TOML configuration file; defaults plus environment when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config.observability);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "assessment-api starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        api_prefix = %config.listener.api_prefix,
        request_timeout_secs = config.timeouts.request_secs,
        blockchain_enabled = config.blockchain.enabled,
        "Configuration loaded"
    );

    lifecycle::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
