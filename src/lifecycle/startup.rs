//! Startup orchestration.
//!
//! Order: metrics exporter, services (fail fast), listener, signal handler,
//! then serve until shutdown. Traffic is only accepted once every service
//! initialized.

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::AppConfig;
use crate::http::{HttpServer, StartupError};
use crate::lifecycle::shutdown::Shutdown;
use crate::lifecycle::signals::spawn_signal_handler;
use crate::observability::init_metrics;

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Startup(#[from] StartupError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Start every subsystem and serve until a stop signal arrives.
pub async fn run(config: AppConfig) -> Result<(), RunError> {
    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let bind_address = config.listener.bind_address.clone();
    let server = HttpServer::new(config).await?;

    let listener = TcpListener::bind(&bind_address)
        .await
        .map_err(|source| RunError::Bind {
            address: bind_address.clone(),
            source,
        })?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    spawn_signal_handler(shutdown);

    server.run(listener, server_shutdown).await?;
    Ok(())
}
