//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Config / INFURA_URL (RPC URL)
//!     → client.rs (RPC connection with timeouts)
//!     → units.rs (address parsing, wei → ether)
//!     → handlers.rs (GET /balance/{address}, session required)
//! ```
//!
//! # Security Constraints
//! - Never log the RPC URL (it carries the provider API key)
//! - All RPC calls have configurable timeouts
//! - Graceful degradation when blockchain unreachable

pub mod client;
pub mod handlers;
pub mod types;
pub mod units;

use axum::{middleware, routing::get, Router};

use crate::auth::require_session;
use crate::http::server::AppState;

pub use client::BlockchainClient;
pub use types::{BlockchainConfig, BlockchainError, ChainId};

/// Balance lookup, behind the session guard.
pub fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/balance/{address}", get(handlers::fetch_eth_balance))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session))
}
