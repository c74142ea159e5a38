//! Liveness endpoint.

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::http::server::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// `disabled`, `connected` or `unreachable`.
    pub blockchain: &'static str,
}

/// Service liveness and blockchain connectivity.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let blockchain = match &state.blockchain {
        None => "disabled",
        Some(client) => {
            if client.is_healthy().await {
                "connected"
            } else {
                "unreachable"
            }
        }
    };

    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        blockchain,
    })
}
