use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::blockchain::types::BlockchainError;
use crate::error::{ApiError, ErrorBody};
use crate::http::server::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct BalanceResponse {
    pub success: bool,
    /// Ethereum balance for the address, in ether.
    pub balance: String,
}

/// Get the Ethereum balance for an address.
#[utoipa::path(
    get,
    path = "/balance/{address}",
    tag = "Web3",
    security(("cookieAuth" = [])),
    params(("address" = String, Path, description = "Ethereum address for which to fetch the balance")),
    responses(
        (status = 200, description = "Balance in ether", body = BalanceResponse),
        (status = 401, description = "User authentication failed", body = ErrorBody),
        (status = 500, description = "Failed to retrieve Ethereum balance", body = ErrorBody)
    )
)]
pub async fn fetch_eth_balance(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<BalanceResponse>, ApiError> {
    let client = state
        .blockchain
        .as_ref()
        .ok_or_else(|| BlockchainError::NotAvailable("blockchain integration disabled".into()))?;

    let balance = client.get_ether_balance(&address).await?;

    Ok(Json(BalanceResponse {
        success: true,
        balance,
    }))
}
