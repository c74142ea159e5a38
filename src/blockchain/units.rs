//! Address parsing and wei → ether rendering.

use alloy::primitives::{utils::format_ether, Address, U256};

use crate::blockchain::types::{BlockchainError, BlockchainResult};

/// Parse a hex account address (`0x` prefix optional).
pub fn parse_address(raw: &str) -> BlockchainResult<Address> {
    raw.trim()
        .parse::<Address>()
        .map_err(|_| BlockchainError::InvalidAddress(raw.to_string()))
}

/// Render a wei amount as the shortest exact ether decimal: `1.5`, `0`, `0.000001`.
pub fn wei_to_ether(wei: U256) -> String {
    let formatted = format_ether(wei);
    match formatted.split_once('.') {
        Some((whole, fraction)) => {
            let fraction = fraction.trim_end_matches('0');
            if fraction.is_empty() {
                whole.to_string()
            } else {
                format!("{}.{}", whole, fraction)
            }
        }
        None => formatted,
    }
}
