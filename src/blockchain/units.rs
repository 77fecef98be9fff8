//! Human-readable token amounts.

use alloy::primitives::utils::format_units as alloy_format_units;
use alloy::primitives::U256;

use crate::blockchain::types::{BlockchainError, BlockchainResult};

/// Format a raw amount with `decimals` places.
///
/// Trailing zeros are trimmed but one fractional digit is always kept, so
/// `1500000` with 6 decimals is `1.5` and zero is `0.0`.
pub fn format_units(raw: U256, decimals: u8) -> BlockchainResult<String> {
    let formatted = alloy_format_units(raw, decimals)
        .map_err(|e| BlockchainError::Contract(format!("Cannot format amount: {}", e)))?;

    let Some((whole, fraction)) = formatted.split_once('.') else {
        return Ok(format!("{}.0", formatted));
    };
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        Ok(format!("{}.0", whole))
    } else {
        Ok(format!("{}.{}", whole, fraction))
    }
}
