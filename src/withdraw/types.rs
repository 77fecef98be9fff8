//! Withdraw page types.

use alloy::primitives::{Address, U256};
use serde::Serialize;
use thiserror::Error;

use crate::blockchain::{Asset, BlockchainError};
use crate::config::{TokensConfig, ValidationError};

/// A token row on the withdraw page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenSpec {
    pub symbol: String,
    pub name: String,
    pub decimals: u8,
    pub asset: Asset,
}

impl TokenSpec {
    /// Native token first, then the ERC-20s in configured order.
    pub fn from_config(tokens: &TokensConfig) -> Result<Vec<TokenSpec>, ValidationError> {
        let mut specs = vec![TokenSpec {
            symbol: tokens.native.symbol.clone(),
            name: tokens.native.name.clone(),
            decimals: tokens.native.decimals,
            asset: Asset::Native,
        }];
        for (i, token) in tokens.erc20.iter().enumerate() {
            let address: Address = token.address.parse().map_err(|_| ValidationError {
                field: format!("tokens.erc20[{}].address", i),
                message: format!("'{}' is not a valid address", token.address),
            })?;
            specs.push(TokenSpec {
                symbol: token.symbol.clone(),
                name: token.name.clone(),
                decimals: token.decimals,
                asset: Asset::Erc20(address),
            });
        }
        Ok(specs)
    }
}

/// Balance as of the last successful fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenBalance {
    pub raw: U256,
    pub formatted: String,
}

/// How a withdraw attempt ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WithdrawOutcome {
    Confirmed { block_number: u64 },
    Failed { reason: String },
}

/// Reasons a withdraw cannot start.
#[derive(Debug, Error)]
pub enum WithdrawError {
    #[error("Unknown token '{0}'")]
    UnknownToken(String),

    #[error("Connect a wallet and load a profile contract before withdrawing")]
    NotConnected,

    #[error("No profile contract address is known")]
    NoProfile,

    #[error("A {0} withdraw is already in progress")]
    InProgress(String),

    #[error(transparent)]
    Chain(#[from] BlockchainError),
}

/// Serializable snapshot of one token row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenRow {
    pub symbol: String,
    pub name: String,
    /// Formatted balance, absent until the first successful fetch.
    pub balance: Option<String>,
    pub withdrawing: bool,
    /// Whether the withdraw control is enabled.
    pub can_withdraw: bool,
}

/// Serializable snapshot of the whole withdraw page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WithdrawView {
    pub profile_addr: Option<String>,
    pub wallet: Option<String>,
    pub can_withdraw: bool,
    pub tokens: Vec<TokenRow>,
    pub success: Option<String>,
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Erc20TokenConfig;

    #[test]
    fn test_specs_from_default_config() {
        let specs = TokenSpec::from_config(&TokensConfig::default()).unwrap();
        let symbols: Vec<_> = specs.iter().map(|s| s.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["MATIC", "DAI", "USDC"]);
        assert_eq!(specs[0].asset, Asset::Native);
        assert_eq!(specs[2].decimals, 6);
        assert!(matches!(specs[1].asset, Asset::Erc20(_)));
    }

    #[test]
    fn test_bad_token_address() {
        let mut tokens = TokensConfig::default();
        tokens.erc20.push(Erc20TokenConfig {
            symbol: "BAD".to_string(),
            name: "Bad".to_string(),
            address: "0x12".to_string(),
            decimals: 18,
        });
        let err = TokenSpec::from_config(&tokens).unwrap_err();
        assert_eq!(err.field, "tokens.erc20[2].address");
    }

    #[test]
    fn test_outcome_serialization() {
        let json = serde_json::to_value(WithdrawOutcome::Failed {
            reason: "Transaction reverted".to_string(),
        })
        .unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["reason"], "Transaction reverted");
    }
}
