//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the front end.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the verified profile front end.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct FrontendConfig {
    /// Listener configuration (bind address, request timeout).
    pub listener: ListenerConfig,

    /// External profile API.
    pub api: ApiConfig,

    /// Blockchain integration settings.
    pub blockchain: BlockchainConfig,

    /// Tokens shown on the withdraw page.
    pub tokens: TokensConfig,

    /// Withdraw flow settings.
    pub withdraw: WithdrawConfig,

    /// Session defaults (the signed-in user's profile contract).
    pub session: SessionConfig,

    /// Notification timing.
    pub ui: UiConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Profile API location.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Scheme and authority of the profile service.
    pub host: String,

    /// Path of the profile lookup endpoint, appended to `host`.
    pub profile_path: String,

    /// Lookup timeout in seconds.
    pub timeout_secs: u64,
}

impl ApiConfig {
    /// Full URL of the profile lookup endpoint.
    pub fn profile_url(&self) -> String {
        format!("{}{}", self.host, self.profile_path)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "http://localhost:3000".to_string(),
            profile_path: "/api/profile".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Blockchain integration configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BlockchainConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Failover JSON-RPC endpoint URLs.
    pub failover_urls: Vec<String>,

    /// Chain ID (137 for Polygon mainnet, 31337 for local Anvil).
    pub chain_id: u64,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Number of block confirmations required before a withdraw counts.
    pub confirmation_blocks: u32,

    /// How long to wait for a withdraw to confirm.
    pub confirmation_timeout_secs: u64,

    /// Receipt / log polling interval in milliseconds.
    pub poll_interval_ms: u64,
}

impl Default for BlockchainConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:8545".to_string(),
            failover_urls: Vec::new(),
            chain_id: 137,
            rpc_timeout_secs: 10,
            confirmation_blocks: 1,
            confirmation_timeout_secs: 120,
            poll_interval_ms: 2000,
        }
    }
}

/// Native token plus the ERC-20 tokens a profile contract can hold.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TokensConfig {
    pub native: NativeTokenConfig,
    pub erc20: Vec<Erc20TokenConfig>,
}

impl Default for TokensConfig {
    fn default() -> Self {
        Self {
            native: NativeTokenConfig::default(),
            erc20: vec![
                Erc20TokenConfig {
                    symbol: "DAI".to_string(),
                    name: "Dai Stablecoin".to_string(),
                    address: "0x8f3Cf7ad23Cd3CaDbD9735AFf958023239c6A063".to_string(),
                    decimals: 18,
                },
                Erc20TokenConfig {
                    symbol: "USDC".to_string(),
                    name: "USD Coin".to_string(),
                    address: "0x2791Bca1f2de4661ED88A30C99A7a9449Aa84174".to_string(),
                    decimals: 6,
                },
            ],
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NativeTokenConfig {
    pub symbol: String,
    pub name: String,
    pub decimals: u8,
}

impl Default for NativeTokenConfig {
    fn default() -> Self {
        Self {
            symbol: "MATIC".to_string(),
            name: "Polygon (MATIC)".to_string(),
            decimals: 18,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Erc20TokenConfig {
    pub symbol: String,
    pub name: String,
    /// Token contract address (hex).
    pub address: String,
    pub decimals: u8,
}

/// How a submitted withdraw is observed to completion.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConfirmationMode {
    /// Poll the transaction receipt.
    #[default]
    Receipt,
    /// Watch for the profile contract's withdrawal event.
    Event,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct WithdrawConfig {
    pub confirmation: ConfirmationMode,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SessionConfig {
    /// Profile contract address of the signed-in user, if known.
    pub profile_addr: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UiConfig {
    /// How long success/error notifications stay visible.
    pub notification_secs: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { notification_secs: 3 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FrontendConfig::default();
        assert_eq!(config.ui.notification_secs, 3);
        assert_eq!(config.withdraw.confirmation, ConfirmationMode::Receipt);
        assert_eq!(config.tokens.native.symbol, "MATIC");
        let symbols: Vec<_> = config.tokens.erc20.iter().map(|t| t.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["DAI", "USDC"]);
        assert_eq!(config.api.profile_url(), "http://localhost:3000/api/profile");
    }

    #[test]
    fn test_partial_toml() {
        let config: FrontendConfig = toml::from_str(
            r#"
            [api]
            host = "https://api.example.org"

            [withdraw]
            confirmation = "event"
            "#,
        )
        .unwrap();
        assert_eq!(config.api.host, "https://api.example.org");
        assert_eq!(config.api.profile_path, "/api/profile");
        assert_eq!(config.withdraw.confirmation, ConfirmationMode::Event);
        assert_eq!(config.tokens.erc20.len(), 2);
    }
}
