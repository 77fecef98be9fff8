//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate URLs, addresses and value ranges
//! - Detect duplicate token symbols
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: FrontendConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::fmt;

use alloy::primitives::Address;

use crate::config::schema::FrontendConfig;

/// Largest decimals value whose scale still fits in a U256.
pub const MAX_TOKEN_DECIMALS: u8 = 77;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Check a loaded configuration, collecting every error found.
pub fn validate_config(config: &FrontendConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<std::net::SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }
    if config.listener.request_timeout_secs == 0 {
        errors.push(ValidationError::new("listener.request_timeout_secs", "must be > 0"));
    }

    if let Err(e) = url::Url::parse(&config.api.profile_url()) {
        errors.push(ValidationError::new(
            "api.host",
            format!("profile URL '{}' is invalid: {}", config.api.profile_url(), e),
        ));
    }
    if config.api.timeout_secs == 0 {
        errors.push(ValidationError::new("api.timeout_secs", "must be > 0"));
    }

    let chain = &config.blockchain;
    if let Err(e) = url::Url::parse(&chain.rpc_url) {
        errors.push(ValidationError::new(
            "blockchain.rpc_url",
            format!("'{}' is invalid: {}", chain.rpc_url, e),
        ));
    }
    for (i, failover) in chain.failover_urls.iter().enumerate() {
        if url::Url::parse(failover).is_err() {
            errors.push(ValidationError::new(
                format!("blockchain.failover_urls[{}]", i),
                format!("'{}' is not a valid URL", failover),
            ));
        }
    }
    if chain.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new("blockchain.rpc_timeout_secs", "must be > 0"));
    }
    if chain.confirmation_timeout_secs == 0 {
        errors.push(ValidationError::new("blockchain.confirmation_timeout_secs", "must be > 0"));
    }
    if chain.poll_interval_ms == 0 {
        errors.push(ValidationError::new("blockchain.poll_interval_ms", "must be > 0"));
    }

    let mut symbols = HashSet::new();
    let native = &config.tokens.native;
    check_token(&mut errors, &mut symbols, "tokens.native", &native.symbol, native.decimals);
    for (i, token) in config.tokens.erc20.iter().enumerate() {
        let field = format!("tokens.erc20[{}]", i);
        check_token(&mut errors, &mut symbols, &field, &token.symbol, token.decimals);
        if token.address.parse::<Address>().is_err() {
            errors.push(ValidationError::new(
                format!("{}.address", field),
                format!("'{}' is not a valid address", token.address),
            ));
        }
    }

    if let Some(addr) = &config.session.profile_addr {
        if addr.parse::<Address>().is_err() {
            errors.push(ValidationError::new(
                "session.profile_addr",
                format!("'{}' is not a valid address", addr),
            ));
        }
    }

    if config.ui.notification_secs == 0 {
        errors.push(ValidationError::new("ui.notification_secs", "must be > 0"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_token(
    errors: &mut Vec<ValidationError>,
    seen: &mut HashSet<String>,
    field: &str,
    symbol: &str,
    decimals: u8,
) {
    if symbol.trim().is_empty() {
        errors.push(ValidationError::new(format!("{}.symbol", field), "must not be empty"));
    } else if !seen.insert(symbol.to_ascii_uppercase()) {
        errors.push(ValidationError::new(
            format!("{}.symbol", field),
            format!("duplicate token symbol '{}'", symbol),
        ));
    }
    if decimals > MAX_TOKEN_DECIMALS {
        errors.push(ValidationError::new(
            format!("{}.decimals", field),
            format!("{} exceeds {}", decimals, MAX_TOKEN_DECIMALS),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::Erc20TokenConfig;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&FrontendConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = FrontendConfig::default();
        config.api.host = "not a url".to_string();
        config.blockchain.rpc_timeout_secs = 0;
        config.session.profile_addr = Some("0xnope".to_string());
        config.tokens.erc20.push(Erc20TokenConfig {
            symbol: "dai".to_string(),
            name: "Duplicate".to_string(),
            address: "garbage".to_string(),
            decimals: 80,
        });

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"api.host"));
        assert!(fields.contains(&"blockchain.rpc_timeout_secs"));
        assert!(fields.contains(&"session.profile_addr"));
        assert!(fields.contains(&"tokens.erc20[2].symbol"));
        assert!(fields.contains(&"tokens.erc20[2].address"));
        assert!(fields.contains(&"tokens.erc20[2].decimals"));
    }

    #[test]
    fn test_error_display() {
        let err = ValidationError::new("ui.notification_secs", "must be > 0");
        assert_eq!(err.to_string(), "ui.notification_secs: must be > 0");
    }
}
