//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::FrontendConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<FrontendConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let mut config: FrontendConfig = toml::from_str(&content)?;
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Load from `path` when given, otherwise start from defaults.
///
/// Environment overrides apply in both cases.
pub fn load_or_default(path: Option<&Path>) -> Result<FrontendConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => {
            let mut config = FrontendConfig::default();
            apply_env_overrides(&mut config, |key| std::env::var(key).ok());
            validate_config(&config).map_err(ConfigError::Validation)?;
            Ok(config)
        }
    }
}

/// Overlay `VP_*` variables onto a loaded config.
///
/// Token overrides are keyed by upper-cased symbol, e.g. `VP_TOKEN_DAI_ADDR`
/// and `VP_TOKEN_DAI_DEC`. Unparseable numeric values are ignored with a
/// warning.
pub fn apply_env_overrides<F>(config: &mut FrontendConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(host) = lookup("VP_API_HOST") {
        config.api.host = host;
    }
    if let Some(path) = lookup("VP_PROFILE_PATH") {
        config.api.profile_path = path;
    }
    if let Some(rpc_url) = lookup("VP_RPC_URL") {
        config.blockchain.rpc_url = rpc_url;
    }
    if let Some(chain_id) = lookup("VP_CHAIN_ID") {
        match chain_id.parse() {
            Ok(id) => config.blockchain.chain_id = id,
            Err(_) => tracing::warn!(value = %chain_id, "Ignoring invalid VP_CHAIN_ID"),
        }
    }
    if let Some(profile_addr) = lookup("VP_PROFILE_ADDR") {
        config.session.profile_addr = Some(profile_addr);
    }

    let native_key = format!("VP_TOKEN_{}_DEC", config.tokens.native.symbol.to_ascii_uppercase());
    if let Some(dec) = lookup(&native_key) {
        match dec.parse() {
            Ok(d) => config.tokens.native.decimals = d,
            Err(_) => tracing::warn!(key = %native_key, value = %dec, "Ignoring invalid decimals"),
        }
    }

    for token in &mut config.tokens.erc20 {
        let symbol = token.symbol.to_ascii_uppercase();
        if let Some(addr) = lookup(&format!("VP_TOKEN_{}_ADDR", symbol)) {
            token.address = addr;
        }
        let dec_key = format!("VP_TOKEN_{}_DEC", symbol);
        if let Some(dec) = lookup(&dec_key) {
            match dec.parse() {
                Ok(d) => token.decimals = d,
                Err(_) => tracing::warn!(key = %dec_key, value = %dec, "Ignoring invalid decimals"),
            }
        }
    }
}
