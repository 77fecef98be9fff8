//! Startup orchestration.
//!
//! # Responsibilities
//! - Turn a validated configuration into the profile client and withdraw page
//! - Connect the wallet from the environment, if present
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - An unreachable RPC endpoint is not a startup error

use alloy::primitives::Address;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::blockchain::{BlockchainClient, BlockchainError, ChainGateway, Wallet, WalletGateway};
use crate::config::{FrontendConfig, ValidationError};
use crate::profile::{ProfileClient, ProfileError};
use crate::withdraw::{TokenSpec, WithdrawPage};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ValidationError),

    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error(transparent)]
    Blockchain(#[from] BlockchainError),
}

/// Everything a front end needs, built from one configuration.
pub struct Frontend {
    pub config: FrontendConfig,
    pub profiles: ProfileClient,
    pub withdraw: Arc<WithdrawPage>,
}

/// Build the pages against the real profile API and chain.
pub async fn initialize(config: FrontendConfig) -> Result<Frontend, StartupError> {
    let client = BlockchainClient::new(config.blockchain.clone()).await?;
    let wallet = Wallet::from_env(config.blockchain.chain_id)?;
    let gateway = ChainGateway::new(client, wallet)?;
    initialize_with_gateway(config, Arc::new(gateway))
}

/// Build the pages over a caller-supplied gateway.
pub fn initialize_with_gateway(
    config: FrontendConfig,
    gateway: Arc<dyn WalletGateway>,
) -> Result<Frontend, StartupError> {
    let profiles = ProfileClient::new(&config.api)?;
    let tokens = TokenSpec::from_config(&config.tokens)?;

    let profile_addr = match &config.session.profile_addr {
        Some(raw) => Some(raw.parse::<Address>().map_err(|_| ValidationError {
            field: "session.profile_addr".to_string(),
            message: format!("'{}' is not a valid address", raw),
        })?),
        None => None,
    };

    let withdraw = WithdrawPage::new(
        tokens,
        gateway,
        config.withdraw.confirmation,
        Duration::from_secs(config.ui.notification_secs),
    )
    .with_profile_addr(profile_addr);

    tracing::info!(
        profile_url = %profiles.profile_url(),
        tokens = withdraw.tokens().len(),
        confirmation = ?config.withdraw.confirmation,
        wallet_connected = withdraw.gateway().connected_account().is_some(),
        "Front end initialized"
    );

    Ok(Frontend {
        config,
        profiles,
        withdraw: Arc::new(withdraw),
    })
}
