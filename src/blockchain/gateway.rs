//! Wallet-facing seam used by the withdraw page.
//!
//! The page only needs three things from the chain: who is connected, what a
//! profile contract holds, and a way to withdraw. [`ChainGateway`] provides
//! them over JSON-RPC; tests provide their own.

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, U256};
use alloy::providers::{DynProvider, Provider};
use alloy::rpc::types::TransactionRequest;
use alloy::sol_types::SolCall;
use futures_util::future::{BoxFuture, FutureExt};
use tokio::time::timeout;
use std::time::Duration;

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::contracts::ISourceCheckProfile;
use crate::blockchain::transaction::ConfirmationWatcher;
use crate::blockchain::types::{
    Asset, BlockchainError, BlockchainResult, ConfirmationMode, ConfirmationStatus,
};
use crate::blockchain::wallet::Wallet;

/// Chain access needed by the withdraw flow.
pub trait WalletGateway: Send + Sync {
    /// Address of the connected wallet, if any.
    fn connected_account(&self) -> Option<Address>;

    /// Balance of `asset` held by `holder`.
    fn balance_of(&self, holder: Address, asset: Asset) -> BoxFuture<'_, BlockchainResult<U256>>;

    /// Submit a withdraw from `profile` and wait for it to settle.
    fn withdraw(
        &self,
        profile: Address,
        asset: Asset,
        mode: ConfirmationMode,
    ) -> BoxFuture<'_, BlockchainResult<ConfirmationStatus>>;

    /// Whether the chain endpoint currently answers.
    fn is_healthy(&self) -> BoxFuture<'_, bool>;
}

struct Signing {
    wallet: Wallet,
    provider: DynProvider,
}

/// [`WalletGateway`] backed by a [`BlockchainClient`] and an optional wallet.
pub struct ChainGateway {
    client: BlockchainClient,
    watcher: ConfirmationWatcher,
    signing: Option<Signing>,
}

impl ChainGateway {
    pub fn new(client: BlockchainClient, wallet: Option<Wallet>) -> BlockchainResult<Self> {
        let signing = match wallet {
            Some(wallet) => {
                let provider = client.signing_provider(wallet.ethereum_wallet())?;
                Some(Signing { wallet, provider })
            }
            None => None,
        };
        Ok(Self {
            watcher: ConfirmationWatcher::new(client.clone()),
            client,
            signing,
        })
    }

    /// Calldata for the profile contract's withdraw entry point.
    pub fn withdraw_calldata(asset: Asset) -> Vec<u8> {
        match asset {
            Asset::Native => ISourceCheckProfile::nativeWithdrawCall {}.abi_encode(),
            Asset::Erc20(token) => ISourceCheckProfile::withdrawCall { token }.abi_encode(),
        }
    }

    async fn submit_and_confirm(
        &self,
        profile: Address,
        asset: Asset,
        mode: ConfirmationMode,
    ) -> BlockchainResult<ConfirmationStatus> {
        let signing = self
            .signing
            .as_ref()
            .ok_or_else(|| BlockchainError::NotAvailable("no wallet connected".to_string()))?;

        let from_block = self.client.get_block_number().await?;

        let tx = TransactionRequest::default()
            .with_from(signing.wallet.address())
            .with_to(profile)
            .with_input(Self::withdraw_calldata(asset));

        let rpc_timeout = self.client.config().rpc_timeout_secs;
        let pending = timeout(
            Duration::from_secs(rpc_timeout),
            signing.provider.send_transaction(tx),
        )
        .await
        .map_err(|_| BlockchainError::Timeout(rpc_timeout))?
        .map_err(|e| BlockchainError::Rpc(e.to_string()))?;
        let tx_hash = *pending.tx_hash();

        tracing::info!(
            tx_hash = %tx_hash,
            profile = %profile,
            asset = ?asset,
            mode = ?mode,
            "Withdraw transaction submitted"
        );

        match mode {
            ConfirmationMode::Receipt => self.watcher.wait_for_receipt(tx_hash).await,
            ConfirmationMode::Event => {
                self.watcher
                    .wait_for_event(profile, asset, tx_hash, from_block)
                    .await
            }
        }
    }
}

impl WalletGateway for ChainGateway {
    fn connected_account(&self) -> Option<Address> {
        self.signing.as_ref().map(|s| s.wallet.address())
    }

    fn balance_of(&self, holder: Address, asset: Asset) -> BoxFuture<'_, BlockchainResult<U256>> {
        async move {
            match asset {
                Asset::Native => self.client.get_balance(holder).await,
                Asset::Erc20(token) => self.client.get_token_balance(token, holder).await,
            }
        }
        .boxed()
    }

    fn withdraw(
        &self,
        profile: Address,
        asset: Asset,
        mode: ConfirmationMode,
    ) -> BoxFuture<'_, BlockchainResult<ConfirmationStatus>> {
        self.submit_and_confirm(profile, asset, mode).boxed()
    }

    fn is_healthy(&self) -> BoxFuture<'_, bool> {
        self.client.is_healthy().boxed()
    }
}

impl std::fmt::Debug for ChainGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainGateway")
            .field("client", &self.client)
            .field("account", &self.connected_account())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::types::BlockchainConfig;

    const TEST_PRIVATE_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn offline_config() -> BlockchainConfig {
        BlockchainConfig {
            rpc_url: "http://127.0.0.1:1".to_string(),
            rpc_timeout_secs: 1,
            ..Default::default()
        }
    }

    #[test]
    fn test_withdraw_calldata_selectors() {
        let native = ChainGateway::withdraw_calldata(Asset::Native);
        assert_eq!(native, ISourceCheckProfile::nativeWithdrawCall::SELECTOR.to_vec());

        let erc20 = ChainGateway::withdraw_calldata(Asset::Erc20(Address::ZERO));
        assert_eq!(&erc20[..4], &ISourceCheckProfile::withdrawCall::SELECTOR);
    }

    #[tokio::test]
    async fn test_without_wallet() {
        let client = BlockchainClient::new(offline_config()).await.unwrap();
        let gateway = ChainGateway::new(client, None).unwrap();
        assert!(gateway.connected_account().is_none());

        let err = gateway
            .withdraw(Address::ZERO, Asset::Native, ConfirmationMode::Receipt)
            .await
            .unwrap_err();
        assert!(matches!(err, BlockchainError::NotAvailable(_)));
    }

    #[tokio::test]
    async fn test_with_wallet() {
        let client = BlockchainClient::new(offline_config()).await.unwrap();
        let wallet = Wallet::from_private_key(TEST_PRIVATE_KEY, 137).unwrap();
        let gateway = ChainGateway::new(client, Some(wallet.clone())).unwrap();
        assert_eq!(gateway.connected_account(), Some(wallet.address()));
    }
}
