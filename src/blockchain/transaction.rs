//! Withdraw confirmation monitoring.
//!
//! # Responsibilities
//! - Poll a submitted transaction's receipt until it has enough confirmations
//! - Alternatively watch the profile contract for the matching withdrawal event
//! - Bound both by the configured confirmation timeout

use alloy::primitives::{Address, TxHash};
use alloy::rpc::types::Filter;
use alloy::sol_types::SolEvent;
use std::time::Duration;
use tokio::time::{interval, timeout};

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::contracts::ISourceCheckProfile::{EvtNativeWithdraw, EvtWithdraw};
use crate::blockchain::types::{Asset, BlockchainError, BlockchainResult, ConfirmationStatus};

/// Log filter matching the withdrawal event a profile contract emits for `asset`.
pub fn withdraw_event_filter(profile: Address, asset: Asset, from_block: u64) -> Filter {
    let filter = Filter::new().address(profile).from_block(from_block);
    match asset {
        Asset::Native => filter.event_signature(EvtNativeWithdraw::SIGNATURE_HASH),
        Asset::Erc20(token) => filter
            .event_signature(EvtWithdraw::SIGNATURE_HASH)
            .topic1(token.into_word()),
    }
}

/// Waits for submitted withdraw transactions to settle.
#[derive(Debug, Clone)]
pub struct ConfirmationWatcher {
    client: BlockchainClient,
    poll_interval: Duration,
    timeout_duration: Duration,
}

impl ConfirmationWatcher {
    pub fn new(client: BlockchainClient) -> Self {
        let config = client.config();
        let poll_interval = Duration::from_millis(config.poll_interval_ms);
        let timeout_duration = Duration::from_secs(config.confirmation_timeout_secs);
        Self {
            client,
            poll_interval,
            timeout_duration,
        }
    }

    /// Wait until the receipt is mined with the required confirmations.
    ///
    /// A reverted receipt yields `Failed`.
    pub async fn wait_for_receipt(&self, tx_hash: TxHash) -> BlockchainResult<ConfirmationStatus> {
        let required_confirmations = self.client.confirmation_blocks();

        let result = timeout(self.timeout_duration, async {
            let mut ticker = interval(self.poll_interval);

            loop {
                ticker.tick().await;

                let receipt = match self.client.get_transaction_receipt(tx_hash).await? {
                    Some(r) => r,
                    None => {
                        tracing::debug!(tx_hash = %tx_hash, "Transaction pending");
                        continue;
                    }
                };

                if !receipt.status() {
                    return Ok(ConfirmationStatus::Failed("Transaction reverted".to_string()));
                }

                let current_block = self.client.get_block_number().await?;
                let tx_block = receipt.block_number.unwrap_or(current_block);
                // The inclusion block counts as the first confirmation.
                let confirmations = current_block.saturating_sub(tx_block) as u32 + 1;

                if confirmations >= required_confirmations {
                    return Ok(ConfirmationStatus::Confirmed {
                        block_number: tx_block,
                    });
                }

                tracing::debug!(
                    tx_hash = %tx_hash,
                    confirmations = confirmations,
                    required = required_confirmations,
                    "Waiting for confirmations"
                );
            }
        })
        .await;

        match result {
            Ok(status) => status,
            Err(_) => Err(BlockchainError::ConfirmationTimeout(self.timeout_duration.as_secs())),
        }
    }

    /// Wait until the profile contract emits the withdrawal event for `tx_hash`.
    pub async fn wait_for_event(
        &self,
        profile: Address,
        asset: Asset,
        tx_hash: TxHash,
        from_block: u64,
    ) -> BlockchainResult<ConfirmationStatus> {
        let filter = withdraw_event_filter(profile, asset, from_block);

        let result = timeout(self.timeout_duration, async {
            let mut ticker = interval(self.poll_interval);

            loop {
                ticker.tick().await;

                let logs = self.client.get_logs(&filter).await?;
                if let Some(log) = logs.iter().find(|l| l.transaction_hash == Some(tx_hash)) {
                    let block_number = log.block_number.unwrap_or(from_block);
                    tracing::debug!(tx_hash = %tx_hash, block_number, "Withdrawal event observed");
                    return Ok(ConfirmationStatus::Confirmed { block_number });
                }

                // A reverted transaction never emits; stop waiting once it is mined.
                if let Some(receipt) = self.client.get_transaction_receipt(tx_hash).await? {
                    if !receipt.status() {
                        return Ok(ConfirmationStatus::Failed("Transaction reverted".to_string()));
                    }
                }
            }
        })
        .await;

        match result {
            Ok(status) => status,
            Err(_) => Err(BlockchainError::ConfirmationTimeout(self.timeout_duration.as_secs())),
        }
    }
}
