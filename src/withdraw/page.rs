//! The withdraw page: balances and the withdraw transaction lifecycle.
//!
//! ```text
//! start(symbol) ── checks + in-flight guard ──▶ PendingWithdraw
//! finish(pending):
//!     submit → confirm (receipt | event)
//!         ├─ Confirmed → refresh balances → "Withdraw successful!"
//!         └─ Failed / error → "Error withdrawing tokens: {reason}"
//!     guard dropped → control re-enabled
//! ```
//!
//! Withdrawals of different tokens never block each other.

use alloy::primitives::Address;
use arc_swap::ArcSwapOption;
use dashmap::{DashMap, DashSet};
use futures_util::future::try_join_all;
use std::sync::Arc;
use std::time::Duration;
use tracing::Instrument;
use uuid::Uuid;

use crate::blockchain::{format_units, BlockchainError, ConfirmationStatus, WalletGateway};
use crate::config::ConfirmationMode;
use crate::observability::metrics;
use crate::ui::NotificationPanel;
use crate::withdraw::types::{
    TokenBalance, TokenRow, TokenSpec, WithdrawError, WithdrawOutcome, WithdrawView,
};

pub const WITHDRAW_SUCCESS: &str = "Withdraw successful!";

/// Marks a token as in flight until dropped.
struct InFlightGuard {
    set: Arc<DashSet<String>>,
    symbol: String,
}

impl InFlightGuard {
    fn acquire(set: &Arc<DashSet<String>>, symbol: &str) -> Option<Self> {
        if set.insert(symbol.to_string()) {
            Some(Self {
                set: set.clone(),
                symbol: symbol.to_string(),
            })
        } else {
            None
        }
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.set.remove(&self.symbol);
    }
}

/// A withdraw that passed its checks and holds the token's control.
pub struct PendingWithdraw {
    token: TokenSpec,
    profile: Address,
    _guard: InFlightGuard,
}

impl PendingWithdraw {
    pub fn symbol(&self) -> &str {
        &self.token.symbol
    }
}

/// Shared state of the withdraw page.
pub struct WithdrawPage {
    tokens: Vec<TokenSpec>,
    gateway: Arc<dyn WalletGateway>,
    mode: ConfirmationMode,
    profile_addr: ArcSwapOption<Address>,
    balances: DashMap<String, TokenBalance>,
    in_flight: Arc<DashSet<String>>,
    success: NotificationPanel,
    error: NotificationPanel,
}

impl WithdrawPage {
    pub fn new(
        tokens: Vec<TokenSpec>,
        gateway: Arc<dyn WalletGateway>,
        mode: ConfirmationMode,
        notification_ttl: Duration,
    ) -> Self {
        Self {
            tokens,
            gateway,
            mode,
            profile_addr: ArcSwapOption::empty(),
            balances: DashMap::new(),
            in_flight: Arc::new(DashSet::new()),
            success: NotificationPanel::new(notification_ttl),
            error: NotificationPanel::new(notification_ttl),
        }
    }

    pub fn with_profile_addr(self, profile_addr: Option<Address>) -> Self {
        self.profile_addr.store(profile_addr.map(Arc::new));
        self
    }

    pub fn profile_addr(&self) -> Option<Address> {
        self.profile_addr.load().as_deref().copied()
    }

    /// Switch the session to another profile contract.
    ///
    /// Balances shown for the previous contract are discarded.
    pub fn set_profile_addr(&self, profile_addr: Option<Address>) {
        self.profile_addr.store(profile_addr.map(Arc::new));
        self.balances.clear();
        tracing::info!(profile_addr = ?profile_addr, "Session profile contract changed");
    }

    pub fn gateway(&self) -> &Arc<dyn WalletGateway> {
        &self.gateway
    }

    pub fn tokens(&self) -> &[TokenSpec] {
        &self.tokens
    }

    fn token(&self, symbol: &str) -> Option<&TokenSpec> {
        self.tokens
            .iter()
            .find(|t| t.symbol.eq_ignore_ascii_case(symbol))
    }

    /// A profile contract is known and a wallet is connected.
    pub fn can_withdraw(&self) -> bool {
        self.profile_addr().is_some() && self.gateway.connected_account().is_some()
    }

    pub fn is_withdrawing(&self, symbol: &str) -> bool {
        self.in_flight.contains(symbol)
    }

    pub fn balance(&self, symbol: &str) -> Option<TokenBalance> {
        self.balances.get(symbol).map(|b| b.value().clone())
    }

    /// Re-read every token balance of the profile contract.
    ///
    /// Displayed balances change only when all reads succeed.
    pub async fn fetch_balances(&self) -> Result<(), WithdrawError> {
        let profile = self.profile_addr().ok_or(WithdrawError::NoProfile)?;

        let reads = self.tokens.iter().map(|token| async move {
            let raw = self.gateway.balance_of(profile, token.asset).await?;
            let formatted = format_units(raw, token.decimals)?;
            Ok::<_, BlockchainError>((token.symbol.clone(), TokenBalance { raw, formatted }))
        });

        match try_join_all(reads).await {
            Ok(fresh) => {
                if self.profile_addr() != Some(profile) {
                    tracing::debug!(profile = %profile, "Discarding balances for a stale profile");
                    return Ok(());
                }
                for (symbol, balance) in fresh {
                    self.balances.insert(symbol, balance);
                }
                metrics::record_balance_fetch("ok");
                tracing::debug!(profile = %profile, "Balances refreshed");
                Ok(())
            }
            Err(e) => {
                metrics::record_balance_fetch("error");
                tracing::warn!(profile = %profile, error = %e, "Balance fetch failed");
                self.error.show(format!("Unable to fetch balances! - {}", e));
                Err(e.into())
            }
        }
    }

    /// Check preconditions and take the token's control.
    pub fn start(&self, symbol: &str) -> Result<PendingWithdraw, WithdrawError> {
        let token = self
            .token(symbol)
            .ok_or_else(|| WithdrawError::UnknownToken(symbol.to_string()))?
            .clone();

        let profile = match (self.profile_addr(), self.gateway.connected_account()) {
            (Some(profile), Some(_)) => profile,
            _ => return Err(WithdrawError::NotConnected),
        };

        let guard = InFlightGuard::acquire(&self.in_flight, &token.symbol)
            .ok_or_else(|| WithdrawError::InProgress(token.symbol.clone()))?;

        Ok(PendingWithdraw {
            token,
            profile,
            _guard: guard,
        })
    }

    /// Submit the withdraw, wait for it, and update balances / notifications.
    pub async fn finish(&self, pending: PendingWithdraw) -> WithdrawOutcome {
        let span = tracing::info_span!(
            "withdraw",
            token = %pending.token.symbol,
            profile = %pending.profile,
            attempt = %Uuid::new_v4(),
        );

        async move {
            tracing::info!("Withdraw started");
            let result = self
                .gateway
                .withdraw(pending.profile, pending.token.asset, self.mode)
                .await;

            let outcome = match result {
                Ok(ConfirmationStatus::Confirmed { block_number }) => {
                    // A failed refresh shows its own error; the withdraw still succeeded.
                    let _ = self.fetch_balances().await;
                    self.success.show(WITHDRAW_SUCCESS);
                    tracing::info!(block_number, "Withdraw confirmed");
                    WithdrawOutcome::Confirmed { block_number }
                }
                Ok(ConfirmationStatus::Failed(reason)) => self.fail(reason),
                Err(e) => self.fail(e.to_string()),
            };

            let label = match &outcome {
                WithdrawOutcome::Confirmed { .. } => "confirmed",
                WithdrawOutcome::Failed { .. } => "failed",
            };
            metrics::record_withdrawal(&pending.token.symbol, label);

            // Dropping `pending` releases the control.
            drop(pending);
            outcome
        }
        .instrument(span)
        .await
    }

    fn fail(&self, reason: String) -> WithdrawOutcome {
        tracing::warn!(reason = %reason, "Withdraw failed");
        self.error.show(format!("Error withdrawing tokens: {}", reason));
        WithdrawOutcome::Failed { reason }
    }

    /// Run a complete withdraw for `symbol`.
    pub async fn withdraw(&self, symbol: &str) -> Result<WithdrawOutcome, WithdrawError> {
        let pending = self.start(symbol)?;
        Ok(self.finish(pending).await)
    }

    pub fn success_message(&self) -> Option<String> {
        self.success.current()
    }

    pub fn error_message(&self) -> Option<String> {
        self.error.current()
    }

    /// Snapshot for rendering.
    pub fn view(&self) -> WithdrawView {
        let can_withdraw = self.can_withdraw();
        let tokens = self
            .tokens
            .iter()
            .map(|token| {
                let withdrawing = self.is_withdrawing(&token.symbol);
                TokenRow {
                    symbol: token.symbol.clone(),
                    name: token.name.clone(),
                    balance: self.balance(&token.symbol).map(|b| b.formatted),
                    withdrawing,
                    can_withdraw: can_withdraw && !withdrawing,
                }
            })
            .collect();

        WithdrawView {
            profile_addr: self.profile_addr().map(|a| a.to_string()),
            wallet: self.gateway.connected_account().map(|a| a.to_string()),
            can_withdraw,
            tokens,
            success: self.success_message(),
            error: self.error_message(),
        }
    }
}

impl std::fmt::Debug for WithdrawPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WithdrawPage")
            .field("tokens", &self.tokens.len())
            .field("mode", &self.mode)
            .field("profile_addr", &self.profile_addr())
            .finish()
    }
}
