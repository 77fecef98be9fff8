//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Environment Variables (private key) + BlockchainConfig (RPC URLs)
//!     → wallet.rs (key loading, the "connected wallet")
//!     → client.rs (RPC connection with timeouts and failover)
//!     → gateway.rs (balances, withdraw submission)
//!     → transaction.rs (receipt or event confirmation)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts
//! - Graceful degradation when blockchain unreachable

pub mod client;
pub mod contracts;
pub mod gateway;
pub mod transaction;
pub mod types;
pub mod units;
pub mod wallet;

pub use client::BlockchainClient;
pub use gateway::{ChainGateway, WalletGateway};
pub use types::{
    Asset, BlockchainConfig, BlockchainError, BlockchainResult, ChainId, ConfirmationStatus,
};
pub use units::format_units;
pub use wallet::Wallet;
