//! Token balances and withdrawals from the user's profile contract.

pub mod page;
pub mod types;

pub use page::{PendingWithdraw, WithdrawPage, WITHDRAW_SUCCESS};
pub use types::{TokenBalance, TokenRow, TokenSpec, WithdrawError, WithdrawOutcome, WithdrawView};
