//! ABI bindings for the profile contract and ERC-20 tokens.

use alloy::sol;

sol! {
    /// Per-user profile contract holding withdrawable balances.
    #[derive(Debug)]
    interface ISourceCheckProfile {
        /// Emitted after the native balance is sent to the owner.
        event EvtNativeWithdraw(uint256 amount);

        /// Emitted after an ERC-20 balance is sent to the owner.
        event EvtWithdraw(address indexed token, uint256 amount);

        function nativeWithdraw() external;

        function withdraw(address token) external;
    }

    #[derive(Debug)]
    interface IERC20 {
        function balanceOf(address account) external view returns (uint256);
    }
}
