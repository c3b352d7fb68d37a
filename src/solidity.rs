//! Definitions of Solidity functions called during deployment

use alloy::sol;

sol! {
    /// The strategy methods configured after deployment; both are
    /// idempotent on-chain setters
    #[sol(rpc)]
    interface IStrategy {
        function setPendingRewardsFunctionName(string calldata _pendingRewardsFunctionName) external;
        function setCallFee(uint256 _fee) external;
    }
}
