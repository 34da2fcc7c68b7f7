//! Red packet contract ABI definitions
//!
//! Uses alloy's sol! macro to generate type-safe bindings for the red packet
//! contract and the ERC20 metadata calls needed to describe packet tokens.

#![allow(clippy::too_many_arguments)]

use alloy::sol;

sol! {
    /// Red packet contract interface (client-facing subset)
    #[sol(rpc)]
    contract RedPacket {
        // ========================================================================
        // Packet Lifecycle
        // ========================================================================

        /// Create a packet of `count` shares funded with `total_balance` of `token`.
        /// The prepaid fee is sent as the call value.
        function create(address token, uint256 count, uint256 total_balance) external payable;

        /// Pay out `balances[i]` to `luck_accounts[i]` from packet `id`
        function open(uint256 id, address[] luck_accounts, uint256[] balances) external;

        /// Close packet `id` and refund the remainder to its creator
        function close(uint256 id, address maybe_creator) external;

        // ========================================================================
        // Views
        // ========================================================================

        function base_prepaid_fee() external view returns (uint256);

        function calc_prepaid_fee(uint256 count) external view returns (uint256);

        function next_id() external view returns (uint256);

        function max_count() external view returns (uint256);

        function is_valid(uint256 id) external view returns (bool);

        function red_envelop_infos(uint256 id) external view returns (address token, uint256 remain_count, uint256 remain_balance);

        // ========================================================================
        // Events
        // ========================================================================

        event NewRedEnvelop(uint256 _id, address _token, uint256 _count, uint256 _balance);

        event UpdateRedEnvelop(uint256 _id, uint256 _remain_count, uint256 _remain_balance);
    }
}

sol! {
    /// ERC20 metadata interface
    #[sol(rpc)]
    contract ERC20 {
        function name() external view returns (string);
        function symbol() external view returns (string);
        function decimals() external view returns (uint8);
    }
}
