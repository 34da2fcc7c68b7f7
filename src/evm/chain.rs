//! EVM chain collaborator interface

use alloy::{
    primitives::{Address, Bytes, U256},
    rpc::types::TransactionRequest,
};
use async_trait::async_trait;
use eyre::Result;

use crate::account::Account;
use crate::types::TransactionDetail;

/// A settled EVM transaction as seen by the red packet adapter
#[derive(Debug, Clone, Default)]
pub struct EvmTransactionRecord {
    /// Hash, addresses, status and timestamp. `amount` holds the call value.
    pub detail: TransactionDetail,
    /// Call data sent to the contract
    pub input: Bytes,
    /// Native value attached to the call
    pub value: U256,
    /// Gas actually paid (`gas_used * effective_gas_price`)
    pub network_fee: U256,
}

/// Token metadata used to decorate creation details
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenInfo {
    pub name: String,
    pub decimals: u8,
}

/// The subset of an EVM node the red packet adapter needs
#[async_trait]
pub trait EvmChain: Send + Sync {
    async fn suggest_gas_price(&self) -> Result<U256>;

    async fn estimate_gas_limit(&self, request: &TransactionRequest) -> Result<u64>;

    /// Build, sign with `account` and broadcast a contract call. Returns the tx hash.
    async fn submit_call(
        &self,
        account: &dyn Account,
        to: Address,
        data: Bytes,
        value: U256,
    ) -> Result<String>;

    async fn fetch_transaction(&self, hash: &str) -> Result<EvmTransactionRecord>;

    async fn token_info(&self, token: Address) -> Result<TokenInfo>;
}
