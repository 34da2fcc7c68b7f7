//! In-memory EVM chain

use std::sync::Mutex;

use alloy::primitives::{Address, Bytes, U256};
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;
use eyre::{eyre, Result};

use crate::account::{Account, SignPurpose};
use crate::evm::chain::{EvmChain, EvmTransactionRecord, TokenInfo};

/// Scripted [`EvmChain`]
///
/// `gas_limit: None` makes gas estimation fail and `record: None` makes
/// transaction lookups fail, so error paths can be driven from tests.
#[derive(Debug)]
pub struct MockEvmChain {
    pub gas_price: U256,
    pub gas_limit: Option<u64>,
    pub record: Option<EvmTransactionRecord>,
    pub token: TokenInfo,
    /// `(to, data, value)` of every submitted call
    pub submitted: Mutex<Vec<(Address, Bytes, U256)>>,
}

impl MockEvmChain {
    pub const SUBMITTED_HASH: &'static str =
        "0x00000000000000000000000000000000000000000000000000000000000000aa";
}

impl Default for MockEvmChain {
    fn default() -> Self {
        Self {
            gas_price: U256::from(1_000_000_000u64),
            gas_limit: Some(100_000),
            record: None,
            token: TokenInfo {
                name: "Mock Token".to_string(),
                decimals: 18,
            },
            submitted: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl EvmChain for MockEvmChain {
    async fn suggest_gas_price(&self) -> Result<U256> {
        Ok(self.gas_price)
    }

    async fn estimate_gas_limit(&self, _request: &TransactionRequest) -> Result<u64> {
        self.gas_limit
            .ok_or_else(|| eyre!("execution reverted: gas estimation failed"))
    }

    async fn submit_call(
        &self,
        account: &dyn Account,
        to: Address,
        data: Bytes,
        value: U256,
    ) -> Result<String> {
        account.sign(&data, SignPurpose::EvmTransaction)?;
        self.submitted
            .lock()
            .map_err(|_| eyre!("mock chain lock poisoned"))?
            .push((to, data, value));
        Ok(Self::SUBMITTED_HASH.to_string())
    }

    async fn fetch_transaction(&self, hash: &str) -> Result<EvmTransactionRecord> {
        self.record
            .clone()
            .ok_or_else(|| eyre!("transaction {} not found", hash))
    }

    async fn token_info(&self, _token: Address) -> Result<TokenInfo> {
        Ok(self.token.clone())
    }
}
