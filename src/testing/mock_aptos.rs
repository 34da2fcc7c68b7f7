//! In-memory Aptos node

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use eyre::{eyre, Result};
use serde_json::Value;

use crate::account::{Account, SignPurpose};
use crate::aptos::chain::{AptosChain, AptosTransaction, CoinInfo};

/// Scripted [`AptosChain`]; resources are keyed by resource type alone
#[derive(Debug, Default)]
pub struct MockAptosChain {
    pub resources: HashMap<String, Value>,
    pub transactions: HashMap<String, AptosTransaction>,
    pub coin_infos: HashMap<String, CoinInfo>,
    /// BCS payloads of every submitted transaction
    pub submitted: Mutex<Vec<Vec<u8>>>,
}

impl MockAptosChain {
    pub const SUBMITTED_HASH: &'static str =
        "0x00000000000000000000000000000000000000000000000000000000000000bb";
    pub const SIMULATED_FEE: u64 = 54_300;
}

#[async_trait]
impl AptosChain for MockAptosChain {
    async fn get_account_resource(
        &self,
        _address: &str,
        resource_type: &str,
    ) -> Result<Option<Value>> {
        Ok(self.resources.get(resource_type).cloned())
    }

    async fn get_transaction_by_hash(&self, hash: &str) -> Result<Option<AptosTransaction>> {
        Ok(self.transactions.get(hash).cloned())
    }

    async fn coin_info(&self, coin_type: &str) -> Result<CoinInfo> {
        self.coin_infos
            .get(coin_type)
            .cloned()
            .ok_or_else(|| eyre!("Coin info for {} not found", coin_type))
    }

    async fn submit_payload(&self, account: &dyn Account, payload: &[u8]) -> Result<String> {
        account.sign(payload, SignPurpose::AptosTransaction)?;
        self.submitted
            .lock()
            .map_err(|_| eyre!("mock chain lock poisoned"))?
            .push(payload.to_vec());
        Ok(Self::SUBMITTED_HASH.to_string())
    }

    async fn estimate_payload_gas_fee(
        &self,
        account: &dyn Account,
        payload: &[u8],
    ) -> Result<u64> {
        account.sign(payload, SignPurpose::AptosSimulation)?;
        Ok(Self::SIMULATED_FEE)
    }
}
