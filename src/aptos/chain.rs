//! Aptos chain collaborator interface and REST response types

use async_trait::async_trait;
use eyre::Result;
use serde::Deserialize;
use serde_json::Value;

use crate::account::Account;
use crate::types::string_u64;

pub const USER_TRANSACTION: &str = "user_transaction";
pub const ENTRY_FUNCTION_PAYLOAD: &str = "entry_function_payload";

/// A transaction as returned by `GET /transactions/by_hash/{hash}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AptosTransaction {
    #[serde(rename = "type")]
    pub tx_type: String,
    pub hash: String,
    #[serde(default)]
    pub sender: String,
    #[serde(default, deserialize_with = "string_u64::deserialize")]
    pub gas_unit_price: u64,
    #[serde(default, deserialize_with = "string_u64::deserialize")]
    pub gas_used: u64,
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub vm_status: String,
    /// Microseconds since the Unix epoch
    #[serde(default, deserialize_with = "string_u64::deserialize")]
    pub timestamp: u64,
    #[serde(default)]
    pub payload: Option<AptosPayload>,
    #[serde(default)]
    pub events: Vec<AptosEvent>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AptosPayload {
    #[serde(rename = "type")]
    pub payload_type: String,
    #[serde(default)]
    pub function: String,
    #[serde(default)]
    pub type_arguments: Vec<String>,
    #[serde(default)]
    pub arguments: Vec<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AptosEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub data: Value,
}

/// `0x1::coin::CoinInfo` fields used to describe packet tokens
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CoinInfo {
    pub name: String,
    pub decimals: u8,
}

/// The subset of an Aptos node the red packet adapter needs
#[async_trait]
pub trait AptosChain: Send + Sync {
    /// `data` of the resource `resource_type` stored at `address`, `None` if absent
    async fn get_account_resource(&self, address: &str, resource_type: &str)
        -> Result<Option<Value>>;

    async fn get_transaction_by_hash(&self, hash: &str) -> Result<Option<AptosTransaction>>;

    async fn coin_info(&self, coin_type: &str) -> Result<CoinInfo>;

    /// Sign and submit a BCS `TransactionPayload`. Returns the transaction hash.
    async fn submit_payload(&self, account: &dyn Account, payload: &[u8]) -> Result<String>;

    /// Simulate a BCS `TransactionPayload` and return `gas_used * gas_unit_price`
    async fn estimate_payload_gas_fee(&self, account: &dyn Account, payload: &[u8])
        -> Result<u64>;
}
