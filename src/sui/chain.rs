//! Sui chain collaborator interface and JSON-RPC response types

use async_trait::async_trait;
use eyre::Result;
use serde::Deserialize;
use serde_json::Value;

use crate::account::Account;
use crate::move_types::AccountAddress;
use crate::sui::transaction::{ObjectDigest, ObjectRef};
use crate::types::string_u64;

pub const SUI_COIN_TYPE: &str = "0x2::sui::SUI";

/// Gas units added on top of a dry-run estimate before it becomes a budget
pub const GAS_SAFE_OVERHEAD: u64 = 1_000;

/// A coin object as returned by `suix_getCoins`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiCoin {
    pub coin_type: String,
    pub coin_object_id: String,
    #[serde(deserialize_with = "string_u64::deserialize")]
    pub version: u64,
    pub digest: String,
    #[serde(deserialize_with = "string_u64::deserialize")]
    pub balance: u64,
}

impl SuiCoin {
    pub fn object_ref(&self) -> crate::error::Result<ObjectRef> {
        Ok(ObjectRef {
            object_id: AccountAddress::from_hex_literal(&self.coin_object_id)?,
            version: self.version,
            digest: ObjectDigest::from_base58(&self.digest)?,
        })
    }
}

/// One page of `suix_getCoins`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiCoinPage {
    pub data: Vec<SuiCoin>,
    #[serde(default)]
    pub next_cursor: Option<String>,
    #[serde(default)]
    pub has_next_page: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub enum SuiOwner {
    AddressOwner(String),
    ObjectOwner(String),
    Shared {
        #[serde(deserialize_with = "string_u64::deserialize")]
        initial_shared_version: u64,
    },
    Immutable,
}

/// `data` of a `sui_getObject` response with `showOwner`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiObjectInfo {
    pub object_id: String,
    #[serde(deserialize_with = "string_u64::deserialize")]
    pub version: u64,
    pub digest: String,
    #[serde(default)]
    pub owner: Option<SuiOwner>,
}

impl SuiObjectInfo {
    pub fn object_ref(&self) -> crate::error::Result<ObjectRef> {
        Ok(ObjectRef {
            object_id: AccountAddress::from_hex_literal(&self.object_id)?,
            version: self.version,
            digest: ObjectDigest::from_base58(&self.digest)?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GasCostSummary {
    #[serde(deserialize_with = "string_u64::deserialize")]
    pub computation_cost: u64,
    #[serde(deserialize_with = "string_u64::deserialize")]
    pub storage_cost: u64,
    #[serde(deserialize_with = "string_u64::deserialize")]
    pub storage_rebate: u64,
}

impl GasCostSummary {
    /// `computation + storage - rebate`; negative when the rebate dominates
    pub fn net_gas_fee(&self) -> i128 {
        self.computation_cost as i128 + self.storage_cost as i128 - self.storage_rebate as i128
    }

    /// Budget needed to execute at `gas_price`: the net fee, but never below
    /// the computation cost, both padded by [`GAS_SAFE_OVERHEAD`] units
    pub fn required_budget(&self, gas_price: u64) -> u64 {
        let computation = self
            .computation_cost
            .saturating_add(GAS_SAFE_OVERHEAD.saturating_mul(gas_price));
        let net = computation
            .saturating_add(self.storage_cost)
            .saturating_sub(self.storage_rebate);
        net.max(computation)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SuiExecutionStatus {
    pub status: String,
    #[serde(default)]
    pub error: Option<String>,
}

impl SuiExecutionStatus {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }

    /// Error reported by the node, falling back to the raw status
    pub fn failure_message(&self) -> String {
        self.error.clone().unwrap_or_else(|| self.status.clone())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiTransactionEffects {
    pub status: SuiExecutionStatus,
    pub gas_used: GasCostSummary,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub parsed_json: Value,
}

/// `transaction.data.transaction` of a programmable transaction block
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SuiProgrammableTransactionView {
    #[serde(default)]
    pub kind: String,
    /// `{"type": "pure", "value": ...}` or `{"type": "object", ...}`
    #[serde(default)]
    pub inputs: Vec<Value>,
    /// Externally tagged commands, e.g. `{"MoveCall": {...}}`
    #[serde(default)]
    pub transactions: Vec<Value>,
}

impl SuiProgrammableTransactionView {
    /// Every `MoveCall` command, in order
    pub fn move_calls(&self) -> impl Iterator<Item = SuiMoveCallView> + '_ {
        self.transactions
            .iter()
            .filter_map(|command| command.get("MoveCall"))
            .filter_map(|call| serde_json::from_value(call.clone()).ok())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SuiMoveCallView {
    pub package: String,
    pub module: String,
    pub function: String,
    #[serde(default)]
    pub type_arguments: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SuiTransactionDataView {
    pub sender: String,
    pub transaction: SuiProgrammableTransactionView,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SuiTransactionView {
    pub data: SuiTransactionDataView,
}

/// A `sui_getTransactionBlock` response with input, effects and events
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiTransactionBlock {
    pub digest: String,
    #[serde(default)]
    pub transaction: Option<SuiTransactionView>,
    #[serde(default)]
    pub effects: Option<SuiTransactionEffects>,
    #[serde(default)]
    pub events: Vec<SuiEvent>,
    #[serde(default, deserialize_with = "deserialize_optional_u64")]
    pub timestamp_ms: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SuiCoinMetadata {
    pub decimals: u8,
    pub name: String,
    #[serde(default)]
    pub symbol: String,
}

fn deserialize_optional_u64<'de, D>(deserializer: D) -> std::result::Result<Option<u64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(v) => crate::types::json_u64(&v)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("expected u64, got {}", v))),
    }
}

/// The subset of a Sui fullnode the red packet adapter needs
#[async_trait]
pub trait SuiChain: Send + Sync {
    /// Every coin of `coin_type` owned by `owner`, across all pages
    async fn get_all_coins(&self, owner: &str, coin_type: &str) -> Result<Vec<SuiCoin>>;

    async fn get_object(&self, object_id: &str) -> Result<SuiObjectInfo>;

    async fn reference_gas_price(&self) -> Result<u64>;

    /// Execute BCS `TransactionData` without committing it
    async fn dry_run_transaction(&self, tx_bytes: &[u8]) -> Result<SuiTransactionEffects>;

    /// Sign BCS `TransactionData` with `account` and execute it. Returns the digest.
    async fn submit_transaction(&self, account: &dyn Account, tx_bytes: &[u8]) -> Result<String>;

    async fn get_transaction_block(&self, digest: &str) -> Result<SuiTransactionBlock>;

    /// `None` when the coin type has no registered metadata
    async fn get_coin_metadata(&self, coin_type: &str) -> Result<Option<SuiCoinMetadata>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_gas_cost_summary() {
        let gas: GasCostSummary = serde_json::from_value(json!({
            "computationCost": "1000000",
            "storageCost": "2000000",
            "storageRebate": "500000",
            "nonRefundableStorageFee": "5000"
        }))
        .unwrap();
        assert_eq!(gas.net_gas_fee(), 2_500_000);
        assert_eq!(gas.required_budget(0), 2_500_000);
        assert_eq!(gas.required_budget(750), 3_250_000);

        let rebate_heavy = GasCostSummary {
            computation_cost: 1_000,
            storage_cost: 100,
            storage_rebate: 5_000,
        };
        assert_eq!(rebate_heavy.net_gas_fee(), -3_900);
        assert_eq!(rebate_heavy.required_budget(0), 1_000);
        assert_eq!(rebate_heavy.required_budget(2), 3_000);
    }

    #[test]
    fn test_deserialize_owner_variants() {
        let shared: SuiOwner =
            serde_json::from_value(json!({"Shared": {"initial_shared_version": 42}})).unwrap();
        assert_eq!(shared, SuiOwner::Shared { initial_shared_version: 42 });

        let immutable: SuiOwner = serde_json::from_value(json!("Immutable")).unwrap();
        assert_eq!(immutable, SuiOwner::Immutable);

        let owned: SuiOwner = serde_json::from_value(json!({"AddressOwner": "0x1"})).unwrap();
        assert_eq!(owned, SuiOwner::AddressOwner("0x1".to_string()));
    }

    #[test]
    fn test_deserialize_transaction_block() {
        let block: SuiTransactionBlock = serde_json::from_value(json!({
            "digest": "9XFD",
            "transaction": {
                "data": {
                    "sender": "0xa11ce",
                    "transaction": {
                        "kind": "ProgrammableTransaction",
                        "inputs": [
                            {"type": "object", "objectType": "sharedObject", "objectId": "0xc0"},
                            {"type": "pure", "valueType": "u64", "value": "2"},
                            {"type": "pure", "valueType": "u64", "value": "9000"}
                        ],
                        "transactions": [
                            {"SplitCoins": ["GasCoin", [{"Input": 2}]]},
                            {"MoveCall": {
                                "package": "0xfeed",
                                "module": "red_packet",
                                "function": "create",
                                "type_arguments": ["0x2::sui::SUI"],
                                "arguments": []
                            }}
                        ]
                    }
                }
            },
            "effects": {
                "status": {"status": "success"},
                "gasUsed": {"computationCost": "10", "storageCost": "20", "storageRebate": "5"}
            },
            "events": [{"type": "0xfeed::red_packet::RedPacketEvent", "parsedJson": {"remain_balance": "8775"}}],
            "timestampMs": "1700000000123"
        }))
        .unwrap();

        let tx = block.transaction.unwrap();
        let call = tx.data.transaction.move_calls().next().unwrap();
        assert_eq!(call.function, "create");
        assert_eq!(call.type_arguments, vec!["0x2::sui::SUI".to_string()]);
        assert!(block.effects.unwrap().status.is_success());
        assert_eq!(block.timestamp_ms, Some(1_700_000_000_123));
    }

    #[test]
    fn test_coin_object_ref() {
        let coin = SuiCoin {
            coin_type: SUI_COIN_TYPE.to_string(),
            coin_object_id: "0xc01".to_string(),
            version: 3,
            digest: bs58::encode([9u8; 32]).into_string(),
            balance: 5_000,
        };
        let object_ref = coin.object_ref().unwrap();
        assert_eq!(object_ref.version, 3);
        assert_eq!(object_ref.digest.0, [9u8; 32]);
    }
}
