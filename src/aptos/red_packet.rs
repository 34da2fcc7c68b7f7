//! Aptos red packet adapter
//!
//! Actions become `red_packet` entry function payloads. The platform fee rate
//! lives in an on-chain resource and is re-read for every call:
//!
//! - legacy deployments keep one `RedPackets` resource with a global `config.fee_point`
//! - handler deployments keep a `GlobalConfig` resource with one handler per
//!   coin type; entry functions take the coin type as a type argument and the
//!   handler index as their first argument

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::account::Account;
use crate::action::{parse_amount_u64, PacketId, RedPacketAction, RedPacketMethod};
use crate::aptos::abi::{MoveValue, RedPacketAbi, MODULE_NAME};
use crate::aptos::chain::{AptosChain, AptosTransaction, ENTRY_FUNCTION_PAYLOAD, USER_TRANSACTION};
use crate::config::{AptosContractConfig, AptosSchema};
use crate::contract::RedPacketContract;
use crate::error::{RedPacketError, Result};
use crate::fee::calc_total;
use crate::move_types::{AccountAddress, StructTag, TypeTag};
use crate::types::{json_u64, ChainType, RedPacketDetail, TransactionDetail, TransactionStatus};

pub const APTOS_COIN_TYPE: &str = "0x1::aptos_coin::AptosCoin";
pub const APTOS_COIN_NAME: &str = "Aptos Coin";
pub const APTOS_COIN_DECIMALS: i16 = 8;

const RED_PACKET_EVENT: &str = "RedPacketEvent";
const CREATE_EVENT_TYPE: u64 = 0;

/// Fee configuration for one coin type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenHandler {
    /// Position in `GlobalConfig.handlers`; `None` for legacy deployments
    pub handler_index: Option<u64>,
    pub fee_point: u64,
}

/// Red packet module deployed on Aptos
pub struct AptosRedPacketContract {
    chain: Arc<dyn AptosChain>,
    address: String,
    module_address: AccountAddress,
    schema: AptosSchema,
    abi: RedPacketAbi,
}

impl AptosRedPacketContract {
    pub fn new(
        chain: Arc<dyn AptosChain>,
        contract_address: &str,
        config: &AptosContractConfig,
    ) -> Result<Self> {
        let module_address = AccountAddress::from_hex_literal(contract_address)?;
        let address = format!("0x{}", contract_address.trim_start_matches("0x"));
        Ok(Self {
            chain,
            address,
            module_address,
            schema: config.schema,
            abi: RedPacketAbi::new(module_address, config.schema),
        })
    }

    pub fn schema(&self) -> AptosSchema {
        self.schema
    }

    fn resource_type(&self, name: &str) -> String {
        format!("{}::{}::{}", self.address, MODULE_NAME, name)
    }

    async fn read_resource(&self, name: &str) -> Result<Value> {
        let resource_type = self.resource_type(name);
        self.chain
            .get_account_resource(&self.address, &resource_type)
            .await?
            .ok_or_else(|| RedPacketError::data(format!("resource {} not found", resource_type)))
    }

    /// Resolve the fee point (and handler index) that applies to `token_address`
    pub async fn get_token_handler(&self, token_address: &str) -> Result<TokenHandler> {
        let handler = match self.schema {
            AptosSchema::Legacy => {
                let data = self.read_resource("RedPackets").await?;
                TokenHandler {
                    handler_index: None,
                    fee_point: read_fee_point(&data)?,
                }
            }
            AptosSchema::Handler => {
                let data = self.read_resource("GlobalConfig").await?;
                let handlers = data
                    .get("handlers")
                    .and_then(Value::as_array)
                    .ok_or_else(|| RedPacketError::data("GlobalConfig.handlers is not an array"))?;
                let handler = handlers
                    .iter()
                    .find(|h| {
                        h.get("coin_type")
                            .and_then(Value::as_str)
                            .is_some_and(|coin_type| same_coin_type(coin_type, token_address))
                    })
                    .ok_or_else(|| {
                        RedPacketError::data(format!("no red packet handler for {}", token_address))
                    })?;
                let handler_index = handler
                    .get("handler_index")
                    .and_then(json_u64)
                    .ok_or_else(|| {
                        RedPacketError::data(format!("handler for {} has no handler_index", token_address))
                    })?;
                TokenHandler {
                    handler_index: Some(handler_index),
                    fee_point: read_fee_point(handler)?,
                }
            }
        };
        debug!(
            token = %token_address,
            fee_point = handler.fee_point,
            handler_index = ?handler.handler_index,
            "Resolved Aptos red packet handler"
        );
        Ok(handler)
    }

    /// Canonical BCS `TransactionPayload` for `action`
    pub async fn create_payload(&self, action: &RedPacketAction) -> Result<Vec<u8>> {
        let token_address = action.token_address();
        let handler = match (self.schema, action.method()) {
            (AptosSchema::Legacy, RedPacketMethod::Create) | (AptosSchema::Handler, _) => {
                Some(self.get_token_handler(token_address).await?)
            }
            (AptosSchema::Legacy, _) => None,
        };

        let mut args = Vec::new();
        if let Some(index) = handler.and_then(|h| h.handler_index) {
            args.push(MoveValue::U64(index));
        }
        let ty_args = match self.schema {
            AptosSchema::Legacy => Vec::new(),
            AptosSchema::Handler => vec![token_address.parse::<TypeTag>()?],
        };

        let abi = match action {
            RedPacketAction::Create(p) => {
                let amount = parse_amount_u64(&p.amount)?;
                let fee_point = handler.map(|h| h.fee_point).unwrap_or_default();
                args.push(MoveValue::U64(p.count));
                args.push(MoveValue::U64(calc_total(amount, fee_point)));
                &self.abi.create
            }
            RedPacketAction::Open(p) => {
                let lucky_accounts = p
                    .addresses
                    .iter()
                    .map(|a| {
                        AccountAddress::from_hex_literal(a)
                            .map_err(|_| RedPacketError::OpenAmounts(format!("invalid address {}", a)))
                    })
                    .collect::<Result<Vec<_>>>()?;
                let balances = p
                    .amounts
                    .iter()
                    .map(|a| parse_amount_u64(a))
                    .collect::<Result<Vec<_>>>()?;
                args.push(MoveValue::U64(numeric_packet_id(&p.packet_id)?));
                args.push(MoveValue::VectorAddress(lucky_accounts));
                args.push(MoveValue::VectorU64(balances));
                &self.abi.open
            }
            RedPacketAction::Close(p) => {
                args.push(MoveValue::U64(numeric_packet_id(&p.packet_id)?));
                &self.abi.close
            }
        };

        abi.encode(ty_args, &args)?.payload_bytes()
    }

    fn amount_argument_index(&self) -> usize {
        match self.schema {
            AptosSchema::Legacy => 1,
            AptosSchema::Handler => 2,
        }
    }

    fn is_red_packet_event(&self, event_type: &str) -> bool {
        event_type
            .parse::<StructTag>()
            .is_ok_and(|tag| tag.is(&self.module_address, MODULE_NAME, RED_PACKET_EVENT))
    }
}

#[async_trait]
impl RedPacketContract for AptosRedPacketContract {
    fn chain_type(&self) -> ChainType {
        ChainType::Aptos
    }

    fn address(&self) -> &str {
        &self.address
    }

    async fn send_transaction(
        &self,
        account: &dyn Account,
        action: &RedPacketAction,
    ) -> Result<String> {
        let payload = self.create_payload(action).await?;
        Ok(self.chain.submit_payload(account, &payload).await?)
    }

    async fn fetch_red_packet_creation_detail(&self, hash: &str) -> Result<RedPacketDetail> {
        let tx = self
            .chain
            .get_transaction_by_hash(hash)
            .await?
            .ok_or_else(|| RedPacketError::data(format!("transaction {} not found", hash)))?;
        let mut detail = to_base_detail(&tx)?;

        let arguments = tx.payload.as_ref().map(|p| p.arguments.as_slice()).unwrap_or_default();
        let index = self.amount_argument_index();
        let amount = arguments.get(index).ok_or_else(|| {
            RedPacketError::data(format!(
                "invalid payload arguments, expected at least {}, found {}",
                index + 1,
                arguments.len()
            ))
        })?;
        detail.transaction.amount = match amount {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            other => {
                return Err(RedPacketError::data(format!(
                    "payload amount argument is not a string: {}",
                    other
                )))
            }
        };

        match self.schema {
            AptosSchema::Legacy => {
                detail.amount_name = APTOS_COIN_NAME.to_string();
                detail.amount_decimal = APTOS_COIN_DECIMALS;
            }
            AptosSchema::Handler => {
                let coin_type = tx
                    .payload
                    .as_ref()
                    .and_then(|p| p.type_arguments.first())
                    .ok_or_else(|| RedPacketError::data("create payload has no coin type argument"))?;
                let info = self.chain.coin_info(coin_type).await?;
                detail.amount_name = info.name;
                detail.amount_decimal = info.decimals as i16;
            }
        }

        detail.red_packet_amount = "0".to_string();
        for event in tx.events.iter().filter(|e| self.is_red_packet_event(&e.event_type)) {
            let data = event
                .data
                .as_object()
                .ok_or_else(|| RedPacketError::data("red packet event data is not an object"))?;
            let event_type = data
                .get("event_type")
                .and_then(json_u64)
                .ok_or_else(|| RedPacketError::data("red packet event_type is not an integer"))?;
            if event_type != CREATE_EVENT_TYPE {
                return Err(RedPacketError::data(format!(
                    "not a create event, event_type {}",
                    event_type
                )));
            }
            detail.red_packet_amount = data
                .get("remain_balance")
                .and_then(Value::as_str)
                .ok_or_else(|| RedPacketError::data("red packet remain_balance is not a string"))?
                .to_string();
            break;
        }

        Ok(detail)
    }

    async fn estimate_fee(&self, action: &RedPacketAction) -> Result<String> {
        match action {
            RedPacketAction::Create(p) => {
                let amount = parse_amount_u64(&p.amount)?;
                let handler = self.get_token_handler(&p.token_address).await?;
                let total = calc_total(amount, handler.fee_point);
                Ok((total - amount).to_string())
            }
            other => Err(RedPacketError::UnsupportedMethod(other.method())),
        }
    }

    async fn estimate_gas_fee(
        &self,
        account: &dyn Account,
        action: &RedPacketAction,
    ) -> Result<String> {
        let payload = self.create_payload(action).await?;
        let fee = self.chain.estimate_payload_gas_fee(account, &payload).await?;
        Ok(fee.to_string())
    }
}

fn read_fee_point(record: &Value) -> Result<u64> {
    record
        .get("config")
        .and_then(|c| c.get("fee_point"))
        .and_then(json_u64)
        .ok_or_else(|| RedPacketError::data("config.fee_point is missing or not an integer"))
}

fn same_coin_type(a: &str, b: &str) -> bool {
    match (a.parse::<StructTag>(), b.parse::<StructTag>()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

fn numeric_packet_id(id: &PacketId) -> Result<u64> {
    match id {
        PacketId::Numeric(id) => Ok(*id),
        PacketId::Object(object) => Err(RedPacketError::InvalidPacketId(format!(
            "Aptos packets are numeric, got object {}",
            object
        ))),
    }
}

/// Common transaction fields; rejects anything but entry function user transactions
fn to_base_detail(tx: &AptosTransaction) -> Result<RedPacketDetail> {
    let payload = match &tx.payload {
        Some(p) if tx.tx_type == USER_TRANSACTION && p.payload_type == ENTRY_FUNCTION_PAYLOAD => p,
        _ => {
            return Err(RedPacketError::data(format!(
                "transaction {} is not an entry function user transaction",
                tx.hash
            )))
        }
    };

    let gas_fee = tx.gas_unit_price as u128 * tx.gas_used as u128;
    let transaction = TransactionDetail {
        hash_string: tx.hash.clone(),
        from_address: tx.sender.clone(),
        to_address: payload.function.split("::").next().unwrap_or_default().to_string(),
        estimate_fees: gas_fee.to_string(),
        finish_timestamp: (tx.timestamp / 1_000_000) as i64,
        status: TransactionStatus::from_success(tx.success),
        failure_message: if tx.success {
            String::new()
        } else {
            tx.vm_status.clone()
        },
        ..Default::default()
    };

    Ok(RedPacketDetail {
        transaction,
        chain_name: ChainType::Aptos.as_str().to_string(),
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aptos::chain::{AptosEvent, AptosPayload, CoinInfo};
    use crate::testing::{MockAccount, MockAptosChain};
    use serde_json::json;

    const CONTRACT: &str = "0xb39c45e31d1429218aeb3590e2a046edae9303fbbc3ef6a065384569cfd81881";
    const USDC: &str = "0xf22bede237a07e121b56d91a491eb7bcdfd1f5907926a9e58338f964a01b17fa::asset::USDC";

    fn contract(chain: Arc<MockAptosChain>, schema: AptosSchema) -> AptosRedPacketContract {
        AptosRedPacketContract::new(chain, CONTRACT, &AptosContractConfig { schema }).unwrap()
    }

    fn legacy_chain(fee_point: Value) -> MockAptosChain {
        let mut chain = MockAptosChain::default();
        chain.resources.insert(
            format!("{}::red_packet::RedPackets", CONTRACT),
            json!({"config": {"fee_point": fee_point}, "next_id": "3"}),
        );
        chain
    }

    fn handler_chain() -> MockAptosChain {
        let mut chain = MockAptosChain::default();
        chain.resources.insert(
            format!("{}::red_packet::GlobalConfig", CONTRACT),
            json!({
                "handlers": [
                    {"coin_type": APTOS_COIN_TYPE, "handler_index": "0", "config": {"fee_point": "250"}},
                    {"coin_type": USDC, "handler_index": "1", "config": {"fee_point": 100}}
                ]
            }),
        );
        chain
    }

    fn create_transaction(arguments: Vec<Value>, type_arguments: Vec<String>, events: Vec<AptosEvent>) -> AptosTransaction {
        AptosTransaction {
            tx_type: USER_TRANSACTION.to_string(),
            hash: "0xhash".to_string(),
            sender: "0xsender".to_string(),
            gas_unit_price: 100,
            gas_used: 523,
            success: true,
            vm_status: "Executed successfully".to_string(),
            timestamp: 1_700_000_000_654_321,
            payload: Some(AptosPayload {
                payload_type: ENTRY_FUNCTION_PAYLOAD.to_string(),
                function: format!("{}::red_packet::create", CONTRACT),
                type_arguments,
                arguments,
            }),
            events,
        }
    }

    fn create_event(event_type: Value, remain_balance: &str) -> AptosEvent {
        AptosEvent {
            event_type: format!("{}::red_packet::RedPacketEvent", CONTRACT),
            data: json!({"event_type": event_type, "remain_balance": remain_balance}),
        }
    }

    #[tokio::test]
    async fn test_legacy_estimate_fee() {
        let contract = contract(Arc::new(legacy_chain(json!(250))), AptosSchema::Legacy);
        let action = RedPacketAction::create(APTOS_COIN_TYPE, 5, "1000000").unwrap();
        assert_eq!(contract.estimate_fee(&action).await.unwrap(), "25500");
    }

    #[tokio::test]
    async fn test_estimate_fee_rejects_non_create() {
        let contract = contract(Arc::new(legacy_chain(json!(250))), AptosSchema::Legacy);
        let action = RedPacketAction::close(APTOS_COIN_TYPE, 1, "0x1");
        let err = contract.estimate_fee(&action).await.unwrap_err();
        assert!(matches!(err, RedPacketError::UnsupportedMethod(RedPacketMethod::Close)));
    }

    #[tokio::test]
    async fn test_handler_lookup() {
        let contract = contract(Arc::new(handler_chain()), AptosSchema::Handler);
        let handler = contract.get_token_handler(USDC).await.unwrap();
        assert_eq!(handler, TokenHandler { handler_index: Some(1), fee_point: 100 });

        // short and long address forms name the same coin
        let native = contract
            .get_token_handler("0x0000000000000000000000000000000000000000000000000000000000000001::aptos_coin::AptosCoin")
            .await
            .unwrap();
        assert_eq!(native.handler_index, Some(0));
    }

    #[tokio::test]
    async fn test_missing_handler_is_data_error() {
        let contract = contract(Arc::new(handler_chain()), AptosSchema::Handler);
        let err = contract.get_token_handler("0x1::fake::Coin").await.unwrap_err();
        assert!(err.is_data_error());

        let empty = contract_with_empty_chain(AptosSchema::Legacy);
        let err = empty.get_token_handler(APTOS_COIN_TYPE).await.unwrap_err();
        assert!(err.is_data_error());
    }

    fn contract_with_empty_chain(schema: AptosSchema) -> AptosRedPacketContract {
        contract(Arc::new(MockAptosChain::default()), schema)
    }

    #[tokio::test]
    async fn test_legacy_create_payload() {
        let contract = contract(Arc::new(legacy_chain(json!(250))), AptosSchema::Legacy);
        let action = RedPacketAction::create(APTOS_COIN_TYPE, 5, "10000").unwrap();
        let payload = contract.create_payload(&action).await.unwrap();

        let expected = contract
            .abi
            .create
            .encode(vec![], &[MoveValue::U64(5), MoveValue::U64(10_250)])
            .unwrap()
            .payload_bytes()
            .unwrap();
        assert_eq!(payload, expected);
    }

    #[tokio::test]
    async fn test_handler_create_payload() {
        let contract = contract(Arc::new(handler_chain()), AptosSchema::Handler);
        let action = RedPacketAction::create(USDC, 2, "1000000").unwrap();
        let payload = contract.create_payload(&action).await.unwrap();

        let expected = contract
            .abi
            .create
            .encode(
                vec![USDC.parse().unwrap()],
                &[
                    MoveValue::U64(1),
                    MoveValue::U64(2),
                    MoveValue::U64(calc_total(1_000_000, 100)),
                ],
            )
            .unwrap()
            .payload_bytes()
            .unwrap();
        assert_eq!(payload, expected);
    }

    #[tokio::test]
    async fn test_open_payload_rejects_malformed_address() {
        let contract = contract(Arc::new(legacy_chain(json!(250))), AptosSchema::Legacy);
        let action = RedPacketAction::open(
            APTOS_COIN_TYPE,
            1,
            vec!["0x1".to_string(), "not-an-address".to_string()],
            vec!["10".to_string(), "20".to_string()],
        )
        .unwrap();
        let err = contract.create_payload(&action).await.unwrap_err();
        assert!(matches!(err, RedPacketError::OpenAmounts(ref m) if m.contains("not-an-address")));
    }

    #[tokio::test]
    async fn test_legacy_open_and_close_payloads() {
        // no resources registered: legacy open/close must not need them
        let contract = contract_with_empty_chain(AptosSchema::Legacy);
        let open = RedPacketAction::open(
            APTOS_COIN_TYPE,
            4,
            vec!["0x1".into(), "0xa11ce".into()],
            vec!["10".into(), "20".into()],
        )
        .unwrap();
        let expected = contract
            .abi
            .open
            .encode(
                vec![],
                &[
                    MoveValue::U64(4),
                    MoveValue::VectorAddress(vec![
                        AccountAddress::from_hex_literal("0x1").unwrap(),
                        AccountAddress::from_hex_literal("0xa11ce").unwrap(),
                    ]),
                    MoveValue::VectorU64(vec![10, 20]),
                ],
            )
            .unwrap()
            .payload_bytes()
            .unwrap();
        assert_eq!(contract.create_payload(&open).await.unwrap(), expected);

        let close = RedPacketAction::close(APTOS_COIN_TYPE, 4, "0x1");
        let expected = contract
            .abi
            .close
            .encode(vec![], &[MoveValue::U64(4)])
            .unwrap()
            .payload_bytes()
            .unwrap();
        assert_eq!(contract.create_payload(&close).await.unwrap(), expected);
    }

    #[tokio::test]
    async fn test_handler_open_and_close_payloads() {
        let contract = contract(Arc::new(handler_chain()), AptosSchema::Handler);
        let open = RedPacketAction::open(USDC, 9, vec!["0xa11ce".into()], vec!["500".into()]).unwrap();
        let expected = contract
            .abi
            .open
            .encode(
                vec![USDC.parse().unwrap()],
                &[
                    MoveValue::U64(1),
                    MoveValue::U64(9),
                    MoveValue::VectorAddress(vec![AccountAddress::from_hex_literal("0xa11ce").unwrap()]),
                    MoveValue::VectorU64(vec![500]),
                ],
            )
            .unwrap()
            .payload_bytes()
            .unwrap();
        assert_eq!(contract.create_payload(&open).await.unwrap(), expected);

        let close = RedPacketAction::close(USDC, 9, "0xa11ce");
        let expected = contract
            .abi
            .close
            .encode(vec![USDC.parse().unwrap()], &[MoveValue::U64(1), MoveValue::U64(9)])
            .unwrap()
            .payload_bytes()
            .unwrap();
        assert_eq!(contract.create_payload(&close).await.unwrap(), expected);
    }

    #[tokio::test]
    async fn test_handler_without_index_is_data_error() {
        let mut chain = MockAptosChain::default();
        chain.resources.insert(
            format!("{}::red_packet::GlobalConfig", CONTRACT),
            json!({"handlers": [{"coin_type": USDC, "config": {"fee_point": 100}}]}),
        );
        let contract = contract(Arc::new(chain), AptosSchema::Handler);
        let err = contract.get_token_handler(USDC).await.unwrap_err();
        assert!(matches!(err, RedPacketError::Data(ref m) if m.contains("handler_index")));
    }

    #[tokio::test]
    async fn test_send_and_estimate_gas() {
        let chain = Arc::new(legacy_chain(json!(250)));
        let contract = contract(chain.clone(), AptosSchema::Legacy);
        let account = MockAccount::new("0x1");
        let action = RedPacketAction::close(APTOS_COIN_TYPE, 4, "0x1");

        let hash = contract.send_transaction(&account, &action).await.unwrap();
        assert_eq!(hash, MockAptosChain::SUBMITTED_HASH);
        assert_eq!(chain.submitted.lock().unwrap().len(), 1);

        let fee = contract.estimate_gas_fee(&account, &action).await.unwrap();
        assert_eq!(fee, MockAptosChain::SIMULATED_FEE.to_string());
    }

    #[tokio::test]
    async fn test_fetch_legacy_creation_detail() {
        let mut chain = legacy_chain(json!(250));
        chain.transactions.insert(
            "0xhash".to_string(),
            create_transaction(
                vec![json!("5"), json!("10250")],
                vec![],
                vec![create_event(json!(0), "10000")],
            ),
        );
        let contract = contract(Arc::new(chain), AptosSchema::Legacy);

        let detail = contract.fetch_red_packet_creation_detail("0xhash").await.unwrap();
        assert_eq!(detail.transaction.amount, "10250");
        assert_eq!(detail.transaction.estimate_fees, "52300");
        assert_eq!(detail.transaction.to_address, CONTRACT);
        assert_eq!(detail.transaction.finish_timestamp, 1_700_000_000);
        assert_eq!(detail.red_packet_amount, "10000");
        assert_eq!(detail.amount_name, APTOS_COIN_NAME);
        assert_eq!(detail.amount_decimal, 8);
        assert_eq!(detail.chain_name, "aptos");
    }

    #[tokio::test]
    async fn test_fetch_handler_creation_detail() {
        let mut chain = handler_chain();
        chain.coin_infos.insert(
            USDC.to_string(),
            CoinInfo {
                name: "USD Coin".to_string(),
                decimals: 6,
            },
        );
        chain.transactions.insert(
            "0xhash".to_string(),
            create_transaction(
                vec![json!("1"), json!("2"), json!("1010000")],
                vec![USDC.to_string()],
                vec![create_event(json!("0"), "1000000")],
            ),
        );
        let contract = contract(Arc::new(chain), AptosSchema::Handler);

        let detail = contract.fetch_red_packet_creation_detail("0xhash").await.unwrap();
        assert_eq!(detail.transaction.amount, "1010000");
        assert_eq!(detail.red_packet_amount, "1000000");
        assert_eq!(detail.amount_name, "USD Coin");
        assert_eq!(detail.amount_decimal, 6);
    }

    #[tokio::test]
    async fn test_fetch_detail_data_errors() {
        let mut chain = legacy_chain(json!(250));
        chain.transactions.insert(
            "0xshort".to_string(),
            create_transaction(vec![json!("5")], vec![], vec![]),
        );
        chain.transactions.insert(
            "0xopen".to_string(),
            create_transaction(
                vec![json!("5"), json!("10250")],
                vec![],
                vec![create_event(json!(1), "0")],
            ),
        );
        let mut script = create_transaction(vec![], vec![], vec![]);
        script.tx_type = "genesis_transaction".to_string();
        chain.transactions.insert("0xgenesis".to_string(), script);
        let contract = contract(Arc::new(chain), AptosSchema::Legacy);

        for hash in ["0xshort", "0xopen", "0xgenesis", "0xmissing"] {
            let err = contract.fetch_red_packet_creation_detail(hash).await.unwrap_err();
            assert!(err.is_data_error(), "{} should be a data error, got {:?}", hash, err);
        }
    }

    #[tokio::test]
    async fn test_fetch_detail_without_event_reports_zero() {
        let mut chain = legacy_chain(json!(250));
        chain.transactions.insert(
            "0xhash".to_string(),
            create_transaction(vec![json!("5"), json!("10250")], vec![], vec![]),
        );
        let contract = contract(Arc::new(chain), AptosSchema::Legacy);
        let detail = contract.fetch_red_packet_creation_detail("0xhash").await.unwrap();
        assert_eq!(detail.red_packet_amount, "0");
    }
}
