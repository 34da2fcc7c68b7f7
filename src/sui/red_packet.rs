//! Sui red packet adapter
//!
//! Actions become programmable transactions calling `<package>::red_packet`.
//! Creation has to name the coin objects it spends:
//!
//! - native SUI: the packet amount is split off the gas coin, so every
//!   selected SUI coin becomes gas payment and the budget is reserved on top
//! - other coins: payment coins are selected from the token's own objects and
//!   passed as a vector, and SUI coins are selected separately for gas
//!
//! Gas is estimated in two passes: a draft with a conservative budget is dry
//! run, then the transaction is rebuilt with the budget the dry run reported.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::account::Account;
use crate::action::{parse_amount_u64, PacketId, RedPacketAction};
use crate::config::SuiContractConfig;
use crate::contract::RedPacketContract;
use crate::error::{RedPacketError, Result};
use crate::fee::calc_total;
use crate::move_types::{AccountAddress, StructTag, TypeTag};
use crate::sui::chain::{SuiChain, SuiCoin, SuiOwner, SuiTransactionEffects, SUI_COIN_TYPE};
use crate::sui::coins::{select_coins, total_balance};
use crate::sui::transaction::{
    Argument, CallArg, Command, ObjectArg, ObjectId, ObjectRef, ProgrammableMoveCall,
    ProgrammableTransaction, TransactionData,
};
use crate::types::{json_u64, ChainType, RedPacketDetail, TransactionDetail, TransactionStatus};

pub const MODULE_NAME: &str = "red_packet";
pub const SUI_COIN_NAME: &str = "Sui";
pub const SUI_DECIMALS: i16 = 9;

const RED_PACKET_EVENT: &str = "RedPacketEvent";

fn sui_framework_address() -> AccountAddress {
    let mut bytes = [0u8; AccountAddress::LENGTH];
    bytes[AccountAddress::LENGTH - 1] = 2;
    AccountAddress(bytes)
}

/// True for `0x2::sui::SUI` in any address spelling
pub fn is_native_coin(tag: &TypeTag) -> bool {
    matches!(tag, TypeTag::Struct(s) if s.is(&sui_framework_address(), "sui", "SUI") && s.type_params.is_empty())
}

fn is_native_coin_type(coin_type: &str) -> bool {
    coin_type
        .parse::<TypeTag>()
        .is_ok_and(|tag| is_native_coin(&tag))
}

/// Move call inputs before gas is attached
struct PreparedCall {
    pt: ProgrammableTransaction,
    /// Native amount split off the gas coin by the transaction itself
    gas_coin_spend: u128,
}

/// Red packet package deployed on Sui
pub struct SuiRedPacketContract {
    chain: Arc<dyn SuiChain>,
    address: String,
    package_id: ObjectId,
    config_object_id: ObjectId,
    fee_point: u64,
    max_gas_budget: u64,
}

impl SuiRedPacketContract {
    pub fn new(
        chain: Arc<dyn SuiChain>,
        contract_address: &str,
        config: &SuiContractConfig,
    ) -> Result<Self> {
        let package_id = AccountAddress::from_hex_literal(contract_address)?;
        let config_object_id = AccountAddress::from_hex_literal(&config.config_object_id)?;
        Ok(Self {
            chain,
            address: format!("0x{}", contract_address.trim_start_matches("0x")),
            package_id,
            config_object_id,
            fee_point: config.fee_point,
            max_gas_budget: config.max_gas_budget,
        })
    }

    /// Input argument for an object: shared objects by initial version, others by reference
    async fn object_arg(&self, object_id: &ObjectId, mutable: bool) -> Result<ObjectArg> {
        let object = self.chain.get_object(&object_id.to_hex_literal()).await?;
        let arg = match object.owner {
            Some(SuiOwner::Shared {
                initial_shared_version,
            }) => ObjectArg::SharedObject {
                id: *object_id,
                initial_shared_version,
                mutable,
            },
            _ => ObjectArg::ImmOrOwnedObject(object.object_ref()?),
        };
        Ok(arg)
    }

    fn move_call(&self, function: &str, coin_type: TypeTag, arguments: Vec<Argument>) -> Command {
        Command::MoveCall(Box::new(ProgrammableMoveCall {
            package: self.package_id,
            module: MODULE_NAME.to_string(),
            function: function.to_string(),
            type_arguments: vec![coin_type],
            arguments,
        }))
    }

    async fn prepare_call(&self, owner: &str, action: &RedPacketAction) -> Result<PreparedCall> {
        let coin_type: TypeTag = action.token_address().parse()?;
        let mut pt = ProgrammableTransaction::default();

        let gas_coin_spend = match action {
            RedPacketAction::Create(p) => {
                let amount = parse_amount_u64(&p.amount)?;
                let total = calc_total(amount, self.fee_point);
                let coin_vec_type = TypeTag::Struct(Box::new(StructTag::new(
                    sui_framework_address(),
                    "coin",
                    "Coin",
                    vec![coin_type.clone()],
                )));

                let config = self.object_arg(&self.config_object_id, false).await?;
                let config = pt.input(CallArg::Object(config));

                let (coins, spend) = if is_native_coin(&coin_type) {
                    let count = pt.input(CallArg::pure(&p.count)?);
                    let total_arg = pt.input(CallArg::pure(&total)?);
                    let split = pt.command(Command::SplitCoins(Argument::GasCoin, vec![total_arg]));
                    let coins = pt.command(Command::MakeMoveVec(
                        Some(coin_vec_type),
                        vec![nested(split, 0)],
                    ));
                    (vec![config, coins, count, total_arg], total as u128)
                } else {
                    let owned = self.chain.get_all_coins(owner, &p.token_address).await?;
                    let selection = select_coins(&owned, total as u128, &p.token_address)?;
                    let mut elements = Vec::with_capacity(selection.coins.len());
                    for coin in &selection.coins {
                        let object = ObjectArg::ImmOrOwnedObject(coin.object_ref()?);
                        elements.push(pt.input(CallArg::Object(object)));
                    }
                    let count = pt.input(CallArg::pure(&p.count)?);
                    let total_arg = pt.input(CallArg::pure(&total)?);
                    let coins = pt.command(Command::MakeMoveVec(Some(coin_vec_type), elements));
                    (vec![config, coins, count, total_arg], 0)
                };

                debug!(amount = amount, total = total, fee_point = self.fee_point, "Prepared Sui create");
                pt.command(self.move_call("create", coin_type, coins));
                spend
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
                let packet_id = object_packet_id(&p.packet_id)?;

                let packet = self.object_arg(&packet_id, true).await?;
                let packet = pt.input(CallArg::Object(packet));
                let lucky_accounts = pt.input(CallArg::pure(&lucky_accounts)?);
                let balances = pt.input(CallArg::pure(&balances)?);
                pt.command(self.move_call("open", coin_type, vec![packet, lucky_accounts, balances]));
                0
            }
            RedPacketAction::Close(p) => {
                let packet_id = object_packet_id(&p.packet_id)?;
                let packet = self.object_arg(&packet_id, true).await?;
                let packet = pt.input(CallArg::Object(packet));
                pt.command(self.move_call("close", coin_type, vec![packet]));
                0
            }
        };

        Ok(PreparedCall { pt, gas_coin_spend })
    }

    /// Build the final transaction for `action` sent by `sender`, together with
    /// the dry-run effects used to size its gas budget
    pub async fn build_transaction(
        &self,
        sender: &str,
        action: &RedPacketAction,
    ) -> Result<(TransactionData, SuiTransactionEffects)> {
        let sender_address = AccountAddress::from_hex_literal(sender)?;
        let owner = sender_address.to_hex_literal();
        let call = self.prepare_call(&owner, action).await?;

        let (gas_price, gas_coins) = tokio::try_join!(
            self.chain.reference_gas_price(),
            self.chain.get_all_coins(&owner, SUI_COIN_TYPE)
        )?;

        let spend = call.gas_coin_spend;
        let available = total_balance(&gas_coins);
        if available <= spend {
            // gas needs at least one MIST beyond what the transaction spends
            return Err(RedPacketError::InsufficientBalance {
                coin_type: SUI_COIN_TYPE.to_string(),
                required: spend + 1,
                available,
            });
        }

        let draft_budget = (self.max_gas_budget as u128).min(available - spend) as u64;
        let (draft_payment, draft_covered) = gas_payment(&gas_coins, spend + draft_budget as u128)?;
        let draft = TransactionData::new_programmable(
            sender_address,
            draft_payment.clone(),
            call.pt.clone(),
            draft_budget,
            gas_price,
        );

        let effects = self.chain.dry_run_transaction(&draft.to_bytes()?).await?;
        if !effects.status.is_success() {
            return Err(RedPacketError::Rejected(effects.status.failure_message()));
        }

        // storage cost and rebate were measured with the draft gas coins, so they stay
        let budget = effects.gas_used.required_budget(gas_price);
        let payment = if draft_covered >= spend + budget as u128 {
            draft_payment
        } else {
            gas_payment(&gas_coins, spend + budget as u128)?.0
        };
        debug!(
            draft_budget = draft_budget,
            budget = budget,
            gas_price = gas_price,
            gas_coins = payment.len(),
            "Sized Sui gas budget"
        );

        let data = TransactionData::new_programmable(sender_address, payment, call.pt, budget, gas_price);
        Ok((data, effects))
    }

    async fn coin_metadata(&self, coin_type: &str) -> Result<(String, i16)> {
        let native = is_native_coin_type(coin_type);
        match self.chain.get_coin_metadata(coin_type).await {
            Ok(Some(metadata)) => Ok((metadata.name, metadata.decimals as i16)),
            Ok(None) if native => Ok((SUI_COIN_NAME.to_string(), SUI_DECIMALS)),
            Err(e) if native => {
                warn!(error = %e, "Coin metadata lookup failed, using native SUI metadata");
                Ok((SUI_COIN_NAME.to_string(), SUI_DECIMALS))
            }
            Ok(None) => Err(RedPacketError::data(format!("no coin metadata for {}", coin_type))),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl RedPacketContract for SuiRedPacketContract {
    fn chain_type(&self) -> ChainType {
        ChainType::Sui
    }

    fn address(&self) -> &str {
        &self.address
    }

    async fn send_transaction(
        &self,
        account: &dyn Account,
        action: &RedPacketAction,
    ) -> Result<String> {
        let (data, _) = self.build_transaction(&account.address(), action).await?;
        Ok(self.chain.submit_transaction(account, &data.to_bytes()?).await?)
    }

    async fn fetch_red_packet_creation_detail(&self, hash: &str) -> Result<RedPacketDetail> {
        let block = self.chain.get_transaction_block(hash).await?;
        let tx = block
            .transaction
            .as_ref()
            .ok_or_else(|| RedPacketError::data(format!("transaction {} has no input data", hash)))?;
        let programmable = &tx.data.transaction;

        let call = programmable
            .move_calls()
            .find(|call| call.module == MODULE_NAME)
            .ok_or_else(|| {
                RedPacketError::data(format!("transaction {} has no red packet move call", hash))
            })?;
        let coin_type = call.type_arguments.first().ok_or_else(|| {
            RedPacketError::data("red packet move call has no coin type argument")
        })?;

        // coin inputs precede the amount, so it is always the last input
        let amount = programmable
            .inputs
            .last()
            .and_then(|input| input.get("value"))
            .and_then(json_u64)
            .ok_or_else(|| RedPacketError::data("last transaction input is not a u64 amount"))?;

        let effects = block
            .effects
            .as_ref()
            .ok_or_else(|| RedPacketError::data(format!("transaction {} has no effects", hash)))?;

        let red_packet_amount = block
            .events
            .iter()
            .filter(|event| {
                event.event_type.parse::<StructTag>().is_ok_and(|tag| {
                    tag.module == MODULE_NAME && tag.name == RED_PACKET_EVENT
                })
            })
            .find_map(|event| event.parsed_json.get("remain_balance").and_then(json_u64))
            .ok_or_else(|| RedPacketError::data("RedPacketEvent with remain_balance not found"))?;

        let (amount_name, amount_decimal) = self.coin_metadata(coin_type).await?;

        let success = effects.status.is_success();
        Ok(RedPacketDetail {
            transaction: TransactionDetail {
                hash_string: block.digest.clone(),
                from_address: tx.data.sender.clone(),
                to_address: call.package.clone(),
                amount: amount.to_string(),
                estimate_fees: effects.gas_used.net_gas_fee().to_string(),
                finish_timestamp: block.timestamp_ms.map(|ms| (ms / 1000) as i64).unwrap_or_default(),
                status: TransactionStatus::from_success(success),
                failure_message: if success {
                    String::new()
                } else {
                    effects.status.failure_message()
                },
            },
            amount_name,
            amount_decimal,
            red_packet_amount: red_packet_amount.to_string(),
            chain_name: ChainType::Sui.as_str().to_string(),
        })
    }

    async fn estimate_fee(&self, action: &RedPacketAction) -> Result<String> {
        match action {
            RedPacketAction::Create(p) => {
                let amount = parse_amount_u64(&p.amount)?;
                Ok((calc_total(amount, self.fee_point) - amount).to_string())
            }
            other => Err(RedPacketError::UnsupportedMethod(other.method())),
        }
    }

    async fn estimate_gas_fee(
        &self,
        account: &dyn Account,
        action: &RedPacketAction,
    ) -> Result<String> {
        let (_, effects) = self.build_transaction(&account.address(), action).await?;
        Ok(effects.gas_used.net_gas_fee().to_string())
    }
}

fn nested(result: Argument, index: u16) -> Argument {
    match result {
        Argument::Result(command) => Argument::NestedResult(command, index),
        other => other,
    }
}

/// Gas payment covering `target`, with the balance it holds
fn gas_payment(coins: &[SuiCoin], target: u128) -> Result<(Vec<ObjectRef>, u128)> {
    let selection = select_coins(coins, target, SUI_COIN_TYPE)?;
    let payment = selection
        .coins
        .iter()
        .map(SuiCoin::object_ref)
        .collect::<Result<Vec<_>>>()?;
    Ok((payment, selection.total))
}

fn object_packet_id(id: &PacketId) -> Result<ObjectId> {
    match id {
        PacketId::Object(object) => AccountAddress::from_hex_literal(object)
            .map_err(|_| RedPacketError::InvalidPacketId(object.clone())),
        PacketId::Numeric(id) => Err(RedPacketError::InvalidPacketId(format!(
            "Sui packets are objects, got numeric id {}",
            id
        ))),
    }
}
