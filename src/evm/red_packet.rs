//! EVM red packet adapter
//!
//! Encodes actions as calls to the red packet contract. Creation pays a flat
//! prepaid fee (tiered by share count) as the call value.

use std::str::FromStr;
use std::sync::Arc;

use alloy::{
    primitives::{Address, Bytes, U256},
    rpc::types::TransactionRequest,
    sol_types::{SolCall, SolInterface},
};
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::account::Account;
use crate::action::{parse_amount, PacketId, RedPacketAction};
use crate::config::EvmContractConfig;
use crate::contract::RedPacketContract;
use crate::error::{RedPacketError, Result};
use crate::evm::chain::EvmChain;
use crate::evm::contracts::RedPacket;
use crate::fee::evm_prepaid_fee;
use crate::types::{ChainType, RedPacketDetail};

/// Red packet contract deployed on an EVM chain
pub struct EvmRedPacketContract {
    chain: Arc<dyn EvmChain>,
    address: Address,
    address_str: String,
    fallback_gas_limit: u64,
}

impl EvmRedPacketContract {
    pub fn new(
        chain: Arc<dyn EvmChain>,
        contract_address: &str,
        config: &EvmContractConfig,
    ) -> Result<Self> {
        let address = parse_address(contract_address)?;
        Ok(Self {
            chain,
            address,
            address_str: address.to_string(),
            fallback_gas_limit: config.fallback_gas_limit,
        })
    }

    /// ABI-encoded call data for `action`
    pub fn pack_params(&self, action: &RedPacketAction) -> Result<Bytes> {
        let data = match action {
            RedPacketAction::Create(p) => RedPacket::createCall {
                token: parse_address(&p.token_address)?,
                count: U256::from(p.count),
                total_balance: parse_amount(&p.amount)?,
            }
            .abi_encode(),
            RedPacketAction::Open(p) => RedPacket::openCall {
                id: numeric_packet_id(&p.packet_id)?,
                luck_accounts: p
                    .addresses
                    .iter()
                    .map(|a| parse_address(a))
                    .collect::<Result<Vec<_>>>()?,
                balances: p
                    .amounts
                    .iter()
                    .map(|a| parse_amount(a))
                    .collect::<Result<Vec<_>>>()?,
            }
            .abi_encode(),
            RedPacketAction::Close(p) => RedPacket::closeCall {
                id: numeric_packet_id(&p.packet_id)?,
                maybe_creator: parse_address(&p.creator)?,
            }
            .abi_encode(),
        };
        Ok(data.into())
    }

    /// Native value attached to the call: the prepaid fee for creation, zero otherwise
    pub fn call_value(&self, action: &RedPacketAction) -> U256 {
        match action {
            RedPacketAction::Create(p) => evm_prepaid_fee(p.count),
            _ => U256::ZERO,
        }
    }
}

#[async_trait]
impl RedPacketContract for EvmRedPacketContract {
    fn chain_type(&self) -> ChainType {
        ChainType::Evm
    }

    fn address(&self) -> &str {
        &self.address_str
    }

    async fn send_transaction(
        &self,
        account: &dyn Account,
        action: &RedPacketAction,
    ) -> Result<String> {
        let data = self.pack_params(action)?;
        let value = self.call_value(action);
        let hash = self
            .chain
            .submit_call(account, self.address, data, value)
            .await?;
        Ok(hash)
    }

    async fn fetch_red_packet_creation_detail(&self, hash: &str) -> Result<RedPacketDetail> {
        let record = self.chain.fetch_transaction(hash).await?;
        let mut detail = RedPacketDetail {
            transaction: record.detail,
            chain_name: ChainType::Evm.as_str().to_string(),
            ..Default::default()
        };

        if record.input.is_empty() {
            return Ok(detail);
        }

        let call = RedPacket::RedPacketCalls::abi_decode(&record.input, true)
            .map_err(|e| RedPacketError::data(format!("undecodable red packet call data: {e}")))?;

        if let RedPacket::RedPacketCalls::create(create) = call {
            let token = self.chain.token_info(create.token).await?;
            let amount = create.total_balance.to_string();

            detail.transaction.estimate_fees = (record.network_fee + record.value).to_string();
            detail.transaction.amount = amount.clone();
            detail.red_packet_amount = amount;
            detail.amount_name = token.name;
            detail.amount_decimal = token.decimals as i16;
        }

        Ok(detail)
    }

    async fn estimate_fee(&self, action: &RedPacketAction) -> Result<String> {
        Ok(self.call_value(action).to_string())
    }

    async fn estimate_gas_fee(
        &self,
        account: &dyn Account,
        action: &RedPacketAction,
    ) -> Result<String> {
        let data = self.pack_params(action)?;
        let value = self.call_value(action);
        let gas_price = self.chain.suggest_gas_price().await?;

        let request = TransactionRequest::default()
            .from(parse_address(&account.address())?)
            .to(self.address)
            .input(data.into())
            .value(value);

        let gas_limit = match self.chain.estimate_gas_limit(&request).await {
            Ok(limit) => limit,
            Err(e) => {
                warn!(
                    error = %e,
                    fallback_gas_limit = self.fallback_gas_limit,
                    "Gas estimation failed, using fallback gas limit"
                );
                self.fallback_gas_limit
            }
        };

        debug!(gas_price = %gas_price, gas_limit = gas_limit, "Estimated red packet gas");

        Ok((gas_price * U256::from(gas_limit)).to_string())
    }
}

fn parse_address(s: &str) -> Result<Address> {
    Address::from_str(s).map_err(|_| RedPacketError::InvalidAddress(s.to_string()))
}

fn numeric_packet_id(id: &PacketId) -> Result<U256> {
    match id {
        PacketId::Numeric(id) => Ok(U256::from(*id)),
        PacketId::Object(object) => Err(RedPacketError::InvalidPacketId(format!(
            "EVM packets are numeric, got object {}",
            object
        ))),
    }
}
