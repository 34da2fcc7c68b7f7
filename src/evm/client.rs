//! EVM RPC chain implementation
//!
//! [`EvmRpcChain`] implements [`EvmChain`] over an alloy HTTP provider. Signing
//! is delegated to the caller's [`Account`]: the client builds an EIP-1559
//! transaction, hands its signing payload to the account and broadcasts the
//! signed bytes it gets back.

use std::str::FromStr;

use alloy::{
    consensus::{BlockHeader, SignableTransaction, Transaction as _, TxEip1559},
    eips::BlockNumberOrTag,
    primitives::{Address, Bytes, TxKind, B256, U256},
    providers::{Provider, ProviderBuilder, RootProvider},
    rpc::types::{BlockTransactionsKind, TransactionRequest},
    transports::http::{Client, Http},
};
use async_trait::async_trait;
use eyre::{eyre, Result, WrapErr};
use tracing::{debug, info};

use crate::account::{Account, SignPurpose};
use crate::evm::chain::{EvmChain, EvmTransactionRecord, TokenInfo};
use crate::evm::contracts::ERC20;
use crate::types::{TransactionDetail, TransactionStatus};

/// EVM chain accessed through JSON-RPC
pub struct EvmRpcChain {
    /// The alloy provider
    provider: RootProvider<Http<Client>>,
    /// Chain ID used for replay protection
    chain_id: u64,
}

impl EvmRpcChain {
    pub fn new(rpc_url: &str, chain_id: u64) -> Result<Self> {
        let provider = ProviderBuilder::new().on_http(
            rpc_url
                .parse()
                .map_err(|e| eyre!("Invalid RPC URL: {}", e))?,
        );

        info!(rpc_url = %rpc_url, chain_id = chain_id, "Created EVM red packet chain client");

        Ok(Self { provider, chain_id })
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    async fn block_timestamp(&self, block_number: Option<u64>) -> Result<i64> {
        let Some(number) = block_number else {
            return Ok(0);
        };
        let block = self
            .provider
            .get_block_by_number(
                BlockNumberOrTag::Number(number),
                BlockTransactionsKind::Hashes,
            )
            .await
            .wrap_err("Failed to get block")?;
        Ok(block.map(|b| b.header.timestamp() as i64).unwrap_or_default())
    }
}

#[async_trait]
impl EvmChain for EvmRpcChain {
    async fn suggest_gas_price(&self) -> Result<U256> {
        let price = self
            .provider
            .get_gas_price()
            .await
            .wrap_err("Failed to get gas price")?;
        Ok(U256::from(price))
    }

    async fn estimate_gas_limit(&self, request: &TransactionRequest) -> Result<u64> {
        let gas = self
            .provider
            .estimate_gas(request)
            .await
            .wrap_err("Failed to estimate gas")?;
        Ok(gas)
    }

    async fn submit_call(
        &self,
        account: &dyn Account,
        to: Address,
        data: Bytes,
        value: U256,
    ) -> Result<String> {
        let from = Address::from_str(&account.address())
            .map_err(|e| eyre!("Invalid sender address {}: {}", account.address(), e))?;

        let request = TransactionRequest::default()
            .from(from)
            .to(to)
            .input(data.clone().into())
            .value(value);

        let nonce = self
            .provider
            .get_transaction_count(from)
            .await
            .wrap_err("Failed to get nonce")?;
        let gas_limit = self.estimate_gas_limit(&request).await?;
        let gas_price = self
            .provider
            .get_gas_price()
            .await
            .wrap_err("Failed to get gas price")?;
        let priority_fee = self
            .provider
            .get_max_priority_fee_per_gas()
            .await
            .wrap_err("Failed to get max priority fee")?;

        let tx = TxEip1559 {
            chain_id: self.chain_id,
            nonce,
            gas_limit,
            max_fee_per_gas: gas_price + priority_fee,
            max_priority_fee_per_gas: priority_fee,
            to: TxKind::Call(to),
            value,
            access_list: Default::default(),
            input: data,
        };

        let mut payload = Vec::new();
        tx.encode_for_signing(&mut payload);
        let raw = account.sign(&payload, SignPurpose::EvmTransaction)?;

        debug!(nonce = nonce, gas_limit = gas_limit, "Broadcasting red packet transaction");

        let pending = self
            .provider
            .send_raw_transaction(&raw)
            .await
            .wrap_err("Failed to send raw transaction")?;
        let hash = pending.tx_hash().to_string();

        info!(hash = %hash, from = %from, to = %to, "Submitted red packet transaction");

        Ok(hash)
    }

    async fn fetch_transaction(&self, hash: &str) -> Result<EvmTransactionRecord> {
        let tx_hash =
            B256::from_str(hash).map_err(|e| eyre!("Invalid tx hash {}: {}", hash, e))?;

        let tx = self
            .provider
            .get_transaction_by_hash(tx_hash)
            .await
            .wrap_err("Failed to get transaction")?
            .ok_or_else(|| eyre!("Transaction {} not found", hash))?;

        let receipt = self
            .provider
            .get_transaction_receipt(tx_hash)
            .await
            .wrap_err("Failed to get transaction receipt")?;

        let mut detail = TransactionDetail {
            hash_string: hash.to_string(),
            from_address: tx.from.to_string(),
            to_address: tx.to().map(|to| to.to_string()).unwrap_or_default(),
            amount: tx.value().to_string(),
            status: TransactionStatus::Pending,
            ..Default::default()
        };

        let mut network_fee = U256::ZERO;
        if let Some(receipt) = receipt {
            network_fee = U256::from(receipt.gas_used) * U256::from(receipt.effective_gas_price);
            detail.status = TransactionStatus::from_success(receipt.status());
            if !receipt.status() {
                detail.failure_message = "execution reverted".to_string();
            }
            detail.finish_timestamp = self.block_timestamp(receipt.block_number).await?;
        }
        detail.estimate_fees = network_fee.to_string();

        Ok(EvmTransactionRecord {
            detail,
            input: tx.input().clone(),
            value: tx.value(),
            network_fee,
        })
    }

    async fn token_info(&self, token: Address) -> Result<TokenInfo> {
        let contract = ERC20::new(token, &self.provider);
        let name_call = contract.name();
        let decimals_call = contract.decimals();
        let (name, decimals) = tokio::try_join!(name_call.call(), decimals_call.call())
            .map_err(|e| eyre!("Failed to get token info for {}: {}", token, e))?;

        Ok(TokenInfo {
            name: name._0,
            decimals: decimals._0,
        })
    }
}
