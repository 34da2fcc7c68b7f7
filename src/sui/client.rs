//! Sui JSON-RPC client
//!
//! Implements [`SuiChain`] against a fullnode JSON-RPC endpoint. Transaction
//! bytes travel base64-encoded; the caller's [`Account`] produces the
//! serialized signature.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use eyre::{eyre, Result, WrapErr};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::account::{Account, SignPurpose};
use crate::sui::chain::{
    SuiChain, SuiCoin, SuiCoinMetadata, SuiCoinPage, SuiObjectInfo, SuiTransactionBlock,
    SuiTransactionEffects,
};
use crate::types::json_u64;

/// Page size for `suix_getCoins`
const COIN_PAGE_LIMIT: u64 = 50;

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct DryRunResponse {
    effects: SuiTransactionEffects,
}

#[derive(Debug, Deserialize)]
struct ObjectResponse {
    data: Option<SuiObjectInfo>,
    error: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct ExecuteResponse {
    digest: String,
    #[serde(default)]
    effects: Option<SuiTransactionEffects>,
}

/// Sui fullnode JSON-RPC client
pub struct SuiRpcClient {
    rpc_url: String,
    client: Client,
    request_id: AtomicU64,
}

impl SuiRpcClient {
    pub fn new(rpc_url: &str) -> Result<Self> {
        url::Url::parse(rpc_url).map_err(|e| eyre!("Invalid Sui RPC URL: {}", e))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .wrap_err("Failed to create HTTP client")?;

        info!(rpc_url = %rpc_url, "Sui RPC client initialized");

        Ok(Self {
            rpc_url: rpc_url.trim_end_matches('/').to_string(),
            client,
            request_id: AtomicU64::new(1),
        })
    }

    /// Call `method`; a JSON-RPC error object becomes an `Err`
    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<Option<T>> {
        let id = self.request_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        let response = self
            .client
            .post(&self.rpc_url)
            .json(&body)
            .send()
            .await
            .wrap_err_with(|| format!("Failed to call {}", method))?;

        if !response.status().is_success() {
            return Err(eyre!(
                "Sui RPC {} failed: {} - {}",
                method,
                response.status(),
                response.text().await.unwrap_or_default()
            ));
        }

        let response: RpcResponse<T> = response
            .json()
            .await
            .wrap_err_with(|| format!("Failed to decode {} response", method))?;
        if let Some(error) = response.error {
            return Err(eyre!("Sui RPC {} error {}: {}", method, error.code, error.message));
        }
        Ok(response.result)
    }

    async fn call_required<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T> {
        self.call(method, params)
            .await?
            .ok_or_else(|| eyre!("Sui RPC {} returned no result", method))
    }
}

#[async_trait]
impl SuiChain for SuiRpcClient {
    async fn get_all_coins(&self, owner: &str, coin_type: &str) -> Result<Vec<SuiCoin>> {
        let mut coins = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let page: SuiCoinPage = self
                .call_required(
                    "suix_getCoins",
                    json!([owner, coin_type, cursor, COIN_PAGE_LIMIT]),
                )
                .await?;
            coins.extend(page.data);
            match page.next_cursor {
                Some(next) if page.has_next_page => cursor = Some(next),
                _ => break,
            }
        }

        debug!(owner = %owner, coin_type = %coin_type, count = coins.len(), "Fetched Sui coins");
        Ok(coins)
    }

    async fn get_object(&self, object_id: &str) -> Result<SuiObjectInfo> {
        let response: ObjectResponse = self
            .call_required("sui_getObject", json!([object_id, {"showOwner": true}]))
            .await?;
        match (response.data, response.error) {
            (Some(data), _) => Ok(data),
            (None, error) => Err(eyre!(
                "Object {} not available: {}",
                object_id,
                error.unwrap_or(Value::Null)
            )),
        }
    }

    async fn reference_gas_price(&self) -> Result<u64> {
        let price: Value = self
            .call_required("suix_getReferenceGasPrice", json!([]))
            .await?;
        json_u64(&price).ok_or_else(|| eyre!("Invalid reference gas price: {}", price))
    }

    async fn dry_run_transaction(&self, tx_bytes: &[u8]) -> Result<SuiTransactionEffects> {
        let response: DryRunResponse = self
            .call_required("sui_dryRunTransactionBlock", json!([BASE64.encode(tx_bytes)]))
            .await?;
        Ok(response.effects)
    }

    async fn submit_transaction(&self, account: &dyn Account, tx_bytes: &[u8]) -> Result<String> {
        let signature = account.sign(tx_bytes, SignPurpose::SuiTransaction)?;
        let response: ExecuteResponse = self
            .call_required(
                "sui_executeTransactionBlock",
                json!([
                    BASE64.encode(tx_bytes),
                    [BASE64.encode(signature)],
                    {"showEffects": true},
                    "WaitForLocalExecution"
                ]),
            )
            .await?;

        if let Some(effects) = response.effects.as_ref() {
            if !effects.status.is_success() {
                return Err(eyre!(
                    "Transaction {} failed: {}",
                    response.digest,
                    effects.status.failure_message()
                ));
            }
        }

        info!(digest = %response.digest, sender = %account.address(), "Submitted Sui red packet transaction");
        Ok(response.digest)
    }

    async fn get_transaction_block(&self, digest: &str) -> Result<SuiTransactionBlock> {
        self.call_required(
            "sui_getTransactionBlock",
            json!([digest, {"showInput": true, "showEffects": true, "showEvents": true}]),
        )
        .await
    }

    async fn get_coin_metadata(&self, coin_type: &str) -> Result<Option<SuiCoinMetadata>> {
        self.call("suix_getCoinMetadata", json!([coin_type])).await
    }
}
