//! Aptos REST client
//!
//! Implements [`AptosChain`] against a fullnode REST API (`.../v1`). Raw
//! transactions are assembled here in BCS; the caller's [`Account`] turns the
//! signing message into a transaction authenticator.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use eyre::{eyre, Result, WrapErr};
use reqwest::{header::CONTENT_TYPE, Client, StatusCode};
use serde_json::Value;
use tiny_keccak::{Hasher, Sha3};
use tracing::{debug, info};

use crate::account::{Account, SignPurpose};
use crate::aptos::chain::{AptosChain, AptosTransaction, CoinInfo};
use crate::move_types::{AccountAddress, StructTag};
use crate::types::json_u64;

const SIGNED_TRANSACTION_CONTENT_TYPE: &str = "application/x.aptos.signed_transaction+bcs";
const RAW_TRANSACTION_SALT: &[u8] = b"APTOS::RawTransaction";

/// Aptos fullnode REST client
pub struct AptosRestClient {
    /// Base URL including the API version, e.g. `https://fullnode.mainnet.aptoslabs.com/v1`
    base_url: String,
    /// Maximum gas units a transaction may consume
    max_gas_amount: u64,
    /// Seconds until a submitted transaction expires
    expiration_secs: u64,
    /// HTTP client
    client: Client,
}

impl AptosRestClient {
    pub fn new(base_url: &str) -> Result<Self> {
        url::Url::parse(base_url).map_err(|e| eyre!("Invalid Aptos node URL: {}", e))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .wrap_err("Failed to create HTTP client")?;

        info!(base_url = %base_url, "Aptos REST client initialized");

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            max_gas_amount: 2_000,
            expiration_secs: 600,
            client,
        })
    }

    pub fn with_max_gas_amount(mut self, max_gas_amount: u64) -> Self {
        self.max_gas_amount = max_gas_amount;
        self
    }

    /// GET `path`, mapping 404 to `None`
    async fn get_json(&self, path: &str) -> Result<Option<Value>> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .wrap_err_with(|| format!("Failed to query {}", path))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(eyre!(
                "Aptos query {} failed: {} - {}",
                path,
                response.status(),
                response.text().await.unwrap_or_default()
            ));
        }

        Ok(Some(response.json().await?))
    }

    async fn post_bcs(&self, path: &str, body: Vec<u8>) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, SIGNED_TRANSACTION_CONTENT_TYPE)
            .body(body)
            .send()
            .await
            .wrap_err_with(|| format!("Failed to post {}", path))?;

        if !response.status().is_success() {
            return Err(eyre!(
                "Aptos request {} failed: {} - {}",
                path,
                response.status(),
                response.text().await.unwrap_or_default()
            ));
        }

        Ok(response.json().await?)
    }

    async fn chain_id(&self) -> Result<u8> {
        let ledger = self
            .get_json("")
            .await?
            .ok_or_else(|| eyre!("Ledger info not available"))?;
        let chain_id = ledger
            .get("chain_id")
            .and_then(json_u64)
            .ok_or_else(|| eyre!("Missing 'chain_id' in ledger info"))?;
        u8::try_from(chain_id).map_err(|_| eyre!("Chain id {} out of range", chain_id))
    }

    async fn sequence_number(&self, address: &AccountAddress) -> Result<u64> {
        let account = self
            .get_json(&format!("/accounts/{}", address))
            .await?
            .ok_or_else(|| eyre!("Account {} not found", address))?;
        account
            .get("sequence_number")
            .and_then(json_u64)
            .ok_or_else(|| eyre!("Missing 'sequence_number' for account {}", address))
    }

    async fn gas_unit_price(&self) -> Result<u64> {
        let estimate = self
            .get_json("/estimate_gas_price")
            .await?
            .ok_or_else(|| eyre!("Gas price estimate not available"))?;
        estimate
            .get("gas_estimate")
            .and_then(json_u64)
            .ok_or_else(|| eyre!("Missing 'gas_estimate' in gas price response"))
    }

    /// BCS `RawTransaction` wrapping `payload`
    async fn build_raw_transaction(
        &self,
        account: &dyn Account,
        payload: &[u8],
    ) -> Result<Vec<u8>> {
        let sender = AccountAddress::from_hex_literal(&account.address())?;
        let (sequence_number, gas_unit_price, chain_id) = tokio::try_join!(
            self.sequence_number(&sender),
            self.gas_unit_price(),
            self.chain_id()
        )?;
        let expiration = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .wrap_err("System clock before Unix epoch")?
            .as_secs()
            + self.expiration_secs;

        debug!(
            sender = %sender,
            sequence_number = sequence_number,
            gas_unit_price = gas_unit_price,
            "Built Aptos raw transaction"
        );

        let mut raw = bcs::to_bytes(&(sender, sequence_number))?;
        raw.extend_from_slice(payload);
        raw.extend(bcs::to_bytes(&(
            self.max_gas_amount,
            gas_unit_price,
            expiration,
            chain_id,
        ))?);
        Ok(raw)
    }
}

/// `sha3_256("APTOS::RawTransaction") || raw`
pub fn signing_message(raw_transaction: &[u8]) -> Vec<u8> {
    let mut prefix = [0u8; 32];
    let mut hasher = Sha3::v256();
    hasher.update(RAW_TRANSACTION_SALT);
    hasher.finalize(&mut prefix);

    let mut message = prefix.to_vec();
    message.extend_from_slice(raw_transaction);
    message
}

#[async_trait]
impl AptosChain for AptosRestClient {
    async fn get_account_resource(
        &self,
        address: &str,
        resource_type: &str,
    ) -> Result<Option<Value>> {
        let resource = self
            .get_json(&format!("/accounts/{}/resource/{}", address, resource_type))
            .await?;
        Ok(resource.and_then(|r| r.get("data").cloned()))
    }

    async fn get_transaction_by_hash(&self, hash: &str) -> Result<Option<AptosTransaction>> {
        match self.get_json(&format!("/transactions/by_hash/{}", hash)).await? {
            Some(value) => Ok(Some(
                serde_json::from_value(value).wrap_err("Failed to decode Aptos transaction")?,
            )),
            None => Ok(None),
        }
    }

    async fn coin_info(&self, coin_type: &str) -> Result<CoinInfo> {
        let tag: StructTag = coin_type.parse()?;
        let data = self
            .get_account_resource(
                &tag.address.to_hex_literal(),
                &format!("0x1::coin::CoinInfo<{}>", coin_type),
            )
            .await?
            .ok_or_else(|| eyre!("Coin info for {} not found", coin_type))?;
        let name = data
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| eyre!("Missing 'name' in coin info for {}", coin_type))?;
        let decimals = data
            .get("decimals")
            .and_then(json_u64)
            .and_then(|d| u8::try_from(d).ok())
            .ok_or_else(|| eyre!("Missing 'decimals' in coin info for {}", coin_type))?;
        Ok(CoinInfo {
            name: name.to_string(),
            decimals,
        })
    }

    async fn submit_payload(&self, account: &dyn Account, payload: &[u8]) -> Result<String> {
        let raw = self.build_raw_transaction(account, payload).await?;
        let authenticator = account.sign(&signing_message(&raw), SignPurpose::AptosTransaction)?;

        let mut signed = raw;
        signed.extend(authenticator);
        let response = self.post_bcs("/transactions", signed).await?;
        let hash = response
            .get("hash")
            .and_then(Value::as_str)
            .ok_or_else(|| eyre!("Missing 'hash' in submit response"))?
            .to_string();

        info!(hash = %hash, sender = %account.address(), "Submitted Aptos red packet transaction");
        Ok(hash)
    }

    async fn estimate_payload_gas_fee(
        &self,
        account: &dyn Account,
        payload: &[u8],
    ) -> Result<u64> {
        let raw = self.build_raw_transaction(account, payload).await?;
        let authenticator = account.sign(&signing_message(&raw), SignPurpose::AptosSimulation)?;

        let mut signed = raw;
        signed.extend(authenticator);
        let response = self.post_bcs("/transactions/simulate", signed).await?;
        simulated_gas_fee(&response)
    }
}

/// Gas fee (`gas_used * gas_unit_price`) of the first simulation result
fn simulated_gas_fee(response: &Value) -> Result<u64> {
    let result = response
        .as_array()
        .and_then(|results| results.first())
        .ok_or_else(|| eyre!("Empty simulation response"))?;

    if !result.get("success").and_then(Value::as_bool).unwrap_or(false) {
        return Err(eyre!(
            "Simulation failed: {}",
            result.get("vm_status").and_then(Value::as_str).unwrap_or("unknown")
        ));
    }

    let field = |name: &str| {
        result
            .get(name)
            .and_then(json_u64)
            .ok_or_else(|| eyre!("Simulation result has no {}", name))
    };
    Ok(field("gas_used")?.saturating_mul(field("gas_unit_price")?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signing_message_prefix() {
        let message = signing_message(&[1, 2, 3]);
        assert_eq!(message.len(), 35);
        assert_eq!(&message[32..], &[1, 2, 3]);

        let mut expected = [0u8; 32];
        let mut hasher = Sha3::v256();
        hasher.update(b"APTOS::RawTransaction");
        hasher.finalize(&mut expected);
        assert_eq!(&message[..32], &expected);
    }

    #[test]
    fn test_simulated_gas_fee() {
        let ok = serde_json::json!([{"success": true, "gas_used": "543", "gas_unit_price": "100"}]);
        assert_eq!(simulated_gas_fee(&ok).unwrap(), 54_300);

        let failed = serde_json::json!([{"success": false, "vm_status": "OUT_OF_GAS"}]);
        assert!(simulated_gas_fee(&failed).unwrap_err().to_string().contains("OUT_OF_GAS"));

        let missing = serde_json::json!([{"success": true, "gas_used": "543"}]);
        let err = simulated_gas_fee(&missing).unwrap_err();
        assert!(err.to_string().contains("gas_unit_price"));

        assert!(simulated_gas_fee(&serde_json::json!([])).is_err());
    }

    #[test]
    fn test_new_rejects_invalid_url() {
        assert!(AptosRestClient::new("not a url").is_err());
        let client = AptosRestClient::new("https://fullnode.testnet.aptoslabs.com/v1/").unwrap();
        assert_eq!(client.base_url, "https://fullnode.testnet.aptoslabs.com/v1");
    }
}
