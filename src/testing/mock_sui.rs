//! In-memory Sui fullnode

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use eyre::{eyre, Result};

use crate::account::{Account, SignPurpose};
use crate::sui::chain::{
    GasCostSummary, SuiChain, SuiCoin, SuiCoinMetadata, SuiExecutionStatus, SuiObjectInfo,
    SuiTransactionBlock, SuiTransactionEffects,
};

/// Scripted [`SuiChain`]
///
/// Coins are keyed by coin type and objects by full hex id; the owner
/// argument of coin queries is ignored. Every dry run returns `dry_run`.
#[derive(Debug)]
pub struct MockSuiChain {
    pub coins: HashMap<String, Vec<SuiCoin>>,
    pub objects: HashMap<String, SuiObjectInfo>,
    pub gas_price: u64,
    pub dry_run: SuiTransactionEffects,
    pub blocks: HashMap<String, SuiTransactionBlock>,
    pub metadata: HashMap<String, SuiCoinMetadata>,
    /// Make metadata lookups fail with a transport error
    pub metadata_error: bool,
    /// Transaction bytes of every dry run
    pub dry_runs: Mutex<Vec<Vec<u8>>>,
    /// Transaction bytes of every submission
    pub submitted: Mutex<Vec<Vec<u8>>>,
}

impl MockSuiChain {
    pub const SUBMITTED_DIGEST: &'static str = "5Jt1FBv5hcVvDPVJ6jsxqPwy8VtPdcEAXqM1rwM9RrGk";
}

impl Default for MockSuiChain {
    fn default() -> Self {
        Self {
            coins: HashMap::new(),
            objects: HashMap::new(),
            gas_price: 750,
            dry_run: SuiTransactionEffects {
                status: SuiExecutionStatus {
                    status: "success".to_string(),
                    error: None,
                },
                gas_used: GasCostSummary {
                    computation_cost: 750_000,
                    storage_cost: 2_000_000,
                    storage_rebate: 980_000,
                },
            },
            blocks: HashMap::new(),
            metadata: HashMap::new(),
            metadata_error: false,
            dry_runs: Mutex::new(Vec::new()),
            submitted: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl SuiChain for MockSuiChain {
    async fn get_all_coins(&self, _owner: &str, coin_type: &str) -> Result<Vec<SuiCoin>> {
        Ok(self.coins.get(coin_type).cloned().unwrap_or_default())
    }

    async fn get_object(&self, object_id: &str) -> Result<SuiObjectInfo> {
        self.objects
            .get(object_id)
            .cloned()
            .ok_or_else(|| eyre!("Object {} not available", object_id))
    }

    async fn reference_gas_price(&self) -> Result<u64> {
        Ok(self.gas_price)
    }

    async fn dry_run_transaction(&self, tx_bytes: &[u8]) -> Result<SuiTransactionEffects> {
        self.dry_runs
            .lock()
            .map_err(|_| eyre!("mock chain lock poisoned"))?
            .push(tx_bytes.to_vec());
        Ok(self.dry_run.clone())
    }

    async fn submit_transaction(&self, account: &dyn Account, tx_bytes: &[u8]) -> Result<String> {
        account.sign(tx_bytes, SignPurpose::SuiTransaction)?;
        self.submitted
            .lock()
            .map_err(|_| eyre!("mock chain lock poisoned"))?
            .push(tx_bytes.to_vec());
        Ok(Self::SUBMITTED_DIGEST.to_string())
    }

    async fn get_transaction_block(&self, digest: &str) -> Result<SuiTransactionBlock> {
        self.blocks
            .get(digest)
            .cloned()
            .ok_or_else(|| eyre!("Transaction {} not found", digest))
    }

    async fn get_coin_metadata(&self, coin_type: &str) -> Result<Option<SuiCoinMetadata>> {
        if self.metadata_error {
            return Err(eyre!("suix_getCoinMetadata unavailable"));
        }
        Ok(self.metadata.get(coin_type).cloned())
    }
}
