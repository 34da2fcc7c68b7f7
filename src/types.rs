//! Shared types for red packet operations
//!
//! Chain identification and the unified transaction detail records that every
//! adapter produces from chain-native receipts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{RedPacketError, Result};

// ============================================================================
// Chain Type
// ============================================================================

/// Chain families supported by the red packet contracts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChainType {
    /// Account-based EVM chains, tagged `eth`
    #[serde(rename = "eth")]
    Evm,
    /// Move-resource chains (Aptos), tagged `aptos`
    #[serde(rename = "aptos")]
    Aptos,
    /// Object-model chains (Sui), tagged `sui`
    #[serde(rename = "sui")]
    Sui,
}

impl ChainType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChainType::Evm => "eth",
            ChainType::Aptos => "aptos",
            ChainType::Sui => "sui",
        }
    }
}

impl fmt::Display for ChainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChainType {
    type Err = RedPacketError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "eth" => Ok(ChainType::Evm),
            "aptos" => Ok(ChainType::Aptos),
            "sui" => Ok(ChainType::Sui),
            other => Err(RedPacketError::UnsupportedChainType(other.to_string())),
        }
    }
}

// ============================================================================
// Transaction Detail
// ============================================================================

/// Final state of a submitted transaction
///
/// Serialized as an integer (0 none, 1 pending, 2 success, 3 failure).
/// Unknown integers decode as [`TransactionStatus::None`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum TransactionStatus {
    #[default]
    None,
    Pending,
    Success,
    Failure,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::None => "none",
            TransactionStatus::Pending => "pending",
            TransactionStatus::Success => "success",
            TransactionStatus::Failure => "failure",
        }
    }

    pub fn from_success(success: bool) -> Self {
        if success {
            TransactionStatus::Success
        } else {
            TransactionStatus::Failure
        }
    }
}

impl From<i64> for TransactionStatus {
    fn from(value: i64) -> Self {
        match value {
            1 => TransactionStatus::Pending,
            2 => TransactionStatus::Success,
            3 => TransactionStatus::Failure,
            _ => TransactionStatus::None,
        }
    }
}

impl From<TransactionStatus> for i64 {
    fn from(status: TransactionStatus) -> Self {
        match status {
            TransactionStatus::None => 0,
            TransactionStatus::Pending => 1,
            TransactionStatus::Success => 2,
            TransactionStatus::Failure => 3,
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Chain-agnostic view of a settled transaction
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct TransactionDetail {
    pub hash_string: String,
    pub from_address: String,
    pub to_address: String,
    /// Gross amount in the token's smallest unit
    pub amount: String,
    /// Total fee paid in the native currency's smallest unit
    pub estimate_fees: String,
    /// Unix seconds
    pub finish_timestamp: i64,
    pub status: TransactionStatus,
    pub failure_message: String,
}

/// A red packet creation transaction, decorated with token and pool data
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct RedPacketDetail {
    #[serde(flatten)]
    pub transaction: TransactionDetail,
    /// Token display name
    pub amount_name: String,
    /// Token decimal places
    pub amount_decimal: i16,
    /// Net amount placed in the packet pool (gross minus platform fee)
    pub red_packet_amount: String,
    pub chain_name: String,
}

impl RedPacketDetail {
    /// Serialize to the JSON form used for cross-process transport
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| RedPacketError::Encode(e.to_string()))
    }

    /// Parse the JSON transport form. Missing fields are zero-valued.
    pub fn from_json_str(s: &str) -> Result<Self> {
        serde_json::from_str(s)
            .map_err(|e| RedPacketError::data(format!("invalid detail json: {e}")))
    }
}

// ============================================================================
// JSON helpers
// ============================================================================

/// Read a u64 encoded either as a JSON number or a decimal string
pub(crate) fn json_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// Serde adapter for u64 fields that RPC nodes send as strings
pub(crate) mod string_u64 {
    use super::*;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Num(u64),
        Str(String),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Repr::deserialize(deserializer)? {
            Repr::Num(n) => Ok(n),
            Repr::Str(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}
