//! Chain-agnostic red packet actions
//!
//! A [`RedPacketAction`] describes one create, open or close request. The
//! constructors validate the parameters; adapters decide how each action is
//! encoded for their chain.

use std::fmt;

use alloy::primitives::U256;
use serde::{Deserialize, Serialize};

use crate::error::{RedPacketError, Result};

/// Contract entry points shared by every red packet deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RedPacketMethod {
    Create,
    Open,
    Close,
}

impl RedPacketMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            RedPacketMethod::Create => "create",
            RedPacketMethod::Open => "open",
            RedPacketMethod::Close => "close",
        }
    }
}

impl fmt::Display for RedPacketMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies an existing red packet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PacketId {
    /// Sequential id assigned by account-model contracts (EVM, Aptos)
    Numeric(u64),
    /// Object id of the packet on object-model chains (Sui)
    Object(String),
}

impl fmt::Display for PacketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PacketId::Numeric(id) => write!(f, "{}", id),
            PacketId::Object(id) => f.write_str(id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateParams {
    pub token_address: String,
    pub count: u64,
    /// Net amount the packet should hold, in the token's smallest unit
    pub amount: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenParams {
    pub token_address: String,
    pub packet_id: PacketId,
    pub addresses: Vec<String>,
    pub amounts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloseParams {
    pub token_address: String,
    pub packet_id: PacketId,
    pub creator: String,
}

/// A single red packet request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "lowercase")]
pub enum RedPacketAction {
    Create(CreateParams),
    Open(OpenParams),
    Close(CloseParams),
}

impl RedPacketAction {
    /// Create a packet holding `amount` split into `count` shares
    pub fn create(
        token_address: impl Into<String>,
        count: u64,
        amount: impl Into<String>,
    ) -> Result<Self> {
        let token_address = token_address.into();
        let amount = amount.into();
        if token_address.is_empty() {
            return Err(RedPacketError::EmptyTokenAddress);
        }
        parse_amount(&amount)?;
        Ok(RedPacketAction::Create(CreateParams {
            token_address,
            count,
            amount,
        }))
    }

    /// Open packet `packet_id`, paying `amounts[i]` to `addresses[i]`
    pub fn open(
        token_address: impl Into<String>,
        packet_id: u64,
        addresses: Vec<String>,
        amounts: Vec<String>,
    ) -> Result<Self> {
        Self::open_with(token_address.into(), PacketId::Numeric(packet_id), addresses, amounts)
    }

    /// Open the packet object `packet_object_id` (object-model chains)
    pub fn open_object(
        token_address: impl Into<String>,
        packet_object_id: impl Into<String>,
        addresses: Vec<String>,
        amounts: Vec<String>,
    ) -> Result<Self> {
        Self::open_with(
            token_address.into(),
            PacketId::Object(packet_object_id.into()),
            addresses,
            amounts,
        )
    }

    fn open_with(
        token_address: String,
        packet_id: PacketId,
        addresses: Vec<String>,
        amounts: Vec<String>,
    ) -> Result<Self> {
        if addresses.len() != amounts.len() {
            return Err(RedPacketError::LengthMismatch {
                addresses: addresses.len(),
                amounts: amounts.len(),
            });
        }
        for amount in &amounts {
            parse_amount(amount)?;
        }
        Ok(RedPacketAction::Open(OpenParams {
            token_address,
            packet_id,
            addresses,
            amounts,
        }))
    }

    /// Close packet `packet_id` and refund the remainder to `creator`
    pub fn close(
        token_address: impl Into<String>,
        packet_id: u64,
        creator: impl Into<String>,
    ) -> Self {
        RedPacketAction::Close(CloseParams {
            token_address: token_address.into(),
            packet_id: PacketId::Numeric(packet_id),
            creator: creator.into(),
        })
    }

    /// Close the packet object `packet_object_id` (object-model chains)
    pub fn close_object(
        token_address: impl Into<String>,
        packet_object_id: impl Into<String>,
        creator: impl Into<String>,
    ) -> Self {
        RedPacketAction::Close(CloseParams {
            token_address: token_address.into(),
            packet_id: PacketId::Object(packet_object_id.into()),
            creator: creator.into(),
        })
    }

    pub fn method(&self) -> RedPacketMethod {
        match self {
            RedPacketAction::Create(_) => RedPacketMethod::Create,
            RedPacketAction::Open(_) => RedPacketMethod::Open,
            RedPacketAction::Close(_) => RedPacketMethod::Close,
        }
    }

    pub fn token_address(&self) -> &str {
        match self {
            RedPacketAction::Create(p) => &p.token_address,
            RedPacketAction::Open(p) => &p.token_address,
            RedPacketAction::Close(p) => &p.token_address,
        }
    }
}

/// Parse a non-negative decimal amount literal.
///
/// Only ASCII digits are accepted: empty strings, signs, whitespace and
/// values wider than 256 bits are rejected with [`RedPacketError::InvalidAmount`].
pub fn parse_amount(amount: &str) -> Result<U256> {
    if amount.is_empty() || !amount.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RedPacketError::InvalidAmount(amount.to_string()));
    }
    U256::from_str_radix(amount, 10).map_err(|_| RedPacketError::InvalidAmount(amount.to_string()))
}

/// Parse an amount that must fit the u64 arguments of Move contracts
pub fn parse_amount_u64(amount: &str) -> Result<u64> {
    let value = parse_amount(amount)?;
    u64::try_from(value).map_err(|_| RedPacketError::InvalidAmount(amount.to_string()))
}
