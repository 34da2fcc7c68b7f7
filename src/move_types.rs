//! Move language primitives shared by the Aptos and Sui adapters
//!
//! Both chains identify accounts/objects by 32-byte addresses and describe
//! coin types with Move type tags. These types serialize to the canonical BCS
//! layout expected by each chain's transaction format.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{RedPacketError, Result};

// ============================================================================
// Account Address
// ============================================================================

/// A 32-byte Move account (or object) address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct AccountAddress(pub [u8; 32]);

impl AccountAddress {
    pub const LENGTH: usize = 32;
    pub const ZERO: Self = Self([0u8; 32]);

    /// Parse a hex literal, with or without `0x`. Short forms (`0x1`) are
    /// left-padded with zeros.
    pub fn from_hex_literal(s: &str) -> Result<Self> {
        let hex_part = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        if hex_part.is_empty() || hex_part.len() > Self::LENGTH * 2 {
            return Err(RedPacketError::InvalidAddress(s.to_string()));
        }

        let padded = format!("{:0>64}", hex_part);
        let bytes =
            hex::decode(&padded).map_err(|_| RedPacketError::InvalidAddress(s.to_string()))?;
        let mut out = [0u8; 32];
        out.copy_from_slice(&bytes);
        Ok(Self(out))
    }

    /// Full 64-digit lowercase hex with `0x` prefix
    pub fn to_hex_literal(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Hex with leading zeros trimmed (`0x1`, `0x2`), as used in type strings
    pub fn short_str(&self) -> String {
        let full = hex::encode(self.0);
        let trimmed = full.trim_start_matches('0');
        if trimmed.is_empty() {
            "0x0".to_string()
        } else {
            format!("0x{}", trimmed)
        }
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex_literal())
    }
}

impl FromStr for AccountAddress {
    type Err = RedPacketError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex_literal(s)
    }
}

// ============================================================================
// Type Tags
// ============================================================================

/// A Move type, in the variant order of the on-chain BCS encoding
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum TypeTag {
    Bool,
    U8,
    U64,
    U128,
    Address,
    Signer,
    Vector(Box<TypeTag>),
    Struct(Box<StructTag>),
    U16,
    U32,
    U256,
}

/// A fully qualified Move struct type such as `0x2::coin::Coin<0x2::sui::SUI>`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct StructTag {
    pub address: AccountAddress,
    pub module: String,
    pub name: String,
    pub type_params: Vec<TypeTag>,
}

impl StructTag {
    pub fn new(
        address: AccountAddress,
        module: &str,
        name: &str,
        type_params: Vec<TypeTag>,
    ) -> Self {
        Self {
            address,
            module: module.to_string(),
            name: name.to_string(),
            type_params,
        }
    }

    /// True when `self` names the same struct as `address::module::name`, ignoring type params
    pub fn is(&self, address: &AccountAddress, module: &str, name: &str) -> bool {
        self.address == *address && self.module == module && self.name == name
    }
}

impl FromStr for TypeTag {
    type Err = RedPacketError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let tag = match s {
            "bool" => TypeTag::Bool,
            "u8" => TypeTag::U8,
            "u16" => TypeTag::U16,
            "u32" => TypeTag::U32,
            "u64" => TypeTag::U64,
            "u128" => TypeTag::U128,
            "u256" => TypeTag::U256,
            "address" => TypeTag::Address,
            "signer" => TypeTag::Signer,
            _ if s.starts_with("vector<") && s.ends_with('>') => {
                TypeTag::Vector(Box::new(s["vector<".len()..s.len() - 1].parse()?))
            }
            _ => TypeTag::Struct(Box::new(s.parse()?)),
        };
        Ok(tag)
    }
}

impl FromStr for StructTag {
    type Err = RedPacketError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let invalid = || RedPacketError::InvalidTypeTag(s.to_string());

        let (base, type_params) = match s.find('<') {
            Some(start) => {
                if !s.ends_with('>') {
                    return Err(invalid());
                }
                let params = split_type_params(&s[start + 1..s.len() - 1])
                    .ok_or_else(invalid)?
                    .into_iter()
                    .map(str::parse)
                    .collect::<Result<Vec<TypeTag>>>()?;
                (&s[..start], params)
            }
            None => (s, Vec::new()),
        };

        let parts: Vec<&str> = base.split("::").collect();
        let [address, module, name] = parts.as_slice() else {
            return Err(invalid());
        };
        if !is_identifier(module) || !is_identifier(name) {
            return Err(invalid());
        }
        let address = AccountAddress::from_hex_literal(address).map_err(|_| invalid())?;

        Ok(StructTag::new(address, module, name, type_params))
    }
}

/// Split a generic parameter list at top-level commas
fn split_type_params(s: &str) -> Option<Vec<&str>> {
    let mut params = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.checked_sub(1)?,
            ',' if depth == 0 => {
                params.push(s[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return None;
    }
    params.push(s[start..].trim());
    if params.iter().any(|p| p.is_empty()) {
        return None;
    }
    Some(params)
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl fmt::Display for StructTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}::{}", self.address.short_str(), self.module, self.name)?;
        if !self.type_params.is_empty() {
            let params: Vec<String> = self.type_params.iter().map(|t| t.to_string()).collect();
            write!(f, "<{}>", params.join(", "))?;
        }
        Ok(())
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::Bool => f.write_str("bool"),
            TypeTag::U8 => f.write_str("u8"),
            TypeTag::U16 => f.write_str("u16"),
            TypeTag::U32 => f.write_str("u32"),
            TypeTag::U64 => f.write_str("u64"),
            TypeTag::U128 => f.write_str("u128"),
            TypeTag::U256 => f.write_str("u256"),
            TypeTag::Address => f.write_str("address"),
            TypeTag::Signer => f.write_str("signer"),
            TypeTag::Vector(inner) => write!(f, "vector<{}>", inner),
            TypeTag::Struct(tag) => write!(f, "{}", tag),
        }
    }
}
