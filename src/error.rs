//! Error types for red packet operations
//!
//! Every failure surfaced by this crate is a [`RedPacketError`]. Variants fall
//! into four groups:
//!
//! - **Validation** - malformed action parameters, detected before any network call
//! - **Data** - the chain answered but its data did not match the expected schema
//! - **Chain** - transport/RPC failures from a chain collaborator, passed through unchanged
//! - **Encode** - canonical binary serialization failures

use thiserror::Error;

use crate::action::RedPacketMethod;
use crate::types::ChainType;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, RedPacketError>;

#[derive(Error, Debug)]
pub enum RedPacketError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("invalid red packet amount {0:?}")]
    InvalidAmount(String),

    #[error("tokenAddress must not be empty")]
    EmptyTokenAddress,

    #[error(
        "the number of opened addresses ({addresses}) is not the same as the amounts ({amounts})"
    )]
    LengthMismatch { addresses: usize, amounts: usize },

    #[error("open amounts error: {0}")]
    OpenAmounts(String),

    #[error("invalid address {0:?}")]
    InvalidAddress(String),

    #[error("invalid type tag {0:?}")]
    InvalidTypeTag(String),

    #[error("invalid packet identifier: {0}")]
    InvalidPacketId(String),

    #[error("unsupported method {0}")]
    UnsupportedMethod(RedPacketMethod),

    #[error("unsupported chain type {0:?}")]
    UnsupportedChainType(String),

    #[error("invalid chain object: expected {expected} chain handle, got {actual}")]
    InvalidChainObject {
        expected: ChainType,
        actual: ChainType,
    },

    #[error("missing contract config: {0}")]
    MissingConfig(&'static str),

    #[error("insufficient balance of {coin_type}: required {required}, available {available}")]
    InsufficientBalance {
        coin_type: String,
        required: u128,
        available: u128,
    },

    #[error("too many {coin_type} coin objects needed ({count}), merge coins first")]
    TooManyCoins { coin_type: String, count: usize },

    // ========================================================================
    // Chain Data Errors
    // ========================================================================
    #[error("red packet data error: {0}")]
    Data(String),

    #[error("transaction rejected: {0}")]
    Rejected(String),

    // ========================================================================
    // Encoding / Transport Errors
    // ========================================================================
    #[error("encoding error: {0}")]
    Encode(String),

    #[error(transparent)]
    Chain(#[from] eyre::Report),
}

impl RedPacketError {
    /// Shorthand for a [`RedPacketError::Data`] error
    pub fn data(message: impl Into<String>) -> Self {
        Self::Data(message.into())
    }

    /// True when the chain responded but its data didn't match the expected shape
    pub fn is_data_error(&self) -> bool {
        matches!(self, Self::Data(_))
    }

    /// True for errors detected locally before any chain request was made
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidAmount(_)
                | Self::EmptyTokenAddress
                | Self::LengthMismatch { .. }
                | Self::OpenAmounts(_)
                | Self::InvalidAddress(_)
                | Self::InvalidTypeTag(_)
                | Self::InvalidPacketId(_)
                | Self::UnsupportedMethod(_)
                | Self::UnsupportedChainType(_)
                | Self::InvalidChainObject { .. }
                | Self::MissingConfig(_)
                | Self::InsufficientBalance { .. }
                | Self::TooManyCoins { .. }
        )
    }
}

impl From<bcs::Error> for RedPacketError {
    fn from(err: bcs::Error) -> Self {
        Self::Encode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eyre::eyre;

    #[test]
    fn test_error_classification() {
        assert!(RedPacketError::InvalidAmount("abc".into()).is_validation_error());
        assert!(RedPacketError::EmptyTokenAddress.is_validation_error());
        assert!(RedPacketError::data("missing event").is_data_error());
        assert!(!RedPacketError::data("missing event").is_validation_error());

        let chain: RedPacketError = eyre!("connection refused").into();
        assert!(!chain.is_data_error());
        assert!(!chain.is_validation_error());
    }

    #[test]
    fn test_chain_error_passes_through_unchanged() {
        let err: RedPacketError = eyre!("rpc timeout").into();
        assert_eq!(err.to_string(), "rpc timeout");
    }

    #[test]
    fn test_error_messages() {
        let err = RedPacketError::LengthMismatch {
            addresses: 2,
            amounts: 3,
        };
        assert!(err.to_string().contains("not the same as the amounts"));

        let err = RedPacketError::InvalidChainObject {
            expected: ChainType::Sui,
            actual: ChainType::Evm,
        };
        assert_eq!(
            err.to_string(),
            "invalid chain object: expected sui chain handle, got eth"
        );
    }
}
