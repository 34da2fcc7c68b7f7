//! Redpacket-RS: Cross-Chain Red Packet Client Library
//!
//! Builds, submits and inspects "red packet" (lucky money) transactions on
//! smart-contract chains whose transaction models differ completely:
//!
//! - **Action Model** - One create/open/close request shape for every chain
//! - **Fee Calculator** - Gross amount needed so a net amount survives the platform fee
//! - **EVM Module** - ABI-encoded contract calls with a flat prepaid fee
//! - **Aptos Module** - BCS entry function payloads against on-chain fee config
//! - **Sui Module** - Programmable transactions with coin and gas object selection
//! - **Contract Factory** - Resolves the adapter for a chain type and chain handle
//!
//! ## Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use redpacket_rs::{new_red_packet_contract, ChainHandle, ChainType, ContractConfig, RedPacketAction};
//! use redpacket_rs::evm::EvmRpcChain;
//!
//! let chain = Arc::new(EvmRpcChain::new("https://rpc.example.org", 1)?);
//! let contract = new_red_packet_contract(
//!     ChainType::Evm,
//!     ChainHandle::Evm(chain),
//!     "0x...",
//!     &ContractConfig::default(),
//! )?;
//! let action = RedPacketAction::create("0x...", 10, "1000000")?;
//! let hash = contract.send_transaction(&account, &action).await?;
//! ```
//!
//! ## Feature Flags
//!
//! - `evm` - Enable EVM chain support (default)
//! - `aptos` - Enable Aptos chain support (default)
//! - `sui` - Enable Sui chain support (default)
//! - `testing` - Enable in-memory chain mocks for downstream tests
//! - `full` - Enable all features

// Core modules (always available)
pub mod account;
pub mod action;
pub mod config;
pub mod contract;
pub mod error;
pub mod fee;
pub mod move_types;
pub mod types;

// Chain-specific modules (feature-gated)
#[cfg(feature = "evm")]
pub mod evm;

#[cfg(feature = "aptos")]
pub mod aptos;

#[cfg(feature = "sui")]
pub mod sui;

// Testing utilities (feature-gated)
#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Re-export commonly used items at the crate root
pub use account::{Account, SignPurpose};
pub use action::{
    parse_amount, CloseParams, CreateParams, OpenParams, PacketId, RedPacketAction,
    RedPacketMethod,
};
pub use config::{
    AptosContractConfig, AptosSchema, ContractConfig, EvmContractConfig, SuiContractConfig,
};
pub use contract::{new_red_packet_contract, ChainHandle, RedPacketContract};
pub use error::{RedPacketError, Result};
pub use fee::{calc_total, RedPacketFeeCalculator, DEFAULT_FEE_POINT, FEE_DENOMINATOR};
pub use types::{ChainType, RedPacketDetail, TransactionDetail, TransactionStatus};
