//! EVM Chain Support Module
//!
//! Red packet support for EVM-compatible chains (Ethereum, BSC, Polygon, etc.)
//!
//! ## Submodules
//!
//! - `chain` - Chain collaborator trait consumed by the adapter
//! - `client` - Alloy-backed JSON-RPC implementation of the chain trait
//! - `contracts` - Red packet and ERC20 bindings using alloy sol! macro
//! - `red_packet` - The red packet contract adapter

pub mod chain;
pub mod client;
pub mod contracts;
pub mod red_packet;

// Re-export commonly used items
pub use chain::{EvmChain, EvmTransactionRecord, TokenInfo};
pub use client::EvmRpcChain;
pub use contracts::{RedPacket, ERC20};
pub use red_packet::EvmRedPacketContract;
