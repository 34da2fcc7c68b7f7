//! Aptos Chain Support Module
//!
//! Red packet support for the Aptos Move-resource model.
//!
//! ## Submodules
//!
//! - `abi` - Entry function descriptors and BCS payload encoding
//! - `chain` - Chain collaborator trait and REST response types
//! - `client` - REST implementation of the chain trait
//! - `red_packet` - The red packet contract adapter

pub mod abi;
pub mod chain;
pub mod client;
pub mod red_packet;

// Re-export commonly used items
pub use abi::{EntryFunction, EntryFunctionAbi, MoveValue, RedPacketAbi};
pub use chain::{AptosChain, AptosEvent, AptosPayload, AptosTransaction, CoinInfo};
pub use client::{signing_message, AptosRestClient};
pub use red_packet::{AptosRedPacketContract, TokenHandler, APTOS_COIN_TYPE};
