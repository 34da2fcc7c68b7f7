//! Sui Chain Support Module
//!
//! Red packet support for the Sui object model.
//!
//! ## Submodules
//!
//! - `transaction` - Programmable transaction model and BCS encoding
//! - `coins` - Coin object selection for payments and gas
//! - `chain` - Chain collaborator trait and JSON-RPC response types
//! - `client` - JSON-RPC implementation of the chain trait
//! - `red_packet` - The red packet contract adapter

pub mod chain;
pub mod client;
pub mod coins;
pub mod red_packet;
pub mod transaction;

// Re-export commonly used items
pub use chain::{
    GasCostSummary, SuiChain, SuiCoin, SuiCoinMetadata, SuiObjectInfo, SuiOwner,
    SuiTransactionBlock, SuiTransactionEffects, SUI_COIN_TYPE,
};
pub use client::SuiRpcClient;
pub use coins::{select_coins, CoinSelection, MAX_COIN_OBJECTS};
pub use red_packet::SuiRedPacketContract;
pub use transaction::{
    Argument, CallArg, Command, ObjectArg, ObjectRef, ProgrammableTransaction, TransactionData,
};
