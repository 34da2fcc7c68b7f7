//! Testing Utilities Module
//!
//! In-memory chain collaborators and a signing account for exercising the
//! adapters without a node.
//!
//! ## Submodules
//!
//! - `account` - Deterministic signing account
//! - `mock_evm` - In-memory EVM chain
//! - `mock_aptos` - In-memory Aptos node
//! - `mock_sui` - In-memory Sui fullnode

pub mod account;
#[cfg(feature = "aptos")]
pub mod mock_aptos;
#[cfg(feature = "evm")]
pub mod mock_evm;
#[cfg(feature = "sui")]
pub mod mock_sui;

// Re-export commonly used items
pub use account::*;
#[cfg(feature = "aptos")]
pub use mock_aptos::*;
#[cfg(feature = "evm")]
pub use mock_evm::*;
#[cfg(feature = "sui")]
pub use mock_sui::*;
