//! Signing account abstraction
//!
//! Key storage lives outside this crate. Adapters only need an address and a
//! way to turn chain-specific signing input into signed bytes.

/// What a [`Account::sign`] call is producing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignPurpose {
    /// Input: unsigned EIP-2718 signing payload. Output: signed raw transaction.
    EvmTransaction,
    /// Input: Aptos signing message. Output: BCS transaction authenticator.
    AptosTransaction,
    /// As [`SignPurpose::AptosTransaction`] but for simulation; the
    /// authenticator must not carry a valid signature.
    AptosSimulation,
    /// Input: BCS transaction data. Output: serialized Sui signature
    /// (flag || signature || public key).
    SuiTransaction,
}

/// A key holder able to sign for one address
pub trait Account: Send + Sync {
    /// Address in the chain's native text encoding
    fn address(&self) -> String;

    fn sign(&self, message: &[u8], purpose: SignPurpose) -> eyre::Result<Vec<u8>>;
}
