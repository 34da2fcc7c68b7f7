//! Deterministic signing account

use std::sync::Mutex;

use crate::account::{Account, SignPurpose};

/// Account whose "signature" is the purpose tag followed by the message
///
/// Every signing request is recorded for inspection.
#[derive(Debug, Default)]
pub struct MockAccount {
    pub address: String,
    pub signed: Mutex<Vec<(SignPurpose, Vec<u8>)>>,
}

impl MockAccount {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            signed: Mutex::new(Vec::new()),
        }
    }
}

impl Account for MockAccount {
    fn address(&self) -> String {
        self.address.clone()
    }

    fn sign(&self, message: &[u8], purpose: SignPurpose) -> eyre::Result<Vec<u8>> {
        let mut signed = self
            .signed
            .lock()
            .map_err(|_| eyre::eyre!("mock account lock poisoned"))?;
        signed.push((purpose, message.to_vec()));

        let mut out = vec![purpose as u8];
        out.extend_from_slice(message);
        Ok(out)
    }
}
