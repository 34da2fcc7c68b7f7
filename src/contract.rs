//! Uniform red packet contract surface and the per-chain factory

use std::sync::Arc;

use async_trait::async_trait;

use crate::account::Account;
use crate::action::RedPacketAction;
use crate::config::ContractConfig;
use crate::error::{RedPacketError, Result};
use crate::types::{ChainType, RedPacketDetail};

#[cfg(feature = "aptos")]
use crate::aptos::{AptosChain, AptosRedPacketContract};
#[cfg(feature = "evm")]
use crate::evm::{EvmChain, EvmRedPacketContract};
#[cfg(feature = "sui")]
use crate::sui::{SuiChain, SuiRedPacketContract};

/// A deployed red packet contract on one chain
///
/// Implementations hold no per-call state: every method re-reads what it
/// needs from the chain, so a contract can be shared across tasks.
#[async_trait]
pub trait RedPacketContract: Send + Sync {
    fn chain_type(&self) -> ChainType;

    /// Normalized contract address (package id on Sui)
    fn address(&self) -> &str;

    /// Build, sign and submit `action`. Returns the transaction hash (digest on Sui).
    async fn send_transaction(&self, account: &dyn Account, action: &RedPacketAction)
        -> Result<String>;

    /// Decode a creation transaction into a [`RedPacketDetail`]
    async fn fetch_red_packet_creation_detail(&self, hash: &str) -> Result<RedPacketDetail>;

    /// Platform fee charged on top of the packet amount, as a decimal string
    async fn estimate_fee(&self, action: &RedPacketAction) -> Result<String>;

    /// Network gas cost of submitting `action`, as a decimal string
    async fn estimate_gas_fee(
        &self,
        account: &dyn Account,
        action: &RedPacketAction,
    ) -> Result<String>;
}

/// A chain collaborator, one variant per supported chain family
#[derive(Clone)]
pub enum ChainHandle {
    #[cfg(feature = "evm")]
    Evm(Arc<dyn EvmChain>),
    #[cfg(feature = "aptos")]
    Aptos(Arc<dyn AptosChain>),
    #[cfg(feature = "sui")]
    Sui(Arc<dyn SuiChain>),
}

impl ChainHandle {
    pub fn chain_type(&self) -> ChainType {
        match self {
            #[cfg(feature = "evm")]
            ChainHandle::Evm(_) => ChainType::Evm,
            #[cfg(feature = "aptos")]
            ChainHandle::Aptos(_) => ChainType::Aptos,
            #[cfg(feature = "sui")]
            ChainHandle::Sui(_) => ChainType::Sui,
        }
    }
}

impl std::fmt::Debug for ChainHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ChainHandle").field(&self.chain_type()).finish()
    }
}

/// Resolve the red packet contract for `chain_type` at `contract_address`.
///
/// Fails with [`RedPacketError::InvalidChainObject`] when `chain` belongs to a
/// different chain family, and with [`RedPacketError::MissingConfig`] when a
/// Sui contract is requested without a Sui config.
pub fn new_red_packet_contract(
    chain_type: ChainType,
    chain: ChainHandle,
    contract_address: &str,
    config: &ContractConfig,
) -> Result<Box<dyn RedPacketContract>> {
    let actual = chain.chain_type();
    if actual != chain_type {
        return Err(RedPacketError::InvalidChainObject {
            expected: chain_type,
            actual,
        });
    }

    let contract: Box<dyn RedPacketContract> = match chain {
        #[cfg(feature = "evm")]
        ChainHandle::Evm(chain) => Box::new(EvmRedPacketContract::new(
            chain,
            contract_address,
            &config.evm,
        )?),
        #[cfg(feature = "aptos")]
        ChainHandle::Aptos(chain) => Box::new(AptosRedPacketContract::new(
            chain,
            contract_address,
            &config.aptos,
        )?),
        #[cfg(feature = "sui")]
        ChainHandle::Sui(chain) => {
            let sui_config = config
                .sui
                .as_ref()
                .ok_or(RedPacketError::MissingConfig("sui config object is required"))?;
            Box::new(SuiRedPacketContract::new(chain, contract_address, sui_config)?)
        }
    };

    Ok(contract)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SuiContractConfig;
    use crate::testing::{MockAptosChain, MockEvmChain, MockSuiChain};

    const EVM_CONTRACT: &str = "0x5555555555555555555555555555555555555555";
    const MOVE_CONTRACT: &str = "0xf5244fdbeae35291fd829d5dd13cf8ce596c986ca1373687600808ee6d7c0241";

    fn sui_config() -> ContractConfig {
        ContractConfig {
            sui: Some(SuiContractConfig::new("0x5")),
            ..Default::default()
        }
    }

    #[test]
    fn test_resolves_each_chain_type() {
        let config = sui_config();

        let evm = new_red_packet_contract(
            ChainType::Evm,
            ChainHandle::Evm(Arc::new(MockEvmChain::default())),
            EVM_CONTRACT,
            &config,
        )
        .unwrap();
        assert_eq!(evm.chain_type(), ChainType::Evm);

        let aptos = new_red_packet_contract(
            ChainType::Aptos,
            ChainHandle::Aptos(Arc::new(MockAptosChain::default())),
            MOVE_CONTRACT,
            &config,
        )
        .unwrap();
        assert_eq!(aptos.chain_type(), ChainType::Aptos);
        assert_eq!(aptos.address(), MOVE_CONTRACT);

        let sui = new_red_packet_contract(
            ChainType::Sui,
            ChainHandle::Sui(Arc::new(MockSuiChain::default())),
            MOVE_CONTRACT.trim_start_matches("0x"),
            &config,
        )
        .unwrap();
        assert_eq!(sui.chain_type(), ChainType::Sui);
        assert_eq!(sui.address(), MOVE_CONTRACT);
    }

    #[test]
    fn test_mismatched_handle_is_invalid_chain_object() {
        let err = new_red_packet_contract(
            ChainType::Sui,
            ChainHandle::Aptos(Arc::new(MockAptosChain::default())),
            MOVE_CONTRACT,
            &sui_config(),
        )
        .err()
        .unwrap();
        assert!(matches!(
            err,
            RedPacketError::InvalidChainObject {
                expected: ChainType::Sui,
                actual: ChainType::Aptos
            }
        ));
        assert!(err.is_validation_error());
    }

    #[test]
    fn test_sui_requires_config() {
        let err = new_red_packet_contract(
            ChainType::Sui,
            ChainHandle::Sui(Arc::new(MockSuiChain::default())),
            MOVE_CONTRACT,
            &ContractConfig::default(),
        )
        .err()
        .unwrap();
        assert!(matches!(err, RedPacketError::MissingConfig(_)));
    }

    #[test]
    fn test_malformed_contract_address() {
        let err = new_red_packet_contract(
            ChainType::Evm,
            ChainHandle::Evm(Arc::new(MockEvmChain::default())),
            "0x1234",
            &ContractConfig::default(),
        )
        .err()
        .unwrap();
        assert!(matches!(err, RedPacketError::InvalidAddress(_)));
    }

    #[test]
    fn test_handle_debug_names_chain() {
        let handle = ChainHandle::Evm(Arc::new(MockEvmChain::default()));
        assert_eq!(format!("{:?}", handle), "ChainHandle(Evm)");
    }
}
