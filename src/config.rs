//! Adapter configuration
//!
//! Per-chain settings passed to [`crate::new_red_packet_contract`]. Every
//! field has a documented default except the Sui shared config object,
//! which has no sensible default and must be supplied.

use std::env;
use std::str::FromStr;

use eyre::{eyre, Result, WrapErr};
use serde::Deserialize;

use crate::fee::{DEFAULT_FEE_POINT, FEE_DENOMINATOR};
use crate::move_types::AccountAddress;

/// Configuration for every adapter
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContractConfig {
    #[serde(default)]
    pub evm: EvmContractConfig,
    #[serde(default)]
    pub aptos: AptosContractConfig,
    /// Required for Sui contracts
    #[serde(default)]
    pub sui: Option<SuiContractConfig>,
}

/// EVM adapter configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EvmContractConfig {
    /// Gas limit used when the node's estimator fails
    #[serde(default = "default_fallback_gas_limit")]
    pub fallback_gas_limit: u64,
}

impl Default for EvmContractConfig {
    fn default() -> Self {
        Self {
            fallback_gas_limit: default_fallback_gas_limit(),
        }
    }
}

/// Generation of the Aptos red packet module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AptosSchema {
    /// Single `RedPackets` resource with a global fee point, native coin only
    Legacy,
    /// `GlobalConfig` resource with one handler per coin type
    #[default]
    Handler,
}

impl FromStr for AptosSchema {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "legacy" => Ok(AptosSchema::Legacy),
            "handler" => Ok(AptosSchema::Handler),
            other => Err(eyre!("Unknown Aptos red packet schema: {}", other)),
        }
    }
}

/// Aptos adapter configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AptosContractConfig {
    #[serde(default)]
    pub schema: AptosSchema,
}

/// Sui adapter configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SuiContractConfig {
    /// Shared `red_packet::Config` object created when the package was published
    pub config_object_id: String,
    /// Platform fee in basis points
    #[serde(default = "default_sui_fee_point")]
    pub fee_point: u64,
    /// Budget used for the draft transaction before dry-run estimation (MIST)
    #[serde(default = "default_sui_max_gas_budget")]
    pub max_gas_budget: u64,
}

impl SuiContractConfig {
    pub fn new(config_object_id: impl Into<String>) -> Self {
        Self {
            config_object_id: config_object_id.into(),
            fee_point: default_sui_fee_point(),
            max_gas_budget: default_sui_max_gas_budget(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        AccountAddress::from_hex_literal(&self.config_object_id)
            .map_err(|_| eyre!("Invalid Sui config object id: {}", self.config_object_id))?;
        if self.fee_point >= FEE_DENOMINATOR {
            return Err(eyre!(
                "Sui fee point must be below {} basis points, got {}",
                FEE_DENOMINATOR,
                self.fee_point
            ));
        }
        if self.max_gas_budget == 0 {
            return Err(eyre!("Sui max gas budget must be non-zero"));
        }
        Ok(())
    }
}

fn default_fallback_gas_limit() -> u64 {
    200_000
}

fn default_sui_fee_point() -> u64 {
    DEFAULT_FEE_POINT
}

fn default_sui_max_gas_budget() -> u64 {
    500_000_000
}

impl ContractConfig {
    /// Load configuration from `REDPACKET_*` environment variables
    pub fn load_from_env() -> Result<Self> {
        let evm = EvmContractConfig {
            fallback_gas_limit: env::var("REDPACKET_EVM_FALLBACK_GAS_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_fallback_gas_limit),
        };

        let aptos = AptosContractConfig {
            schema: match env::var("REDPACKET_APTOS_SCHEMA") {
                Ok(v) => v.parse().wrap_err("REDPACKET_APTOS_SCHEMA is invalid")?,
                Err(_) => AptosSchema::default(),
            },
        };

        let sui = match env::var("REDPACKET_SUI_CONFIG_OBJECT") {
            Ok(config_object_id) => Some(SuiContractConfig {
                config_object_id,
                fee_point: env::var("REDPACKET_SUI_FEE_POINT")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or_else(default_sui_fee_point),
                max_gas_budget: env::var("REDPACKET_SUI_MAX_GAS_BUDGET")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or_else(default_sui_max_gas_budget),
            }),
            Err(_) => None,
        };

        let config = Self { evm, aptos, sui };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.evm.fallback_gas_limit == 0 {
            return Err(eyre!("EVM fallback gas limit must be non-zero"));
        }
        if let Some(sui) = &self.sui {
            sui.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ContractConfig::default();
        assert_eq!(config.evm.fallback_gas_limit, 200_000);
        assert_eq!(config.aptos.schema, AptosSchema::Handler);
        assert!(config.sui.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: ContractConfig = serde_json::from_str(
            r#"{"aptos":{"schema":"legacy"},"sui":{"config_object_id":"0x5"}}"#,
        )
        .unwrap();
        assert_eq!(config.aptos.schema, AptosSchema::Legacy);
        let sui = config.sui.unwrap();
        assert_eq!(sui.fee_point, 250);
        assert_eq!(sui.max_gas_budget, 500_000_000);
    }

    #[test]
    fn test_sui_config_validation() {
        assert!(SuiContractConfig::new("0x5").validate().is_ok());
        assert!(SuiContractConfig::new("not-an-object").validate().is_err());

        let mut config = SuiContractConfig::new("0x5");
        config.fee_point = 10_000;
        assert!(config.validate().is_err());

        let mut config = SuiContractConfig::new("0x5");
        config.max_gas_budget = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_aptos_schema_parse() {
        assert_eq!("Legacy".parse::<AptosSchema>().unwrap(), AptosSchema::Legacy);
        assert_eq!("handler".parse::<AptosSchema>().unwrap(), AptosSchema::Handler);
        assert!("v3".parse::<AptosSchema>().is_err());
    }
}
