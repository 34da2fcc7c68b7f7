//! Red Packet Integration Tests
//!
//! Offline tests exercise the public API end to end with the real chain
//! clients (constructing a client performs no network I/O). The live test
//! fetches a creation detail from a running network.
//!
//! ## Live test setup
//!
//! - `REDPACKET_LIVE_CHAIN` - `eth`, `aptos` or `sui`
//! - `REDPACKET_LIVE_RPC_URL` - Node URL (Aptos: REST base including `/v1`)
//! - `REDPACKET_LIVE_CONTRACT` - Red packet contract address / package id
//! - `REDPACKET_LIVE_TX_HASH` - Hash (or digest) of a creation transaction
//! - `REDPACKET_LIVE_EVM_CHAIN_ID` - EVM chain id (default 1)
//! - Adapter settings from `REDPACKET_*` config variables (see `ContractConfig::load_from_env`)
//!
//! ## Running
//!
//! ```bash
//! REDPACKET_LIVE_CHAIN=sui \
//! REDPACKET_LIVE_RPC_URL=https://fullnode.mainnet.sui.io:443 \
//! REDPACKET_LIVE_CONTRACT=0x... \
//! REDPACKET_LIVE_TX_HASH=... \
//! REDPACKET_SUI_CONFIG_OBJECT=0x... \
//! cargo test --test red_packet_integration -- --ignored --nocapture
//! ```

use std::sync::Arc;

use redpacket_rs::aptos::AptosRestClient;
use redpacket_rs::evm::EvmRpcChain;
use redpacket_rs::sui::SuiRpcClient;
use redpacket_rs::{
    calc_total, new_red_packet_contract, ChainHandle, ChainType, ContractConfig, RedPacketAction,
    RedPacketDetail, RedPacketError, RedPacketFeeCalculator, SuiContractConfig,
    TransactionStatus,
};

const EVM_CONTRACT: &str = "0x5555555555555555555555555555555555555555";
const EVM_TOKEN: &str = "0xdAC17F958D2ee523a2206206994597C13D831ec7";
const SUI_PACKAGE: &str = "0xf5244fdbeae35291fd829d5dd13cf8ce596c986ca1373687600808ee6d7c0241";
const SUI_CONFIG: &str = "0x1029909aa0c52524de0ce602cc80b52a17c3962b07fac67f982e6388c72be2e7";

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init()
        .ok();
}

fn evm_handle() -> ChainHandle {
    ChainHandle::Evm(Arc::new(
        EvmRpcChain::new("http://localhost:8545", 31337).unwrap(),
    ))
}

fn sui_handle() -> ChainHandle {
    ChainHandle::Sui(Arc::new(
        SuiRpcClient::new("http://localhost:9000").unwrap(),
    ))
}

fn aptos_handle() -> ChainHandle {
    ChainHandle::Aptos(Arc::new(
        AptosRestClient::new("http://localhost:8080/v1").unwrap(),
    ))
}

#[test]
fn test_factory_rejects_mismatched_handles() {
    let config = ContractConfig {
        sui: Some(SuiContractConfig::new(SUI_CONFIG)),
        ..Default::default()
    };

    let cases = [
        (ChainType::Evm, sui_handle()),
        (ChainType::Aptos, evm_handle()),
        (ChainType::Sui, aptos_handle()),
    ];
    for (chain_type, handle) in cases {
        let actual = handle.chain_type();
        let err = new_red_packet_contract(chain_type, handle, SUI_PACKAGE, &config)
            .err()
            .expect("mismatched handle must fail");
        assert!(
            matches!(err, RedPacketError::InvalidChainObject { expected, actual: a } if expected == chain_type && a == actual),
            "unexpected error {:?}",
            err
        );
    }
}

#[test]
fn test_factory_requires_sui_config() {
    let err = new_red_packet_contract(
        ChainType::Sui,
        sui_handle(),
        SUI_PACKAGE,
        &ContractConfig::default(),
    )
    .err()
    .expect("sui without config must fail");
    assert!(matches!(err, RedPacketError::MissingConfig(_)));
}

#[test]
fn test_chain_type_tags() {
    assert_eq!("eth".parse::<ChainType>().unwrap(), ChainType::Evm);
    assert_eq!("sui".parse::<ChainType>().unwrap(), ChainType::Sui);
    assert!(matches!(
        "solana".parse::<ChainType>(),
        Err(RedPacketError::UnsupportedChainType(_))
    ));
}

#[test]
fn test_evm_estimate_fee_is_offline() {
    let contract = new_red_packet_contract(
        ChainType::Evm,
        evm_handle(),
        EVM_CONTRACT,
        &ContractConfig::default(),
    )
    .unwrap();

    let create = RedPacketAction::create(EVM_TOKEN, 101, "5000000").unwrap();
    let fee = tokio_test::block_on(contract.estimate_fee(&create)).unwrap();
    // 200 units of 0.025 ether
    assert_eq!(fee, "5000000000000000000");

    let open = RedPacketAction::open(EVM_TOKEN, 1, vec![], vec![]).unwrap();
    assert_eq!(tokio_test::block_on(contract.estimate_fee(&open)).unwrap(), "0");
}

#[tokio::test]
async fn test_sui_estimate_fee_matches_calc_total() {
    let config = ContractConfig {
        sui: Some(SuiContractConfig::new(SUI_CONFIG)),
        ..Default::default()
    };
    let contract =
        new_red_packet_contract(ChainType::Sui, sui_handle(), SUI_PACKAGE, &config).unwrap();

    for amount in [0u64, 9_999, 10_000, 1_000_000, 123_456_789] {
        let action = RedPacketAction::create("0x2::sui::SUI", 1, amount.to_string()).unwrap();
        let fee: u64 = contract.estimate_fee(&action).await.unwrap().parse().unwrap();
        assert_eq!(fee, calc_total(amount, 250) - amount);
    }

    let close = RedPacketAction::close_object("0x2::sui::SUI", "0xbeef", "0x1");
    assert!(matches!(
        contract.estimate_fee(&close).await,
        Err(RedPacketError::UnsupportedMethod(_))
    ));
}

#[test]
fn test_fee_deduction_round_trip() {
    let calculator = RedPacketFeeCalculator::new(250);
    for amount in [10_000u64, 10_001, 99_999, 1_000_000, 987_654_321, u32::MAX as u64] {
        let total = calculator.total_for(amount);
        assert_eq!(calculator.net_of(total), amount, "amount {}", amount);
    }
    for amount in [0u64, 1, 9_999] {
        assert_eq!(calc_total(amount, 1_000), amount);
    }
}

#[test]
fn test_action_validation() {
    for bad in ["abc", "", "-5", "+5", "1.5"] {
        assert!(
            matches!(
                RedPacketAction::create(EVM_TOKEN, 1, bad),
                Err(RedPacketError::InvalidAmount(_))
            ),
            "amount {:?} should be rejected",
            bad
        );
    }

    let err = RedPacketAction::open(
        EVM_TOKEN,
        1,
        vec!["0x1".to_string(), "0x2".to_string()],
        vec!["1".to_string()],
    )
    .unwrap_err();
    assert!(matches!(
        err,
        RedPacketError::LengthMismatch { addresses: 2, amounts: 1 }
    ));
}

#[test]
fn test_detail_transport_round_trip() {
    let mut detail = RedPacketDetail::default();
    detail.transaction.hash_string = "0xabc".to_string();
    detail.transaction.amount = "1025500".to_string();
    detail.transaction.status = TransactionStatus::Failure;
    detail.transaction.failure_message = "out of gas".to_string();
    detail.amount_name = "Tether USD".to_string();
    detail.amount_decimal = 6;
    detail.red_packet_amount = "1000000".to_string();
    detail.chain_name = "eth".to_string();

    let json = detail.to_json_string().unwrap();
    assert_eq!(RedPacketDetail::from_json_str(&json).unwrap(), detail);

    let partial = RedPacketDetail::from_json_str(r#"{"HashString":"0x1","Extra":true}"#).unwrap();
    assert_eq!(partial.transaction.hash_string, "0x1");
    assert_eq!(partial.transaction.status, TransactionStatus::None);
}

/// Live context loaded from the environment
struct LiveContext {
    chain_type: ChainType,
    rpc_url: String,
    contract: String,
    tx_hash: String,
    evm_chain_id: u64,
}

impl LiveContext {
    fn from_env() -> Result<Self, String> {
        let var = |name: &str| std::env::var(name).map_err(|_| format!("{} not set", name));
        Ok(Self {
            chain_type: var("REDPACKET_LIVE_CHAIN")?
                .parse()
                .map_err(|e| format!("Invalid REDPACKET_LIVE_CHAIN: {}", e))?,
            rpc_url: var("REDPACKET_LIVE_RPC_URL")?,
            contract: var("REDPACKET_LIVE_CONTRACT")?,
            tx_hash: var("REDPACKET_LIVE_TX_HASH")?,
            evm_chain_id: std::env::var("REDPACKET_LIVE_EVM_CHAIN_ID")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1),
        })
    }

    fn handle(&self) -> eyre::Result<ChainHandle> {
        Ok(match self.chain_type {
            ChainType::Evm => {
                ChainHandle::Evm(Arc::new(EvmRpcChain::new(&self.rpc_url, self.evm_chain_id)?))
            }
            ChainType::Aptos => ChainHandle::Aptos(Arc::new(AptosRestClient::new(&self.rpc_url)?)),
            ChainType::Sui => ChainHandle::Sui(Arc::new(SuiRpcClient::new(&self.rpc_url)?)),
        })
    }
}

#[tokio::test]
#[ignore = "requires a live network: REDPACKET_LIVE_CHAIN, REDPACKET_LIVE_RPC_URL, REDPACKET_LIVE_CONTRACT, REDPACKET_LIVE_TX_HASH"]
async fn test_live_fetch_creation_detail() {
    init_tracing();

    let ctx = match LiveContext::from_env() {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Skipping: {}", e);
            return;
        }
    };

    let config = ContractConfig::load_from_env().expect("REDPACKET_* config should be valid");
    let handle = ctx.handle().expect("chain client should build");
    let contract = new_red_packet_contract(ctx.chain_type, handle, &ctx.contract, &config)
        .expect("contract should resolve");

    let detail = contract
        .fetch_red_packet_creation_detail(&ctx.tx_hash)
        .await
        .expect("creation detail should decode");

    tracing::info!(
        hash = %detail.transaction.hash_string,
        amount = %detail.transaction.amount,
        red_packet_amount = %detail.red_packet_amount,
        token = %detail.amount_name,
        fees = %detail.transaction.estimate_fees,
        "Fetched creation detail"
    );

    assert_eq!(detail.chain_name, ctx.chain_type.as_str());
    assert!(!detail.transaction.amount.is_empty());
    let json = detail.to_json_string().unwrap();
    assert_eq!(RedPacketDetail::from_json_str(&json).unwrap(), detail);
}
