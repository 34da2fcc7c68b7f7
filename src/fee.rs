//! Platform fee calculations
//!
//! Two fee policies exist side by side:
//!
//! - Move chains (Aptos, Sui) charge a proportional fee in basis points.
//!   [`calc_total`] finds the gross amount that leaves exactly the requested
//!   net amount after the contract deducts its fee.
//! - The EVM contract charges a flat prepaid fee tiered by packet count
//!   ([`evm_prepaid_fee`]).

use alloy::primitives::U256;

/// Basis point denominator
pub const FEE_DENOMINATOR: u64 = 10_000;

/// Fee point assumed when a contract reports a rate of zero (2.5%)
pub const DEFAULT_FEE_POINT: u64 = 250;

/// One EVM prepaid fee unit: 0.025 of the 18-decimal native currency
pub const EVM_FEE_UNIT_WEI: u128 = 25_000_000_000_000_000;

/// Smallest gross total that nets `amount` after the contract's fee deduction.
///
/// The contract keeps `floor(total / 10000) * fee_point` and places the rest
/// in the pool. Amounts below 10000 are returned unchanged (the fee rounds to
/// zero at that scale). When no candidate reproduces `amount` exactly the
/// amount itself is returned.
pub fn calc_total(amount: u64, fee_point: u64) -> u64 {
    let fee_point = if fee_point == 0 {
        DEFAULT_FEE_POINT
    } else {
        fee_point
    } as u128;
    let amount = amount as u128;
    let denominator = FEE_DENOMINATOR as u128;

    if amount < denominator {
        return amount as u64;
    }

    let fee = amount / denominator * fee_point;
    let mut left: u128 = 0;
    let mut right: u128 = amount / fee_point;
    while left <= right {
        let center = (left + right) / 2;
        let total = center * fee_point + fee + amount;
        let net = total.saturating_sub(total / denominator * fee_point);
        if net > amount {
            // center > 0 here: at center 0 the net never exceeds amount
            right = center - 1;
        } else if net < amount {
            left = center + 1;
        } else {
            return u64::try_from(total).unwrap_or(amount as u64);
        }
    }
    amount as u64
}

/// Stateful wrapper over [`calc_total`] for a fixed fee point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RedPacketFeeCalculator {
    fee_point: u64,
}

impl RedPacketFeeCalculator {
    /// Create a calculator; a zero fee point falls back to [`DEFAULT_FEE_POINT`]
    pub fn new(fee_point: u64) -> Self {
        let fee_point = if fee_point == 0 {
            DEFAULT_FEE_POINT
        } else {
            fee_point
        };
        Self { fee_point }
    }

    pub fn fee_point(&self) -> u64 {
        self.fee_point
    }

    /// Gross amount to send so that `amount` lands in the pool
    pub fn total_for(&self, amount: u64) -> u64 {
        calc_total(amount, self.fee_point)
    }

    /// Platform fee on top of `amount`
    pub fn fee_for(&self, amount: u64) -> u64 {
        self.total_for(amount).saturating_sub(amount)
    }

    /// Amount the contract places in the pool for a gross `total`
    pub fn net_of(&self, total: u64) -> u64 {
        total.saturating_sub(total / FEE_DENOMINATOR * self.fee_point)
    }
}

impl Default for RedPacketFeeCalculator {
    fn default() -> Self {
        Self::new(DEFAULT_FEE_POINT)
    }
}

/// Flat prepaid fee rate (in fee units) for a packet of `count` shares
pub fn evm_prepaid_fee_rate(count: u64) -> u64 {
    match count {
        0..=10 => 4,
        11..=100 => 16,
        // tiers above 1000 are capped at the 1000-share rate
        _ => 200,
    }
}

/// Flat prepaid fee in wei for a packet of `count` shares
pub fn evm_prepaid_fee(count: u64) -> U256 {
    U256::from(evm_prepaid_fee_rate(count)) * U256::from(EVM_FEE_UNIT_WEI)
}
