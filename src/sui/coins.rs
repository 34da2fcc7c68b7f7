//! Coin object selection
//!
//! Sui balances are split across coin objects, so every payment has to name
//! the objects it spends. Selection prefers a single coin large enough for the
//! target; otherwise it accumulates the largest coins first, which keeps the
//! number of inputs (and therefore the transaction size) small.

use tracing::debug;

use crate::error::{RedPacketError, Result};
use crate::sui::chain::SuiCoin;

/// Maximum number of coin objects one transaction may reference
pub const MAX_COIN_OBJECTS: usize = 256;

/// Coins chosen to cover a target amount
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoinSelection {
    pub coins: Vec<SuiCoin>,
    /// Sum of the selected balances
    pub total: u128,
}

/// Sum of all balances in `coins`
pub fn total_balance(coins: &[SuiCoin]) -> u128 {
    coins.iter().map(|c| c.balance as u128).sum()
}

/// Pick coins of `coin_type` whose balances sum to at least `target`.
///
/// At least one coin is always selected, so a zero target still yields a
/// usable gas payment.
pub fn select_coins(coins: &[SuiCoin], target: u128, coin_type: &str) -> Result<CoinSelection> {
    let insufficient = || RedPacketError::InsufficientBalance {
        coin_type: coin_type.to_string(),
        required: target,
        available: total_balance(coins),
    };

    if let Some(single) = coins
        .iter()
        .filter(|c| c.balance as u128 >= target)
        .min_by_key(|c| c.balance)
    {
        debug!(coin_type = %coin_type, target = %target, coin = %single.coin_object_id, "Selected single coin");
        return Ok(CoinSelection {
            coins: vec![single.clone()],
            total: single.balance as u128,
        });
    }

    let mut sorted: Vec<&SuiCoin> = coins.iter().collect();
    sorted.sort_by(|a, b| b.balance.cmp(&a.balance));

    let mut selected = Vec::new();
    let mut total = 0u128;
    for coin in sorted {
        if total >= target {
            break;
        }
        total += coin.balance as u128;
        selected.push(coin.clone());
    }

    if total < target || selected.is_empty() {
        return Err(insufficient());
    }
    if selected.len() > MAX_COIN_OBJECTS {
        return Err(RedPacketError::TooManyCoins {
            coin_type: coin_type.to_string(),
            count: selected.len(),
        });
    }

    debug!(
        coin_type = %coin_type,
        target = %target,
        count = selected.len(),
        total = %total,
        "Selected coins"
    );
    Ok(CoinSelection {
        coins: selected,
        total,
    })
}
