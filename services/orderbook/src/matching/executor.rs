//! Trade execution
//!
//! Turns a matched quantity into an immutable trade record with a
//! globally monotonic sequence number.

use ethers::types::{H256, U256};
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use types::pair::{LimitPrice, TokenPair};
use types::trade::Trade;

/// Match execution errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    #[error("Trade amount must be positive")]
    ZeroAmount,

    #[error("An order cannot trade against itself")]
    IdenticalOrders,
}

/// Executes matches, assigning each trade a monotonic sequence.
///
/// The counter is atomic so pair books matching in parallel never reuse
/// a sequence number.
#[derive(Debug)]
pub struct MatchExecutor {
    sequence: AtomicU64,
}

impl MatchExecutor {
    pub fn new(starting_sequence: u64) -> Self {
        Self {
            sequence: AtomicU64::new(starting_sequence),
        }
    }

    /// Execute one trade between a buy-side and a sell-side order.
    ///
    /// `amount` is in base units; `price` is the maker's limit price.
    pub fn execute_trade(
        &self,
        pair: TokenPair,
        buy_order: H256,
        sell_order: H256,
        amount: U256,
        price: LimitPrice,
        executed_at: u64,
    ) -> Result<Trade, MatchError> {
        if amount.is_zero() {
            return Err(MatchError::ZeroAmount);
        }
        if buy_order == sell_order {
            return Err(MatchError::IdenticalOrders);
        }

        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst);
        Ok(Trade::new(
            sequence, pair, buy_order, sell_order, amount, price, executed_at,
        ))
    }
}
