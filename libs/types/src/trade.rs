//! Trade execution types

use crate::ids::TradeId;
use crate::pair::{LimitPrice, TokenPair};
use ethers::types::{H256, U256};
use serde::{Deserialize, Serialize};

/// The record of one match between two resident orders.
///
/// Immutable once created; owned by the settlement ledger. `amount` is
/// denominated in base units of `pair`, and `price` is the resident
/// (maker) order's exact limit price at execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    pub trade_id: TradeId,
    /// Global monotonic sequence assigned at execution
    pub sequence: u64,
    pub pair: TokenPair,

    /// Fingerprint of the buy-side order
    pub buy_order: H256,
    /// Fingerprint of the sell-side order
    pub sell_order: H256,

    /// Matched quantity in base units
    pub amount: U256,
    /// Execution price, quote per base
    pub price: LimitPrice,

    /// Unix seconds
    pub executed_at: u64,
}

impl Trade {
    pub fn new(
        sequence: u64,
        pair: TokenPair,
        buy_order: H256,
        sell_order: H256,
        amount: U256,
        price: LimitPrice,
        executed_at: u64,
    ) -> Self {
        Self {
            trade_id: TradeId::new(),
            sequence,
            pair,
            buy_order,
            sell_order,
            amount,
            price,
            executed_at,
        }
    }

    /// Composite key under which the ledger enforces uniqueness.
    pub fn uniqueness_key(&self) -> (H256, H256, u64) {
        (self.buy_order, self.sell_order, self.sequence)
    }
}
