//! Read-only ledger projections

use ethers::types::H256;
use types::pair::TokenPair;
use types::trade::Trade;

/// Filter for ledger queries. Empty filter matches everything.
#[derive(Debug, Clone, Default)]
pub struct TradeFilter {
    pub pair: Option<TokenPair>,
    /// Inclusive lower bound on `executed_at`
    pub from: Option<u64>,
    /// Inclusive upper bound on `executed_at`
    pub to: Option<u64>,
    /// Match trades where this fingerprint is either side
    pub order: Option<H256>,
}

impl TradeFilter {
    pub fn by_pair(pair: TokenPair) -> Self {
        Self {
            pair: Some(pair),
            ..Default::default()
        }
    }

    pub fn by_order(order: H256) -> Self {
        Self {
            order: Some(order),
            ..Default::default()
        }
    }

    pub fn between(mut self, from: Option<u64>, to: Option<u64>) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    /// Whether `trade` passes every set criterion.
    pub fn matches(&self, trade: &Trade) -> bool {
        if let Some(pair) = &self.pair {
            if trade.pair != *pair {
                return false;
            }
        }
        if let Some(from) = self.from {
            if trade.executed_at < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if trade.executed_at > to {
                return false;
            }
        }
        if let Some(order) = self.order {
            if trade.buy_order != order && trade.sell_order != order {
                return false;
            }
        }
        true
    }
}
