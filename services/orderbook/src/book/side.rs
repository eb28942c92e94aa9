//! One side of a pair's book
//!
//! Buy orders rest on the bid side (best = highest price), sell orders
//! on the ask side (best = lowest price). A BTreeMap keyed by exact
//! rational prices keeps iteration order deterministic.

use super::price_level::{LevelEntry, PriceLevel};
use ethers::types::H256;
use std::collections::BTreeMap;
use types::pair::LimitPrice;

/// Which end of the price ordering is "best" for this side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideOf {
    /// Resting buy orders; highest price has priority
    Bids,
    /// Resting sell orders; lowest price has priority
    Asks,
}

/// Price-ordered levels for one side of the book.
#[derive(Debug, Clone)]
pub struct SideBook {
    side_of: SideOf,
    levels: BTreeMap<LimitPrice, PriceLevel>,
}

impl SideBook {
    pub fn new(side_of: SideOf) -> Self {
        Self {
            side_of,
            levels: BTreeMap::new(),
        }
    }

    /// Insert a resting entry at its limit price, behind any earlier
    /// orders at the same price.
    pub fn insert(&mut self, price: LimitPrice, entry: LevelEntry) {
        self.levels.entry(price).or_default().push_back(entry);
    }

    /// The best price on this side, if any level exists.
    pub fn best_price(&self) -> Option<LimitPrice> {
        match self.side_of {
            SideOf::Bids => self.levels.keys().next_back().copied(),
            SideOf::Asks => self.levels.keys().next().copied(),
        }
    }

    /// Read-only access to the level at `price`.
    pub fn level(&self, price: &LimitPrice) -> Option<&PriceLevel> {
        self.levels.get(price)
    }

    /// Mutable access to the level at `price`.
    pub fn level_mut(&mut self, price: &LimitPrice) -> Option<&mut PriceLevel> {
        self.levels.get_mut(price)
    }

    /// Drop the level at `price` if it holds no entries.
    pub fn prune_level(&mut self, price: &LimitPrice) {
        if self.levels.get(price).is_some_and(|l| l.is_empty()) {
            self.levels.remove(price);
        }
    }

    /// Remove one entry by fingerprint from the level at `price`.
    pub fn remove(&mut self, fingerprint: &H256, price: &LimitPrice) -> Option<LevelEntry> {
        let removed = self.levels.get_mut(price)?.remove(fingerprint);
        self.prune_level(price);
        removed
    }

    /// Prices from best to worst.
    pub fn prices_best_first(&self) -> Vec<LimitPrice> {
        match self.side_of {
            SideOf::Bids => self.levels.keys().rev().copied().collect(),
            SideOf::Asks => self.levels.keys().copied().collect(),
        }
    }

    /// Whether `incoming` crosses a resting level at `resting` price.
    ///
    /// A bid is crossed by an incoming sell at or below it; an ask by an
    /// incoming buy at or above it.
    pub fn crosses(&self, incoming: &LimitPrice, resting: &LimitPrice) -> bool {
        match self.side_of {
            SideOf::Bids => resting >= incoming,
            SideOf::Asks => resting <= incoming,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }
}
