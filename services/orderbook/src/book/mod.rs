//! Book infrastructure for one trading pair
//!
//! Contains price levels, side books, and the pair book that ties both
//! sides to the resident-order registry.

pub mod price_level;
pub mod side;

pub use price_level::{LevelEntry, PriceLevel};
pub use side::{SideBook, SideOf};

use crate::resident::ResidentOrder;
use ethers::types::{Address, H256, U256};
use serde::Serialize;
use std::collections::HashMap;
use types::order::{OrderStatus, Side};
use types::pair::{LimitPrice, TokenPair};

/// A matchable resting order: the front of the best crossing level.
#[derive(Debug, Clone, Copy)]
pub struct Candidate {
    pub fingerprint: H256,
    pub price: LimitPrice,
    pub remaining: U256,
}

/// One resting order in a snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct RestingOrderView {
    pub fingerprint: H256,
    pub signer: Address,
    pub price: LimitPrice,
    pub remaining_amount: U256,
    pub admitted_at: u64,
}

/// Point-in-time view of a pair's book, both sides in priority order.
#[derive(Debug, Clone, Serialize)]
pub struct BookSnapshot {
    pub pair: TokenPair,
    pub bids: Vec<RestingOrderView>,
    pub asks: Vec<RestingOrderView>,
}

/// All resident-order state for one trading pair.
///
/// Exclusively accessed under the pair's lock; nothing here is shared.
#[derive(Debug)]
pub struct PairBook {
    pair: TokenPair,
    bids: SideBook,
    asks: SideBook,
    /// Every order admitted to this pair, including terminal ones, keyed
    /// by fingerprint. Level entries point into this map.
    resident: HashMap<H256, ResidentOrder>,
}

impl PairBook {
    pub fn new(pair: TokenPair) -> Self {
        Self {
            pair,
            bids: SideBook::new(SideOf::Bids),
            asks: SideBook::new(SideOf::Asks),
            resident: HashMap::new(),
        }
    }

    pub fn pair(&self) -> TokenPair {
        self.pair
    }

    /// Whether an order with this fingerprint currently rests here.
    pub fn contains_active(&self, fingerprint: &H256) -> bool {
        self.resident
            .get(fingerprint)
            .is_some_and(|r| r.is_active())
    }

    pub fn resident(&self, fingerprint: &H256) -> Option<&ResidentOrder> {
        self.resident.get(fingerprint)
    }

    /// Admit an order to rest, behind all earlier orders at its price.
    pub fn admit_resting(&mut self, resident: ResidentOrder) {
        let entry = LevelEntry {
            fingerprint: resident.fingerprint,
            signer: resident.order.signer,
            valid_to: resident.order.valid_to,
            remaining: resident.remaining_amount,
        };
        let price = resident.order.limit_price();
        match resident.order.side {
            Side::Buy => self.bids.insert(price, entry),
            Side::Sell => self.asks.insert(price, entry),
        }
        self.resident.insert(resident.fingerprint, resident);
    }

    /// Find the front of the best level crossed by an incoming order,
    /// lazily expiring stale entries encountered on the way.
    pub fn best_crossing(
        &mut self,
        taker_side: Side,
        limit: &LimitPrice,
        now: u64,
    ) -> Option<Candidate> {
        loop {
            let side = match taker_side {
                Side::Buy => &mut self.asks,
                Side::Sell => &mut self.bids,
            };
            let best = side.best_price()?;
            if !side.crosses(limit, &best) {
                return None;
            }

            let level = side.level_mut(&best)?;
            let front = *level.front()?;
            if front.valid_to < now {
                level.pop_front();
                side.prune_level(&best);
                if let Some(resident) = self.resident.get_mut(&front.fingerprint) {
                    resident.expire();
                }
                continue;
            }

            return Some(Candidate {
                fingerprint: front.fingerprint,
                price: best,
                remaining: front.remaining,
            });
        }
    }

    /// Apply a fill to the maker at the front of the level at `price` on
    /// the side opposite the taker. Returns the maker's new remaining.
    pub fn fill_maker(&mut self, taker_side: Side, price: &LimitPrice, amount: U256) -> U256 {
        let side = match taker_side {
            Side::Buy => &mut self.asks,
            Side::Sell => &mut self.bids,
        };
        let level = side.level_mut(price).expect("maker level exists");
        let maker = level.front().expect("maker entry exists").fingerprint;
        let left = level.fill_front(amount);
        side.prune_level(price);

        self.resident
            .get_mut(&maker)
            .expect("maker resident exists")
            .fill(amount);
        left
    }

    /// Total live quantity an incoming order could match right now.
    ///
    /// Expired entries are skipped but not removed; the match loop
    /// retires them when it reaches them.
    pub fn crossing_depth(&self, taker_side: Side, limit: &LimitPrice, now: u64) -> U256 {
        let side = match taker_side {
            Side::Buy => &self.asks,
            Side::Sell => &self.bids,
        };
        let mut total = U256::zero();
        for price in side.prices_best_first() {
            if !side.crosses(limit, &price) {
                break;
            }
            if let Some(level) = side.level(&price) {
                for entry in level.iter() {
                    if entry.valid_to >= now {
                        total = total.saturating_add(entry.remaining);
                    }
                }
            }
        }
        total
    }

    /// Cancel a resident order, removing any leftover remainder from the
    /// book. Terminal orders are left untouched (idempotent no-op).
    /// Returns the resulting status, or None if the fingerprint was never
    /// admitted here.
    pub fn cancel_resident(&mut self, fingerprint: &H256) -> Option<OrderStatus> {
        let resident = self.resident.get_mut(fingerprint)?;
        if resident.status.is_terminal() {
            return Some(resident.status);
        }

        let price = resident.order.limit_price();
        let order_side = resident.order.side;
        resident.cancel();

        let side = match order_side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        };
        side.remove(fingerprint, &price);
        Some(OrderStatus::Cancelled)
    }

    /// Point-in-time snapshot, expiring stale entries first.
    ///
    /// `depth` bounds the number of orders returned per side.
    pub fn snapshot(&mut self, now: u64, depth: usize) -> BookSnapshot {
        Self::expire_side(&mut self.bids, &mut self.resident, now);
        Self::expire_side(&mut self.asks, &mut self.resident, now);

        BookSnapshot {
            pair: self.pair,
            bids: Self::side_view(&self.bids, &self.resident, depth),
            asks: Self::side_view(&self.asks, &self.resident, depth),
        }
    }

    fn expire_side(side: &mut SideBook, resident: &mut HashMap<H256, ResidentOrder>, now: u64) {
        let mut stale: Vec<(LimitPrice, H256)> = Vec::new();
        for price in side.prices_best_first() {
            if let Some(level) = side.level(&price) {
                for entry in level.iter() {
                    if entry.valid_to < now {
                        stale.push((price, entry.fingerprint));
                    }
                }
            }
        }
        for (price, fingerprint) in stale {
            side.remove(&fingerprint, &price);
            if let Some(r) = resident.get_mut(&fingerprint) {
                r.expire();
            }
        }
    }

    fn side_view(
        side: &SideBook,
        resident: &HashMap<H256, ResidentOrder>,
        depth: usize,
    ) -> Vec<RestingOrderView> {
        let mut out = Vec::new();
        'levels: for price in side.prices_best_first() {
            let Some(level) = side.level(&price) else {
                continue;
            };
            for entry in level.iter() {
                if out.len() == depth {
                    break 'levels;
                }
                let admitted_at = resident
                    .get(&entry.fingerprint)
                    .map(|r| r.admitted_at)
                    .unwrap_or_default();
                out.push(RestingOrderView {
                    fingerprint: entry.fingerprint,
                    signer: entry.signer,
                    price,
                    remaining_amount: entry.remaining,
                    admitted_at,
                });
            }
        }
        out
    }
}
