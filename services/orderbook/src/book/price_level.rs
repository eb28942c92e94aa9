//! Price level with FIFO queue
//!
//! A price level holds every resting order at one limit price, in
//! admission order, which is what enforces time priority among equal
//! prices.

use ethers::types::{Address, H256, U256};
use std::collections::VecDeque;

/// One resting order's footprint in a level queue.
#[derive(Debug, Clone, Copy)]
pub struct LevelEntry {
    pub fingerprint: H256,
    pub signer: Address,
    /// Expiry of the underlying order, unix seconds
    pub valid_to: u64,
    /// Unfilled base units
    pub remaining: U256,
}

/// FIFO queue of resting orders at a single price.
#[derive(Debug, Clone, Default)]
pub struct PriceLevel {
    entries: VecDeque<LevelEntry>,
}

impl PriceLevel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry at the back of the queue (time priority).
    pub fn push_back(&mut self, entry: LevelEntry) {
        self.entries.push_back(entry);
    }

    /// Peek the front entry without removing it.
    pub fn front(&self) -> Option<&LevelEntry> {
        self.entries.front()
    }

    /// Pop the front entry.
    pub fn pop_front(&mut self) -> Option<LevelEntry> {
        self.entries.pop_front()
    }

    /// Reduce the front entry's remaining amount by `amount`, removing
    /// the entry when it reaches zero. Returns the new remaining amount.
    ///
    /// # Panics
    /// Panics if the level is empty or `amount` exceeds the front's
    /// remaining quantity.
    pub fn fill_front(&mut self, amount: U256) -> U256 {
        let front = self.entries.front_mut().expect("fill on empty level");
        assert!(amount <= front.remaining, "fill exceeds front remaining");
        front.remaining -= amount;
        let left = front.remaining;
        if left.is_zero() {
            self.entries.pop_front();
        }
        left
    }

    /// Remove an entry anywhere in the queue by fingerprint.
    pub fn remove(&mut self, fingerprint: &H256) -> Option<LevelEntry> {
        let position = self
            .entries
            .iter()
            .position(|e| &e.fingerprint == fingerprint)?;
        self.entries.remove(position)
    }

    /// Sum of remaining amounts, saturating at the type bound.
    pub fn total_remaining(&self) -> U256 {
        self.entries
            .iter()
            .fold(U256::zero(), |acc, e| acc.saturating_add(e.remaining))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterate entries in time priority.
    pub fn iter(&self) -> impl Iterator<Item = &LevelEntry> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(tag: u8, remaining: u64) -> LevelEntry {
        LevelEntry {
            fingerprint: H256::from([tag; 32]),
            signer: Address::from([0xAA; 20]),
            valid_to: 2_000_000_000,
            remaining: U256::from(remaining),
        }
    }

    #[test]
    fn test_fifo_order_preserved() {
        let mut level = PriceLevel::new();
        level.push_back(entry(1, 10));
        level.push_back(entry(2, 20));
        level.push_back(entry(3, 30));

        assert_eq!(level.front().unwrap().fingerprint, H256::from([1; 32]));
        level.pop_front();
        assert_eq!(level.front().unwrap().fingerprint, H256::from([2; 32]));
    }

    #[test]
    fn test_fill_front_partial() {
        let mut level = PriceLevel::new();
        level.push_back(entry(1, 10));

        let left = level.fill_front(U256::from(4u64));
        assert_eq!(left, U256::from(6u64));
        assert_eq!(level.len(), 1);
    }

    #[test]
    fn test_fill_front_complete_removes_entry() {
        let mut level = PriceLevel::new();
        level.push_back(entry(1, 10));
        level.push_back(entry(2, 20));

        let left = level.fill_front(U256::from(10u64));
        assert!(left.is_zero());
        assert_eq!(level.len(), 1);
        assert_eq!(level.front().unwrap().fingerprint, H256::from([2; 32]));
    }

    #[test]
    #[should_panic(expected = "fill exceeds front remaining")]
    fn test_fill_front_overfill_panics() {
        let mut level = PriceLevel::new();
        level.push_back(entry(1, 10));
        level.fill_front(U256::from(11u64));
    }

    #[test]
    fn test_remove_middle_entry() {
        let mut level = PriceLevel::new();
        level.push_back(entry(1, 10));
        level.push_back(entry(2, 20));
        level.push_back(entry(3, 30));

        let removed = level.remove(&H256::from([2; 32])).unwrap();
        assert_eq!(removed.remaining, U256::from(20u64));
        assert_eq!(level.len(), 2);
        assert!(level.remove(&H256::from([2; 32])).is_none());
    }

    #[test]
    fn test_total_remaining() {
        let mut level = PriceLevel::new();
        level.push_back(entry(1, 10));
        level.push_back(entry(2, 20));
        assert_eq!(level.total_remaining(), U256::from(30u64));
    }
}
