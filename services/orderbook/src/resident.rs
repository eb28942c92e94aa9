//! Resident orders — admitted orders actively tracked by the book

use ethers::types::{H256, U256};
use serde::Serialize;
use types::order::{Order, OrderStatus};

/// An admitted order plus its mutable server-side state.
///
/// Owned exclusively by the pair book; mutated only by the matching
/// algorithm or an explicit cancel/expire. The original order fields are
/// never touched, so the fingerprint and signature remain valid evidence
/// of intent for the audit trail.
#[derive(Debug, Clone, Serialize)]
pub struct ResidentOrder {
    pub order: Order,
    pub fingerprint: H256,
    /// Unfilled quantity in base units of the pair
    pub remaining_amount: U256,
    pub status: OrderStatus,
    /// Admission time, unix seconds
    pub admitted_at: u64,
}

impl ResidentOrder {
    pub fn new(order: Order, fingerprint: H256, remaining_amount: U256, admitted_at: u64) -> Self {
        let status = if remaining_amount < order.base_amount() {
            OrderStatus::PartiallyFilled
        } else {
            OrderStatus::Open
        };
        Self {
            order,
            fingerprint,
            remaining_amount,
            status,
            admitted_at,
        }
    }

    /// Apply a fill of `amount` base units.
    ///
    /// # Panics
    /// Panics if the fill exceeds the remaining amount.
    pub fn fill(&mut self, amount: U256) {
        assert!(
            amount <= self.remaining_amount,
            "fill exceeds remaining amount"
        );
        self.remaining_amount -= amount;
        self.status = if self.remaining_amount.is_zero() {
            OrderStatus::Filled
        } else {
            OrderStatus::PartiallyFilled
        };
    }

    /// Transition to cancelled. Caller checks authorization.
    pub fn cancel(&mut self) {
        debug_assert!(!self.status.is_terminal());
        self.status = OrderStatus::Cancelled;
    }

    /// Transition to expired.
    pub fn expire(&mut self) {
        debug_assert!(!self.status.is_terminal());
        self.status = OrderStatus::Expired;
    }

    /// Whether the order still rests in the book.
    pub fn is_active(&self) -> bool {
        !self.status.is_terminal()
    }
}
