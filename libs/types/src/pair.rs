//! Trading pair and limit price types
//!
//! Prices are exact rationals (quote units per base unit) compared by
//! 512-bit cross multiplication. No floating point enters matching, so
//! comparisons are deterministic across platforms.

use ethers::types::{Address, U256};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A normalized trading pair.
///
/// A `Sell`-side order sells `base` for `quote`; a `Buy`-side order sells
/// `quote` for `base`. Both sides of the same market share one pair value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenPair {
    pub base: Address,
    pub quote: Address,
}

impl TokenPair {
    pub fn new(base: Address, quote: Address) -> Self {
        Self { base, quote }
    }
}

impl fmt::Display for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}/{:?}", self.base, self.quote)
    }
}

/// An exact rational limit price: `numerator` quote units per
/// `denominator` base units.
///
/// Ordering and equality are value-based via cross multiplication in 512
/// bits, so `2/4` and `1/2` compare equal and `a * d` can never overflow.
/// `Hash` is deliberately not implemented (it could not agree with `Eq`
/// across representations).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LimitPrice {
    numerator: U256,
    denominator: U256,
}

impl LimitPrice {
    /// Create a new limit price.
    ///
    /// # Panics
    /// Panics if `denominator` is zero.
    pub fn new(numerator: U256, denominator: U256) -> Self {
        assert!(!denominator.is_zero(), "limit price denominator must be nonzero");
        Self {
            numerator,
            denominator,
        }
    }

    /// Try to create a limit price, returning None for a zero denominator.
    pub fn try_new(numerator: U256, denominator: U256) -> Option<Self> {
        if denominator.is_zero() {
            None
        } else {
            Some(Self {
                numerator,
                denominator,
            })
        }
    }

    /// Quote units per `denominator` base units.
    pub fn numerator(&self) -> U256 {
        self.numerator
    }

    /// Base units the numerator is quoted against.
    pub fn denominator(&self) -> U256 {
        self.denominator
    }
}

impl PartialEq for LimitPrice {
    fn eq(&self, other: &Self) -> bool {
        self.numerator.full_mul(other.denominator) == other.numerator.full_mul(self.denominator)
    }
}

impl Eq for LimitPrice {}

impl PartialOrd for LimitPrice {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LimitPrice {
    fn cmp(&self, other: &Self) -> Ordering {
        self.numerator
            .full_mul(other.denominator)
            .cmp(&other.numerator.full_mul(self.denominator))
    }
}

impl fmt::Display for LimitPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(byte: u8) -> Address {
        Address::from([byte; 20])
    }

    fn price(n: u64, d: u64) -> LimitPrice {
        LimitPrice::new(U256::from(n), U256::from(d))
    }

    #[test]
    fn test_pair_equality() {
        let pair1 = TokenPair::new(addr(1), addr(2));
        let pair2 = TokenPair::new(addr(1), addr(2));
        let pair3 = TokenPair::new(addr(2), addr(1));
        assert_eq!(pair1, pair2);
        assert_ne!(pair1, pair3);
    }

    #[test]
    fn test_price_ordering() {
        assert!(price(2, 1) > price(1, 1));
        assert!(price(1, 2) < price(1, 1));
        assert!(price(3, 2) > price(4, 3));
    }

    #[test]
    fn test_price_cross_representation_equality() {
        assert_eq!(price(1, 2), price(2, 4));
        assert_eq!(price(10, 5), price(2, 1));
    }

    #[test]
    #[should_panic(expected = "denominator must be nonzero")]
    fn test_price_zero_denominator_panics() {
        LimitPrice::new(U256::from(1), U256::zero());
    }

    #[test]
    fn test_price_try_new() {
        assert!(LimitPrice::try_new(U256::from(1), U256::zero()).is_none());
        assert!(LimitPrice::try_new(U256::from(1), U256::from(2)).is_some());
    }

    #[test]
    fn test_price_no_overflow_at_extremes() {
        // Cross multiplication of two near-max prices must not panic.
        let a = LimitPrice::new(U256::MAX, U256::from(1));
        let b = LimitPrice::new(U256::from(1), U256::MAX);
        assert!(a > b);
        assert_eq!(a.cmp(&a), Ordering::Equal);
    }

    #[test]
    fn test_price_serialization() {
        let p = price(50, 3);
        let json = serde_json::to_string(&p).unwrap();
        let restored: LimitPrice = serde_json::from_str(&json).unwrap();
        assert_eq!(p, restored);
    }
}
