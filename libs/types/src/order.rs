//! Order types and lifecycle states

use crate::errors::ValidationError;
use crate::pair::{LimitPrice, TokenPair};
use ethers::types::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

/// Order side
///
/// A `Sell` order sells the pair's base token for quote; a `Buy` order
/// sells quote to acquire base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Get the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }

    /// Numeric tag used in the canonical encoding
    pub fn tag(&self) -> u8 {
        match self {
            Side::Buy => 0,
            Side::Sell => 1,
        }
    }
}

/// How the order's signature was produced.
///
/// `Eip712` signatures are taken directly over the typed-data digest;
/// `EthSign` signatures are taken over the digest wrapped in the
/// `"\x19Ethereum Signed Message:\n32"` prefix that wallets apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SigningScheme {
    Eip712,
    EthSign,
}

impl SigningScheme {
    /// Numeric tag used in the canonical encoding
    pub fn tag(&self) -> u8 {
        match self {
            SigningScheme::Eip712 => 0,
            SigningScheme::EthSign => 1,
        }
    }
}

/// Resident-order status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Admitted and unfilled
    Open,
    /// Some quantity filled, remainder resting
    PartiallyFilled,
    /// Completely filled (terminal)
    Filled,
    /// Cancelled by the signer (terminal)
    Cancelled,
    /// Validity deadline passed (terminal)
    Expired,
}

impl OrderStatus {
    /// Check if status is terminal (no further transitions possible)
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Filled | OrderStatus::Cancelled | OrderStatus::Expired
        )
    }
}

/// A signed intent to exchange a fixed amount of one token for a minimum
/// amount of another.
///
/// Immutable after submission: partial fills decrement a server-side
/// remaining counter, never these fields, so the original hash and
/// signature stay valid evidence of intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub sell_token: Address,
    pub buy_token: Address,
    /// Amount of `sell_token` offered, in base units of that token
    pub sell_amount: U256,
    /// Minimum amount of `buy_token` demanded in return
    pub buy_amount: U256,
    /// Expiry as unix seconds
    pub valid_to: u64,
    /// The identity that authorized this order
    pub signer: Address,
    /// Who receives the proceeds
    pub receiver: Address,
    /// Opaque caller data; hashed into the fingerprint, never interpreted
    pub app_data: Bytes,
    pub fee_amount: U256,
    pub partially_fillable: bool,
    pub side: Side,
    pub signing_scheme: SigningScheme,
    /// Replay-prevention counter chosen by the signer
    pub nonce: u64,
}

impl Order {
    /// Check all field invariants.
    ///
    /// Amounts must be positive, tokens distinct, and the signer nonzero.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.sell_amount.is_zero() {
            return Err(ValidationError::ZeroAmount {
                field: "sell_amount",
            });
        }
        if self.buy_amount.is_zero() {
            return Err(ValidationError::ZeroAmount { field: "buy_amount" });
        }
        if self.sell_token == self.buy_token {
            return Err(ValidationError::IdenticalTokens);
        }
        if self.signer == Address::zero() {
            return Err(ValidationError::ZeroAddress { field: "signer" });
        }
        Ok(())
    }

    /// The normalized pair this order trades on.
    pub fn pair(&self) -> TokenPair {
        match self.side {
            Side::Sell => TokenPair::new(self.sell_token, self.buy_token),
            Side::Buy => TokenPair::new(self.buy_token, self.sell_token),
        }
    }

    /// Limit price in quote units per base unit.
    ///
    /// For a sell this is the minimum acceptable, for a buy the maximum
    /// offered; a buy crosses a sell when buy price >= sell price.
    pub fn limit_price(&self) -> LimitPrice {
        match self.side {
            Side::Sell => LimitPrice::new(self.buy_amount, self.sell_amount),
            Side::Buy => LimitPrice::new(self.sell_amount, self.buy_amount),
        }
    }

    /// Order size denominated in base units of the pair.
    pub fn base_amount(&self) -> U256 {
        match self.side {
            Side::Sell => self.sell_amount,
            Side::Buy => self.buy_amount,
        }
    }

    /// Whether `valid_to` has passed at `now` (unix seconds).
    pub fn is_expired(&self, now: u64) -> bool {
        self.valid_to < now
    }
}
