//! Escrow contract events
//!
//! Immutable records emitted by contract operations. Observers consume
//! these by name plus the indexed fields `trade_id`, `amount`, `party`.

use ethers::types::{Address, H256, U256};
use serde::{Deserialize, Serialize};
use types::ids::EscrowId;

/// Instance created, awaiting the depositor's funds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowCreated {
    pub instance_id: EscrowId,
    pub trade_id: H256,
    pub amount: U256,
    /// The designated depositor
    pub party: Address,
}

/// Exact deposit received; custody holds the funds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowDeposited {
    pub instance_id: EscrowId,
    pub trade_id: H256,
    pub amount: U256,
    /// Who deposited
    pub party: Address,
}

/// Custody released; the instance is complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowReleased {
    pub instance_id: EscrowId,
    pub trade_id: H256,
    pub amount: U256,
    /// Who received the funds
    pub party: Address,
}

/// Custody returned to the depositor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowRefunded {
    pub instance_id: EscrowId,
    pub trade_id: H256,
    pub amount: U256,
    /// The refunded depositor
    pub party: Address,
}

/// Enum wrapper for all escrow events, enabling uniform handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EscrowEvent {
    Created(EscrowCreated),
    Deposited(EscrowDeposited),
    Released(EscrowReleased),
    Refunded(EscrowRefunded),
}

impl EscrowEvent {
    /// Event name as observers see it.
    pub fn name(&self) -> &'static str {
        match self {
            EscrowEvent::Created(_) => "EscrowCreated",
            EscrowEvent::Deposited(_) => "EscrowDeposited",
            EscrowEvent::Released(_) => "EscrowReleased",
            EscrowEvent::Refunded(_) => "EscrowRefunded",
        }
    }

    pub fn instance_id(&self) -> EscrowId {
        match self {
            EscrowEvent::Created(e) => e.instance_id,
            EscrowEvent::Deposited(e) => e.instance_id,
            EscrowEvent::Released(e) => e.instance_id,
            EscrowEvent::Refunded(e) => e.instance_id,
        }
    }

    pub fn trade_id(&self) -> H256 {
        match self {
            EscrowEvent::Created(e) => e.trade_id,
            EscrowEvent::Deposited(e) => e.trade_id,
            EscrowEvent::Released(e) => e.trade_id,
            EscrowEvent::Refunded(e) => e.trade_id,
        }
    }

    pub fn amount(&self) -> U256 {
        match self {
            EscrowEvent::Created(e) => e.amount,
            EscrowEvent::Deposited(e) => e.amount,
            EscrowEvent::Released(e) => e.amount,
            EscrowEvent::Refunded(e) => e.amount,
        }
    }

    pub fn party(&self) -> Address {
        match self {
            EscrowEvent::Created(e) => e.party,
            EscrowEvent::Deposited(e) => e.party,
            EscrowEvent::Released(e) => e.party,
            EscrowEvent::Refunded(e) => e.party,
        }
    }
}
