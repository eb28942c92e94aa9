//! One escrow instance and its state machine

use ethers::types::{Address, H256, U256};
use ethers::utils::keccak256;
use serde::{Deserialize, Serialize};
use types::ids::EscrowId;

/// Lifecycle state of an escrow instance.
///
/// `Complete` and `Refunded` are terminal: once reached, every further
/// mutating call fails deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EscrowState {
    AwaitingDeposit,
    AwaitingConfirmation,
    Complete,
    Refunded,
}

impl EscrowState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, EscrowState::Complete | EscrowState::Refunded)
    }
}

/// One custodial trade lifecycle.
///
/// Created with `state = AwaitingDeposit`; mutated only by the contract
/// in response to authorized calls. `trade_hash` binds the instance to
/// the off-chain-agreed trade it settles.
#[derive(Debug, Clone, Serialize)]
pub struct EscrowInstance {
    pub instance_id: EscrowId,
    pub depositor: Address,
    pub counterparty: Address,
    pub arbiter: Address,
    pub asset: Address,
    pub amount: U256,
    pub trade_hash: H256,
    pub state: EscrowState,
    /// Unix seconds of instantiation
    pub created_at: u64,
}

impl EscrowInstance {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        depositor: Address,
        counterparty: Address,
        arbiter: Address,
        asset: Address,
        amount: U256,
        trade_hash: H256,
        created_at: u64,
    ) -> Self {
        Self {
            instance_id: EscrowId::new(),
            depositor,
            counterparty,
            arbiter,
            asset,
            amount,
            trade_hash,
            state: EscrowState::AwaitingDeposit,
            created_at,
        }
    }

    /// Deterministic custody account for this instance's funds, derived
    /// from the instance id the way contract-created accounts are.
    pub fn custody_address(&self) -> Address {
        let digest = keccak256(self.instance_id.as_word());
        Address::from_slice(&digest[12..])
    }
}
