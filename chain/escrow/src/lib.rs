//! Escrow contract logic for custodial settlement
//!
//! Models the on-chain side of a trade: per-instance lifecycle from
//! deposit through confirmation, arbiter-signed release, or refund.
//! Transitions are strict; the state check itself is the guard that
//! makes double-release and release-after-refund impossible.
//!
//! # Modules
//! - `errors`: escrow and vault error types
//! - `events`: emitted contract events (name + trade id, amount, party)
//! - `vault`: overflow-checked per-(holder, token) balances
//! - `instance`: one escrow instance and its state machine
//! - `contract`: the deployed contract holding instances, funds, events

pub mod contract;
pub mod errors;
pub mod events;
pub mod instance;
pub mod vault;

pub use contract::EscrowContract;
pub use errors::{EscrowError, VaultError};
pub use events::EscrowEvent;
pub use instance::{EscrowInstance, EscrowState};
pub use vault::TokenVault;
