//! Settlement Service
//!
//! Append-only record of executed trades. Records are never mutated or
//! deleted; the ledger exists for audit, reconciliation, and idempotence
//! checks. An optional binary journal persists every record with a
//! CRC32C checksum and is replayed at startup.

pub mod journal;
pub mod ledger;
pub mod query;

pub use ledger::{LedgerError, SettlementLedger};
pub use query::TradeFilter;
