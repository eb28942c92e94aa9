//! Append-only settlement ledger
//!
//! Sole owner of executed-trade records. Inserts are append-only and
//! guarded by a uniqueness constraint on `(buy_order, sell_order,
//! sequence)` plus a never-reused sequence number, so one matching run
//! can never emit the same trade twice. Sequence numbers are assigned by
//! the matching executor; pairs match in parallel, so records may arrive
//! out of numeric order — reuse is the invariant, not arrival order.

use crate::journal::{read_journal, JournalEntry, JournalError, JournalWriter};
use crate::query::TradeFilter;
use ethers::types::H256;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;
use types::trade::Trade;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Duplicate trade: buy {buy:?} / sell {sell:?} at sequence {sequence}")]
    DuplicateTrade {
        buy: H256,
        sell: H256,
        sequence: u64,
    },

    #[error("Sequence {sequence} already recorded")]
    SequenceReused { sequence: u64 },

    #[error("Journal error: {0}")]
    Journal(#[from] JournalError),

    #[error("Trade serialization failed: {0}")]
    Serialization(String),
}

/// Append-only trade ledger with optional journal persistence.
#[derive(Debug)]
pub struct SettlementLedger {
    trades: Vec<Trade>,
    keys: HashSet<(H256, H256, u64)>,
    sequences: HashSet<u64>,
    journal: Option<JournalWriter>,
}

impl SettlementLedger {
    /// Create a memory-only ledger.
    pub fn in_memory() -> Self {
        Self {
            trades: Vec::new(),
            keys: HashSet::new(),
            sequences: HashSet::new(),
            journal: None,
        }
    }

    /// Open a journal-backed ledger, replaying any existing entries.
    pub fn with_journal(path: impl AsRef<Path>) -> Result<Self, LedgerError> {
        let mut ledger = Self::in_memory();

        for entry in read_journal(&path)? {
            let trade: Trade = bincode::deserialize(&entry.payload)
                .map_err(|e| LedgerError::Serialization(e.to_string()))?;
            // Journal is still unset here, so this is a pure replay
            ledger.record(trade)?;
        }

        ledger.journal = Some(JournalWriter::open(path)?);
        Ok(ledger)
    }

    /// Append one trade. Never mutates or deletes existing records.
    ///
    /// The journal write happens before the in-memory insert: a crash in
    /// between leaves the entry on disk, where the next open replays it.
    pub fn record(&mut self, trade: Trade) -> Result<(), LedgerError> {
        self.check_unique(&trade)?;

        if let Some(journal) = &mut self.journal {
            let payload = bincode::serialize(&trade)
                .map_err(|e| LedgerError::Serialization(e.to_string()))?;
            journal.append(&JournalEntry::new(
                trade.sequence,
                trade.executed_at,
                payload,
            ))?;
        }

        self.insert_unchecked(trade);
        Ok(())
    }

    /// Read-only projection of all trades passing `filter`.
    pub fn query(&self, filter: &TradeFilter) -> Vec<Trade> {
        self.trades
            .iter()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.trades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    fn check_unique(&self, trade: &Trade) -> Result<(), LedgerError> {
        let key = trade.uniqueness_key();
        if self.keys.contains(&key) {
            return Err(LedgerError::DuplicateTrade {
                buy: key.0,
                sell: key.1,
                sequence: key.2,
            });
        }
        if self.sequences.contains(&trade.sequence) {
            return Err(LedgerError::SequenceReused {
                sequence: trade.sequence,
            });
        }
        Ok(())
    }

    fn insert_unchecked(&mut self, trade: Trade) {
        self.keys.insert(trade.uniqueness_key());
        self.sequences.insert(trade.sequence);
        self.trades.push(trade);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::types::{Address, U256};
    use tempfile::tempdir;
    use types::pair::{LimitPrice, TokenPair};

    fn pair() -> TokenPair {
        TokenPair::new(Address::from([1; 20]), Address::from([2; 20]))
    }

    fn trade(sequence: u64) -> Trade {
        Trade::new(
            sequence,
            pair(),
            H256::from([0xB0; 32]),
            H256::from([0x50; 32]),
            U256::from(10u64),
            LimitPrice::new(U256::from(2u64), U256::from(1u64)),
            1_700_000_000 + sequence,
        )
    }

    #[test]
    fn test_record_and_query() {
        let mut ledger = SettlementLedger::in_memory();
        ledger.record(trade(1)).unwrap();
        ledger.record(trade(2)).unwrap();

        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.query(&TradeFilter::default()).len(), 2);
        assert_eq!(ledger.query(&TradeFilter::by_pair(pair())).len(), 2);
    }

    #[test]
    fn test_duplicate_composite_key_rejected() {
        let mut ledger = SettlementLedger::in_memory();
        let t = trade(1);
        ledger.record(t.clone()).unwrap();

        let result = ledger.record(t);
        assert!(matches!(result, Err(LedgerError::DuplicateTrade { .. })));
        assert_eq!(ledger.len(), 1, "failed insert must not append");
    }

    #[test]
    fn test_sequence_reuse_rejected() {
        let mut ledger = SettlementLedger::in_memory();
        ledger.record(trade(1)).unwrap();

        // Same sequence, different order fingerprints
        let mut other = trade(1);
        other.buy_order = H256::from([0xB1; 32]);
        assert!(matches!(
            ledger.record(other),
            Err(LedgerError::SequenceReused { sequence: 1 })
        ));
    }

    #[test]
    fn test_out_of_order_sequences_accepted() {
        // Pairs match in parallel; arrival order is not the invariant.
        let mut ledger = SettlementLedger::in_memory();
        ledger.record(trade(5)).unwrap();
        ledger.record(trade(3)).unwrap();
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn test_time_range_query() {
        let mut ledger = SettlementLedger::in_memory();
        for seq in 1..=5 {
            ledger.record(trade(seq)).unwrap();
        }

        let filter = TradeFilter::default()
            .between(Some(1_700_000_002), Some(1_700_000_004));
        assert_eq!(ledger.query(&filter).len(), 3);
    }

    #[test]
    fn test_order_query() {
        let mut ledger = SettlementLedger::in_memory();
        ledger.record(trade(1)).unwrap();

        let hits = ledger.query(&TradeFilter::by_order(H256::from([0xB0; 32])));
        assert_eq!(hits.len(), 1);
        let misses = ledger.query(&TradeFilter::by_order(H256::from([0x00; 32])));
        assert!(misses.is_empty());
    }

    #[test]
    fn test_journal_recovery() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("trades.journal");

        {
            let mut ledger = SettlementLedger::with_journal(&path).unwrap();
            ledger.record(trade(1)).unwrap();
            ledger.record(trade(2)).unwrap();
        }

        let recovered = SettlementLedger::with_journal(&path).unwrap();
        assert_eq!(recovered.len(), 2);
        assert_eq!(recovered.trades()[0].sequence, 1);
        assert_eq!(recovered.trades()[1].sequence, 2);
    }

    #[test]
    fn test_journal_recovery_keeps_rejecting_duplicates() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("trades.journal");

        {
            let mut ledger = SettlementLedger::with_journal(&path).unwrap();
            ledger.record(trade(1)).unwrap();
        }

        let mut recovered = SettlementLedger::with_journal(&path).unwrap();
        assert!(matches!(
            recovered.record(trade(1)),
            Err(LedgerError::DuplicateTrade { .. })
        ));
    }
}
