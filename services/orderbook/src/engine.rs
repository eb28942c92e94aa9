//! Exchange engine
//!
//! Coordinates admission, matching, and settlement recording. Each pair
//! is guarded by its own mutex; admission through trade recording runs
//! entirely inside that lock, so two orders racing against the same
//! resting order can never both consume its remainder. Orders on
//! different pairs proceed in parallel.

use crate::book::{BookSnapshot, PairBook};
use crate::matching::{MatchError, MatchExecutor};
use crate::resident::ResidentOrder;
use dashmap::DashMap;
use ethers::types::{Address, H256, U256};
use serde::Serialize;
use settlement::{LedgerError, SettlementLedger, TradeFilter};
use signing::verify::{verify_order, SigningError};
use signing::{Eip712Domain, OrderCodec};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use types::order::{Order, OrderStatus, Side};
use types::pair::TokenPair;
use types::trade::Trade;

/// Order book errors
#[derive(Error, Debug)]
pub enum BookError {
    #[error("Signature verification failed: recovered signer does not match")]
    InvalidSignature,

    #[error("Signature error: {0}")]
    Signing(#[from] SigningError),

    #[error("Order expired at {valid_to}")]
    Expired { valid_to: u64 },

    #[error("Order with this fingerprint is already resident")]
    Duplicate,

    #[error("Fill-or-kill order cannot be fully matched")]
    Unfillable,

    #[error("Order not found: {fingerprint:?}")]
    NotFound { fingerprint: H256 },

    #[error("Requester is not the order's signer")]
    Unauthorized,

    #[error("Match execution failed: {0}")]
    Match(#[from] MatchError),

    #[error("Ledger rejected trade: {0}")]
    Ledger(#[from] LedgerError),
}

/// Result of one order submission.
#[derive(Debug, Clone, Serialize)]
pub struct Submission {
    pub fingerprint: H256,
    pub pair: TokenPair,
    pub signer: Address,
    pub trades: Vec<Trade>,
    /// Unfilled base units left after matching
    pub remaining_amount: U256,
    pub status: OrderStatus,
}

/// The venue's order intake and matching engine.
pub struct Exchange {
    domain: Eip712Domain,
    books: DashMap<TokenPair, Arc<Mutex<PairBook>>>,
    /// Prior submissions by fingerprint; makes retransmission idempotent.
    admissions: DashMap<H256, Submission>,
    executor: MatchExecutor,
    ledger: Arc<Mutex<SettlementLedger>>,
}

impl Exchange {
    pub fn new(domain: Eip712Domain, ledger: SettlementLedger) -> Self {
        Self {
            domain,
            books: DashMap::new(),
            admissions: DashMap::new(),
            executor: MatchExecutor::new(1),
            ledger: Arc::new(Mutex::new(ledger)),
        }
    }

    pub fn domain(&self) -> &Eip712Domain {
        &self.domain
    }

    /// Submit a signed order: verify, admit, match, record.
    ///
    /// Retransmission of an already-admitted order returns the prior
    /// result instead of erroring.
    pub fn submit(&self, order: Order, signature: &str, now: u64) -> Result<Submission, BookError> {
        let fingerprint = OrderCodec::fingerprint(&order, &self.domain)
            .map_err(SigningError::from)?;

        if let Some(prior) = self.admissions.get(&fingerprint) {
            return Ok(prior.clone());
        }

        if !verify_order(&order, signature, order.signer, &self.domain)? {
            return Err(BookError::InvalidSignature);
        }
        if order.is_expired(now) {
            return Err(BookError::Expired {
                valid_to: order.valid_to,
            });
        }

        let pair = order.pair();
        let book = self.pair_book(pair);
        let mut book = book.lock().expect("pair lock poisoned");

        if book.contains_active(&fingerprint) {
            return Err(BookError::Duplicate);
        }

        let incoming_amount = order.base_amount();
        let limit = order.limit_price();

        // All-or-nothing orders are checked against live crossing depth
        // before any trade executes, so a partial rest can never leak in.
        if !order.partially_fillable
            && book.crossing_depth(order.side, &limit, now) < incoming_amount
        {
            return Err(BookError::Unfillable);
        }

        let mut remaining = incoming_amount;
        let mut trades = Vec::new();
        while !remaining.is_zero() {
            let Some(candidate) = book.best_crossing(order.side, &limit, now) else {
                break;
            };
            let traded = remaining.min(candidate.remaining);
            let (buy_order, sell_order) = match order.side {
                Side::Buy => (fingerprint, candidate.fingerprint),
                Side::Sell => (candidate.fingerprint, fingerprint),
            };
            // Execution price is the maker's price
            let trade = self.executor.execute_trade(
                pair,
                buy_order,
                sell_order,
                traded,
                candidate.price,
                now,
            )?;
            book.fill_maker(order.side, &candidate.price, traded);
            trades.push(trade);
            remaining -= traded;
        }

        // Record while still holding the pair lock so admit → match →
        // record is one atomic unit per pair.
        {
            let mut ledger = self.ledger.lock().expect("ledger lock poisoned");
            for trade in &trades {
                ledger.record(trade.clone())?;
            }
        }

        let status = if remaining.is_zero() {
            OrderStatus::Filled
        } else {
            let resident = ResidentOrder::new(order.clone(), fingerprint, remaining, now);
            let status = resident.status;
            book.admit_resting(resident);
            status
        };

        let submission = Submission {
            fingerprint,
            pair,
            signer: order.signer,
            trades,
            remaining_amount: remaining,
            status,
        };
        self.admissions.insert(fingerprint, submission.clone());
        Ok(submission)
    }

    /// Cancel a resident order on behalf of `requester`.
    ///
    /// Best-effort: a match that already consumed quantity stands, and
    /// the cancel applies to the leftover remainder. Doubly-sent cancels
    /// are no-ops. Fails with `Unauthorized` unless the requester is the
    /// order's signer.
    pub fn cancel(&self, fingerprint: H256, requester: Address) -> Result<OrderStatus, BookError> {
        let Some(prior) = self.admissions.get(&fingerprint) else {
            return Err(BookError::NotFound { fingerprint });
        };
        if prior.signer != requester {
            return Err(BookError::Unauthorized);
        }
        let pair = prior.pair;
        drop(prior);

        let book = self.pair_book(pair);
        let mut book = book.lock().expect("pair lock poisoned");
        match book.cancel_resident(&fingerprint) {
            Some(status) => Ok(status),
            // Admitted but fully matched on entry: nothing rests, no-op.
            None => Ok(OrderStatus::Filled),
        }
    }

    /// Point-in-time book snapshot for a pair.
    pub fn snapshot(&self, pair: TokenPair, depth: usize, now: u64) -> BookSnapshot {
        let book = self.pair_book(pair);
        let mut book = book.lock().expect("pair lock poisoned");
        book.snapshot(now, depth)
    }

    /// Resident-order status lookup by fingerprint.
    pub fn order_status(&self, fingerprint: H256) -> Option<Submission> {
        self.admissions.get(&fingerprint).map(|s| s.clone())
    }

    /// Query the settlement ledger.
    pub fn trades(&self, filter: &TradeFilter) -> Vec<Trade> {
        self.ledger
            .lock()
            .expect("ledger lock poisoned")
            .query(filter)
    }

    fn pair_book(&self, pair: TokenPair) -> Arc<Mutex<PairBook>> {
        self.books
            .entry(pair)
            .or_insert_with(|| Arc::new(Mutex::new(PairBook::new(pair))))
            .clone()
    }
}
