//! Shared application state

use crate::rate_limit::RateLimiter;
use escrow::EscrowContract;
use orderbook::Exchange;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct AppState {
    pub exchange: Arc<Exchange>,
    /// The contract-execution environment serializes transitions; a
    /// single mutex models that here.
    pub escrow: Arc<Mutex<EscrowContract>>,
    pub rate_limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(exchange: Exchange, escrow: EscrowContract) -> Self {
        Self {
            exchange: Arc::new(exchange),
            escrow: Arc::new(Mutex::new(escrow)),
            rate_limiter: Arc::new(RateLimiter::new()),
        }
    }
}

/// Current time as unix seconds.
pub fn unix_now() -> u64 {
    chrono::Utc::now().timestamp().max(0) as u64
}
