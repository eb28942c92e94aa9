//! Token-bucket rate limiting keyed by caller identity

use crate::error::AppError;
use dashmap::DashMap;
use std::time::Instant;

#[derive(Clone)]
struct Bucket {
    capacity: u32,
    tokens: f64,
    refill_per_second: f64,
    last_update: Instant,
}

impl Bucket {
    fn new(capacity: u32, refill_per_second: f64) -> Self {
        Self {
            capacity,
            tokens: capacity as f64,
            refill_per_second,
            last_update: Instant::now(),
        }
    }

    fn try_take(&mut self) -> bool {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_update).as_secs_f64();
        self.tokens = f64::min(
            self.capacity as f64,
            self.tokens + elapsed * self.refill_per_second,
        );
        self.last_update = now;

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

/// Per-key token buckets, e.g. keyed by "signer:endpoint".
pub struct RateLimiter {
    buckets: DashMap<String, Bucket>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self {
            buckets: DashMap::new(),
        }
    }

    pub fn check(&self, key: &str, capacity: u32, refill_per_second: f64) -> Result<(), AppError> {
        let mut bucket = self
            .buckets
            .entry(key.to_string())
            .or_insert_with(|| Bucket::new(capacity, refill_per_second));

        if bucket.try_take() {
            Ok(())
        } else {
            Err(AppError::RateLimitExceeded(key.to_string()))
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}
