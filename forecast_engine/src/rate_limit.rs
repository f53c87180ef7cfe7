//! Token-bucket rate limiting for upstream calls
//!
//! The weather archive enforces a fixed call budget per rolling window.
//! This runs as an unattended scheduled job with no interactive deadline,
//! so an exhausted budget blocks the caller until the window resets instead
//! of failing.

use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

use crate::error::{EngineError, Result};

#[derive(Debug)]
struct BucketState {
    window_start: Instant,
    used: u32,
}

/// Blocking token bucket: `budget` calls per rolling `period`.
#[derive(Debug)]
pub struct RateLimiter {
    budget: u32,
    period: Duration,
    state: Mutex<BucketState>,
}

impl RateLimiter {
    pub fn new(budget: u32, period: Duration) -> Result<Self> {
        if budget == 0 {
            return Err(EngineError::Data(
                "Rate limit budget must be greater than zero".to_string(),
            ));
        }
        if period.is_zero() {
            return Err(EngineError::Data(
                "Rate limit period must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            budget,
            period,
            state: Mutex::new(BucketState {
                window_start: Instant::now(),
                used: 0,
            }),
        })
    }

    /// `budget` calls per rolling 60-second window.
    pub fn per_minute(budget: u32) -> Result<Self> {
        Self::new(budget, Duration::from_secs(60))
    }

    /// Take one call slot, blocking until the rolling window has room.
    pub fn acquire(&self) {
        loop {
            let wait = {
                let mut state = match self.state.lock() {
                    Ok(guard) => guard,
                    Err(p) => p.into_inner(),
                };
                let now = Instant::now();
                if now.duration_since(state.window_start) >= self.period {
                    state.window_start = now;
                    state.used = 0;
                }
                if state.used < self.budget {
                    state.used += 1;
                    return;
                }
                self.period - now.duration_since(state.window_start)
            };
            thread::sleep(wait);
        }
    }
}
