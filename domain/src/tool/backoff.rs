//! Retry delay computation.
//!
//! `delay(retry) = min(max_delay, base_delay * factor^retry) * jitter`
//!
//! `retry` is zero-based (the delay before the first retry uses `retry = 0`)
//! and `jitter` is drawn from `[1, 2)` by a [`JitterSource`]. Randomness is
//! injected so the executor stays deterministic under test.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Exponential backoff parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackoffPolicy {
    /// Delay before the first retry (before jitter)
    pub base_delay: Duration,
    /// Growth factor per retry
    pub factor: f64,
    /// Upper bound applied before jitter
    pub max_delay: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_millis(1000),
            factor: 2.0,
            max_delay: Duration::from_secs(30),
        }
    }
}

impl BackoffPolicy {
    pub fn new(base_delay: Duration, factor: f64, max_delay: Duration) -> Self {
        Self {
            base_delay,
            factor,
            max_delay,
        }
    }

    /// Compute the delay before retry number `retry` (zero-based).
    ///
    /// Jitter outside `[1, 2)` is clamped into range.
    pub fn delay(&self, retry: u32, jitter: f64) -> Duration {
        let base_ms = self.base_delay.as_secs_f64() * 1000.0;
        let max_ms = self.max_delay.as_secs_f64() * 1000.0;
        let exponent = i32::try_from(retry).unwrap_or(i32::MAX);
        let grown = base_ms * self.factor.max(1.0).powi(exponent);
        let capped = if grown.is_finite() { grown.min(max_ms) } else { max_ms };
        let jitter = if jitter.is_finite() {
            jitter.clamp(1.0, 2.0)
        } else {
            1.0
        };
        Duration::from_nanos(((capped * jitter).max(0.0) * 1_000_000.0).round() as u64)
    }
}

/// Source of the randomized jitter multiplier, in `[1, 2)`.
pub trait JitterSource: Send + Sync {
    fn jitter(&self) -> f64;
}

/// Jitter source that always returns `1.0` (pure exponential backoff).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoJitter;

impl JitterSource for NoJitter {
    fn jitter(&self) -> f64 {
        1.0
    }
}

/// Jitter source returning a fixed multiplier.
#[derive(Debug, Clone, Copy)]
pub struct FixedJitter(pub f64);

impl JitterSource for FixedJitter {
    fn jitter(&self) -> f64 {
        self.0
    }
}
