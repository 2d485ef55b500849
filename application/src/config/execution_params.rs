//! Execution parameters: single tool call control.
//!
//! [`ExecutionParams`] groups the static parameters that control one
//! executor invocation: the per-attempt timeout, the retry budget and the
//! backoff policy used between attempts.

use enzymeml_domain::BackoffPolicy;
use std::time::Duration;

/// Per-call execution parameters.
///
/// | Field | Default |
/// |-------|---------|
/// | `timeout` | 30s |
/// | `retries` | 2 |
/// | `backoff` | 1000ms × 2^n, capped at 30s |
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionParams {
    /// Wall-clock budget of a single attempt.
    pub timeout: Duration,
    /// Additional attempts after the first failure.
    pub retries: u32,
    /// Delay schedule between attempts.
    pub backoff: BackoffPolicy,
}

impl Default for ExecutionParams {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            retries: 2,
            backoff: BackoffPolicy::default(),
        }
    }
}

impl ExecutionParams {
    // ==================== Builder Methods ====================

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    pub fn with_backoff(mut self, backoff: BackoffPolicy) -> Self {
        self.backoff = backoff;
        self
    }

    /// Total number of handler invocations allowed for one call.
    pub fn max_attempts(&self) -> u32 {
        self.retries.saturating_add(1)
    }
}
