//! Scheduler parameters: batch fan-out control.

use std::time::Duration;

/// Rate-limit window for task starts.
///
/// At most `max_tasks` executor invocations may start within one
/// `interval`. With `carry_over`, tasks still running when a window closes
/// count against the next window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimit {
    pub max_tasks: usize,
    pub interval: Duration,
    pub carry_over: bool,
}

impl RateLimit {
    pub fn new(max_tasks: usize, interval: Duration) -> Self {
        Self {
            max_tasks,
            interval,
            carry_over: false,
        }
    }

    pub fn with_carry_over(mut self, carry_over: bool) -> Self {
        self.carry_over = carry_over;
        self
    }
}

/// Concurrency control for one batch of tool calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerParams {
    /// Maximum number of executor invocations running at once.
    pub concurrency: usize,
    /// Optional start-rate window.
    pub rate_limit: Option<RateLimit>,
}

impl Default for SchedulerParams {
    fn default() -> Self {
        Self {
            concurrency: 2,
            rate_limit: None,
        }
    }
}

impl SchedulerParams {
    // ==================== Builder Methods ====================

    /// Set the concurrency cap. Zero is raised to one.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_rate_limit(mut self, rate_limit: RateLimit) -> Self {
        self.rate_limit = Some(rate_limit);
        self
    }

    /// Effective cap, never zero.
    pub fn cap(&self) -> usize {
        self.concurrency.max(1)
    }
}
