//! Scheduler configuration from TOML (`[scheduler]` section)

use enzymeml_application::{RateLimit, SchedulerParams};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw scheduler configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSchedulerConfig {
    /// Maximum number of tool calls running at once
    pub concurrency: usize,
    /// Optional start-rate limit
    pub rate_limit: Option<FileRateLimitConfig>,
}

impl Default for FileSchedulerConfig {
    fn default() -> Self {
        Self {
            concurrency: 2,
            rate_limit: None,
        }
    }
}

/// `[scheduler.rate_limit]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRateLimitConfig {
    /// Calls allowed to start per window
    pub max_tasks: usize,
    /// Window length in milliseconds
    pub interval_ms: u64,
    /// Count calls still running against the next window
    pub carry_over: bool,
}

impl Default for FileRateLimitConfig {
    fn default() -> Self {
        Self {
            max_tasks: 5,
            interval_ms: 1000,
            carry_over: false,
        }
    }
}

impl FileSchedulerConfig {
    pub fn to_params(&self) -> SchedulerParams {
        let params = SchedulerParams::default().with_concurrency(self.concurrency);
        match &self.rate_limit {
            Some(limit) => params.with_rate_limit(
                RateLimit::new(limit.max_tasks, Duration::from_millis(limit.interval_ms))
                    .with_carry_over(limit.carry_over),
            ),
            None => params,
        }
    }
}
