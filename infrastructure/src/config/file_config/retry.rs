//! Retry configuration from TOML (`[retry]` section)

use enzymeml_application::ExecutionParams;
use enzymeml_domain::BackoffPolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw retry / timeout configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRetryConfig {
    /// Retries after the first attempt
    pub retries: u32,
    /// Per-attempt timeout in milliseconds
    pub timeout_ms: u64,
    pub base_delay_ms: u64,
    pub factor: f64,
    pub max_delay_ms: u64,
}

impl Default for FileRetryConfig {
    fn default() -> Self {
        Self {
            retries: 2,
            timeout_ms: 30_000,
            base_delay_ms: 1000,
            factor: 2.0,
            max_delay_ms: 30_000,
        }
    }
}

impl FileRetryConfig {
    pub fn to_params(&self) -> ExecutionParams {
        ExecutionParams::default()
            .with_retries(self.retries)
            .with_timeout(Duration::from_millis(self.timeout_ms))
            .with_backoff(BackoffPolicy::new(
                Duration::from_millis(self.base_delay_ms),
                self.factor,
                Duration::from_millis(self.max_delay_ms),
            ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_execution_params() {
        assert_eq!(FileRetryConfig::default().to_params(), ExecutionParams::default());
    }

    #[test]
    fn test_to_params() {
        let retry = FileRetryConfig {
            retries: 0,
            timeout_ms: 50,
            base_delay_ms: 10,
            factor: 3.0,
            max_delay_ms: 100,
        };
        let params = retry.to_params();
        assert_eq!(params.max_attempts(), 1);
        assert_eq!(params.timeout, Duration::from_millis(50));
        assert_eq!(params.backoff.delay(1, 1.0), Duration::from_millis(30));
    }
}
