//! Raw TOML configuration data types
//!
//! These structs mirror the TOML file exactly. Every section is optional;
//! missing keys fall back to the same defaults the application layer uses.

mod chain;
mod databases;
mod logging;
mod retry;
mod scheduler;

pub use chain::FileChainConfig;
pub use databases::{FileDatabaseUrls, FileDatabasesConfig};
pub use logging::FileLoggingConfig;
pub use retry::FileRetryConfig;
pub use scheduler::{FileRateLimitConfig, FileSchedulerConfig};

use enzymeml_application::ChainConfig;
use enzymeml_domain::Database;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A problem found while validating a loaded configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    #[error("chain.depth ({depth}) must be between 1 and chain.total_depth ({total_depth})")]
    InvalidDepth { depth: usize, total_depth: usize },

    #[error("scheduler.concurrency must be at least 1")]
    ZeroConcurrency,

    #[error("scheduler.rate_limit: {0}")]
    InvalidRateLimit(String),

    #[error("{field} must be greater than zero")]
    ZeroDuration { field: &'static str },

    #[error("retry.factor must be a finite number >= 1, got {0}")]
    InvalidBackoffFactor(f64),

    #[error("retry.base_delay_ms ({base}) exceeds retry.max_delay_ms ({max})")]
    InvalidBackoffRange { base: u64, max: u64 },

    #[error("databases.base_urls.{database}: '{url}' is not an http(s) URL")]
    InvalidBaseUrl { database: Database, url: String },
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Depth and correlation settings
    pub chain: FileChainConfig,
    /// Batch concurrency settings
    pub scheduler: FileSchedulerConfig,
    /// Per-call timeout and retry settings
    pub retry: FileRetryConfig,
    /// Record fetcher settings
    pub databases: FileDatabasesConfig,
    /// Event log settings
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected problems.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        let chain = &self.chain;
        if chain.depth == 0 || chain.depth > chain.total_depth {
            errors.push(ConfigValidationError::InvalidDepth {
                depth: chain.depth,
                total_depth: chain.total_depth,
            });
        }

        if self.scheduler.concurrency == 0 {
            errors.push(ConfigValidationError::ZeroConcurrency);
        }
        if let Some(limit) = &self.scheduler.rate_limit {
            if limit.max_tasks == 0 {
                errors.push(ConfigValidationError::InvalidRateLimit(
                    "max_tasks must be at least 1".to_string(),
                ));
            }
            if limit.interval_ms == 0 {
                errors.push(ConfigValidationError::InvalidRateLimit(
                    "interval_ms must be greater than zero".to_string(),
                ));
            }
        }

        let retry = &self.retry;
        if retry.timeout_ms == 0 {
            errors.push(ConfigValidationError::ZeroDuration {
                field: "retry.timeout_ms",
            });
        }
        if !retry.factor.is_finite() || retry.factor < 1.0 {
            errors.push(ConfigValidationError::InvalidBackoffFactor(retry.factor));
        }
        if retry.base_delay_ms > retry.max_delay_ms {
            errors.push(ConfigValidationError::InvalidBackoffRange {
                base: retry.base_delay_ms,
                max: retry.max_delay_ms,
            });
        }

        if self.databases.timeout_seconds == 0 {
            errors.push(ConfigValidationError::ZeroDuration {
                field: "databases.timeout_seconds",
            });
        }
        for database in Database::ALL {
            if let Some(url) = self.databases.base_urls.get(database)
                && !(url.starts_with("http://") || url.starts_with("https://"))
            {
                errors.push(ConfigValidationError::InvalidBaseUrl {
                    database,
                    url: url.to_string(),
                });
            }
        }

        errors
    }

    /// Convert to the application's chain configuration.
    ///
    /// Fails with the first validation problem, if any.
    pub fn to_chain_config(&self) -> Result<ChainConfig, ConfigValidationError> {
        if let Some(error) = self.validate().into_iter().next() {
            return Err(error);
        }

        let mut config = ChainConfig::default()
            .with_depth(self.chain.depth, self.chain.total_depth)
            .with_execution(self.retry.to_params())
            .with_scheduler(self.scheduler.to_params());
        if let Some(id) = &self.chain.conversation_id {
            config = config.with_conversation_id(id);
        }
        Ok(config)
    }
}
