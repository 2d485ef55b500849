//! Application-level configuration.
//!
//! This module provides configuration types that control how use cases behave:
//!
//! - [`ExecutionParams`]: single call control (timeout, retries, backoff)
//! - [`SchedulerParams`]: batch control (concurrency cap, rate limit)
//! - [`ChainConfig`]: container for a full chain run

pub mod chain_config;
pub mod execution_params;
pub mod scheduler_params;

pub use chain_config::ChainConfig;
pub use execution_params::ExecutionParams;
pub use scheduler_params::{RateLimit, SchedulerParams};
