//! Configuration file loading for enzymeml-llm
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `ENZYMEML_` environment variables (`__` separates nested keys)
//! 2. `--config <path>` specified file
//! 3. Project root: `./enzymeml.toml` or `./.enzymeml.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/enzymeml-llm/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileChainConfig, FileConfig, FileDatabaseUrls, FileDatabasesConfig,
    FileLoggingConfig, FileRateLimitConfig, FileRetryConfig, FileSchedulerConfig,
};
pub use loader::ConfigLoader;
