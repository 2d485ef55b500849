//! Infrastructure layer for enzymeml-llm
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: configuration file loading, chain event
//! observers and (with the `databases` feature) the HTTP record fetcher.

pub mod config;
#[cfg(feature = "databases")]
pub mod databases;
pub mod logging;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileChainConfig, FileConfig, FileDatabasesConfig,
    FileLoggingConfig, FileRetryConfig, FileSchedulerConfig,
};
#[cfg(feature = "databases")]
pub use databases::RestRecordFetcher;
pub use logging::{CompositeChainObserver, JsonlChainLogger, TracingChainObserver};
