//! Logging infrastructure: chain event observers.
//!
//! | Observer | Output |
//! |----------|--------|
//! | [`JsonlChainLogger`] | one JSON object per event in a file |
//! | [`TracingChainObserver`] | `tracing` records |
//! | [`CompositeChainObserver`] | fans out to several observers |
//!
//! All implement the [`ChainObserver`](enzymeml_application::ChainObserver) port.

mod composite;
mod jsonl_logger;
mod tracing_observer;

pub use composite::CompositeChainObserver;
pub use jsonl_logger::JsonlChainLogger;
pub use tracing_observer::TracingChainObserver;
