//! Application layer for enzymeml-llm
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{ChainConfig, ExecutionParams, RateLimit, SchedulerParams};
pub use ports::{
    chain_observer::{ChainObserver, FnObserver, NoChainObserver},
    llm_gateway::{Completion, GatewayError, LlmGateway, ProviderStream},
    record_fetcher::{FetchError, RecordFetcher},
    tool_handler::{ToolHandler, handler_fn, sync_handler_fn},
};
#[cfg(any(test, feature = "test-support"))]
pub use ports::chain_observer::RecordingChainObserver;
pub use use_cases::database_search::DatabaseSearchTool;
pub use use_cases::event_sink::EventSink;
pub use use_cases::execute_tool::{RandomJitter, ToolExecutor};
pub use use_cases::extract_data::{ExtractDataInput, ExtractDataOutput, ExtractDataUseCase};
pub use use_cases::run_tool_chain::{ChainError, RunToolChainInput, RunToolChainUseCase};
pub use use_cases::scheduler::Scheduler;
pub use use_cases::stream_aggregator::{
    AggregatedStream, FinalResponse, ItemStream, StreamError, aggregate,
};
pub use use_cases::tool_registry::{ResolvedTool, ToolRegistry};
